use dioxus::prelude::*;

use crate::core::timing::sleep_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    fn css_class(self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Info => "toast toast--info",
            ToastKind::Error => "toast toast--error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Handle to the toast queue, shared through context.
#[derive(Clone, Copy)]
pub struct Notifications {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
    duration_ms: u32,
}

impl Notifications {
    pub fn new(toasts: Signal<Vec<Toast>>, next_id: Signal<u64>, duration_ms: u32) -> Self {
        Self {
            toasts,
            next_id,
            duration_ms,
        }
    }

    /// Show `message`, removing it again after the configured delay.
    pub fn push(mut self, kind: ToastKind, message: impl Into<String>) {
        let id = *self.next_id.peek();
        self.next_id.set(id + 1);
        self.toasts.write().push(Toast {
            id,
            kind,
            message: message.into(),
        });

        let mut toasts = self.toasts;
        let delay = self.duration_ms;
        spawn(async move {
            sleep_ms(delay).await;
            toasts.write().retain(|toast| toast.id != id);
        });
    }

    pub fn dismiss(mut self, id: u64) {
        self.toasts.write().retain(|toast| toast.id != id);
    }

    pub fn toasts(&self) -> Signal<Vec<Toast>> {
        self.toasts
    }
}

#[component]
pub fn NotificationTray() -> Element {
    let notifications = use_context::<Notifications>();
    let toasts = notifications.toasts();

    rsx! {
        div { class: "toast-tray", role: "status", aria_live: "polite",
            for toast in toasts() {
                div { key: "{toast.id}", class: toast.kind.css_class(),
                    span { class: "toast__message", "{toast.message}" }
                    button {
                        class: "toast__close",
                        aria_label: crate::t!("toast-dismiss"),
                        onclick: move |_| notifications.dismiss(toast.id),
                        "×"
                    }
                }
            }
        }
    }
}
