//! Page-wide state: the decoded data table, the theme and the toast queue,
//! plus the keyboard shortcuts that act on them.

use std::rc::Rc;

use dioxus::logger::tracing::{error, info, warn};
use dioxus::prelude::*;

use super::notifications::{NotificationTray, Notifications, ToastKind};
use crate::core::{
    config::DashboardConfig,
    platform::{self, EventSource},
    shortcuts::Shortcut,
    storage,
    theme::Theme,
};
use crate::data::DashboardData;
use crate::{export, t};

const THEME_CSS: Asset = asset!("/assets/theme/main.css");
const THEME_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/theme/main.css"
));

/// Shared through context by [`DashboardShell`].
#[derive(Clone)]
pub struct DashboardContext {
    pub data: Result<Rc<DashboardData>, String>,
    pub config: &'static DashboardConfig,
}

impl DashboardContext {
    fn load(config: &'static DashboardConfig) -> Self {
        let data = DashboardData::load(config.seed).map(Rc::new).map_err(|err| {
            error!("dashboard data unavailable: {err}");
            err.to_string()
        });
        Self { data, config }
    }
}

pub fn toggle_theme(mut theme: Signal<Theme>) {
    let next = theme.peek().toggled();
    info!("theme -> {next}");
    theme.set(next);
}

pub fn export_csv_action(data: Option<&DashboardData>, notifications: Notifications) {
    let Some(data) = data else {
        notifications.push(
            ToastKind::Error,
            t!("export-failed", reason = t!("export-no-data")),
        );
        return;
    };
    match export::export_csv(data) {
        Ok(file) => notifications.push(ToastKind::Success, t!("export-csv-done", file = file)),
        Err(err) => {
            warn!("csv export failed: {err}");
            notifications.push(
                ToastKind::Error,
                t!("export-failed", reason = err.to_string()),
            );
        }
    }
}

pub fn export_pdf_action(notifications: Notifications) {
    notifications.push(ToastKind::Info, t!("export-pdf-placeholder"));
}

#[component]
pub fn DashboardShell(children: Element) -> Element {
    let config = DashboardConfig::current();
    let context = use_hook(|| DashboardContext::load(config));
    use_context_provider(|| context.clone());

    let theme = use_signal(|| storage::load_theme(&config.theme_storage_key).unwrap_or_default());
    use_context_provider(|| theme);

    let toasts = use_signal(Vec::new);
    let next_id = use_signal(|| 0u64);
    let notifications =
        use_context_provider(|| Notifications::new(toasts, next_id, config.notification_ms));

    use_effect(move || {
        if let Err(err) = storage::save_theme(&config.theme_storage_key, theme()) {
            warn!("theme not persisted: {err}");
        }
    });

    let data = context.data.clone().ok();
    use_hook(move || {
        Rc::new(platform::listen(EventSource::Document, "keydown", move |event| {
            let Some((key, modifier)) = event.key_press() else {
                return;
            };
            let Some(shortcut) = Shortcut::from_key(modifier, &key) else {
                return;
            };
            event.prevent_default();
            match shortcut {
                Shortcut::ToggleTheme => toggle_theme(theme),
                Shortcut::ExportCsv => export_csv_action(data.as_deref(), notifications),
                Shortcut::ExportPdf => export_pdf_action(notifications),
            }
        }))
    });

    rsx! {
        document::Link { rel: "stylesheet", href: THEME_CSS }
        if cfg!(all(not(debug_assertions), not(target_arch = "wasm32"))) {
            document::Style { "{THEME_CSS_INLINE}" }
        }
        div { class: "app theme-{theme}", "data-theme": "{theme}",
            {children}
            NotificationTray {}
        }
    }
}
