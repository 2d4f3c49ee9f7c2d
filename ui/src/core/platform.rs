//! Browser glue: global event subscriptions, element resize observation, page
//! visibility, dependency
//! checks and service worker registration. Native builds get inert versions
//! so the views compile and render without a DOM.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Window,
    Document,
}

#[cfg(target_arch = "wasm32")]
mod web {
    use dioxus::logger::tracing::{info, warn};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use super::EventSource;

    /// Thin view over a DOM event.
    pub struct DomEvent(web_sys::Event);

    impl DomEvent {
        /// `(key, ctrl_or_meta)` for keyboard events.
        pub fn key_press(&self) -> Option<(String, bool)> {
            let event = self.0.dyn_ref::<web_sys::KeyboardEvent>()?;
            Some((event.key(), event.ctrl_key() || event.meta_key()))
        }

        pub fn prevent_default(&self) {
            self.0.prevent_default();
        }
    }

    /// Removes its listener when dropped.
    pub struct EventSubscription {
        target: web_sys::EventTarget,
        event: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Drop for EventSubscription {
        fn drop(&mut self) {
            let _ = self.target.remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }

    pub fn listen(
        source: EventSource,
        event: &'static str,
        mut handler: impl FnMut(DomEvent) + 'static,
    ) -> Option<EventSubscription> {
        let window = web_sys::window()?;
        let target: web_sys::EventTarget = match source {
            EventSource::Window => window.into(),
            EventSource::Document => window.document()?.into(),
        };
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            handler(DomEvent(event))
        });
        if let Err(err) =
            target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            warn!("couldn't subscribe to `{event}`: {err:?}");
            return None;
        }
        Some(EventSubscription {
            target,
            event,
            callback,
        })
    }

    /// Disconnects its observer when dropped.
    pub struct ResizeWatch {
        observer: web_sys::ResizeObserver,
        _callback: Closure<dyn FnMut(JsValue)>,
    }

    impl Drop for ResizeWatch {
        fn drop(&mut self) {
            self.observer.disconnect();
        }
    }

    /// Call `handler` whenever an element matching `selector` changes size.
    /// `None` when nothing matches or the browser lacks `ResizeObserver`.
    pub fn observe_resize(
        selector: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Option<ResizeWatch> {
        let document = web_sys::window()?.document()?;
        let nodes = document.query_selector_all(selector).ok()?;
        if nodes.length() == 0 {
            warn!("no `{selector}` elements to observe");
            return None;
        }
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_entries: JsValue| handler());
        let observer = match web_sys::ResizeObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                warn!("ResizeObserver unavailable: {err:?}");
                return None;
            }
        };
        for index in 0..nodes.length() {
            if let Some(element) = nodes.get(index).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
                observer.observe(&element);
            }
        }
        Some(ResizeWatch {
            observer,
            _callback: callback,
        })
    }

    pub fn page_hidden() -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .map(|d| d.visibility_state() == web_sys::VisibilityState::Hidden)
            .unwrap_or(false)
    }

    pub fn charting_library_loaded() -> bool {
        js_sys::Reflect::has(&js_sys::global(), &JsValue::from_str("Chart")).unwrap_or(false)
    }

    pub fn reload_page() {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().reload() {
                warn!("reload failed: {err:?}");
            }
        }
    }

    pub fn register_service_worker(script_url: &'static str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let container = window.navigator().service_worker();
        let promise = container.register(script_url);
        wasm_bindgen_futures::spawn_local(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => info!("service worker registered from {script_url}"),
                Err(err) => warn!("service worker registration failed: {err:?}"),
            }
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::EventSource;

    pub struct EventSubscription;

    pub struct DomEvent;

    impl DomEvent {
        pub fn key_press(&self) -> Option<(String, bool)> {
            None
        }

        pub fn prevent_default(&self) {}
    }

    /// There is no event source outside the browser.
    pub fn listen(
        _source: EventSource,
        _event: &'static str,
        _handler: impl FnMut(DomEvent) + 'static,
    ) -> Option<EventSubscription> {
        None
    }

    pub struct ResizeWatch;

    pub fn observe_resize(_selector: &str, _handler: impl FnMut() + 'static) -> Option<ResizeWatch> {
        None
    }

    pub fn page_hidden() -> bool {
        false
    }

    /// The headless chart backend has no external dependency.
    pub fn charting_library_loaded() -> bool {
        true
    }

    pub fn reload_page() {}

    pub fn register_service_worker(_script_url: &'static str) {}
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::*;
#[cfg(target_arch = "wasm32")]
pub use web::*;
