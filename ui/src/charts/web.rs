//! Chart.js backend. Talks to the global `Chart` class loaded from the CDN.

use dioxus::logger::tracing::{debug, warn};
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::backend::{ChartBackend, RenderStyle};
use super::chartjs;
use super::spec::{ChartSpec, IndexAxis};
use crate::core::format::ValueFormat;
use crate::core::theme::Theme;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    type JsChart;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(canvas: &web_sys::HtmlCanvasElement, config: &JsValue) -> Result<JsChart, JsValue>;

    #[wasm_bindgen(static_method_of = JsChart, js_class = "Chart", js_name = getChart)]
    fn get_chart(canvas: &web_sys::HtmlCanvasElement) -> Option<JsChart>;

    #[wasm_bindgen(method, js_class = "Chart", catch)]
    fn update(this: &JsChart) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_class = "Chart")]
    fn resize(this: &JsChart);

    #[wasm_bindgen(method, js_class = "Chart")]
    fn destroy(this: &JsChart);
}

type TickCallback = Closure<dyn Fn(JsValue) -> JsValue>;

/// A live Chart.js chart plus the Rust callbacks it calls into.
pub struct ChartJsInstance {
    chart: JsChart,
    theme: Theme,
    _callbacks: Vec<TickCallback>,
}

#[derive(Debug, Default)]
pub struct ChartJsBackend;

impl ChartJsBackend {
    pub fn new() -> Self {
        Self
    }
}

fn canvas(canvas_id: &str) -> Option<web_sys::HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(canvas_id)?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, String> {
    js_sys::JSON::parse(&value.to_string()).map_err(|err| format!("{err:?}"))
}

fn get_path(root: &JsValue, path: &[&str]) -> Result<JsValue, String> {
    path.iter().try_fold(root.clone(), |node, key| {
        Reflect::get(&node, &JsValue::from_str(key)).map_err(|err| format!("{key}: {err:?}"))
    })
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), String> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| format!("{key}: {err:?}"))
}

/// Tick labels and tooltip lines formatted in Rust.
fn attach_callbacks(config: &JsValue, spec: &ChartSpec) -> Result<Vec<TickCallback>, String> {
    let mut callbacks = Vec::new();

    for axis in &spec.axes {
        let Some(format) = axis.format else { continue };
        let callback: TickCallback = Closure::new(move |value: JsValue| {
            JsValue::from_str(&format.short(value.as_f64().unwrap_or(f64::NAN)))
        });
        let ticks = get_path(config, &["options", "scales", axis.id.key(), "ticks"])?;
        set(&ticks, "callback", callback.as_ref())?;
        callbacks.push(callback);
    }

    let formats: Vec<ValueFormat> = spec.datasets.iter().map(|d| d.format).collect();
    let value_key = match spec.index_axis {
        IndexAxis::X => "y",
        IndexAxis::Y => "x",
    };
    let label: TickCallback = Closure::new(move |context: JsValue| {
        let index = get_path(&context, &["datasetIndex"])
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as usize;
        let name = get_path(&context, &["dataset", "label"])
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_default();
        let raw = get_path(&context, &["parsed", value_key])
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN);
        let format = formats.get(index).copied().unwrap_or(ValueFormat::Count);
        JsValue::from_str(&format!("{name}: {}", format.long(raw)))
    });
    let tooltip = get_path(config, &["options", "plugins", "tooltip"])?;
    let hooks = js_sys::Object::new();
    set(&hooks, "label", label.as_ref())?;
    set(&tooltip, "callbacks", &hooks)?;
    callbacks.push(label);

    Ok(callbacks)
}

impl ChartBackend for ChartJsBackend {
    type Instance = ChartJsInstance;

    fn has_canvas(&self, canvas_id: &str) -> bool {
        canvas(canvas_id).is_some()
    }

    fn create(
        &mut self,
        canvas_id: &str,
        spec: &ChartSpec,
        style: RenderStyle,
    ) -> Result<ChartJsInstance, String> {
        spec.validate()?;
        let element = canvas(canvas_id).ok_or_else(|| format!("no canvas `{canvas_id}`"))?;

        // A chart left behind on this canvas (hot reload, remount) would
        // make Chart.js refuse the new one.
        if let Some(stale) = JsChart::get_chart(&element) {
            warn!("destroying stray chart on `{canvas_id}`");
            stale.destroy();
        }

        let config = to_js(&chartjs::config(spec, style.theme, style.animation_ms))?;
        let callbacks = attach_callbacks(&config, spec)?;
        let chart = JsChart::new(&element, &config).map_err(|err| format!("{err:?}"))?;
        debug!("Chart.js instance created on `{canvas_id}`");
        Ok(ChartJsInstance {
            chart,
            theme: style.theme,
            _callbacks: callbacks,
        })
    }

    fn update(&mut self, instance: &mut ChartJsInstance, spec: &ChartSpec) -> Result<(), String> {
        spec.validate()?;
        let fresh = to_js(&chartjs::data(spec, instance.theme))?;
        let data = get_path(&instance.chart, &["data"])?;
        set(&data, "labels", &get_path(&fresh, &["labels"])?)?;

        let datasets = get_path(&data, &["datasets"])?;
        let fresh_sets = get_path(&fresh, &["datasets"])?;
        for index in 0..spec.datasets.len() {
            let key = index.to_string();
            let target = get_path(&datasets, &[key.as_str()])?;
            let values = get_path(&fresh_sets, &[key.as_str(), "data"])?;
            set(&target, "data", &values)?;
        }
        instance.chart.update().map_err(|err| format!("{err:?}"))
    }

    fn resize(&mut self, instance: &mut ChartJsInstance) {
        instance.chart.resize();
    }

    fn set_animation(&mut self, instance: &mut ChartJsInstance, duration_ms: u32) {
        let result = get_path(&instance.chart, &["options", "animation"]).and_then(|animation| {
            if animation.is_object() {
                set(&animation, "duration", &JsValue::from(duration_ms))
            } else {
                let options = get_path(&instance.chart, &["options"])?;
                let fresh = js_sys::Object::new();
                set(&fresh, "duration", &JsValue::from(duration_ms))?;
                set(&options, "animation", &fresh)
            }
        });
        if let Err(err) = result {
            warn!("couldn't change chart animation: {err}");
        }
    }

    fn destroy(&mut self, instance: ChartJsInstance) {
        instance.chart.destroy();
    }
}
