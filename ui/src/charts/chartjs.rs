//! Pure translation of a [`ChartSpec`] into a Chart.js configuration object.
//!
//! Tick and tooltip callbacks can't live in JSON; the browser backend attaches
//! them afterwards using the formats carried by the spec.

use serde_json::{json, Map, Value};

use super::spec::{AxisSpec, ChartKind, ChartSpec, DatasetRole, DatasetSpec, GridStyle, IndexAxis};
use crate::core::theme::Theme;

pub fn config(spec: &ChartSpec, theme: Theme, animation_ms: u32) -> Value {
    json!({
        "type": spec.kind,
        "data": data(spec, theme),
        "options": options(spec, theme, animation_ms),
    })
}

/// The `data` block alone, used when rebinding an existing chart.
pub fn data(spec: &ChartSpec, theme: Theme) -> Value {
    json!({
        "labels": spec.labels,
        "datasets": spec
            .datasets
            .iter()
            .map(|dataset| dataset_config(spec.kind, dataset, theme))
            .collect::<Vec<_>>(),
    })
}

fn dataset_config(kind: ChartKind, dataset: &DatasetSpec, theme: Theme) -> Value {
    let stroke = dataset.color.stroke();
    let mut config = json!({
        "label": dataset.label,
        "data": dataset.values,
        "borderColor": stroke,
    });
    let extra = match (kind, dataset.role) {
        (_, DatasetRole::Benchmark(_)) => json!({
            "backgroundColor": "transparent",
            "borderWidth": 2,
            "borderDash": [6, 4],
            "fill": false,
            "tension": 0,
            "pointRadius": 0,
            "pointHoverRadius": 0,
        }),
        (ChartKind::Line, DatasetRole::Primary) => json!({
            "backgroundColor": dataset.color.fill(),
            "borderWidth": 2,
            "fill": false,
            "tension": 0.4,
            "pointBackgroundColor": stroke,
            "pointBorderColor": theme.palette().point_border,
            "pointBorderWidth": 2,
            "pointRadius": 3,
            "pointHoverRadius": 5,
        }),
        (ChartKind::Bar, DatasetRole::Primary) => json!({
            "backgroundColor": stroke,
            "borderWidth": 0,
            "borderRadius": 4,
        }),
    };
    merge(&mut config, extra);
    if kind == ChartKind::Line {
        merge(&mut config, json!({ "yAxisID": dataset.axis.key() }));
    }
    config
}

fn options(spec: &ChartSpec, theme: Theme, animation_ms: u32) -> Value {
    let palette = theme.palette();
    let mut scales = Map::new();
    for axis in &spec.axes {
        scales.insert(axis.id.key().to_string(), axis_config(axis, theme));
    }

    let mut options = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "animation": { "duration": animation_ms },
        "indexAxis": match spec.index_axis {
            IndexAxis::X => "x",
            IndexAxis::Y => "y",
        },
        "plugins": {
            "legend": {
                "display": spec.legend,
                "position": "bottom",
                "labels": {
                    "color": palette.text,
                    "usePointStyle": true,
                    "padding": 20,
                },
            },
            "tooltip": {
                "mode": "index",
                "intersect": false,
            },
        },
        "scales": scales,
    });
    if spec.kind == ChartKind::Line {
        merge(
            &mut options,
            json!({ "interaction": { "mode": "nearest", "axis": "x", "intersect": false } }),
        );
    }
    options
}

fn axis_config(axis: &AxisSpec, theme: Theme) -> Value {
    let palette = theme.palette();
    let grid = match axis.grid {
        GridStyle::Hidden => json!({ "display": false }),
        GridStyle::Visible => json!({ "color": palette.grid }),
        GridStyle::AxisOnly => json!({ "drawOnChartArea": false }),
    };
    let mut ticks = json!({ "color": palette.text });
    if let Some(limit) = axis.max_ticks {
        merge(&mut ticks, json!({ "maxTicksLimit": limit }));
    }
    let mut config = json!({
        "display": true,
        "position": axis.position,
        "grid": grid,
        "ticks": ticks,
    });
    if axis.format.is_some() {
        merge(&mut config, json!({ "type": "linear", "beginAtZero": axis.begin_at_zero }));
    }
    if let Some(title) = &axis.title {
        merge(
            &mut config,
            json!({ "title": { "display": true, "text": title, "color": palette.text } }),
        );
    }
    config
}

fn merge(target: &mut Value, extra: Value) {
    if let (Value::Object(target), Value::Object(extra)) = (target, extra) {
        target.extend(extra);
    }
}
