use serde::Serialize;

use crate::core::format::ValueFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Axis the categories run along. Horizontal bars index on `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAxis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    X,
    Y,
    Y1,
}

impl AxisId {
    pub fn key(self) -> &'static str {
        match self {
            AxisId::X => "x",
            AxisId::Y => "y",
            AxisId::Y1 => "y1",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GridStyle {
    Hidden,
    Visible,
    /// Drawn on the axis only, so a secondary axis doesn't double the grid.
    AxisOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesColor {
    Blue,
    Orange,
    Red,
    Green,
    Slate,
}

impl SeriesColor {
    pub fn stroke(self) -> &'static str {
        match self {
            SeriesColor::Blue => "#3b82f6",
            SeriesColor::Orange => "#f97316",
            SeriesColor::Red => "#ef4444",
            SeriesColor::Green => "#10b981",
            SeriesColor::Slate => "#94a3b8",
        }
    }

    pub fn fill(self) -> &'static str {
        match self {
            SeriesColor::Blue => "rgba(59, 130, 246, 0.1)",
            SeriesColor::Orange => "rgba(249, 115, 22, 0.1)",
            SeriesColor::Red => "rgba(239, 68, 68, 0.1)",
            SeriesColor::Green => "rgba(16, 185, 129, 0.1)",
            SeriesColor::Slate => "rgba(148, 163, 184, 0.1)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "role", content = "value")]
pub enum DatasetRole {
    Primary,
    /// Constant reference line at the given value.
    Benchmark(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSpec {
    pub label: String,
    pub values: Vec<f64>,
    pub axis: AxisId,
    pub color: SeriesColor,
    pub format: ValueFormat,
    pub role: DatasetRole,
}

impl DatasetSpec {
    pub fn primary(label: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            label: label.into(),
            values: Vec::new(),
            axis: AxisId::Y,
            color: SeriesColor::Blue,
            format,
            role: DatasetRole::Primary,
        }
    }

    pub fn benchmark(label: impl Into<String>, value: f64, format: ValueFormat) -> Self {
        Self {
            label: label.into(),
            values: Vec::new(),
            axis: AxisId::Y,
            color: SeriesColor::Slate,
            format,
            role: DatasetRole::Benchmark(value),
        }
    }

    pub fn on(mut self, axis: AxisId) -> Self {
        self.axis = axis;
        self
    }

    pub fn color(mut self, color: SeriesColor) -> Self {
        self.color = color;
        self
    }

    pub fn is_benchmark(&self) -> bool {
        matches!(self.role, DatasetRole::Benchmark(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    pub id: AxisId,
    pub position: AxisPosition,
    pub title: Option<String>,
    pub format: Option<ValueFormat>,
    pub grid: GridStyle,
    pub max_ticks: Option<u8>,
    pub begin_at_zero: bool,
}

impl AxisSpec {
    /// Category axis along the bottom.
    pub fn category(id: AxisId) -> Self {
        Self {
            id,
            position: if id == AxisId::X {
                AxisPosition::Bottom
            } else {
                AxisPosition::Left
            },
            title: None,
            format: None,
            grid: GridStyle::Hidden,
            max_ticks: None,
            begin_at_zero: false,
        }
    }

    pub fn value(id: AxisId, position: AxisPosition, format: ValueFormat) -> Self {
        Self {
            id,
            position,
            title: None,
            format: Some(format),
            grid: GridStyle::Visible,
            max_ticks: None,
            begin_at_zero: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn grid(mut self, grid: GridStyle) -> Self {
        self.grid = grid;
        self
    }

    pub fn max_ticks(mut self, limit: u8) -> Self {
        self.max_ticks = Some(limit);
        self
    }

    pub fn from_zero(mut self) -> Self {
        self.begin_at_zero = true;
        self
    }
}

/// Backend-neutral description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub index_axis: IndexAxis,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetSpec>,
    pub axes: Vec<AxisSpec>,
    pub legend: bool,
}

impl ChartSpec {
    pub fn line() -> Self {
        Self::new(ChartKind::Line, IndexAxis::X)
    }

    pub fn bar() -> Self {
        Self::new(ChartKind::Bar, IndexAxis::X)
    }

    pub fn horizontal_bar() -> Self {
        Self::new(ChartKind::Bar, IndexAxis::Y)
    }

    fn new(kind: ChartKind, index_axis: IndexAxis) -> Self {
        Self {
            kind,
            index_axis,
            labels: Vec::new(),
            datasets: Vec::new(),
            axes: Vec::new(),
            legend: true,
        }
    }

    pub fn dataset(mut self, dataset: DatasetSpec) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn axis(mut self, axis: AxisSpec) -> Self {
        self.axes.push(axis);
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.legend = false;
        self
    }

    /// Fill in labels and primary values (in dataset order) and stretch
    /// benchmark lines across the new label count.
    pub fn with_data(mut self, labels: Vec<String>, primaries: Vec<Vec<f64>>) -> Self {
        self.bind(labels, primaries);
        self
    }

    pub fn bind(&mut self, labels: Vec<String>, primaries: Vec<Vec<f64>>) {
        let len = labels.len();
        let mut primaries = primaries.into_iter();
        for dataset in &mut self.datasets {
            dataset.values = match dataset.role {
                DatasetRole::Primary => primaries.next().unwrap_or_default(),
                DatasetRole::Benchmark(value) => vec![value; len],
            };
        }
        self.labels = labels;
    }

    pub fn primary_count(&self) -> usize {
        self.datasets.iter().filter(|d| !d.is_benchmark()).count()
    }

    pub fn axis_spec(&self, id: AxisId) -> Option<&AxisSpec> {
        self.axes.iter().find(|axis| axis.id == id)
    }

    /// The same spec with every label and value cleared.
    pub fn shape(&self) -> ChartSpec {
        let mut shape = self.clone();
        shape.labels.clear();
        for dataset in &mut shape.datasets {
            dataset.values.clear();
        }
        shape
    }

    /// Structural problems a renderer would choke on.
    pub fn validate(&self) -> Result<(), String> {
        if self.datasets.is_empty() {
            return Err("chart has no datasets".into());
        }
        for dataset in &self.datasets {
            if dataset.values.len() != self.labels.len() {
                return Err(format!(
                    "dataset `{}` has {} values for {} labels",
                    dataset.label,
                    dataset.values.len(),
                    self.labels.len()
                ));
            }
            if self.axis_spec(dataset.axis).is_none() {
                return Err(format!(
                    "dataset `{}` is bound to undeclared axis `{}`",
                    dataset.label,
                    dataset.axis.key()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uptime_spec() -> ChartSpec {
        ChartSpec::line()
            .dataset(DatasetSpec::primary("Uptime", ValueFormat::Percent(1)))
            .dataset(DatasetSpec::benchmark("Industry average", 95.3, ValueFormat::Percent(1)))
            .axis(AxisSpec::category(AxisId::X))
            .axis(AxisSpec::value(AxisId::Y, AxisPosition::Left, ValueFormat::Percent(1)))
    }

    #[test]
    fn binding_expands_benchmarks() {
        let spec = uptime_spec().with_data(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![98.0, 97.0, 99.0]],
        );
        assert_eq!(spec.datasets[0].values, vec![98.0, 97.0, 99.0]);
        assert_eq!(spec.datasets[1].values, vec![95.3; 3]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn rebinding_keeps_shape() {
        let mut spec = uptime_spec().with_data(vec!["a".into()], vec![vec![98.0]]);
        let before = spec.shape();
        spec.bind(vec!["x".into(), "y".into()], vec![vec![1.0, 2.0]]);
        assert_eq!(spec.shape(), before);
        assert_eq!(spec.datasets[1].values, vec![95.3, 95.3]);
    }

    #[test]
    fn validate_catches_length_mismatch() {
        let mut spec = uptime_spec().with_data(vec!["a".into()], vec![vec![98.0]]);
        spec.datasets[0].values.push(1.0);
        let err = spec.validate().unwrap_err();
        assert!(err.contains("2 values for 1 labels"), "{err}");
    }

    #[test]
    fn validate_catches_undeclared_axis() {
        let spec = ChartSpec::line()
            .dataset(DatasetSpec::primary("Tickets", ValueFormat::Count).on(AxisId::Y1))
            .axis(AxisSpec::category(AxisId::X))
            .with_data(vec![], vec![vec![]]);
        assert!(spec.validate().unwrap_err().contains("`y1`"));
    }
}
