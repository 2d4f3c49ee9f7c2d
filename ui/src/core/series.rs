//! Time series samples and the synthetic series generator.
//!
//! The generator adds bounded jitter around a target average:
//!
//! ```text
//! value = clamp(average + (u - 0.5) * (max - min) * 0.3, min, max)
//! ```
//!
//! with `u` uniform in `[0, 1)`, rounded to two decimals. The RNG is always
//! injected so callers decide between reproducible (seeded) and entropy-backed
//! output.

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration};

use super::error::DataError;

/// Hard cap on the number of days produced by [`date_range`].
pub const MAX_RANGE_DAYS: usize = 100;

const JITTER_SPAN: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ordered samples for one metric over one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSeries(pub Vec<SeriesPoint>);

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.0
    }

    pub fn values(&self) -> Vec<f64> {
        self.0.iter().map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<Date> {
        self.0.iter().map(|p| p.date).collect()
    }

    pub fn value_on(&self, date: Date) -> Option<f64> {
        self.0.iter().find(|p| p.date == date).map(|p| p.value)
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.0.last()
    }
}

/// Parameters for one synthetic series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecipe {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesRecipe {
    pub const fn new(average: f64, min: f64, max: f64) -> Self {
        Self { average, min, max }
    }
}

pub struct SeriesGenerator<R> {
    rng: R,
}

impl<R: Rng> SeriesGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn sample(&mut self, recipe: SeriesRecipe) -> f64 {
        let SeriesRecipe { average, min, max } = recipe;
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        let variation = (self.rng.gen::<f64>() - 0.5) * (high - low) * JITTER_SPAN;
        round2((average + variation).clamp(low, high))
    }

    pub fn values(&mut self, len: usize, recipe: SeriesRecipe) -> Vec<f64> {
        (0..len).map(|_| self.sample(recipe)).collect()
    }

    /// `days` consecutive daily samples ending on `end` (inclusive).
    pub fn daily(&mut self, days: u16, end: Date, recipe: SeriesRecipe) -> MetricSeries {
        let days = i64::from(days);
        let points = (0..days)
            .filter_map(|offset| end.checked_sub(Duration::days(days - 1 - offset)))
            .map(|date| SeriesPoint::new(date, self.sample(recipe)))
            .collect();
        MetricSeries(points)
    }
}

/// Inclusive list of days from `start` to `end`, capped at [`MAX_RANGE_DAYS`].
/// An inverted range falls back to `[start, end]`.
pub fn date_range(start: Date, end: Date) -> Vec<Date> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end && dates.len() < MAX_RANGE_DAYS {
        dates.push(current);
        match current.next_day() {
            Some(next) => current = next,
            None => break,
        }
    }

    if dates.is_empty() {
        vec![start, end]
    } else {
        dates
    }
}

pub fn parse_date(raw: &str) -> Result<Date, DataError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| DataError::Date(raw.to_string()))
}

pub fn iso_label(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Axis label such as `Jun 09, 2025`.
pub fn axis_label(date: Date) -> String {
    date.format(format_description!("[month repr:short] [day], [year]"))
        .unwrap_or_else(|_| iso_label(date))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

mod iso_date {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::iso_label(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use time::macros::date;

    #[test]
    fn seeded_generators_are_reproducible() {
        let recipe = SeriesRecipe::new(1200.0, 200.0, 1800.0);
        let a = SeriesGenerator::new(StdRng::seed_from_u64(7)).values(36, recipe);
        let b = SeriesGenerator::new(StdRng::seed_from_u64(7)).values(36, recipe);
        assert_eq!(a, b);
    }

    #[test]
    fn samples_stay_within_bounds() {
        let recipe = SeriesRecipe::new(1.8, 0.1, 2.5);
        let mut generator = SeriesGenerator::new(StdRng::seed_from_u64(42));
        for value in generator.values(500, recipe) {
            assert!((0.1..=2.5).contains(&value), "{value}");
        }
    }

    #[test]
    fn average_outside_bounds_is_clamped() {
        let recipe = SeriesRecipe::new(5000.0, 0.0, 10.0);
        let mut generator = SeriesGenerator::new(StdRng::seed_from_u64(1));
        assert!(generator.values(20, recipe).iter().all(|v| *v == 10.0));
    }

    #[test]
    fn daily_series_ends_on_anchor() {
        let end = date!(2024 - 01 - 31);
        let mut generator = SeriesGenerator::new(StdRng::seed_from_u64(3));
        let series = generator.daily(90, end, SeriesRecipe::new(93.1, 90.0, 99.5));
        assert_eq!(series.len(), 90);
        assert_eq!(series.last().map(|p| p.date), Some(end));
        assert_eq!(series.points()[0].date, date!(2023 - 11 - 03));
        assert!(series.points().windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn date_range_is_inclusive() {
        let dates = date_range(date!(2025 - 06 - 09), date!(2025 - 07 - 14));
        assert_eq!(dates.len(), 36);
        assert_eq!(dates.first(), Some(&date!(2025 - 06 - 09)));
        assert_eq!(dates.last(), Some(&date!(2025 - 07 - 14)));
    }

    #[test]
    fn date_range_caps_and_falls_back() {
        let capped = date_range(date!(2024 - 01 - 01), date!(2024 - 12 - 31));
        assert_eq!(capped.len(), MAX_RANGE_DAYS);

        let inverted = date_range(date!(2024 - 02 - 01), date!(2024 - 01 - 01));
        assert_eq!(inverted, vec![date!(2024 - 02 - 01), date!(2024 - 01 - 01)]);
    }

    #[test]
    fn labels() {
        assert_eq!(axis_label(date!(2025 - 06 - 09)), "Jun 09, 2025");
        assert_eq!(iso_label(date!(2024 - 01 - 07)), "2024-01-07");
        assert!(parse_date("2024-13-01").is_err());
    }
}
