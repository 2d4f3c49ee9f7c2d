//! The static dashboard data table.
//!
//! `assets/data/dashboard.json` is embedded at compile time and decoded once
//! at startup. Windows that the document does not spell out are produced by
//! the synthetic series generator from the recipes it lists, anchored on the
//! document's `asOf` date. Everything is immutable afterwards.

use std::collections::BTreeMap;

use dioxus::logger::tracing::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use crate::core::{
    error::DataError,
    metric::{Metric, Period},
    series::{date_range, parse_date, MetricSeries, SeriesGenerator, SeriesRecipe},
};

const EMBEDDED_DATA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/data/dashboard.json"
));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub name: String,
    pub id: String,
    pub status: SupplierStatus,
    pub last_updated: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Online,
    Degraded,
    Offline,
}

impl SupplierStatus {
    pub fn css_class(self) -> &'static str {
        match self {
            SupplierStatus::Online => "status-badge--online",
            SupplierStatus::Degraded => "status-badge--degraded",
            SupplierStatus::Offline => "status-badge--offline",
        }
    }
}

/// Reference values used for benchmark lines and the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub supplier: f64,
    pub industry_average: f64,
    pub top_performers: f64,
    #[serde(default)]
    pub percentile: Option<u8>,
    #[serde(default)]
    pub potential_recovery: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: u32,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub effort: String,
    #[serde(default)]
    pub actions: Vec<RecommendationAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub timestamp: String,
    pub resolved: bool,
}

impl Alert {
    /// `Jan 31 · 14:30`, or the raw timestamp if it isn't RFC 3339.
    pub fn timestamp_label(&self) -> String {
        let label = || -> Option<String> {
            let ts = OffsetDateTime::parse(&self.timestamp, &Rfc3339).ok()?;
            let day = ts
                .format(format_description!("[month repr:short] [day padding:none]"))
                .ok()?;
            let clock = ts.format(format_description!("[hour]:[minute]")).ok()?;
            Some(format!("{day} · {clock}"))
        };
        label().unwrap_or_else(|| self.timestamp.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRevenue {
    pub market: String,
    pub revenue: f64,
}

/// Daily sales figures shown in the revenue and traffic charts.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSeries {
    pub dates: Vec<Date>,
    pub revenue_by_travel: Vec<f64>,
    pub tickets_by_travel: Vec<f64>,
    pub revenue_by_purchase: Vec<f64>,
    pub tickets_by_purchase: Vec<f64>,
    pub views: Vec<f64>,
    pub conversion: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub as_of: Date,
    pub supplier: Supplier,
    pub headline: BTreeMap<Metric, BTreeMap<String, f64>>,
    pub series: BTreeMap<(Metric, Period), MetricSeries>,
    pub benchmarks: BTreeMap<Metric, Benchmark>,
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
    pub goals: BTreeMap<Metric, f64>,
    pub source_markets: Vec<MarketRevenue>,
    pub sales: SalesSeries,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardDocument {
    as_of: String,
    supplier: Supplier,
    metrics: BTreeMap<Metric, BTreeMap<String, f64>>,
    time_series: BTreeMap<Metric, BTreeMap<Period, MetricSeries>>,
    #[serde(default)]
    synthetic_series: BTreeMap<Metric, BTreeMap<Period, SeriesRecipe>>,
    benchmarks: BTreeMap<Metric, Benchmark>,
    #[serde(default)]
    recommendations: Vec<Recommendation>,
    #[serde(default)]
    alerts: Vec<Alert>,
    #[serde(default)]
    goals: BTreeMap<Metric, f64>,
    #[serde(default)]
    source_markets: Vec<MarketRevenue>,
    sales: SalesDocument,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SalesDocument {
    start: String,
    end: String,
    revenue_by_travel: SeriesRecipe,
    tickets_by_travel: SeriesRecipe,
    revenue_by_purchase: SeriesRecipe,
    tickets_by_purchase: SeriesRecipe,
    views: SeriesRecipe,
    conversion: SeriesRecipe,
}

impl DashboardData {
    /// Decode the embedded table, seeding the generator from `seed` when given.
    pub fn load(seed: Option<u64>) -> Result<Self, DataError> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::from_json(EMBEDDED_DATA, &mut SeriesGenerator::new(rng))
    }

    pub fn from_json<R: Rng>(
        raw: &str,
        generator: &mut SeriesGenerator<R>,
    ) -> Result<Self, DataError> {
        let doc: DashboardDocument = serde_json::from_str(raw)?;
        let as_of = parse_date(&doc.as_of)?;

        let mut series = BTreeMap::new();
        for (metric, windows) in doc.time_series {
            for (period, points) in windows {
                series.insert((metric, period), points);
            }
        }
        for (metric, recipes) in doc.synthetic_series {
            for (period, recipe) in recipes {
                if series.contains_key(&(metric, period)) {
                    debug!("{} {period} series is static; skipping recipe", metric.key());
                    continue;
                }
                series.insert((metric, period), generator.daily(period.days(), as_of, recipe));
            }
        }

        let sales = doc.sales.generate(generator)?;

        Ok(Self {
            as_of,
            supplier: doc.supplier,
            headline: doc.metrics,
            series,
            benchmarks: doc.benchmarks,
            recommendations: doc.recommendations,
            alerts: doc.alerts,
            goals: doc.goals,
            source_markets: doc.source_markets,
            sales,
        })
    }

    pub fn series(&self, metric: Metric, period: Period) -> Option<&MetricSeries> {
        self.series.get(&(metric, period))
    }

    pub fn benchmark(&self, metric: Metric) -> Option<&Benchmark> {
        self.benchmarks.get(&metric)
    }

    /// Headline value for a window key such as `"30d"`.
    pub fn headline(&self, metric: Metric, window: &str) -> Option<f64> {
        self.headline.get(&metric)?.get(window).copied()
    }

    pub fn goal(&self, metric: Metric) -> Option<f64> {
        self.goals.get(&metric).copied()
    }
}

impl SalesDocument {
    fn generate<R: Rng>(&self, generator: &mut SeriesGenerator<R>) -> Result<SalesSeries, DataError> {
        let dates = date_range(parse_date(&self.start)?, parse_date(&self.end)?);
        let len = dates.len();
        Ok(SalesSeries {
            revenue_by_travel: generator.values(len, self.revenue_by_travel),
            tickets_by_travel: generator.values(len, self.tickets_by_travel),
            revenue_by_purchase: generator.values(len, self.revenue_by_purchase),
            tickets_by_purchase: generator.values(len, self.tickets_by_purchase),
            views: generator.values(len, self.views),
            conversion: generator.values(len, self.conversion),
            dates,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::macros::date;

    pub(crate) fn seeded() -> DashboardData {
        let mut generator = SeriesGenerator::new(StdRng::seed_from_u64(2024));
        DashboardData::from_json(EMBEDDED_DATA, &mut generator).expect("embedded data decodes")
    }

    #[test]
    fn embedded_table_decodes() {
        let data = seeded();
        assert_eq!(data.as_of, date!(2024 - 01 - 31));
        assert_eq!(data.supplier.status, SupplierStatus::Online);
        assert_eq!(data.recommendations.len(), 3);
        assert_eq!(data.alerts.len(), 3);
        assert_eq!(data.source_markets.len(), 6);
    }

    #[test]
    fn static_week_of_uptime_is_verbatim() {
        let data = seeded();
        let week = data.series(Metric::Uptime, Period::Week).unwrap();
        assert_eq!(week.values(), vec![98.2, 97.8, 99.1, 96.5, 97.2, 98.9, 96.2]);
    }

    #[test]
    fn missing_windows_are_generated_on_anchor() {
        let data = seeded();
        for (metric, period) in [
            (Metric::Uptime, Period::Quarter),
            (Metric::ErrorRate, Period::Quarter),
            (Metric::LostRevenue, Period::Month),
            (Metric::LostRevenue, Period::Quarter),
        ] {
            let series = data.series(metric, period).unwrap();
            assert_eq!(series.len(), usize::from(period.days()), "{metric:?} {period}");
            assert_eq!(series.last().map(|p| p.date), Some(data.as_of));
        }
    }

    #[test]
    fn same_seed_same_data() {
        assert_eq!(seeded(), seeded());
    }

    #[test]
    fn sales_series_cover_the_date_range() {
        let sales = seeded().sales;
        assert_eq!(sales.dates.len(), 36);
        assert_eq!(sales.revenue_by_travel.len(), 36);
        assert_eq!(sales.conversion.len(), 36);
        assert!(sales.conversion.iter().all(|v| (0.5..=2.0).contains(v)));
    }

    #[test]
    fn lookups() {
        let data = seeded();
        assert_eq!(data.headline(Metric::LostRevenue, "30d"), Some(8450.0));
        assert_eq!(data.headline(Metric::Visits, "30d"), None);
        assert_eq!(
            data.benchmark(Metric::Uptime).map(|b| b.industry_average),
            Some(95.3)
        );
        assert_eq!(data.goal(Metric::Uptime), Some(99.0));
    }

    #[test]
    fn alert_timestamps_are_humanized() {
        let data = seeded();
        assert_eq!(data.alerts[0].timestamp_label(), "Jan 31 · 14:30");
    }

    #[test]
    fn bad_anchor_date_is_reported() {
        let raw = EMBEDDED_DATA.replace("\"asOf\": \"2024-01-31\"", "\"asOf\": \"31/01/2024\"");
        let mut generator = SeriesGenerator::new(StdRng::seed_from_u64(1));
        assert!(matches!(
            DashboardData::from_json(&raw, &mut generator),
            Err(DataError::Date(_))
        ));
    }
}
