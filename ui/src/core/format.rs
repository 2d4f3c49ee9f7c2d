//! Formatting helpers for presenting metrics.
//!
//! Everything here is locale-independent: Rust's float formatting never
//! consults the host locale, and thousands grouping is done by hand with `,`.

use serde::{Deserialize, Serialize};

use super::metric::Metric;

const PLACEHOLDER: &str = "—";

/// How values of a series are rendered on axis ticks and in tooltips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "precision")]
pub enum ValueFormat {
    /// Euro amounts, `€1.2K` on ticks.
    Currency,
    /// Percentages with a fixed number of decimals.
    Percent(u8),
    /// Plain counts, `1.8K` on ticks.
    Count,
    /// Durations in seconds.
    Seconds,
}

impl ValueFormat {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Revenue | Metric::LostRevenue => ValueFormat::Currency,
            Metric::Uptime => ValueFormat::Percent(1),
            Metric::ErrorRate | Metric::Conversion => ValueFormat::Percent(2),
            Metric::Visits | Metric::Tickets => ValueFormat::Count,
            Metric::ResponseTime => ValueFormat::Seconds,
        }
    }

    /// Compact form used on axis ticks and metric cards.
    pub fn short(self, raw: f64) -> String {
        if !raw.is_finite() {
            return PLACEHOLDER.to_string();
        }
        match self {
            ValueFormat::Currency => format!("€{:.1}K", raw / 1000.0),
            ValueFormat::Percent(precision) => format!("{:.*}%", precision as usize, raw),
            ValueFormat::Count => format!("{:.1}K", raw / 1000.0),
            ValueFormat::Seconds => format!("{raw:.1}s"),
        }
    }

    /// Full form used in tooltips and exports.
    pub fn long(self, raw: f64) -> String {
        if !raw.is_finite() {
            return PLACEHOLDER.to_string();
        }
        match self {
            ValueFormat::Currency => format!("€{}", format_grouped(raw, 2)),
            ValueFormat::Percent(_) => format!("{raw:.2}%"),
            ValueFormat::Count => format_grouped(raw, 2),
            ValueFormat::Seconds => format!("{raw:.2}s"),
        }
    }
}

/// Deterministic short rendering of `raw` for the given metric.
pub fn format_value(metric: Metric, raw: f64) -> String {
    ValueFormat::for_metric(metric).short(raw)
}

/// `1234.5` -> `1,234.5`; trailing fractional zeros are dropped.
pub fn format_grouped(value: f64, max_decimals: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let fixed = format!("{:.*}", max_decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    if value < 0.0 && !is_zero {
        out.push('-');
    }
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_forms_per_metric() {
        assert_eq!(format_value(Metric::Revenue, 1200.0), "€1.2K");
        assert_eq!(format_value(Metric::LostRevenue, 2300.0), "€2.3K");
        assert_eq!(format_value(Metric::Uptime, 98.2), "98.2%");
        assert_eq!(format_value(Metric::ErrorRate, 1.2), "1.20%");
        assert_eq!(format_value(Metric::Conversion, 1.25), "1.25%");
        assert_eq!(format_value(Metric::Visits, 1800.0), "1.8K");
        assert_eq!(format_value(Metric::ResponseTime, 2.3), "2.3s");
    }

    #[test]
    fn format_value_is_deterministic() {
        for metric in Metric::ALL {
            for raw in [0.0, 0.3, 97.8, 1234.5, 23400.0] {
                assert_eq!(format_value(metric, raw), format_value(metric, raw));
            }
        }
    }

    #[test]
    fn non_finite_values_render_placeholder() {
        assert_eq!(format_value(Metric::Uptime, f64::NAN), "—");
        assert_eq!(ValueFormat::Currency.long(f64::INFINITY), "—");
    }

    #[test]
    fn grouping() {
        assert_eq!(format_grouped(1234.5, 2), "1,234.5");
        assert_eq!(format_grouped(1800.0, 2), "1,800");
        assert_eq!(format_grouped(0.3, 2), "0.3");
        assert_eq!(format_grouped(999.0, 2), "999");
        assert_eq!(format_grouped(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_grouped(-2500.0, 0), "-2,500");
        assert_eq!(format_grouped(-0.001, 2), "0");
    }

    #[test]
    fn long_forms() {
        assert_eq!(ValueFormat::Currency.long(1234.5), "€1,234.5");
        assert_eq!(ValueFormat::Count.long(45.0), "45");
        assert_eq!(ValueFormat::Percent(1).long(1.2), "1.20%");
    }
}
