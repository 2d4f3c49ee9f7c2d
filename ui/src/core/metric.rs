//! Metric identities, time windows and the good/warning/critical tier rule.
//!
//! Tiers are derived from fixed thresholds. A threshold table is either
//! "higher is better" (uptime) or "lower is better" (error rate, lost revenue,
//! response time); both bounds are inclusive on the good side, so
//! `tier(Uptime, 98.0)` is good and `tier(Uptime, 97.999)` is warning.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ChartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Uptime,
    ErrorRate,
    Revenue,
    LostRevenue,
    Visits,
    Conversion,
    Tickets,
    ResponseTime,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Uptime,
        Metric::ErrorRate,
        Metric::Revenue,
        Metric::LostRevenue,
        Metric::Visits,
        Metric::Conversion,
        Metric::Tickets,
        Metric::ResponseTime,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Uptime => "uptime",
            Metric::ErrorRate => "errorRate",
            Metric::Revenue => "revenue",
            Metric::LostRevenue => "lostRevenue",
            Metric::Visits => "visits",
            Metric::Conversion => "conversion",
            Metric::Tickets => "tickets",
            Metric::ResponseTime => "responseTime",
        }
    }

    pub fn thresholds(self) -> Option<Thresholds> {
        match self {
            Metric::Uptime => Some(Thresholds::higher_is_better(98.0, 95.0)),
            Metric::ErrorRate => Some(Thresholds::lower_is_better(0.5, 1.5)),
            Metric::LostRevenue => Some(Thresholds::lower_is_better(500.0, 2000.0)),
            Metric::ResponseTime => Some(Thresholds::lower_is_better(1.5, 3.0)),
            Metric::Revenue | Metric::Visits | Metric::Conversion | Metric::Tickets => None,
        }
    }

    /// Tier for `value`, or `None` for metrics without a threshold table.
    pub fn tier(self, value: f64) -> Option<Tier> {
        self.thresholds().map(|t| t.classify(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Warning,
    Critical,
}

impl Tier {
    pub fn css_class(self) -> &'static str {
        match self {
            Tier::Good => "tier--good",
            Tier::Warning => "tier--warning",
            Tier::Critical => "tier--critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub direction: Direction,
    pub good: f64,
    pub warning: f64,
}

impl Thresholds {
    pub const fn higher_is_better(good: f64, warning: f64) -> Self {
        Self {
            direction: Direction::HigherIsBetter,
            good,
            warning,
        }
    }

    pub const fn lower_is_better(good: f64, warning: f64) -> Self {
        Self {
            direction: Direction::LowerIsBetter,
            good,
            warning,
        }
    }

    /// Total over the reals; NaN compares false everywhere and lands in critical.
    pub fn classify(&self, value: f64) -> Tier {
        let (good, warning) = match self.direction {
            Direction::HigherIsBetter => (value >= self.good, value >= self.warning),
            Direction::LowerIsBetter => (value <= self.good, value <= self.warning),
        };
        if good {
            Tier::Good
        } else if warning {
            Tier::Warning
        } else {
            Tier::Critical
        }
    }
}

/// Time window of a series, in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    #[default]
    Week,
    Month,
    Quarter,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Quarter];

    pub fn days(self) -> u16 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Period::Week => "7",
            Period::Month => "30",
            Period::Quarter => "90",
        }
    }

    pub fn from_days(days: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.days() == days)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-day", self.days())
    }
}

impl FromStr for Period {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u16>()
            .ok()
            .and_then(Period::from_days)
            .ok_or_else(|| ChartError::UnknownPeriod(raw.to_string()))
    }
}

impl TryFrom<String> for Period {
    type Error = ChartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(value: Period) -> Self {
        value.key().to_string()
    }
}
