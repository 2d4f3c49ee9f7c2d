//! The slot configuration table: one fixed template per slot, plus the
//! labels and values each slot shows for a period.

use super::spec::{AxisId, AxisPosition, AxisSpec, ChartSpec, DatasetSpec, GridStyle, SeriesColor};
use super::Slot;
use crate::core::{
    error::ChartError,
    format::ValueFormat,
    metric::{Metric, Period},
    series::axis_label,
};
use crate::data::DashboardData;

const DATE_TICKS: u8 = 8;

/// Metric plotted by a period-selectable slot.
pub fn trend_metric(slot: Slot) -> Option<Metric> {
    match slot {
        Slot::Uptime => Some(Metric::Uptime),
        Slot::Errors => Some(Metric::ErrorRate),
        Slot::LostRevenue => Some(Metric::LostRevenue),
        _ => None,
    }
}

/// Complete spec for `slot` showing the `period` window.
pub fn spec_for(slot: Slot, period: Period, data: &DashboardData) -> Result<ChartSpec, ChartError> {
    let (labels, primaries) = series_for(slot, period, data)?;
    Ok(template(slot, data).with_data(labels, primaries))
}

/// Everything except labels and values.
pub fn template(slot: Slot, data: &DashboardData) -> ChartSpec {
    match slot {
        Slot::RevenueTravel | Slot::RevenuePurchase => dual_axis(
            DatasetSpec::primary("Revenue", ValueFormat::Currency),
            ("Revenue (€)", ValueFormat::Currency),
            DatasetSpec::primary("Tickets", ValueFormat::Count).color(SeriesColor::Orange),
            ("Tickets", ValueFormat::Count),
        ),
        Slot::VisitorsConversion => dual_axis(
            DatasetSpec::primary("Total views", ValueFormat::Count),
            ("Views", ValueFormat::Count),
            DatasetSpec::primary("Conversion rate", ValueFormat::Percent(2))
                .color(SeriesColor::Green),
            ("Conversion rate (%)", ValueFormat::Percent(2)),
        ),
        Slot::SourceMarkets => ChartSpec::horizontal_bar()
            .without_legend()
            .dataset(DatasetSpec::primary("Revenue", ValueFormat::Currency).on(AxisId::X))
            .axis(
                AxisSpec::value(AxisId::X, AxisPosition::Bottom, ValueFormat::Currency)
                    .from_zero(),
            )
            .axis(AxisSpec::category(AxisId::Y)),
        Slot::Uptime => trend(
            data,
            Metric::Uptime,
            "Uptime",
            "Uptime (%)",
            SeriesColor::Blue,
            true,
        ),
        Slot::Errors => trend(
            data,
            Metric::ErrorRate,
            "Error rate",
            "Error rate (%)",
            SeriesColor::Red,
            true,
        ),
        Slot::LostRevenue => trend(
            data,
            Metric::LostRevenue,
            "Lost revenue",
            "Lost revenue (€)",
            SeriesColor::Orange,
            false,
        ),
    }
}

/// Labels and primary values, in dataset order.
pub fn series_for(
    slot: Slot,
    period: Period,
    data: &DashboardData,
) -> Result<(Vec<String>, Vec<Vec<f64>>), ChartError> {
    let sales = &data.sales;
    let sales_labels = || sales.dates.iter().copied().map(axis_label).collect();
    let result = match slot {
        Slot::RevenueTravel => (
            sales_labels(),
            vec![sales.revenue_by_travel.clone(), sales.tickets_by_travel.clone()],
        ),
        Slot::RevenuePurchase => (
            sales_labels(),
            vec![sales.revenue_by_purchase.clone(), sales.tickets_by_purchase.clone()],
        ),
        Slot::VisitorsConversion => (
            sales_labels(),
            vec![sales.views.clone(), sales.conversion.clone()],
        ),
        Slot::SourceMarkets => (
            data.source_markets.iter().map(|m| m.market.clone()).collect(),
            vec![data.source_markets.iter().map(|m| m.revenue).collect()],
        ),
        Slot::Uptime | Slot::Errors | Slot::LostRevenue => {
            let series = trend_metric(slot)
                .and_then(|metric| data.series(metric, period))
                .ok_or(ChartError::MissingSeries { slot, period })?;
            (
                series.dates().into_iter().map(axis_label).collect(),
                vec![series.values()],
            )
        }
    };
    Ok(result)
}

fn dual_axis(
    left: DatasetSpec,
    (left_title, left_format): (&str, ValueFormat),
    right: DatasetSpec,
    (right_title, right_format): (&str, ValueFormat),
) -> ChartSpec {
    ChartSpec::line()
        .dataset(left)
        .dataset(right.on(AxisId::Y1))
        .axis(AxisSpec::category(AxisId::X).max_ticks(DATE_TICKS))
        .axis(AxisSpec::value(AxisId::Y, AxisPosition::Left, left_format).title(left_title))
        .axis(
            AxisSpec::value(AxisId::Y1, AxisPosition::Right, right_format)
                .title(right_title)
                .grid(GridStyle::AxisOnly),
        )
}

fn trend(
    data: &DashboardData,
    metric: Metric,
    label: &str,
    title: &str,
    color: SeriesColor,
    with_benchmark: bool,
) -> ChartSpec {
    let format = ValueFormat::for_metric(metric);
    let base = if metric == Metric::LostRevenue {
        ChartSpec::bar()
    } else {
        ChartSpec::line()
    };
    let mut spec = base.dataset(DatasetSpec::primary(label, format).color(color));

    if with_benchmark {
        if let Some(benchmark) = data.benchmark(metric) {
            spec = spec.dataset(DatasetSpec::benchmark(
                "Industry average",
                benchmark.industry_average,
                format,
            ));
        }
    }

    let mut value_axis = AxisSpec::value(AxisId::Y, AxisPosition::Left, format).title(title);
    if metric == Metric::LostRevenue {
        value_axis = value_axis.from_zero();
    }
    spec.axis(AxisSpec::category(AxisId::X).max_ticks(DATE_TICKS))
        .axis(value_axis)
}
