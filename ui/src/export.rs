//! CSV export of the 30-day reliability series and the PDF placeholder.

use dioxus::logger::tracing::info;

use crate::core::{
    error::ExportError,
    metric::{Metric, Period},
    series::iso_label,
};
use crate::data::DashboardData;

pub const CSV_HEADER: [&str; 4] = ["Date", "Uptime (%)", "Error Rate (%)", "Lost Revenue (EUR)"];

/// One row per uptime date; error rate and lost revenue are matched by date
/// and left empty where the day has no value.
pub fn build_csv(data: &DashboardData) -> Result<String, ExportError> {
    let uptime = data
        .series(Metric::Uptime, Period::Month)
        .filter(|series| !series.is_empty())
        .ok_or(ExportError::Empty)?;
    let errors = data.series(Metric::ErrorRate, Period::Month);
    let lost = data.series(Metric::LostRevenue, Period::Month);

    let mut csv = CSV_HEADER.map(escape_csv).join(",");
    csv.push('\n');
    for point in uptime.points() {
        let cell = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        let row = [
            iso_label(point.date),
            point.value.to_string(),
            cell(errors.and_then(|s| s.value_on(point.date))),
            cell(lost.and_then(|s| s.value_on(point.date))),
        ];
        csv.push_str(&row.iter().map(|f| escape_csv(f)).collect::<Vec<_>>().join(","));
        csv.push('\n');
    }
    Ok(csv)
}

/// Quote a field when it contains a delimiter, a quote or a line break.
pub fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn csv_filename() -> String {
    format!("pulseboard-metrics-{}.csv", timestamp_slug())
}

fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!("[year][month][day]_[hour][minute][second]"))
        .unwrap_or_else(|_| "export".into())
}

/// Build the CSV and hand it to the browser as a download.
pub fn export_csv(data: &DashboardData) -> Result<String, ExportError> {
    let csv = build_csv(data)?;
    let filename = csv_filename();
    download_text(&filename, "text/csv;charset=utf-8", &csv)?;
    info!("exported {} bytes to {filename}", csv.len());
    Ok(filename)
}

#[cfg(target_arch = "wasm32")]
fn download_text(filename: &str, mime: &str, payload: &str) -> Result<(), ExportError> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let failed = |what: &str| ExportError::Download(what.to_string());

    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(payload));

    let mut opts = BlobPropertyBag::new();
    opts.type_(mime);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|_| failed("couldn't create blob"))?;
    let url = Url::create_object_url_with_blob(&blob).map_err(|_| failed("couldn't create URL"))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| failed("document unavailable"))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| failed("couldn't create anchor"))?
        .dyn_into()
        .map_err(|_| failed("anchor cast failed"))?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    document
        .body()
        .ok_or_else(|| failed("missing body"))?
        .append_child(&anchor)
        .ok();
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).ok();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn download_text(_filename: &str, _mime: &str, _payload: &str) -> Result<(), ExportError> {
    Err(ExportError::Unsupported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::seeded;

    #[test]
    fn header_and_row_count() {
        let data = seeded();
        let csv = build_csv(&data).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Uptime (%),Error Rate (%),Lost Revenue (EUR)")
        );
        let uptime = data.series(Metric::Uptime, Period::Month).unwrap();
        assert_eq!(lines.count(), uptime.len());
    }

    #[test]
    fn rows_are_joined_by_date() {
        let data = seeded();
        let csv = build_csv(&data).unwrap();
        let first = csv.lines().nth(1).unwrap();
        let uptime = data.series(Metric::Uptime, Period::Month).unwrap();
        let errors = data.series(Metric::ErrorRate, Period::Month).unwrap();
        let day = uptime.points()[0].date;
        assert_eq!(
            first,
            format!(
                "{},{},{},",
                iso_label(day),
                uptime.points()[0].value,
                errors.value_on(day).unwrap()
            )
        );
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn missing_uptime_is_empty_export() {
        let mut data = seeded();
        data.series.remove(&(Metric::Uptime, Period::Month));
        assert_eq!(build_csv(&data), Err(ExportError::Empty));
    }

    #[test]
    fn download_is_web_only() {
        assert_eq!(export_csv(&seeded()), Err(ExportError::Unsupported));
    }
}
