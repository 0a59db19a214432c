pub mod json;
pub mod markdown;
pub mod terminal;

pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

use crate::core::NetworkTelemetry;
use chrono::{DateTime, Utc};

/// Cell text for an optional reading.
pub(crate) fn format_reading(value: Option<f64>, precision: usize) -> String {
    match NetworkTelemetry::finite(value) {
        Some(value) => format!("{value:.precision$}"),
        None => "-".to_string(),
    }
}

pub(crate) fn format_percent(value: Option<f64>) -> String {
    match NetworkTelemetry::finite(value) {
        Some(value) => format!("{value:.1}%"),
        None => "-".to_string(),
    }
}

pub(crate) fn format_scan_age(telemetry: &NetworkTelemetry, as_of: DateTime<Utc>) -> String {
    match telemetry.scan_age_days(as_of) {
        Some(days) => format!("{days:.0}d"),
        None => "never".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::reference_time;

    #[test]
    fn test_cell_formatting() {
        assert_eq!(format_reading(Some(2.345), 2), "2.35");
        assert_eq!(format_reading(None, 2), "-");
        assert_eq!(format_reading(Some(f64::NAN), 2), "-");
        assert_eq!(format_percent(Some(95.0)), "95.0%");

        let as_of = reference_time();
        let mut telemetry = NetworkTelemetry::default();
        assert_eq!(format_scan_age(&telemetry, as_of), "never");
        telemetry.last_scan = Some(as_of - chrono::Duration::days(3));
        assert_eq!(format_scan_age(&telemetry, as_of), "3d");
    }
}
