use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;

/// Format a Decimal for document output: always include at least 2 decimal places,
/// strip trailing zeros beyond that.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

/// Fully qualified timestamp with offset (`2023-05-10T09:00:00-06:00`).
///
/// UTC is written as `+00:00`, never `Z`.
pub fn format_timestamp(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}
