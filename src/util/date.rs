//! Human-readable dates for backend timestamps.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

#[cfg(test)]
#[path = "date_test.rs"]
mod tests;

/// Render an ISO-8601 timestamp as `"<day> <Month>, <year>"`.
///
/// Accepts RFC 3339 (offset converted to UTC) and naive timestamps with a
/// `T` or space separator and optional fractional seconds, as the backend
/// emits them. Returns `None` for anything else.
#[must_use]
pub fn format_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (day, month, year) = if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        let utc = dt.to_offset(time::UtcOffset::UTC);
        (utc.day(), utc.month(), utc.year())
    } else {
        let naive = parse_naive(raw)?;
        (naive.day(), naive.month(), naive.year())
    };
    Some(format!("{day} {month}, {year}"))
}

fn parse_naive(raw: &str) -> Option<PrimitiveDateTime> {
    let normalized = raw.replacen(' ', "T", 1);
    let without_fraction = normalized.split('.').next().unwrap_or(&normalized);
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let without_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    PrimitiveDateTime::parse(without_fraction, with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(without_fraction, without_seconds))
        .ok()
        .or_else(|| {
            let date_only = format_description!("[year]-[month]-[day]");
            time::Date::parse(raw, date_only).ok().map(|d| d.midnight())
        })
}
