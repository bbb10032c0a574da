use chrono::{SecondsFormat, Utc};

/// Current UTC time as a fixed-width RFC 3339 string.
///
/// Fixed microsecond precision keeps `created_at` columns sortable as text.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
