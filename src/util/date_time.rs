use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Truncate a timestamp to whole seconds since the epoch.
///
/// HTTP dates have second granularity, so both sides of a comparison are truncated. Times
/// before the epoch clamp to the epoch.
pub fn truncate_to_secs(time: SystemTime) -> SystemTime {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |dur| dur.as_secs());
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Returns an HTTP format date string, such as `Sat, 26 Oct 1985 01:22:00 GMT`.
pub fn to_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(truncate_to_secs(time))
}

/// Parse an HTTP date in any of the formats allowed by RFC 9110.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    httpdate::parse_http_date(value.trim()).ok()
}
