use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use reqwest::{header::HeaderMap, StatusCode};

/// Reads an integer header, ignoring values that aren't valid numbers.
fn header_number(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()
}

/// Uses github response headers to detect ratelimits:
/// returns the instant at which requests are allowed again, or `None` when
/// the response was not throttled.
///
/// 1. **x-ratelimit-remaining** at 0 means the primary limit is exhausted,
///    **x-ratelimit-reset** holds the epoch second at which it resets.
/// 2. **retry-after** (seconds) is sent on secondary rate limits.
pub fn rate_limit_reset(
    headers: &HeaderMap,
    status: StatusCode,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }

    if let Some(seconds) = header_number(headers, "retry-after") {
        return now.checked_add_signed(TimeDelta::try_seconds(seconds.max(0))?);
    }

    if header_number(headers, "x-ratelimit-remaining") == Some(0) {
        let reset = header_number(headers, "x-ratelimit-reset")
            .and_then(|timestamp| Utc.timestamp_opt(timestamp, 0).single())
            .unwrap_or(now);
        return Some(reset);
    }

    None
}
