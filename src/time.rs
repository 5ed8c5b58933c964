// src/time.rs

use chrono::{DateTime, FixedOffset, Timelike};

use crate::error::{Result, TimestampError};

/// Layout of the bracketed `time_local` field in combined access logs,
/// e.g. `10/Oct/2023:13:55:36 +0000`.
pub const ACCESS_LOG_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Parses an access-log timestamp, keeping the offset written in the line.
pub fn parse_access_log_time(raw: &str) -> Result<DateTime<FixedOffset>> {
    Ok(DateTime::parse_from_str(raw, ACCESS_LOG_TIME_FORMAT)?)
}

/// Parses an RFC 3339 timestamp (`2023-10-10T13:55:36Z`, `...+02:00`).
///
/// Stricter than chrono's own RFC 3339 parser: the separator must be an
/// uppercase `T`, the zone an uppercase `Z` or `±HH:MM`, and leap seconds
/// are refused.
///
/// Deliberately separate from [`parse_access_log_time`]: neither layout is
/// tried as a fallback for the other.
pub fn parse_rfc3339_time(raw: &str) -> Result<DateTime<FixedOffset>> {
    check_rfc3339_layout(raw)?;

    let dt = DateTime::parse_from_rfc3339(raw)?;
    if dt.nanosecond() >= 1_000_000_000 {
        return Err(layout_error(raw, "leap seconds are not accepted").into());
    }

    Ok(dt)
}

fn check_rfc3339_layout(raw: &str) -> std::result::Result<(), TimestampError> {
    let bytes = raw.as_bytes();

    // Short or garbled values are left to chrono for a better message.
    if bytes.len() < 20 {
        return Ok(());
    }

    if bytes[10] != b'T' {
        return Err(layout_error(raw, "date and time must be separated by 'T'"));
    }

    let len = bytes.len();
    let numeric_offset = matches!(bytes[len - 6], b'+' | b'-') && bytes[len - 3] == b':';
    if bytes[len - 1] != b'Z' && !numeric_offset {
        return Err(layout_error(raw, "offset must be 'Z' or ±HH:MM"));
    }

    Ok(())
}

fn layout_error(raw: &str, reason: &'static str) -> TimestampError {
    TimestampError::Layout {
        value: raw.to_string(),
        reason,
    }
}
