// File: src/parsers/combined.rs

use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::LogEntry;
use crate::error::{Error, Result};
use crate::time::parse_access_log_time;

/// Combined access-log grammar (Apache / nginx default).
///
/// Groups: 1 remote addr, 2 time_local, 3 method, 4 request target,
/// 5 referer, 6 user agent. Status and byte count must be present but are
/// not captured. Anything after the user agent is ignored.
pub const COMBINED_PATTERN: &str = r#"^([0-9.]+) - - \[([0-9]{2}/[0-9A-Za-z_]+/[0-9]{4}:[0-9]{2}:[0-9]{2}:[0-9]{2} [+-][0-9]{4})\] "([A-Z]+) (.+) HTTP/[0-9]\.[0-9]" [0-9]+ [0-9]+ "(.+)" "(.+)".*$"#;

// Whole match plus the six groups above.
const CAPTURE_COUNT: usize = 7;

const REMOTE_ADDR: usize = 1;
const TIME_LOCAL: usize = 2;
const REQUEST_TARGET: usize = 4;
const USER_AGENT: usize = 6;

fn combined_regex() -> &'static Regex {
    static COMBINED_REGEX: OnceLock<Regex> = OnceLock::new();

    COMBINED_REGEX.get_or_init(|| Regex::new(COMBINED_PATTERN).expect("Invalid combined log regex"))
}

/// Parses one combined access-log line.
///
/// Only the remote address, request target, timestamp and user agent are
/// kept. The method and referer have to match but are dropped.
pub fn parse_combined_line(line: &str) -> Result<LogEntry> {
    let caps = combined_regex()
        .captures(line)
        .ok_or_else(|| mismatch(line))?;

    // A match that resolved fewer groups counts as no match at all.
    if caps.len() != CAPTURE_COUNT {
        return Err(mismatch(line));
    }

    let ip_address = group(&caps, REMOTE_ADDR, line)?;
    let raw_time = group(&caps, TIME_LOCAL, line)?;
    let requested_url = group(&caps, REQUEST_TARGET, line)?;
    let user_agent = group(&caps, USER_AGENT, line)?;

    let timestamp = parse_access_log_time(raw_time)?;

    Ok(LogEntry {
        ip_address: ip_address.to_string(),
        requested_url: requested_url.to_string(),
        timestamp,
        user_agent: user_agent.to_string(),
    })
}

// --- Helpers ---

#[inline(always)]
fn group<'h>(caps: &Captures<'h>, index: usize, line: &str) -> Result<&'h str> {
    caps.get(index)
        .map(|m| m.as_str())
        .ok_or_else(|| mismatch(line))
}

fn mismatch(line: &str) -> Error {
    Error::FormatMismatch {
        line: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    const SAMPLE: &str = r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 1024 "-" "Mozilla/5.0""#;

    fn assert_mismatch(line: &str) {
        match parse_combined_line(line) {
            Err(Error::FormatMismatch { line: reported }) => assert_eq!(reported, line),
            other => panic!("expected format mismatch for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_parses_sample_line() {
        let entry = parse_combined_line(SAMPLE).unwrap();

        assert_eq!(entry.ip_address, "127.0.0.1");
        assert_eq!(entry.requested_url, "/index.html");
        assert_eq!(entry.user_agent, "Mozilla/5.0");
        assert_eq!(
            entry.timestamp,
            DateTime::parse_from_rfc3339("2023-10-10T13:55:36+00:00").unwrap()
        );
    }

    #[test]
    fn test_rejects_free_text_and_reports_line() {
        assert_mismatch("not a valid log line");
        assert_mismatch("");
    }

    #[test]
    fn test_rejects_missing_literals() {
        // closing bracket
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000 "GET / HTTP/1.1" 200 1 "-" "ua""#);
        // quotes around the request
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] GET / HTTP/1.1 200 1 "-" "ua""#);
        // user agent quotes
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" ua"#);
        // remote user must be a dash
        assert_mismatch(r#"127.0.0.1 - frank [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" "ua""#);
    }

    #[test]
    fn test_rejects_non_numeric_fields() {
        // byte count logged as "-"
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 304 - "-" "ua""#);
        // lowercase method
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "get / HTTP/1.1" 200 1 "-" "ua""#);
        // two-digit protocol version
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/10.1" 200 1 "-" "ua""#);
        // address outside [0-9.]
        assert_mismatch(r#"::1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" "ua""#);
    }

    #[test]
    fn test_empty_referer_does_not_match() {
        assert_mismatch(r#"127.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "" "ua""#);
    }

    #[test]
    fn test_negative_offset_is_kept() {
        let line = r#"10.1.2.3 - - [01/Jan/2024:00:00:01 -0500] "POST /login HTTP/2.0" 302 0 "https://example.com/" "curl/8.0""#;
        let entry = parse_combined_line(line).unwrap();

        assert_eq!(entry.requested_url, "/login");
        assert_eq!(entry.timestamp.to_rfc3339(), "2024-01-01T00:00:01-05:00");
    }

    #[test]
    fn test_request_target_with_spaces_and_query() {
        let line = r#"10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET /search?q=a b HTTP/1.1" 200 12 "-" "ua""#;
        let entry = parse_combined_line(line).unwrap();

        assert_eq!(entry.requested_url, "/search?q=a b");
    }

    #[test]
    fn test_trailing_content_is_ignored() {
        let line = format!("{} rt=0.002 upstream=backend", SAMPLE);
        let entry = parse_combined_line(&line).unwrap();

        assert_eq!(entry.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_extra_quoted_field_shifts_into_referer() {
        // Greedy groups: with a trailing "x_forwarded_for" the last quoted
        // field is the one reported as user agent.
        let line = r#"10.0.0.1 - - [10/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 12 "-" "Mozilla/5.0" "203.0.113.9""#;
        let entry = parse_combined_line(line).unwrap();

        assert_eq!(entry.user_agent, "203.0.113.9");
    }

    #[test]
    fn test_bad_day_of_month_is_a_timestamp_error() {
        let line = r#"127.0.0.1 - - [32/Oct/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" "ua""#;
        assert!(matches!(parse_combined_line(line), Err(Error::Timestamp(_))));
    }

    #[test]
    fn test_unknown_month_is_a_timestamp_error() {
        let line = r#"127.0.0.1 - - [10/Okt/2023:13:55:36 +0000] "GET / HTTP/1.1" 200 1 "-" "ua""#;
        assert!(matches!(parse_combined_line(line), Err(Error::Timestamp(_))));
    }
}
