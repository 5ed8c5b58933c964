// src/parsers/json.rs

use serde_json::{Map, Value};

use super::LogEntry;
use crate::error::Result;
use crate::time::parse_rfc3339_time;

/// Parses a single line as a JSON log object with `ip`, `uri`, `time`
/// (RFC 3339) and `user_agent` string fields.
///
/// Unknown keys are ignored, absent or `null` keys read as empty strings,
/// and a repeated key keeps its last value.
pub fn parse_json_line(line: &str) -> Result<LogEntry> {
    let mut object: Map<String, Value> = serde_json::from_str(line)?;

    let mut take_string = |key: &str| -> Result<String> {
        let value = object.remove(key).unwrap_or(Value::Null);
        Ok(serde_json::from_value::<Option<String>>(value)?.unwrap_or_default())
    };

    let ip_address = take_string("ip")?;
    let requested_url = take_string("uri")?;
    let raw_time = take_string("time")?;
    let user_agent = take_string("user_agent")?;

    let timestamp = parse_rfc3339_time(&raw_time)?;

    Ok(LogEntry {
        ip_address,
        requested_url,
        timestamp,
        user_agent,
    })
}
