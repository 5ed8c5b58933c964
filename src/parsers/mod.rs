// File: src/parsers/mod.rs

pub mod combined;
pub mod json;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The four fields kept from an access-log line, whichever format it came in.
///
/// Only ever built fully populated by one of the parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ip_address: String,
    pub requested_url: String,
    /// Serialized as RFC 3339, offset preserved.
    pub timestamp: DateTime<FixedOffset>,
    pub user_agent: String,
}

/// Input format of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Apache / nginx combined access log.
    Combined,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    /// Guesses the format of a line.
    ///
    /// Anything that looks like an object is JSON and must then parse as
    /// JSON; everything else is handed to the combined grammar.
    pub fn detect(line: &str) -> LogFormat {
        let trimmed = line.trim();
        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            LogFormat::Json
        } else {
            LogFormat::Combined
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Combined => "combined",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "combined" | "clf" | "apache" | "nginx" => Ok(LogFormat::Combined),
            "json" => Ok(LogFormat::Json),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Parses a single line in the given format.
pub fn parse_log_line(line: &str, format: LogFormat) -> Result<LogEntry> {
    match format {
        LogFormat::Combined => combined::parse_combined_line(line),
        LogFormat::Json => json::parse_json_line(line),
    }
}
