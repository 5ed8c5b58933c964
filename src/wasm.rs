use wasm_bindgen::prelude::*;

use crate::parsers::{self, LogFormat};
use crate::LogEntry;

// Returned to JavaScript as a JSON string.
#[derive(serde::Serialize)]
struct WasmResult {
    entry: Option<LogEntry>,
    error: Option<String>,
}

/// Parses one line for the web frontend.
///
/// `format` is `"auto"` (detect per line) or any name accepted by
/// [`LogFormat`]'s `FromStr`.
#[wasm_bindgen]
pub fn parse_line(log_line: &str, format: &str) -> String {
    let format = if format.trim().eq_ignore_ascii_case("auto") {
        Ok(LogFormat::detect(log_line))
    } else {
        format.parse::<LogFormat>()
    };

    let result = match format.and_then(|f| parsers::parse_log_line(log_line, f)) {
        Ok(entry) => WasmResult {
            entry: Some(entry),
            error: None,
        },
        Err(e) => WasmResult {
            entry: None,
            error: Some(e.to_string()),
        },
    };

    serde_json::to_string(&result).unwrap_or_default()
}
