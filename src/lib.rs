pub mod error;
pub mod ingest;
pub mod parsers;
pub mod time;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export for easy access
pub use error::{Error, Result};
pub use ingest::{ingest, IngestOptions, IngestReport};
pub use parsers::combined::parse_combined_line;
pub use parsers::json::parse_json_line;
pub use parsers::{parse_log_line, LogEntry, LogFormat};
