// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The line does not follow the combined access-log grammar.
    #[error("failed to parse log line: {line}")]
    FormatMismatch { line: String },

    #[error("malformed JSON log line: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to parse timestamp: {0}")]
    Timestamp(#[from] TimestampError),

    /// A line that is not valid UTF-8.
    #[error("log line is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("unknown log format: '{0}'")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a timestamp was rejected.
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("{0}")]
    Chrono(#[from] chrono::ParseError),

    /// chrono accepted the value but the layout is stricter.
    #[error("'{value}': {reason}")]
    Layout { value: String, reason: &'static str },
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Error::Timestamp(TimestampError::Chrono(e))
    }
}

impl Error {
    /// True when the error belongs to a single input line, so a caller
    /// walking a stream can skip it and keep going.
    pub fn is_line_error(&self) -> bool {
        matches!(
            self,
            Error::FormatMismatch { .. }
                | Error::Decode(_)
                | Error::Timestamp(_)
                | Error::Encoding(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
