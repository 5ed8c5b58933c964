// src/ingest.rs

use serde::Deserialize;
use std::io::BufRead;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::parsers::{parse_log_line, LogEntry, LogFormat};

/// How a stream of lines is turned into entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IngestOptions {
    /// Fixed input format. `None` detects the format line by line.
    pub format: Option<LogFormat>,
    /// Skip lines that fail to parse instead of stopping at the first one.
    pub skip_invalid: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            format: None,
            skip_invalid: true,
        }
    }
}

/// Outcome of parsing one physical line. Line numbers start at 1.
#[derive(Debug)]
pub struct LineResult {
    pub line_number: usize,
    pub result: Result<LogEntry>,
}

/// Iterator parsing every non-blank line of a reader.
///
/// Each line is independent: a bad line, including one that is not valid
/// UTF-8, yields an error and the next call carries on. A read error is
/// yielded once and ends the iteration.
pub struct LogLines<R> {
    reader: R,
    format: Option<LogFormat>,
    line_number: usize,
    finished: bool,
}

impl<R: BufRead> LogLines<R> {
    pub fn new(reader: R, format: Option<LogFormat>) -> Self {
        Self {
            reader,
            format,
            line_number: 0,
            finished: false,
        }
    }

    /// Reads the next raw line without its `\n` or `\r\n` terminator.
    /// `Ok(None)` at end of input.
    fn read_raw_line(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        Ok(Some(buf))
    }
}

impl<R: BufRead> Iterator for LogLines<R> {
    type Item = LineResult;

    fn next(&mut self) -> Option<LineResult> {
        if self.finished {
            return None;
        }

        loop {
            let raw = match self.read_raw_line() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(LineResult {
                        line_number: self.line_number + 1,
                        result: Err(Error::Io(e)),
                    });
                }
            };
            self.line_number += 1;

            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    return Some(LineResult {
                        line_number: self.line_number,
                        result: Err(Error::Encoding(e)),
                    });
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            let format = self.format.unwrap_or_else(|| LogFormat::detect(&line));
            return Some(LineResult {
                line_number: self.line_number,
                result: parse_log_line(&line, format),
            });
        }
    }
}

/// Entries collected from a reader, plus how many lines were dropped.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub entries: Vec<LogEntry>,
    pub skipped: usize,
}

/// Reads every line from `reader` and parses it according to `options`.
///
/// Read errors always abort. Per-line parse errors abort unless
/// `skip_invalid` is set, in which case they are logged and counted.
pub fn ingest<R: BufRead>(reader: R, options: &IngestOptions) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    for LineResult {
        line_number,
        result,
    } in LogLines::new(reader, options.format)
    {
        match result {
            Ok(entry) => report.entries.push(entry),
            Err(e) if options.skip_invalid && e.is_line_error() => {
                warn!(line_number, error = %e, "Skipping unparseable log line");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        entries = report.entries.len(),
        skipped = report.skipped,
        "Finished ingesting log lines"
    );

    Ok(report)
}
