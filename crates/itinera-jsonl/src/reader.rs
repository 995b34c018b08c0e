//! JSONL reading operations.
//!
//! [`JsonlReader`] reads one record per line with 1-based line tracking.
//! Blank lines are ignored everywhere. Strict reads fail on the first bad
//! line; resilient reads skip it and record a [`Warning`].

use crate::warning::{Warning, WarningCollector};
use crate::{Error, Result};
use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::pin::pin;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Lines longer than this are skipped by resilient reads instead of decoded.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// One non-blank line, or the reason it cannot be decoded at all.
enum Line {
    Text(String),
    Skipped(String),
}

/// Async reader for JSONL data.
///
/// ```no_run
/// use itinera_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut reader = JsonlReader::new(File::open("trip.jsonl").await?);
/// while let Some(value) = reader.read_line::<serde_json::Value>().await? {
///     println!("{value}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// Number of physical lines consumed so far, blank ones included.
    line_number: usize,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Wraps `reader` in a buffered JSONL reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    /// Like [`new`](Self::new) with an explicit buffer capacity in bytes.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
        }
    }

    /// 1-based number of the last line read, or 0 before the first read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Consumes the reader, returning the buffered inner reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }

    /// Reads one physical line as raw bytes, newline included.
    ///
    /// At most `MAX_LINE_BYTES` of content are kept; the rest of a longer
    /// line is consumed and dropped. Returns `None` at end of input, otherwise
    /// whether the line was cut short.
    async fn read_raw_line(&mut self, buf: &mut Vec<u8>) -> Result<Option<bool>> {
        let mut read_any = false;
        let mut too_long = false;
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                break;
            }
            read_any = true;

            let (used, done) = match available.iter().position(|&b| b == b'\n') {
                Some(newline) => (newline + 1, true),
                None => (available.len(), false),
            };
            if !too_long {
                let content = used - usize::from(done);
                if buf.len() + content > MAX_LINE_BYTES {
                    too_long = true;
                    buf.clear();
                } else {
                    buf.extend_from_slice(&available[..used]);
                }
            }
            self.reader.consume(used);
            if done {
                break;
            }
        }
        Ok(read_any.then_some(too_long))
    }

    /// Returns the next non-blank line with surrounding whitespace trimmed.
    async fn next_line(&mut self) -> Result<Option<Line>> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let Some(too_long) = self.read_raw_line(&mut buf).await? else {
                return Ok(None);
            };
            self.line_number += 1;

            if too_long {
                return Ok(Some(Line::Skipped(format!(
                    "line exceeds {MAX_LINE_BYTES} bytes"
                ))));
            }
            let text = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(text) => text,
                Err(e) => {
                    return Ok(Some(Line::Skipped(format!(
                        "invalid UTF-8: {}",
                        e.utf8_error()
                    ))));
                }
            };
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Ok(Some(Line::Text(trimmed.to_string())));
            }
        }
    }

    /// Reads and decodes the next record.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the line number when the line does not
    /// decode into `T`, [`Error::InvalidFormat`] when it is not UTF-8 or is
    /// longer than [`MAX_LINE_BYTES`], or [`Error::Io`] when the underlying
    /// read fails.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let line = match self.next_line().await? {
            Some(Line::Text(line)) => line,
            Some(Line::Skipped(reason)) => {
                return Err(Error::InvalidFormat(format!(
                    "line {}: {reason}",
                    self.line_number
                )));
            }
            None => return Ok(None),
        };
        serde_json::from_str(&line)
            .map(Some)
            .map_err(|source| Error::Parse {
                line_number: self.line_number,
                source,
            })
    }

    /// Reads every remaining record, failing on the first bad line.
    ///
    /// # Errors
    ///
    /// See [`read_line`](Self::read_line).
    pub async fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut values = Vec::new();
        while let Some(value) = self.read_line().await? {
            values.push(value);
        }
        Ok(values)
    }

    /// Turns the reader into a stream that skips undecodable lines.
    ///
    /// Skipped lines are pushed into `warnings`. Only I/O failures surface as
    /// `Err` items, and they end the stream.
    pub fn stream_resilient<T>(self, warnings: WarningCollector) -> impl Stream<Item = Result<T>>
    where
        T: DeserializeOwned,
    {
        stream::unfold(Some((self, warnings)), |state| async move {
            let Some((mut reader, warnings)) = state else {
                return None;
            };
            loop {
                let line = match reader.next_line().await {
                    Ok(Some(Line::Text(line))) => line,
                    Ok(Some(Line::Skipped(reason))) => {
                        warnings.add(Warning::SkippedLine {
                            line_number: reader.line_number,
                            reason,
                        });
                        continue;
                    }
                    Ok(None) => return None,
                    Err(e) => return Some((Err(e), None)),
                };

                let line_number = reader.line_number;
                match serde_json::from_str::<T>(&line) {
                    Ok(value) => return Some((Ok(value), Some((reader, warnings)))),
                    Err(e) => warnings.add(Warning::MalformedJson {
                        line_number,
                        error: e.to_string(),
                    }),
                }
            }
        })
    }
}

/// Loads a whole JSONL file, skipping and reporting bad lines.
///
/// Returns the decoded records in file order together with one warning per
/// skipped line.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await?;
    let warnings = WarningCollector::new();

    let mut records = pin!(JsonlReader::new(file).stream_resilient::<T>(warnings.clone()));
    let mut values = Vec::new();
    while let Some(value) = records.next().await {
        values.push(value?);
    }

    let warnings = warnings.into_warnings();
    if !warnings.is_empty() {
        tracing::debug!(
            path = %path.display(),
            skipped = warnings.len(),
            "skipped unreadable JSONL lines"
        );
    }
    Ok((values, warnings))
}
