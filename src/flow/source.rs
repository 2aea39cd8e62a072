//! Newline-delimited JSON flow input from the capture engine (stdin, file or named pipe).

use super::FlowRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The stream itself failed; no further records can be read
    #[error("flow source read failed: {0}")]
    Io(#[from] std::io::Error),
    /// One line could not be decoded; the stream continues
    #[error("undecodable flow record on line {line}: {source}")]
    Decode {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, SourceError::Io(_))
    }
}

/// Yields one [`FlowRecord`] per non-blank line, blocking on the reader.
/// Lines are read as raw bytes so invalid UTF-8 costs one record, not the stream.
pub struct JsonLinesSource<R> {
    reader: R,
    buf: Vec<u8>,
    line: u64,
    done: bool,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<FlowRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    let bytes = self.buf.trim_ascii();
                    if bytes.is_empty() {
                        continue;
                    }
                    let line = self.line;
                    return Some(
                        serde_json::from_slice(bytes)
                            .map_err(|source| SourceError::Decode { line, source }),
                    );
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(SourceError::Io(e)));
                }
            }
        }
        None
    }
}

/// Open the configured input: `-` is stdin, anything else a file or FIFO path.
pub fn open_source(path: &str) -> Result<JsonLinesSource<Box<dyn BufRead>>, SourceError> {
    let reader: Box<dyn BufRead> = if path == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(File::open(path)?))
    };
    Ok(JsonLinesSource::new(reader))
}
