use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{FlowTagError, Result};

pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Yields batches of at most `chunk_size` raw lines. Only one batch is held at a time.
///
/// A line that is not valid UTF-8 comes through as an empty string, which the record
/// parser drops like any other malformed line.
pub struct ChunkedLogReader<R> {
    reader: R,
    chunk_size: usize,
    buf: Vec<u8>,
    done: bool,
}

impl ChunkedLogReader<BufReader<File>> {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        if !path.is_file() {
            return Err(FlowTagError::MissingFile {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|source| FlowTagError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufReader::new(file), chunk_size))
    }
}

impl<R: BufRead> ChunkedLogReader<R> {
    /// A `chunk_size` of zero is treated as one.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            buf: Vec::new(),
            done: false,
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        let bytes = std::mem::take(&mut self.buf);
        Ok(Some(String::from_utf8(bytes).unwrap_or_default()))
    }
}

impl<R: BufRead> Iterator for ChunkedLogReader<R> {
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::with_capacity(self.chunk_size.min(DEFAULT_CHUNK_SIZE));
        while batch.len() < self.chunk_size {
            match self.read_line() {
                Ok(Some(line)) => batch.push(line),
                Ok(None) => {
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
