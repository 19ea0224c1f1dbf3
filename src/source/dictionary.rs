//! Word-list backed candidate source

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::CandidateSource;
use crate::error::{CrackError, Result};
use crate::types::CrackMode;

/// Yields the lines of a word list in file order.
///
/// Line terminators (`\n` or `\r\n`) are stripped. Lines that are not valid
/// UTF-8 are skipped and counted; an I/O error while reading is fatal.
pub struct DictionarySource<R> {
    reader: R,
    name: String,
    buffer: Vec<u8>,
    line: u64,
    skipped: u64,
}

impl DictionarySource<BufReader<File>> {
    /// Open a word list on disk
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| CrackError::dictionary(path.to_string_lossy(), e.to_string()))?;
        tracing::info!(path = %path.display(), "Opened dictionary");
        Ok(Self::from_reader(BufReader::new(file), path.to_string_lossy()))
    }
}

impl<R: BufRead> DictionarySource<R> {
    /// Wrap any buffered reader. `name` labels errors.
    pub fn from_reader(reader: R, name: impl Into<String>) -> Self {
        Self {
            reader,
            name: name.into(),
            buffer: Vec::with_capacity(64),
            line: 0,
            skipped: 0,
        }
    }

    /// Lines skipped because they were not valid UTF-8
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Lines read so far, including skipped ones
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl<R: BufRead> CandidateSource for DictionarySource<R> {
    fn next_candidate(&mut self) -> Result<Option<String>> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .map_err(|e| CrackError::dictionary(&self.name, e.to_string()))?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            if self.buffer.last() == Some(&b'\n') {
                self.buffer.pop();
                if self.buffer.last() == Some(&b'\r') {
                    self.buffer.pop();
                }
            }

            match std::str::from_utf8(&self.buffer) {
                Ok(word) => return Ok(Some(word.to_string())),
                Err(_) => {
                    self.skipped += 1;
                    tracing::debug!(
                        dictionary = %self.name,
                        line = self.line,
                        "Skipping non UTF-8 line"
                    );
                }
            }
        }
    }

    fn mode(&self) -> CrackMode {
        CrackMode::Dictionary
    }
}
