//! In-memory program source with a seekable read cursor.
//!
//! The whole program is loaded up front and addressed by byte offset, so loop
//! re-entry is a plain integer assignment rather than a stream reposition.

use std::fs;
use std::path::Path;

use crate::BrainfuckError;

/// A captured cursor location inside a [`ProgramSource`].
///
/// Positions are plain byte offsets; they stay valid for as long as the
/// source they came from is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(usize);

impl Position {
    /// Byte offset this position refers to.
    pub fn offset(self) -> usize {
        self.0
    }
}

/// Program text with a forward read cursor.
#[derive(Debug, Clone, Default)]
pub struct ProgramSource {
    bytes: Vec<u8>,
    cursor: usize,
}

impl ProgramSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Load the program stored at `path`. Any byte sequence is accepted.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BrainfuckError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| BrainfuckError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded {} bytes of program from {}", bytes.len(), path.display());
        Ok(Self::new(bytes))
    }

    /// Location just after the most recently read byte.
    pub fn mark_position(&self) -> Position {
        Position(self.cursor)
    }

    /// Move the cursor back (or forward) to a previously captured position.
    pub fn seek(&mut self, position: Position) {
        self.cursor = position.0.min(self.bytes.len());
    }

    /// Current cursor offset.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Iterator for ProgramSource {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = self.bytes.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(byte)
    }
}

impl From<Vec<u8>> for ProgramSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ProgramSource {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl From<String> for ProgramSource {
    fn from(code: String) -> Self {
        Self::new(code.into_bytes())
    }
}

impl From<&str> for ProgramSource {
    fn from(code: &str) -> Self {
        Self::new(code.as_bytes().to_vec())
    }
}
