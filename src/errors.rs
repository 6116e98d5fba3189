//! Error types and the recoverable-error collector (component M).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcqError {
    #[error("could not determine byte order and revision for this file")]
    BootstrapFailed,
    #[error("no valid channel data-type header found within the scan budget")]
    NoValidDtypeHeader,
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("unknown channel data type code: {0}")]
    UnknownDataType(i16),
    #[error("marker section is inconsistent: {0}")]
    InconsistentMarkerSection(String),
    #[error("journal header tag mismatch: expected {expected}, found {found}")]
    JournalTagMismatch { expected: String, found: String },
    #[error("cannot stream a compressed file")]
    StreamingCompressedFile,
    #[error("zlib decompression failed: {0}")]
    Decompression(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AcqError>;

/// Recoverable decode errors accumulated during a single decode session.
/// Unlike `AcqError`, entries here never abort the walk — they're recorded
/// and decoding continues with whatever was already parsed, matching the
/// original's behavior of logging and moving on rather than raising.
#[derive(Debug, Default, Clone)]
pub struct DecodeErrors {
    entries: Vec<String>,
}

impl DecodeErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{}", msg);
        self.entries.push(msg);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_without_aborting() {
        let mut errors = DecodeErrors::new();
        assert!(errors.is_empty());
        errors.push("truncated channel 2");
        errors.push("unknown marker style");
        assert_eq!(errors.into_vec(), vec!["truncated channel 2", "unknown marker style"]);
    }
}
