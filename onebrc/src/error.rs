//! Error and Result types for the aggregation engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A convenience `Result` type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single line could not be turned into a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The line has no `;` separator (this includes empty lines).
    #[error("missing ';' separator")]
    MissingSeparator,

    /// The line has more than one `;` separator.
    #[error("more than one ';' separator")]
    ExtraSeparator,

    /// The station name is not valid UTF-8.
    #[error("station name is not valid UTF-8")]
    InvalidKey,

    /// The value is not a finite decimal number.
    #[error("value is not a finite decimal number")]
    InvalidValue,
}

/// The error type for engine operations.
///
/// Every variant is fatal for the run: no partial report is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The input file exists but could not be opened or inspected.
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Reading the input failed part way through.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line is malformed.
    #[error("Malformed line at byte {offset} (chunk {chunk}): {kind}: {line:?}")]
    Parse {
        /// Index of the chunk the line belongs to.
        chunk: usize,
        /// Absolute byte offset of the start of the line in the input.
        offset: u64,
        /// The offending line, lossily decoded.
        line: String,
        /// What is wrong with it.
        kind: ParseErrorKind,
    },

    /// A chunk task panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl Error {
    /// Maps an error from opening `path` to [`Error::FileNotFound`] or [`Error::Open`].
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound { path },
            _ => Error::Open { path, source },
        }
    }

    /// Returns the parse failure kind if this is a [`Error::Parse`].
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
