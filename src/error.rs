use crate::wav::{FormatCode, error::WavError};

use core::fmt::{Display, Formatter, Result as FmtResult};
use std::{io, path::PathBuf};
use thiserror::Error;

/// Result type for wav_input_source operations
#[allow(clippy::result_large_err)]
pub type InputSourceResult<T> = Result<T, InputSourceError>;

/// Error type for every input source operation
#[derive(Debug, Error)]
pub enum InputSourceError {
    /// Null/empty path or an output buffer that cannot hold the request
    #[error("Bad parameter: {0}")]
    BadParameter(String),

    /// The path or extension does not name a supported container
    #[error("Unrecognized format: {0}")]
    UnrecognizedFormat(String),

    /// The byte stream could not be opened
    #[error("Could not open '{}': {source}", path.display())]
    IoOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Missing or malformed RIFF structure, detected while analysing the source
    #[error("Invalid container: {0}")]
    InvalidContainer(#[from] WavError),

    /// The fmt chunk names an encoding other than integer PCM
    #[error("Unsupported format tag {0}: only integer PCM is supported")]
    UnsupportedFormat(FormatCode),

    /// Read or seek failure after a successful analysis
    #[error("I/O read error: {0}")]
    IoRead(#[source] io::Error),

    /// Data access on a source whose analysis did not succeed
    #[error("Input source is not initialized")]
    NotInitialized,
}

/// Fieldless mirror of [`InputSourceError`] for matching on the failure class alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadParameter,
    UnrecognizedFormat,
    IoOpenError,
    InvalidContainer,
    UnsupportedFormat,
    IoReadError,
    NotInitialized,
}

impl InputSourceError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            InputSourceError::BadParameter(_) => ErrorKind::BadParameter,
            InputSourceError::UnrecognizedFormat(_) => ErrorKind::UnrecognizedFormat,
            InputSourceError::IoOpen { .. } => ErrorKind::IoOpenError,
            InputSourceError::InvalidContainer(_) => ErrorKind::InvalidContainer,
            InputSourceError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            InputSourceError::IoRead(_) => ErrorKind::IoReadError,
            InputSourceError::NotInitialized => ErrorKind::NotInitialized,
        }
    }

    /// Create a BadParameter error with a custom message
    pub fn bad_parameter(message: impl Into<String>) -> Self {
        InputSourceError::BadParameter(message.into())
    }

    /// Create an UnrecognizedFormat error with a custom message
    pub fn unrecognized_format(message: impl Into<String>) -> Self {
        InputSourceError::UnrecognizedFormat(message.into())
    }

    /// Create an IoOpen error for the given path
    pub fn io_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        InputSourceError::IoOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an IoRead error from an underlying stream failure
    pub const fn io_read(source: io::Error) -> Self {
        InputSourceError::IoRead(source)
    }

    /// Create an IoRead error for a read that returned fewer bytes than required
    pub fn short_read(what: &str, expected: u64, actual: u64) -> Self {
        InputSourceError::IoRead(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{what}: expected {expected} bytes, read {actual}"),
        ))
    }
}

/// Position information for errors that occur during parsing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Byte offset in the stream where the error occurred
    pub offset: u64,
    /// Human-readable description of the position
    pub description: String,
}

impl ErrorPosition {
    /// Create a new error position at the given byte offset
    pub fn new(offset: u64) -> Self {
        Self {
            offset,
            description: format!("byte offset {}", offset),
        }
    }

    /// Set a custom description for the error position
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = format!("{} (byte offset {})", description.into(), self.offset);
        self
    }
}

impl Display for ErrorPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.description)
    }
}
