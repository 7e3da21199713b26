use std::io;

use thiserror::Error;

use crate::{error::ErrorPosition, wav::chunks::ChunkID};

/// Structural reasons a RIFF/WAVE container is rejected during analysis
#[derive(Debug, Error)]
pub enum WavError {
    #[error("Expected '{expected}' marker at {position}, found '{found}'")]
    MissingMarker {
        expected: ChunkID,
        found: ChunkID,
        position: ErrorPosition,
    },
    #[error("Chunk '{chunk}' not found before end of stream at {position}")]
    ChunkNotFound {
        chunk: ChunkID,
        position: ErrorPosition,
    },
    #[error("Truncated {what} at {position}: needed {needed} bytes, got {got}")]
    Truncated {
        what: &'static str,
        needed: usize,
        got: usize,
        position: ErrorPosition,
    },
    #[error("Invalid FMT chunk size: declared {0} bytes, at least 16 required")]
    InvalidFmtChunkSize(u32),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Data chunk of {data_bytes} bytes is not a whole number of {block_align}-byte blocks")]
    MisalignedData { data_bytes: u64, block_align: u16 },
    #[error(
        "Data chunk of {data_bytes} bytes starting at offset {header_bytes} overruns the {file_bytes}-byte stream"
    )]
    DataOverrun {
        header_bytes: u64,
        data_bytes: u64,
        file_bytes: u64,
    },
    #[error("Stream unreadable at {position}: {source}")]
    Unreadable {
        position: ErrorPosition,
        #[source]
        source: io::Error,
    },
}

impl WavError {
    pub fn missing_marker(expected: ChunkID, found: ChunkID, offset: u64) -> Self {
        WavError::MissingMarker {
            expected,
            found,
            position: ErrorPosition::new(offset),
        }
    }

    pub fn chunk_not_found(chunk: ChunkID, offset: u64) -> Self {
        WavError::ChunkNotFound {
            chunk,
            position: ErrorPosition::new(offset).with_description("end of chunk scan"),
        }
    }

    pub fn truncated(what: &'static str, needed: usize, got: usize, offset: u64) -> Self {
        WavError::Truncated {
            what,
            needed,
            got,
            position: ErrorPosition::new(offset),
        }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        WavError::InvalidFormat(message.into())
    }

    pub fn unreadable(offset: u64, source: io::Error) -> Self {
        WavError::Unreadable {
            position: ErrorPosition::new(offset),
            source,
        }
    }
}
