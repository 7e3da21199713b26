// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms
#![allow(clippy::result_large_err)] // Allow large error types for comprehensive error handling
#![allow(clippy::missing_const_for_fn)] // Functions may need mutations in the future
#![allow(clippy::collapsible_if)] // Sometimes clearer to have separate conditions
#![allow(clippy::missing_panics_doc)] // Panics are converted to proper errors where needed
#![allow(clippy::needless_borrows_for_generic_args)] // Sometimes clearer with explicit borrows
#![allow(clippy::if_same_then_else)] // Similar blocks may diverge in the future
#![allow(clippy::unnecessary_cast)] // Explicit casts for clarity
#![allow(clippy::identity_op)] // Explicit operations for clarity

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::large_stack_arrays)] // Helps avoid stack overflows
#![warn(clippy::box_collection)] // Warns on boxed `Vec`, `String`, etc.
#![warn(clippy::vec_box)] // Avoids using `Vec<Box<T>>` when unnecessary
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::identity_op)] // e.g., `x + 0`, `x * 1`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::let_unit_value)] // Avoids binding `()` to variables
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`
#![warn(clippy::panic)] // Avoids using `panic!` in production code

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![warn(clippy::missing_safety_doc)] // Docs for `unsafe` functions
#![warn(clippy::missing_const_for_fn)] // Suggests making eligible functions `const`
#![allow(clippy::too_many_arguments)] // Allow functions with many parameters (very few and far between)

//! PCM input sources for audio encoders.
//!
//! An input source analyses a container once, exposes the PCM format of its
//! samples and splits the stream into header, sample data and trailing bytes.
//! Encoders read the samples block by block and can carry the header and
//! trailer over verbatim, so a file can be rebuilt byte for byte.
//!
//! RIFF/WAVE is the supported container; see [`WavInputSource`].

pub mod error;
pub mod traits;
pub mod types;
pub mod wav;

use std::{
    io::{Read, Seek},
    path::Path,
};

use tracing::debug;

pub use crate::{
    error::{ErrorKind, InputSourceError, InputSourceResult},
    traits::{ByteStream, InputSource},
    types::{
        AudioFormatDescriptor, BlockRead, ContainerLayout, FileType, SourceInfo, SourceOptions,
    },
    wav::{FormatCode, WavInputSource, source::OwnedWavSource},
};

/// Convenience trait for types that implement both Read and Seek
pub trait ReadSeek: Read + Seek {}

impl<RS: Read + Seek> ReadSeek for RS where RS: Read + Seek {}

// Public API

/// Create an input source for the file at `path`, chosen by its extension.
///
/// Only `.wav` (any case) is recognised. The returned source owns the file and
/// closes it when dropped.
///
/// # Errors
///
/// - `BadParameter` for an empty path
/// - `UnrecognizedFormat` for any other extension; the file is not opened
/// - `IoOpenError` if the file cannot be opened
/// - any analysis error of [`WavInputSource::with_options`]
///
/// # Example
///
/// ```no_run
/// use wav_input_source::create_input_source;
///
/// let mut source = create_input_source("take1.wav")?;
/// println!("{}", source.info()?);
/// let header = source.header_data()?;
/// # Ok::<(), wav_input_source::InputSourceError>(())
/// ```
pub fn create_input_source<P: AsRef<Path>>(path: P) -> InputSourceResult<Box<dyn InputSource>> {
    create_input_source_with_options(path, SourceOptions::default())
}

/// [`create_input_source`] with explicit options.
pub fn create_input_source_with_options<P: AsRef<Path>>(
    path: P,
    options: SourceOptions,
) -> InputSourceResult<Box<dyn InputSource>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(InputSourceError::bad_parameter("source path is empty"));
    }

    match FileType::from_path(path) {
        FileType::WAV => {
            let source = WavInputSource::open_with_options(path, options)?;
            Ok(Box::new(source))
        }
        other => {
            debug!(path = %path.display(), file_type = %other, "no input source for file");
            Err(InputSourceError::unrecognized_format(format!(
                "No input source for {}",
                path.display()
            )))
        }
    }
}

/// Open a WAV file as a concrete, owning input source.
pub fn open_source<P: AsRef<Path>>(path: P) -> InputSourceResult<OwnedWavSource> {
    let path = path.as_ref();
    match FileType::from_path(path) {
        FileType::WAV => WavInputSource::open(path),
        _ => Err(InputSourceError::unrecognized_format(format!(
            "Not a WAV file: {}",
            path.display()
        ))),
    }
}

/// Analyse any `Read + Seek` source as WAV.
///
/// Pass `&mut reader` to keep ownership of the stream; pass the reader by value
/// to hand it over.
///
/// # Example
///
/// ```no_run
/// use wav_input_source::open_source_reader;
/// use std::io::Cursor;
///
/// let wav_bytes: Vec<u8> = load_from_network();
/// let mut cursor = Cursor::new(wav_bytes);
/// let source = open_source_reader(&mut cursor)?;
/// # fn load_from_network() -> Vec<u8> { vec![] }
/// # Ok::<(), wav_input_source::InputSourceError>(())
/// ```
pub fn open_source_reader<R: ReadSeek>(reader: R) -> InputSourceResult<WavInputSource<R>> {
    WavInputSource::new(reader)
}

/// Format, layout and duration of the file at `path`.
pub fn info<P: AsRef<Path>>(path: P) -> InputSourceResult<SourceInfo> {
    create_input_source(path)?.info()
}
