//! RIFF/WAVE input source.
//!
//! [`WavInputSource`] scans a RIFF/WAVE stream chunk by chunk on construction,
//! extracts the PCM format and splits the stream into three exact byte ranges:
//! the header (everything before the first sample), the PCM data, and whatever
//! trails the data chunk. Afterwards it serves sequential block reads plus
//! cursor-preserving retrieval of the header and trailing bytes.

use std::{fs::File, io::BufReader, path::Path};

use tracing::{debug, trace, warn};

use crate::{
    error::{InputSourceError, InputSourceResult},
    traits::{ByteStream, InputSource},
    types::{AudioFormatDescriptor, BlockRead, ContainerLayout, SourceOptions},
    wav::{
        chunks::{ChunkHeader, ChunkID, DATA_CHUNK, FMT_CHUNK, RIFF_CHUNK, WAVE_CHUNK},
        error::WavError,
        fmt::{FMT_FIXED_SIZE, FmtChunk},
    },
};

/// Input source that owns the file it opened.
pub type OwnedWavSource = WavInputSource<BufReader<File>>;

/// Input source reading from a stream the caller keeps ownership of.
pub type BorrowedWavSource<'a, R> = WavInputSource<&'a mut R>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Analysis {
    format: AudioFormatDescriptor,
    layout: ContainerLayout,
}

#[derive(Debug)]
enum SourceState {
    Ready(Analysis),
    Failed(InputSourceError),
}

#[derive(Debug, Clone, Copy)]
enum ProbeOrigin {
    Start,
    End,
}

/// PCM input source backed by a RIFF/WAVE byte stream.
///
/// The stream type decides ownership: [`WavInputSource::open`] opens and owns a
/// file, which is closed on drop and on every failed construction, while
/// [`WavInputSource::new`] given `&mut R` only borrows the caller's stream.
///
/// After a successful construction the stream is positioned on the first PCM
/// byte and [`read_blocks`](Self::read_blocks) walks forward from there.
/// A source is not meant to be shared between threads: the header and trailer
/// probes move the cursor temporarily, so all access must be serialised.
///
/// # Example
///
/// ```no_run
/// use wav_input_source::WavInputSource;
///
/// let mut source = WavInputSource::open("take1.wav")?;
/// let format = *source.format()?;
/// let mut buffer = vec![0u8; 1024 * format.block_align as usize];
///
/// let header = source.header_data()?;
/// loop {
///     let read = source.read_blocks(&mut buffer, 1024)?;
///     if read.blocks == 0 {
///         break;
///     }
///     // hand buffer[..read.bytes] to the encoder...
/// }
/// let trailer = source.terminating_data()?;
/// # Ok::<(), wav_input_source::InputSourceError>(())
/// ```
#[derive(Debug)]
pub struct WavInputSource<S: ByteStream> {
    stream: S,
    options: SourceOptions,
    state: SourceState,
}

impl OwnedWavSource {
    /// Open and analyse the WAV file at `path` with default options.
    pub fn open<P: AsRef<Path>>(path: P) -> InputSourceResult<Self> {
        Self::open_with_options(path, SourceOptions::default())
    }

    /// Open and analyse the WAV file at `path`.
    ///
    /// # Errors
    ///
    /// - `BadParameter` for an empty path
    /// - `IoOpenError` if the file cannot be opened
    /// - any analysis error of [`WavInputSource::with_options`]; the file is
    ///   closed before the error is returned
    pub fn open_with_options<P: AsRef<Path>>(
        path: P,
        options: SourceOptions,
    ) -> InputSourceResult<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(InputSourceError::bad_parameter("source path is empty"));
        }

        let file = File::open(path).map_err(|e| InputSourceError::io_open(path, e))?;
        debug!(path = %path.display(), "opened WAV source");
        Self::with_options(BufReader::with_capacity(options.buffer_capacity, file), options)
    }
}

impl<S: ByteStream> WavInputSource<S> {
    /// Analyse `stream` with default options.
    pub fn new(stream: S) -> InputSourceResult<Self> {
        Self::with_options(stream, SourceOptions::default())
    }

    /// Analyse `stream`, returning an error instead of an invalid source.
    ///
    /// The stream may be positioned anywhere; analysis always starts at offset 0.
    /// On failure `stream` is dropped, which closes it when owned and ends the
    /// borrow when it is `&mut R`.
    pub fn with_options(stream: S, options: SourceOptions) -> InputSourceResult<Self> {
        let WavInputSource {
            stream,
            options,
            state,
        } = Self::analyze(stream, options);

        match state {
            SourceState::Ready(analysis) => Ok(WavInputSource {
                stream,
                options,
                state: SourceState::Ready(analysis),
            }),
            SourceState::Failed(err) => Err(err),
        }
    }

    /// Analyse `stream` and always hand back a source.
    ///
    /// When analysis fails the source is marked invalid: [`failure`](Self::failure)
    /// holds the reason, [`into_inner`](Self::into_inner) returns the stream, and
    /// every data access fails with `NotInitialized`.
    pub fn analyze(mut stream: S, options: SourceOptions) -> Self {
        let state = match analyze_container(&mut stream, &options) {
            Ok(analysis) => SourceState::Ready(analysis),
            Err(err) => {
                debug!(error = %err, "WAV analysis failed");
                SourceState::Failed(err)
            }
        };

        WavInputSource {
            stream,
            options,
            state,
        }
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        matches!(self.state, SourceState::Ready(_))
    }

    /// Why analysis failed, if it did.
    pub fn failure(&self) -> Option<&InputSourceError> {
        match &self.state {
            SourceState::Ready(_) => None,
            SourceState::Failed(err) => Some(err),
        }
    }

    pub const fn options(&self) -> &SourceOptions {
        &self.options
    }

    /// Shared access to the underlying stream.
    pub const fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Give the stream back, valid or not.
    pub fn into_inner(self) -> S {
        self.stream
    }

    fn analysis(&self) -> InputSourceResult<&Analysis> {
        match &self.state {
            SourceState::Ready(analysis) => Ok(analysis),
            SourceState::Failed(_) => Err(InputSourceError::NotInitialized),
        }
    }

    pub fn format(&self) -> InputSourceResult<&AudioFormatDescriptor> {
        self.analysis().map(|analysis| &analysis.format)
    }

    pub fn layout(&self) -> InputSourceResult<&ContainerLayout> {
        self.analysis().map(|analysis| &analysis.layout)
    }

    /// Number of whole blocks in the data chunk.
    pub fn total_blocks(&self) -> InputSourceResult<u64> {
        let analysis = self.analysis()?;
        Ok(analysis.layout.total_blocks(analysis.format.block_align))
    }

    /// Read up to `blocks` blocks from the current position into `buffer`.
    ///
    /// Reads stop at the end of the data chunk, so trailing chunks are never
    /// returned as samples. The block count is the number of whole blocks among
    /// the bytes read.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` if analysis failed
    /// - `BadParameter` if `buffer` is shorter than `blocks × block_align`
    /// - `IoReadError` if the stream fails
    pub fn read_blocks(&mut self, buffer: &mut [u8], blocks: usize) -> InputSourceResult<BlockRead> {
        let Analysis { format, layout } = *self.analysis()?;
        let block_align = format.block_align as usize;

        let requested = blocks
            .checked_mul(block_align)
            .filter(|&bytes| bytes <= buffer.len())
            .ok_or_else(|| {
                InputSourceError::bad_parameter(format!(
                    "buffer of {} bytes cannot hold {} blocks of {} bytes",
                    buffer.len(),
                    blocks,
                    block_align
                ))
            })?;

        let position = self
            .stream
            .current_position()
            .map_err(InputSourceError::io_read)?;
        let remaining = layout.data_range().end.saturating_sub(position);
        let wanted = usize::try_from(remaining).map_or(requested, |r| r.min(requested));

        let bytes = self
            .stream
            .read_up_to(&mut buffer[..wanted])
            .map_err(InputSourceError::io_read)?;

        let read = BlockRead {
            bytes,
            blocks: bytes / block_align,
        };
        trace!(
            requested = blocks,
            blocks = read.blocks,
            bytes,
            position,
            "read PCM blocks"
        );
        Ok(read)
    }

    /// Move the read cursor to the start of block `block` of the data chunk.
    pub fn seek_to_block(&mut self, block: u64) -> InputSourceResult<()> {
        let Analysis { format, layout } = *self.analysis()?;
        let total_blocks = layout.total_blocks(format.block_align);
        if block > total_blocks {
            return Err(InputSourceError::bad_parameter(format!(
                "block {} is beyond the end of the data (total blocks: {})",
                block, total_blocks
            )));
        }

        let offset = layout.header_bytes + block * format.block_align as u64;
        self.stream
            .seek_absolute(offset)
            .map_err(InputSourceError::io_read)?;
        Ok(())
    }

    /// Move the read cursor back to the first PCM byte.
    pub fn reset(&mut self) -> InputSourceResult<()> {
        self.seek_to_block(0)
    }

    /// All bytes before the first PCM sample, read without moving the cursor.
    pub fn header_data(&mut self) -> InputSourceResult<Vec<u8>> {
        let header_bytes = self.analysis()?.layout.header_bytes;
        self.probe(ProbeOrigin::Start, header_bytes, "header bytes")
    }

    /// All bytes after the data chunk, read without moving the cursor.
    pub fn terminating_data(&mut self) -> InputSourceResult<Vec<u8>> {
        let terminating_bytes = self.analysis()?.layout.terminating_bytes;
        self.probe(ProbeOrigin::End, terminating_bytes, "terminating bytes")
    }

    /// Read `len` bytes at one end of the stream, restoring the cursor on every path.
    fn probe(
        &mut self,
        origin: ProbeOrigin,
        len: u64,
        what: &'static str,
    ) -> InputSourceResult<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }

        let original = self
            .stream
            .current_position()
            .map_err(InputSourceError::io_read)?;
        let data = self.read_region(origin, len, what);
        let restored = self.stream.seek_absolute(original);
        trace!(what, len, original, ok = data.is_ok(), "probed stream");

        let data = data?;
        restored.map_err(InputSourceError::io_read)?;
        Ok(data)
    }

    fn read_region(
        &mut self,
        origin: ProbeOrigin,
        len: u64,
        what: &'static str,
    ) -> InputSourceResult<Vec<u8>> {
        let size = usize::try_from(len).map_err(|_| {
            InputSourceError::bad_parameter(format!("{what} ({len}) do not fit in memory"))
        })?;

        let seeked = match origin {
            ProbeOrigin::Start => self.stream.seek_absolute(0),
            ProbeOrigin::End => {
                let back = i64::try_from(len).map_err(|_| {
                    InputSourceError::bad_parameter(format!("{what} ({len}) exceed seek range"))
                })?;
                self.stream.seek_from_end(-back)
            }
        };
        seeked.map_err(InputSourceError::io_read)?;

        let mut buffer = vec![0u8; size];
        let got = self
            .stream
            .read_up_to(&mut buffer)
            .map_err(InputSourceError::io_read)?;
        if got != size {
            return Err(InputSourceError::short_read(what, len, got as u64));
        }
        Ok(buffer)
    }
}

impl<S: ByteStream> InputSource for WavInputSource<S> {
    fn is_valid(&self) -> bool {
        WavInputSource::is_valid(self)
    }

    fn format(&self) -> InputSourceResult<&AudioFormatDescriptor> {
        WavInputSource::format(self)
    }

    fn layout(&self) -> InputSourceResult<&ContainerLayout> {
        WavInputSource::layout(self)
    }

    fn read_blocks(&mut self, buffer: &mut [u8], blocks: usize) -> InputSourceResult<BlockRead> {
        WavInputSource::read_blocks(self, buffer, blocks)
    }

    fn header_data(&mut self) -> InputSourceResult<Vec<u8>> {
        WavInputSource::header_data(self)
    }

    fn terminating_data(&mut self) -> InputSourceResult<Vec<u8>> {
        WavInputSource::terminating_data(self)
    }
}

// Chunk scanning

fn analyze_container<S: ByteStream>(
    stream: &mut S,
    options: &SourceOptions,
) -> InputSourceResult<Analysis> {
    stream
        .seek_absolute(0)
        .map_err(|e| WavError::unreadable(0, e))?;
    let file_size_bytes = stream
        .total_size()
        .map_err(|e| WavError::unreadable(0, e))?;

    let riff = ChunkHeader::from_bytes(&read_array(stream, "RIFF header")?);
    if !riff.is(RIFF_CHUNK) {
        return Err(WavError::missing_marker(RIFF_CHUNK, riff.id, 0).into());
    }

    let wave = ChunkID::new(&read_array(stream, "WAVE identifier")?);
    if wave != WAVE_CHUNK {
        return Err(WavError::missing_marker(WAVE_CHUNK, wave, 8).into());
    }
    trace!(riff_size = riff.size, file_size_bytes, "RIFF/WAVE markers found");

    let fmt_header = find_chunk(stream, FMT_CHUNK, options)?;
    let fmt_bytes: [u8; FMT_FIXED_SIZE] = read_array(stream, "fmt chunk")?;
    let fmt = FmtChunk::from_array(&fmt_bytes);
    debug!(%fmt, declared_size = fmt_header.size, "found fmt chunk");
    let format = fmt.to_descriptor()?;

    // Extension fields (cbSize, WAVE_FORMAT_EXTENSIBLE data, vendor bytes) are skipped unread
    let extra = i64::from(fmt_header.size) - FMT_FIXED_SIZE as i64;
    if extra < 0 {
        return Err(WavError::InvalidFmtChunkSize(fmt_header.size).into());
    }
    let pad = i64::from(options.pad_odd_chunks && fmt_header.size % 2 == 1);
    if extra + pad > 0 {
        let offset = position(stream)?;
        stream
            .seek_current(extra + pad)
            .map_err(|e| WavError::unreadable(offset, e))?;
    }

    let data_header = find_chunk(stream, DATA_CHUNK, options)?;
    let header_bytes = position(stream)?;
    let data_bytes = match data_header.usable_size() {
        Some(size) => size,
        None => {
            let fallback = file_size_bytes.saturating_sub(header_bytes);
            warn!(
                declared = data_header.size,
                fallback, "unusable data chunk size, assuming data runs to end of stream"
            );
            fallback
        }
    };

    if data_bytes % format.block_align as u64 != 0 {
        return Err(WavError::MisalignedData {
            data_bytes,
            block_align: format.block_align,
        }
        .into());
    }

    let layout = ContainerLayout::new(file_size_bytes, header_bytes, data_bytes)?;
    debug!(%format, %layout, "analysed WAV source");

    Ok(Analysis { format, layout })
}

/// Walk chunk headers from the current position until `target` is found.
///
/// Unknown chunks are skipped by their declared size. On success the stream is
/// positioned on the first payload byte of `target`.
fn find_chunk<S: ByteStream>(
    stream: &mut S,
    target: ChunkID,
    options: &SourceOptions,
) -> Result<ChunkHeader, WavError> {
    loop {
        let offset = position(stream)?;
        let mut bytes = [0u8; ChunkHeader::SIZE];
        let got = stream
            .read_up_to(&mut bytes)
            .map_err(|e| WavError::unreadable(offset, e))?;

        if got == 0 {
            return Err(WavError::chunk_not_found(target, offset));
        }
        if got < ChunkHeader::SIZE {
            return Err(WavError::truncated(
                "chunk header",
                ChunkHeader::SIZE,
                got,
                offset,
            ));
        }

        let header = ChunkHeader::from_bytes(&bytes);
        if header.is(target) {
            trace!(chunk = %header.id, size = header.size, offset, "located chunk");
            return Ok(header);
        }

        let skip = header.skip_len(options.pad_odd_chunks);
        debug!(chunk = %header.id, size = header.size, offset, "skipping chunk");
        stream
            .seek_current(skip as i64)
            .map_err(|e| WavError::unreadable(offset, e))?;
    }
}

fn read_array<S: ByteStream, const N: usize>(
    stream: &mut S,
    what: &'static str,
) -> Result<[u8; N], WavError> {
    let offset = position(stream)?;
    let mut bytes = [0u8; N];
    let got = stream
        .read_up_to(&mut bytes)
        .map_err(|e| WavError::unreadable(offset, e))?;
    if got < N {
        return Err(WavError::truncated(what, N, got, offset));
    }
    Ok(bytes)
}

fn position<S: ByteStream>(stream: &mut S) -> Result<u64, WavError> {
    stream
        .current_position()
        .map_err(|e| WavError::unreadable(0, e))
}
