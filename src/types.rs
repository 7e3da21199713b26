use core::fmt::{Display, Formatter, Result as FmtResult};
use core::ops::Range;
use core::str::FromStr;
use std::path::Path;
use std::time::Duration;

use crate::wav::{FormatCode, error::WavError};

/// Container formats an input source can be created for
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FileType {
    /// RIFF/WAVE container
    #[default]
    WAV,
    /// Anything without a supported extension
    Unknown,
}

impl FileType {
    /// Canonical lowercase file extension
    pub const fn as_str(self) -> &'static str {
        match self {
            FileType::WAV => "wav",
            FileType::Unknown => "unknown",
        }
    }

    /// Human-readable descriptive name
    pub const fn description(self) -> &'static str {
        match self {
            FileType::WAV => "Waveform Audio File Format",
            FileType::Unknown => "Unknown or unsupported audio container",
        }
    }

    /// Detect file type from path extension without allocating.
    ///
    /// A bare dotfile name such as `.wav` counts as its own extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            return ext.parse().unwrap_or(FileType::Unknown);
        }

        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) if name.starts_with('.') => FileType::from_extension(name),
            _ => FileType::Unknown,
        }
    }

    /// Detect file type from a bare extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Self {
        ext.strip_prefix('.')
            .unwrap_or(ext)
            .parse()
            .unwrap_or(FileType::Unknown)
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if f.alternate() {
            write!(f, "{}", self.description())
        } else {
            write!(f, "{}", self.as_str())
        }
    }
}

impl FromStr for FileType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("wav") {
            Ok(FileType::WAV)
        } else {
            Err(())
        }
    }
}

/// PCM format of the samples in an input source.
///
/// Built once per successful analysis and never modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioFormatDescriptor {
    /// Always [`FormatCode::Pcm`] for a successfully analysed source
    pub format_tag: FormatCode,
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    /// Bytes per sample frame (all channels)
    pub block_align: u16,
    pub bytes_per_second: u32,
}

impl AudioFormatDescriptor {
    /// Integer PCM descriptor with block align and byte rate derived from the
    /// sample layout: `block_align = (bits_per_sample / 8) * channels`.
    ///
    /// Returns `None` when the block align does not fit in a `u16` or the byte
    /// rate does not fit in a `u32`.
    pub const fn pcm(sample_rate: u32, bits_per_sample: u16, channels: u16) -> Option<Self> {
        let Some(block_align) = (bits_per_sample / 8).checked_mul(channels) else {
            return None;
        };
        let Some(bytes_per_second) = (block_align as u32).checked_mul(sample_rate) else {
            return None;
        };

        Some(AudioFormatDescriptor {
            format_tag: FormatCode::Pcm,
            channels,
            sample_rate,
            bits_per_sample,
            block_align,
            bytes_per_second,
        })
    }

    /// Playback length of `blocks` sample frames
    pub fn duration_of(&self, blocks: u64) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(blocks as f64 / self.sample_rate as f64)
    }
}

impl Display for AudioFormatDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !f.alternate() {
            return write!(
                f,
                "{} | {} Hz, {} ch, {}-bit, {} B/block",
                self.format_tag,
                self.sample_rate,
                self.channels,
                self.bits_per_sample,
                self.block_align
            );
        }

        writeln!(f, "Audio Format:")?;
        writeln!(f, "├─ Format: {}", self.format_tag)?;
        writeln!(f, "├─ Sample Rate: {} Hz", self.sample_rate)?;
        writeln!(f, "├─ Channels: {}", self.channels)?;
        writeln!(f, "├─ Bits per Sample: {}-bit", self.bits_per_sample)?;
        writeln!(f, "├─ Block Align: {} bytes", self.block_align)?;
        write!(f, "└─ Bytes per Second: {}", self.bytes_per_second)
    }
}

/// Byte ranges of a RIFF/WAVE container.
///
/// `header_bytes + data_bytes + terminating_bytes == file_size_bytes` always holds,
/// and `data_bytes` is a whole number of blocks of the source's block align.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerLayout {
    pub file_size_bytes: u64,
    /// Offset of the first PCM sample byte
    pub header_bytes: u64,
    pub data_bytes: u64,
    /// Whatever follows the data chunk: padding, further chunks or garbage
    pub terminating_bytes: u64,
}

impl ContainerLayout {
    /// Derive the trailing byte count from the other three ranges.
    ///
    /// # Errors
    ///
    /// `WavError::DataOverrun` if header and data together exceed the stream.
    pub fn new(file_size_bytes: u64, header_bytes: u64, data_bytes: u64) -> Result<Self, WavError> {
        let terminating_bytes = file_size_bytes
            .checked_sub(header_bytes)
            .and_then(|rest| rest.checked_sub(data_bytes))
            .ok_or(WavError::DataOverrun {
                header_bytes,
                data_bytes,
                file_bytes: file_size_bytes,
            })?;

        Ok(ContainerLayout {
            file_size_bytes,
            header_bytes,
            data_bytes,
            terminating_bytes,
        })
    }

    /// Byte range of the PCM payload
    #[inline]
    pub const fn data_range(&self) -> Range<u64> {
        self.header_bytes..(self.header_bytes + self.data_bytes)
    }

    /// Byte range following the PCM payload
    #[inline]
    pub const fn terminating_range(&self) -> Range<u64> {
        (self.header_bytes + self.data_bytes)..self.file_size_bytes
    }

    #[inline]
    pub const fn total_blocks(&self, block_align: u16) -> u64 {
        if block_align == 0 {
            0
        } else {
            self.data_bytes / block_align as u64
        }
    }
}

impl Display for ContainerLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "header: {} B, data: {} B, terminating: {} B (total {} B)",
            self.header_bytes, self.data_bytes, self.terminating_bytes, self.file_size_bytes
        )
    }
}

/// Everything a caller learns from creating an input source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceInfo {
    pub format: AudioFormatDescriptor,
    pub layout: ContainerLayout,
    /// `data_bytes / block_align`
    pub total_blocks: u64,
    pub duration: Duration,
}

impl SourceInfo {
    pub fn new(format: AudioFormatDescriptor, layout: ContainerLayout) -> Self {
        let total_blocks = layout.total_blocks(format.block_align);
        SourceInfo {
            format,
            layout,
            total_blocks,
            duration: format.duration_of(total_blocks),
        }
    }

    #[inline]
    pub const fn header_bytes(&self) -> u64 {
        self.layout.header_bytes
    }

    #[inline]
    pub const fn terminating_bytes(&self) -> u64 {
        self.layout.terminating_bytes
    }
}

impl Display for SourceInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if !f.alternate() {
            return write!(
                f,
                "{} | {} blocks, {:.2} s",
                self.format,
                self.total_blocks,
                self.duration.as_secs_f32()
            );
        }

        writeln!(f, "{:#}", self.format)?;
        writeln!(f, "Layout:")?;
        writeln!(f, "├─ Header Bytes: {}", self.layout.header_bytes)?;
        writeln!(f, "├─ Data Bytes: {}", self.layout.data_bytes)?;
        writeln!(f, "├─ Terminating Bytes: {}", self.layout.terminating_bytes)?;
        writeln!(f, "├─ Total Blocks: {}", self.total_blocks)?;
        write!(f, "└─ Duration: {:.2} s", self.duration.as_secs_f32())
    }
}

/// Outcome of a block read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockRead {
    /// Bytes actually copied into the caller's buffer
    pub bytes: usize,
    /// Whole blocks among those bytes
    pub blocks: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceOptions {
    /// Capacity of the read buffer put around files opened by path; 0 reads unbuffered
    pub buffer_capacity: usize,
    /// Also skip the RIFF pad byte after odd-sized chunks while scanning
    pub pad_odd_chunks: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        SourceOptions {
            buffer_capacity: 8 * 1024,
            pad_odd_chunks: false,
        }
    }
}
