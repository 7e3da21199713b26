use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::{
    error::{InputSourceError, InputSourceResult},
    types::AudioFormatDescriptor,
    wav::{FormatCode, error::WavError},
};

/// Size of the mandatory fields of a `fmt ` chunk
pub const FMT_FIXED_SIZE: usize = 16;

/// Borrowed view over the fixed 16-byte part of a `fmt ` chunk.
///
/// Every field is decoded little-endian straight from the bytes, so the layout
/// below is the only source of truth regardless of host byte order:
///
/// | offset | field           | type |
/// |--------|-----------------|------|
/// | 0      | format tag      | u16  |
/// | 2      | channels        | u16  |
/// | 4      | sample rate     | u32  |
/// | 8      | bytes / second  | u32  |
/// | 12     | block align     | u16  |
/// | 14     | bits per sample | u16  |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FmtChunk<'a> {
    bytes: &'a [u8; FMT_FIXED_SIZE],
}

impl<'a> FmtChunk<'a> {
    /// Primary constructor for FmtChunk
    ///
    /// # Arguments
    ///
    /// * `bytes` - The fixed part of the fmt chunk, exactly 16 bytes
    ///
    /// # Returns
    ///
    /// Ok(FmtChunk) if the slice has the right length, Err(WavError) otherwise
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, WavError> {
        let bytes: &[u8; FMT_FIXED_SIZE] = bytes
            .try_into()
            .map_err(|_| WavError::truncated("fmt chunk", FMT_FIXED_SIZE, bytes.len(), 0))?;
        Ok(FmtChunk { bytes })
    }

    pub const fn from_array(bytes: &'a [u8; FMT_FIXED_SIZE]) -> Self {
        FmtChunk { bytes }
    }

    pub const fn as_bytes(&self) -> &[u8; FMT_FIXED_SIZE] {
        self.bytes
    }

    pub const fn format_code(&self) -> FormatCode {
        FormatCode::from_tag(u16::from_le_bytes([self.bytes[0], self.bytes[1]]))
    }

    pub const fn channels(&self) -> u16 {
        u16::from_le_bytes([self.bytes[2], self.bytes[3]])
    }

    /// Sample rate in Hz
    pub const fn sample_rate(&self) -> u32 {
        u32::from_le_bytes([self.bytes[4], self.bytes[5], self.bytes[6], self.bytes[7]])
    }

    /// Bytes per second as declared by the writer of the file
    pub const fn byte_rate(&self) -> u32 {
        u32::from_le_bytes([self.bytes[8], self.bytes[9], self.bytes[10], self.bytes[11]])
    }

    /// Block align as declared by the writer of the file
    pub const fn block_align(&self) -> u16 {
        u16::from_le_bytes([self.bytes[12], self.bytes[13]])
    }

    pub const fn bits_per_sample(&self) -> u16 {
        u16::from_le_bytes([self.bytes[14], self.bytes[15]])
    }

    /// All fields as a tuple.
    ///
    /// (FormatCode, u16 channels, u32 sample_rate, u32 byte_rate, u16 block_align, u16 bits_per_sample)
    pub const fn fmt_chunk(&self) -> (FormatCode, u16, u32, u32, u16, u16) {
        (
            self.format_code(),
            self.channels(),
            self.sample_rate(),
            self.byte_rate(),
            self.block_align(),
            self.bits_per_sample(),
        )
    }

    /// Build the format descriptor for this chunk.
    ///
    /// Block align and byte rate are recomputed from channels and bits per sample;
    /// the declared values are not trusted.
    ///
    /// # Errors
    ///
    /// - `UnsupportedFormat` if the format tag is anything but integer PCM
    /// - `InvalidContainer` if the derived block align is zero or overflows,
    ///   or the derived byte rate overflows
    pub fn to_descriptor(&self) -> InputSourceResult<AudioFormatDescriptor> {
        let format_code = self.format_code();
        if !format_code.is_pcm() {
            return Err(InputSourceError::UnsupportedFormat(format_code));
        }

        let descriptor = AudioFormatDescriptor::pcm(
            self.sample_rate(),
            self.bits_per_sample(),
            self.channels(),
        )
        .ok_or_else(|| {
            WavError::invalid_format(format!(
                "Block size overflows ({} channels of {} bits per sample at {} Hz)",
                self.channels(),
                self.bits_per_sample(),
                self.sample_rate()
            ))
        })?;
        if descriptor.block_align == 0 {
            return Err(WavError::invalid_format(format!(
                "Block align is zero ({} channels of {} bits per sample)",
                self.channels(),
                self.bits_per_sample()
            ))
            .into());
        }

        Ok(descriptor)
    }
}

impl Display for FmtChunk<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let (format, channels, sample_rate, byte_rate, block_align, bits_per_sample) =
            self.fmt_chunk();
        write!(
            f,
            "FmtChunk {{ format: {}, channels: {}, sample_rate: {}, byte_rate: {}, block_align: {}, bits_per_sample: {} }}",
            format, channels, sample_rate, byte_rate, block_align, bits_per_sample
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn make_base_fmt_bytes(
        format_code: u16,
        channels: u16,
        sample_rate: u32,
        byte_rate: u32,
        block_align: u16,
        bits_per_sample: u16,
    ) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..2].copy_from_slice(&format_code.to_le_bytes());
        bytes[2..4].copy_from_slice(&channels.to_le_bytes());
        bytes[4..8].copy_from_slice(&sample_rate.to_le_bytes());
        bytes[8..12].copy_from_slice(&byte_rate.to_le_bytes());
        bytes[12..14].copy_from_slice(&block_align.to_le_bytes());
        bytes[14..16].copy_from_slice(&bits_per_sample.to_le_bytes());
        bytes
    }

    #[test]
    fn test_fmt_fields_decode() {
        let bytes = make_base_fmt_bytes(1, 2, 44_100, 176_400, 4, 16);
        let fmt = FmtChunk::from_array(&bytes);
        assert_eq!(
            fmt.fmt_chunk(),
            (FormatCode::Pcm, 2, 44_100, 176_400, 4, 16)
        );
    }

    #[test]
    fn test_fmt_from_bytes_rejects_wrong_length() {
        let err = FmtChunk::from_bytes(&[0u8; 14]).unwrap_err();
        assert!(err.to_string().contains("needed 16 bytes, got 14"));
    }

    #[test]
    fn test_descriptor_derives_block_align_and_byte_rate() {
        // Declared block align and byte rate are garbage; derived values win
        let bytes = make_base_fmt_bytes(1, 2, 48_000, 1, 7, 24);
        let descriptor = FmtChunk::from_array(&bytes).to_descriptor().unwrap();
        assert_eq!(descriptor.channels, 2);
        assert_eq!(descriptor.bits_per_sample, 24);
        assert_eq!(descriptor.block_align, 6);
        assert_eq!(descriptor.bytes_per_second, 288_000);
    }

    #[test]
    fn test_descriptor_rejects_non_pcm() {
        let bytes = make_base_fmt_bytes(3, 2, 44_100, 352_800, 8, 32);
        let err = FmtChunk::from_array(&bytes).to_descriptor().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        let bytes = make_base_fmt_bytes(0xFFFE, 2, 44_100, 176_400, 4, 16);
        let err = FmtChunk::from_array(&bytes).to_descriptor().unwrap_err();
        assert!(matches!(
            err,
            InputSourceError::UnsupportedFormat(FormatCode::Extensible)
        ));
    }

    #[test]
    fn test_descriptor_rejects_overflowing_block_align() {
        // (16 / 8) * 32769 = 65538 does not fit the u16 block align
        let bytes = make_base_fmt_bytes(1, 32_769, 44_100, 0, 2, 16);
        let err = FmtChunk::from_array(&bytes).to_descriptor().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContainer);
        assert!(err.to_string().contains("Block size overflows"));

        let bytes = make_base_fmt_bytes(1, u16::MAX, 96_000, 0, 0, 8);
        let err = FmtChunk::from_array(&bytes).to_descriptor().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContainer);
    }

    #[test]
    fn test_descriptor_rejects_zero_block_align() {
        let bytes = make_base_fmt_bytes(1, 0, 44_100, 0, 0, 16);
        let err = FmtChunk::from_array(&bytes).to_descriptor().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidContainer);

        // Fewer than 8 bits per sample also derives a zero-byte block
        let bytes = make_base_fmt_bytes(1, 1, 8_000, 500, 1, 4);
        let err = FmtChunk::from_array(&bytes).to_descriptor().unwrap_err();
        assert!(err.to_string().contains("Block align is zero"));
    }
}
