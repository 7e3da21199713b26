pub mod chunks;
pub mod error;
pub mod fmt;
pub mod source;
use core::fmt::{Display, Formatter, Result as FmtResult};
pub use source::WavInputSource;

/// wFormatTag of a `fmt ` chunk.
///
/// Only integer PCM is accepted; the other named tags exist so rejections say
/// what the file actually contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FormatCode {
    Pcm,
    IeeeFloat,
    /// WAVE_FORMAT_EXTENSIBLE, where the real encoding sits in a sub-format GUID
    Extensible,
    Unknown(u16),
}

impl FormatCode {
    pub const fn from_tag(tag: u16) -> Self {
        match tag {
            0x0001 => FormatCode::Pcm,
            0x0003 => FormatCode::IeeeFloat,
            0xFFFE => FormatCode::Extensible,
            other => FormatCode::Unknown(other),
        }
    }

    pub const fn tag(self) -> u16 {
        match self {
            FormatCode::Pcm => 0x0001,
            FormatCode::IeeeFloat => 0x0003,
            FormatCode::Extensible => 0xFFFE,
            FormatCode::Unknown(tag) => tag,
        }
    }

    #[inline]
    pub const fn is_pcm(self) -> bool {
        matches!(self, FormatCode::Pcm)
    }
}

impl From<u16> for FormatCode {
    fn from(tag: u16) -> Self {
        FormatCode::from_tag(tag)
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FormatCode::Pcm => f.write_str("PCM"),
            FormatCode::IeeeFloat => f.write_str("IEEE_FLOAT"),
            FormatCode::Extensible => f.write_str("EXTENSIBLE"),
            FormatCode::Unknown(tag) => write!(f, "UNKNOWN(0x{:04X})", tag),
        }
    }
}
