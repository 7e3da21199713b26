use core::fmt::{Display, Formatter, Result as FmtResult};

/// FourCC chunk identifier wrapper -- does not own the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkID {
    pub id: [u8; 4],
}

impl AsRef<[u8]> for ChunkID {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.id
    }
}

impl Display for ChunkID {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.as_str() {
            Some(s) if s.chars().all(|c| c.is_ascii_graphic() || c == ' ') => write!(f, "{}", s),
            _ => write!(
                f,
                "0x{:02X}{:02X}{:02X}{:02X}",
                self.id[0], self.id[1], self.id[2], self.id[3]
            ),
        }
    }
}

impl From<&[u8; 4]> for ChunkID {
    fn from(value: &[u8; 4]) -> Self {
        ChunkID { id: *value }
    }
}

impl ChunkID {
    #[inline]
    pub const fn new(id: &[u8; 4]) -> Self {
        ChunkID { id: *id }
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.id
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.id).ok()
    }
}

/// Label and declared byte count that open every RIFF chunk.
///
/// Only lives for the duration of the chunk scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub id: ChunkID,
    /// Declared payload size, excluding the header and any pad byte
    pub size: u32,
}

impl ChunkHeader {
    /// Encoded size of a chunk header: 4-byte label + little-endian u32
    pub const SIZE: usize = 8;

    pub const fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        ChunkHeader {
            id: ChunkID::new(&[bytes[0], bytes[1], bytes[2], bytes[3]]),
            size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    #[inline]
    pub fn is(&self, id: ChunkID) -> bool {
        self.id == id
    }

    /// Declared size as a usable byte count.
    ///
    /// Sizes that are negative when read as a signed 32-bit value (including the
    /// `0xFFFFFFFF` placeholder of unfinished recordings) yield `None`.
    #[inline]
    pub const fn usable_size(&self) -> Option<u64> {
        if self.size > i32::MAX as u32 {
            None
        } else {
            Some(self.size as u64)
        }
    }

    /// Bytes to seek past the payload, optionally including the RIFF word-alignment pad byte
    #[inline]
    pub const fn skip_len(&self, pad_odd_chunks: bool) -> u64 {
        let size = self.size as u64;
        if pad_odd_chunks { size + (size & 1) } else { size }
    }
}

impl Display for ChunkHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Chunk ID: {}, Declared Size: {}", self.id, self.size)
    }
}

pub const RIFF_CHUNK: ChunkID = ChunkID::new(b"RIFF");
pub const WAVE_CHUNK: ChunkID = ChunkID::new(b"WAVE");
pub const FMT_CHUNK: ChunkID = ChunkID::new(b"fmt ");
pub const DATA_CHUNK: ChunkID = ChunkID::new(b"data");
pub const FACT_CHUNK: ChunkID = ChunkID::new(b"fact");
pub const LIST_CHUNK: ChunkID = ChunkID::new(b"LIST");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_header_decodes_little_endian_size() {
        let header = ChunkHeader::from_bytes(b"data\x08\x01\x00\x00");
        assert!(header.is(DATA_CHUNK));
        assert_eq!(header.size, 264);
        assert_eq!(header.usable_size(), Some(264));
    }

    #[test]
    fn test_placeholder_size_is_unusable() {
        let header = ChunkHeader::from_bytes(b"data\xFF\xFF\xFF\xFF");
        assert_eq!(header.usable_size(), None);

        let header = ChunkHeader::from_bytes(b"data\x00\x00\x00\x80");
        assert_eq!(header.usable_size(), None);

        let header = ChunkHeader::from_bytes(b"data\xFF\xFF\xFF\x7F");
        assert_eq!(header.usable_size(), Some(i32::MAX as u64));
    }

    #[test]
    fn test_skip_len_pad_byte() {
        let header = ChunkHeader::from_bytes(b"LIST\x05\x00\x00\x00");
        assert_eq!(header.skip_len(false), 5);
        assert_eq!(header.skip_len(true), 6);

        let even = ChunkHeader::from_bytes(b"LIST\x04\x00\x00\x00");
        assert_eq!(even.skip_len(true), 4);
    }

    #[test]
    fn test_chunk_id_display() {
        assert_eq!(FMT_CHUNK.to_string(), "fmt ");
        assert_eq!(LIST_CHUNK.to_string(), "LIST");
        assert_eq!(ChunkID::new(&[0, 1, 0xFF, b'a']).to_string(), "0x0001FF61");
    }
}
