use std::io::{self, Read, Seek, SeekFrom};

use crate::{
    error::InputSourceResult,
    types::{AudioFormatDescriptor, BlockRead, ContainerLayout, SourceInfo},
};

/// Byte-addressable input an input source reads from.
///
/// Every `Read + Seek` type is a `ByteStream` through the blanket implementation
/// below, including `&mut R`, which is how a caller lends an already-open stream
/// without giving up ownership of it.
///
/// Reads never treat a short count as an error on their own: [`read_up_to`](ByteStream::read_up_to)
/// reports how many bytes arrived and the caller decides whether that is fatal.
pub trait ByteStream {
    /// Move the cursor to an absolute offset from the start of the stream.
    fn seek_absolute(&mut self, offset: u64) -> io::Result<u64>;

    /// Move the cursor relative to its current position.
    fn seek_current(&mut self, offset: i64) -> io::Result<u64>;

    /// Move the cursor relative to the end of the stream (`offset` is usually negative).
    fn seek_from_end(&mut self, offset: i64) -> io::Result<u64>;

    /// Current cursor position.
    fn current_position(&mut self) -> io::Result<u64>;

    /// Total size of the stream in bytes. Leaves the cursor where it was.
    fn total_size(&mut self) -> io::Result<u64>;

    /// Fill as much of `buf` as the stream allows.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` only when
    /// the stream ended first.
    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: Read + Seek> ByteStream for T {
    #[inline]
    fn seek_absolute(&mut self, offset: u64) -> io::Result<u64> {
        self.seek(SeekFrom::Start(offset))
    }

    #[inline]
    fn seek_current(&mut self, offset: i64) -> io::Result<u64> {
        self.seek(SeekFrom::Current(offset))
    }

    #[inline]
    fn seek_from_end(&mut self, offset: i64) -> io::Result<u64> {
        self.seek(SeekFrom::End(offset))
    }

    #[inline]
    fn current_position(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    fn total_size(&mut self) -> io::Result<u64> {
        let original = self.stream_position()?;
        let size = self.seek(SeekFrom::End(0))?;
        if original != size {
            self.seek(SeekFrom::Start(original))?;
        }
        Ok(size)
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

/// Container-agnostic view of an analysed input source (object-safe).
///
/// Data access fails with `NotInitialized` when the source's analysis did not
/// succeed. The probes [`header_data`](InputSource::header_data) and
/// [`terminating_data`](InputSource::terminating_data) restore the stream cursor,
/// so they can be interleaved freely with [`read_blocks`](InputSource::read_blocks).
///
/// # Example
///
/// ```no_run
/// use wav_input_source::traits::InputSource;
///
/// fn copy_pcm(source: &mut dyn InputSource) -> Result<Vec<u8>, wav_input_source::InputSourceError> {
///     let block_align = source.format()?.block_align as usize;
///     let mut pcm = Vec::new();
///     let mut buffer = vec![0u8; 4096 * block_align];
///     loop {
///         let read = source.read_blocks(&mut buffer, 4096)?;
///         if read.blocks == 0 {
///             break;
///         }
///         pcm.extend_from_slice(&buffer[..read.blocks * block_align]);
///     }
///     Ok(pcm)
/// }
/// ```
pub trait InputSource {
    /// True when analysis succeeded and data access is allowed.
    fn is_valid(&self) -> bool;

    /// PCM format of the sample data.
    fn format(&self) -> InputSourceResult<&AudioFormatDescriptor>;

    /// Header / data / trailer byte ranges of the container.
    fn layout(&self) -> InputSourceResult<&ContainerLayout>;

    /// Number of whole blocks (sample frames) in the data region.
    fn total_blocks(&self) -> InputSourceResult<u64> {
        let block_align = self.format()?.block_align;
        Ok(self.layout()?.total_blocks(block_align))
    }

    /// Format, block count and byte ranges in one value.
    fn info(&self) -> InputSourceResult<SourceInfo> {
        Ok(SourceInfo::new(*self.format()?, *self.layout()?))
    }

    /// Read `blocks` whole blocks from the current position into `buffer`.
    ///
    /// `buffer` must hold at least `blocks × block_align` bytes. The returned
    /// block count is floored: a short read never reports a partial block.
    fn read_blocks(&mut self, buffer: &mut [u8], blocks: usize) -> InputSourceResult<BlockRead>;

    /// Every byte from the start of the stream up to the first PCM sample.
    fn header_data(&mut self) -> InputSourceResult<Vec<u8>>;

    /// Every byte after the declared data region.
    fn terminating_data(&mut self) -> InputSourceResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read call
    struct Trickle {
        inner: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step);
            self.inner.read(&mut buf[..n])
        }
    }

    impl Seek for Trickle {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_read_up_to_collects_partial_reads() {
        let mut stream = Trickle {
            inner: Cursor::new((0u8..32).collect()),
            step: 3,
        };
        let mut buf = [0u8; 10];
        assert_eq!(stream.read_up_to(&mut buf).unwrap(), 10);
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_read_up_to_reports_short_read_at_end() {
        let mut stream = Cursor::new(vec![7u8; 5]);
        let mut buf = [0u8; 8];
        assert_eq!(stream.read_up_to(&mut buf).unwrap(), 5);
        assert_eq!(stream.read_up_to(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_total_size_preserves_position() {
        let mut stream = Cursor::new(vec![0u8; 100]);
        stream.seek_absolute(40).unwrap();
        assert_eq!(stream.total_size().unwrap(), 100);
        assert_eq!(stream.current_position().unwrap(), 40);
    }

    #[test]
    fn test_seek_variants() {
        let mut stream = Cursor::new(vec![0u8; 64]);
        assert_eq!(stream.seek_absolute(10).unwrap(), 10);
        assert_eq!(stream.seek_current(6).unwrap(), 16);
        assert_eq!(stream.seek_from_end(-4).unwrap(), 60);
    }

    #[test]
    fn test_borrowed_stream_is_a_byte_stream() {
        let mut owned = Cursor::new(vec![1u8, 2, 3]);
        {
            let mut borrowed = &mut owned;
            let mut buf = [0u8; 2];
            assert_eq!(ByteStream::read_up_to(&mut borrowed, &mut buf).unwrap(), 2);
        }
        assert_eq!(owned.position(), 2);
    }
}
