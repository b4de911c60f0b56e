//! Byte source abstraction and the built-in adapters.
//!
//! The navigator only ever issues two operations against its backing
//! storage: read at the current logical position and seek to an
//! absolute logical position. Position 0 is the first byte of the RIFF
//! data, which may sit anywhere inside a larger file.

use std::io::{self, Read, Seek, SeekFrom};

/// Minimal byte access the navigator needs.
///
/// A short `read` signals end-of-source; `seek` to a position past the
/// end is legal and simply makes the next read come up short.
pub trait ByteSource {
    /// Read into `buf` at the current logical position, advancing it.
    /// Loops over partial reads; returns fewer bytes only at
    /// end-of-source.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Move the logical position to `pos` (absolute, from the start of
    /// the RIFF data). Returns the new position.
    fn seek(&mut self, pos: u64) -> io::Result<u64>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn seek(&mut self, pos: u64) -> io::Result<u64> {
        (**self).seek(pos)
    }
}

/// Byte source over any seekable stream, typically an open `File`.
///
/// The stream position at construction becomes logical zero, so RIFF
/// data embedded inside a larger file is handled transparently. Pass
/// `&mut stream` to keep ownership; the reader never closes it.
#[derive(Debug)]
pub struct FileSource<F: Read + Seek> {
    inner: F,
    base: u64,
}

impl<F: Read + Seek> FileSource<F> {
    pub fn new(mut inner: F) -> io::Result<Self> {
        let base = inner.stream_position()?;
        Ok(FileSource { inner, base })
    }

    /// Hand the wrapped stream back.
    pub fn into_inner(self) -> F {
        self.inner
    }
}

impl<F: Read + Seek> ByteSource for FileSource<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn seek(&mut self, pos: u64) -> io::Result<u64> {
        let abs = self.inner.seek(SeekFrom::Start(self.base + pos))?;
        Ok(abs - self.base)
    }
}

/// Byte source over a memory buffer.
#[derive(Debug)]
pub struct MemSource<'a> {
    data: &'a [u8],
    pos: u64,
}

impl<'a> MemSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        MemSource { data, pos: 0 }
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for MemSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = (self.pos as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }

    fn seek(&mut self, pos: u64) -> io::Result<u64> {
        // Instant in memory; an out-of-range target reads back empty.
        self.pos = pos;
        Ok(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn mem_source_reads_and_clamps() {
        let data = [1u8, 2, 3, 4, 5];
        let mut src = MemSource::new(&data);
        let mut buf = [0u8; 3];
        assert_eq!(src.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(src.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn mem_source_seek_past_end_reads_empty() {
        let data = [1u8, 2, 3];
        let mut src = MemSource::new(&data);
        assert_eq!(src.seek(100).unwrap(), 100);
        let mut buf = [0u8; 2];
        assert_eq!(src.read(&mut buf).unwrap(), 0);
        assert_eq!(src.seek(1).unwrap(), 1);
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [2, 3]);
    }

    #[test]
    fn file_source_treats_open_position_as_zero() {
        let mut cursor = Cursor::new(b"junkRIFFdata".to_vec());
        cursor.set_position(4);
        let mut src = FileSource::new(&mut cursor).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"RIFF");
        assert_eq!(src.seek(0).unwrap(), 0);
        assert_eq!(src.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"RIFF");
    }

    #[test]
    fn file_source_fills_across_partial_reads() {
        // Cursor never splits reads, but the loop must at least fill
        // through to end-of-source and report the shortfall.
        let mut cursor = Cursor::new(b"abcdef".to_vec());
        let mut src = FileSource::new(&mut cursor).unwrap();
        let mut buf = [0u8; 10];
        assert_eq!(src.read(&mut buf).unwrap(), 6);
        assert_eq!(&buf[..6], b"abcdef");
    }

    #[test]
    fn borrowed_source_forwards() {
        let data = [9u8, 8, 7];
        let mut src = MemSource::new(&data);
        let mut borrowed = &mut src;
        let mut buf = [0u8; 1];
        assert_eq!(ByteSource::read(&mut borrowed, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], 9);
    }
}
