//! # Reader Module
//!
//! The navigation engine. A `RiffReader` tracks the current chunk and
//! the enclosing list level, and translates every user operation into
//! bounded reads and seeks against its byte source.
//!
//! After opening, the reader is positioned at the first chunk of level
//! 0. Within a chunk the caller may read and seek freely; the pad byte
//! of odd-sized chunks is never exposed. Stepping into a list chunk
//! pushes the enclosing frame; stepping out pops it without moving the
//! position.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::diag::{DiagSink, NullSink, TracingSink};
use crate::error::{Result, RiffError};
use crate::fourcc::FourCc;
use crate::source::{ByteSource, FileSource, MemSource};
use crate::stack::{LevelStack, ListFrame};

/// Size of the outer container header: id + size + form.
pub const HEADER_SIZE: u64 = 12;
/// Offset of a chunk's data from the chunk start: id + size field.
pub const CHUNK_DATA_OFFSET: u64 = 8;

/// Outer size value signalling that the true size lives in a ds64 chunk.
#[cfg(feature = "bw64")]
const SIZE_IN_DS64: u64 = 0xFFFF_FFFF;

/// View of the chunk the reader currently sits in.
#[derive(Debug, Clone, Copy, Default)]
struct ChunkState {
    id: FourCc,
    /// Size as stored in the file, excluding the 8-byte header.
    size: u64,
    /// Absolute position of the chunk header.
    pos_start: u64,
    /// Offset into the chunk's data block.
    pos: u64,
    /// 1 if `size` is odd (a pad byte trails the data), else 0.
    pad: u64,
}

/// Pull-style navigator over a RIFF or BW64 container.
///
/// Critical errors ([`RiffError::is_critical`]) leave the reader in an
/// undefined state; discard or reopen it afterwards. Non-critical
/// errors are ordinary control flow.
pub struct RiffReader<S: ByteSource> {
    src: S,
    diag: Box<dyn DiagSink>,
    /// Total source size; 0 means unknown.
    size: u64,
    /// Current absolute position, relative to the start of the RIFF data.
    pos: u64,
    /// Hot frame of the list we are currently inside.
    list: ListFrame,
    chunk: ChunkState,
    stack: LevelStack,
    last_warning: Option<RiffError>,
}

impl<F: Read + Seek> RiffReader<FileSource<F>> {
    /// Open RIFF data starting at the stream's current position.
    ///
    /// Pass `&mut stream` to retain ownership; the reader never closes
    /// the stream. `size` is the exact byte length of the RIFF data if
    /// known, or 0 to skip the cross-checks that need it.
    pub fn open_file(stream: F, size: u64) -> Result<Self> {
        let src = FileSource::new(stream).map_err(RiffError::access)?;
        Self::open_custom(src, size)
    }
}

impl RiffReader<FileSource<File>> {
    /// Open a RIFF file by path.
    ///
    /// The file is owned by the reader and closed when it drops; use
    /// [`open_file`](Self::open_file) with `&mut file` to borrow one
    /// instead. The size check uses the file's metadata.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(RiffError::access)?;
        let size = file.metadata().map_err(RiffError::access)?.len();
        Self::open_file(file, size)
    }
}

impl<'a> RiffReader<MemSource<'a>> {
    /// Open RIFF data held in a memory buffer.
    pub fn open_mem(data: &'a [u8]) -> Result<Self> {
        let size = data.len() as u64;
        Self::open_custom(MemSource::new(data), size)
    }
}

impl<S: ByteSource> RiffReader<S> {
    /// Open RIFF data behind a caller-supplied byte source.
    pub fn open_custom(src: S, size: u64) -> Result<Self> {
        Self::open_with_sink(src, size, Box::new(TracingSink))
    }

    /// Like [`open_custom`](Self::open_custom) with a custom
    /// diagnostic sink, so that diagnostics emitted during the header
    /// read itself are routed too.
    pub fn open_with_sink(src: S, size: u64, sink: Box<dyn DiagSink>) -> Result<Self> {
        let mut reader = RiffReader {
            src,
            diag: sink,
            size,
            pos: 0,
            list: ListFrame::default(),
            chunk: ChunkState::default(),
            stack: LevelStack::new(),
            last_warning: None,
        };
        reader.read_header()?;
        Ok(reader)
    }

    /// Read the 12-byte outer header and the first chunk header, and
    /// resolve the ds64 size override when present.
    fn read_header(&mut self) -> Result<()> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        let n = self.source_read(&mut buf)?;
        self.pos += n as u64;
        if n != buf.len() {
            self.report(format!("failed to read container header, {n} of 12 bytes read"));
            return Err(RiffError::UnexpectedEof);
        }

        self.list = ListFrame {
            id: FourCc::new([buf[0], buf[1], buf[2], buf[3]]),
            size: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as u64,
            form: FourCc::new([buf[8], buf[9], buf[10], buf[11]]),
            pos_start: 0,
        };

        if !Self::accepts_outer_id(self.list.id) {
            let id = self.list.id;
            self.report(format!("invalid container header id \"{id}\""));
            return Err(RiffError::IllegalId);
        }

        self.read_chunk_header()?;

        #[cfg(feature = "bw64")]
        if self.list.size == SIZE_IN_DS64 && self.chunk.id == FourCc::DS64 {
            let mut ds = [0u8; 8];
            let n = self.read_in_chunk(&mut ds)?;
            if n != ds.len() {
                self.report("ds64 chunk too small to carry a 64-bit size".to_string());
                return Err(RiffError::InvalidChunkSize);
            }
            let low = u32::from_le_bytes([ds[0], ds[1], ds[2], ds[3]]) as u64;
            let high = u32::from_le_bytes([ds[4], ds[5], ds[6], ds[7]]) as u64;
            self.list.size = (high << 32) | low;
        }

        if self.size != 0 && self.size != self.list.size + CHUNK_DATA_OFFSET {
            let declared = self.list.size + CHUNK_DATA_OFFSET;
            let actual = self.size;
            self.report(format!(
                "declared container size {declared} does not match source size {actual}"
            ));
            if self.size >= self.list.size + CHUNK_DATA_OFFSET {
                // Trailing bytes after the container; the structure
                // itself is intact, so the reader stays usable.
                self.last_warning = Some(RiffError::ExcessData);
            } else {
                return Err(RiffError::UnexpectedEof);
            }
        }

        Ok(())
    }

    fn accepts_outer_id(id: FourCc) -> bool {
        #[cfg(feature = "bw64")]
        if id == FourCc::BW64 {
            return true;
        }
        id == FourCc::RIFF
    }

    /// Read an 8-byte chunk header at the current position and
    /// cross-check it against the enclosing list and the source size.
    fn read_chunk_header(&mut self) -> Result<()> {
        let mut buf = [0u8; CHUNK_DATA_OFFSET as usize];
        let n = self.source_read(&mut buf)?;
        if n != buf.len() {
            self.report(format!("failed to read chunk header, {n} of 8 bytes read"));
            return Err(RiffError::UnexpectedEof);
        }

        self.chunk.pos_start = self.pos;
        self.pos += CHUNK_DATA_OFFSET;
        self.chunk.id = FourCc::new([buf[0], buf[1], buf[2], buf[3]]);
        self.chunk.size = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as u64;
        self.chunk.pad = self.chunk.size & 1;
        self.chunk.pos = 0;

        if !self.chunk.id.is_printable() {
            let start = self.chunk.pos_start;
            self.report(format!(
                "invalid chunk id at pos {start}: {:02x} {:02x} {:02x} {:02x}",
                buf[0], buf[1], buf[2], buf[3]
            ));
            return Err(RiffError::IllegalId);
        }

        // The size field may be corrupt; never trust it past the
        // enclosing boundaries.
        let chunk_end = self.chunk.pos_start + CHUNK_DATA_OFFSET + self.chunk.size + self.chunk.pad;
        let list_end = self.list.pos_start + CHUNK_DATA_OFFSET + self.list.size;
        if chunk_end > list_end {
            let id = self.chunk.id;
            let start = self.chunk.pos_start;
            self.report(format!(
                "chunk \"{id}\" at pos {start} runs past its list (chunk end {chunk_end}, list end {list_end})"
            ));
            return Err(RiffError::InvalidChunkSize);
        }
        if self.size > 0 && chunk_end > self.size {
            let id = self.chunk.id;
            let start = self.chunk.pos_start;
            let size = self.size;
            self.report(format!(
                "chunk \"{id}\" at pos {start} runs past the source (chunk end {chunk_end}, source size {size})"
            ));
            return Err(RiffError::UnexpectedEof);
        }

        Ok(())
    }

    /// Read up to `buf.len()` bytes of the current chunk's data.
    ///
    /// Clamps to the chunk remainder; the pad byte is never returned.
    /// Returns the number of bytes read, 0 at the end of the chunk.
    pub fn read_in_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let left = self.chunk.size - self.chunk.pos;
        let want = (buf.len() as u64).min(left) as usize;
        let n = self.source_read(&mut buf[..want])?;
        self.pos += n as u64;
        self.chunk.pos += n as u64;
        Ok(n)
    }

    /// Read the current chunk's entire data block.
    ///
    /// Seeks back to data offset 0 first, so partial reads done before
    /// do not matter. The pad byte is not included.
    pub fn read_chunk_data(&mut self) -> Result<Vec<u8>> {
        self.seek_chunk_start()?;
        let mut data = vec![0u8; self.chunk.size as usize];
        let n = self.read_in_chunk(&mut data)?;
        if n != data.len() {
            let total = data.len();
            self.report(format!("chunk data cut short, {n} of {total} bytes read"));
            return Err(RiffError::UnexpectedEof);
        }
        Ok(data)
    }

    /// Seek to `offset` within the current chunk's data.
    ///
    /// Offset `chunk_size` is legal; the next read returns 0.
    pub fn seek_in_chunk(&mut self, offset: u64) -> Result<()> {
        if offset > self.chunk.size {
            return Err(RiffError::EndOfChunk);
        }
        self.pos = self.chunk.pos_start + CHUNK_DATA_OFFSET + offset;
        self.chunk.pos = offset;
        self.source_seek(self.pos)
    }

    /// Seek to the next chunk in the current level and read its header.
    pub fn seek_next_chunk(&mut self) -> Result<()> {
        let next = self.chunk.pos_start + CHUNK_DATA_OFFSET + self.chunk.size + self.chunk.pad;
        let list_end = self.list.pos_start + CHUNK_DATA_OFFSET + self.list.size;

        if list_end < next + CHUNK_DATA_OFFSET {
            // Contained chunks are already padded to even length, so a
            // well-formed level ends exactly at the list boundary.
            if list_end > next {
                let stray = list_end - next;
                self.report(format!("{stray} stray bytes at pos {next} at end of chunk list"));
                return Err(RiffError::ExcessData);
            }
            return Err(RiffError::EndOfChunkList);
        }

        self.pos = next;
        self.chunk.pos = 0;
        self.source_seek(next)?;
        self.read_chunk_header()
    }

    /// Seek back to offset 0 of the current chunk's data.
    pub fn seek_chunk_start(&mut self) -> Result<()> {
        self.pos = self.chunk.pos_start + CHUNK_DATA_OFFSET;
        self.chunk.pos = 0;
        self.source_seek(self.pos)
    }

    /// Seek to the first chunk of the current level and read its header.
    pub fn seek_level_start(&mut self) -> Result<()> {
        // First chunk sits right after the list's id, size and form.
        self.pos = self.list.pos_start + HEADER_SIZE;
        self.chunk.pos = 0;
        self.source_seek(self.pos)?;
        self.read_chunk_header()
    }

    /// Pop back to level 0 and seek to the very first chunk, the
    /// position just after opening.
    pub fn rewind(&mut self) -> Result<()> {
        while self.pop_frame() {}
        self.seek_level_start()
    }

    /// Step into the current chunk's sub list and read the first
    /// contained chunk header.
    ///
    /// Only `RIFF`, `LIST` and `BW64` chunks contain sub chunks.
    pub fn seek_level_sub(&mut self) -> Result<()> {
        if !self.can_be_chunk_list() {
            let id = self.chunk.id;
            self.report(format!(
                "chunk \"{id}\" cannot contain sub chunks; only RIFF, LIST or BW64 can"
            ));
            return Err(RiffError::IllegalId);
        }
        // Data must at least hold the form FourCC.
        if self.chunk.size < 4 {
            self.report("chunk too small to contain sub level chunks".to_string());
            return Err(RiffError::InvalidChunkSize);
        }

        // The form sits at data offset 0; seek back if the caller has
        // already read into the chunk.
        if self.chunk.pos > 0 {
            self.pos = self.chunk.pos_start + CHUNK_DATA_OFFSET;
            self.chunk.pos = 0;
            self.source_seek(self.pos)?;
        }

        let mut buf = [0u8; 4];
        let n = self.source_read(&mut buf)?;
        if n != buf.len() {
            self.report("failed to read sub list form".to_string());
            return Err(RiffError::UnexpectedEof);
        }
        self.pos += 4;

        let form = FourCc::new(buf);
        if !form.is_printable() {
            let start = self.chunk.pos_start;
            self.report(format!(
                "invalid sub list form at pos {start}: {:02x} {:02x} {:02x} {:02x}",
                buf[0], buf[1], buf[2], buf[3]
            ));
            return Err(RiffError::IllegalId);
        }

        self.stack.push(self.list);
        self.list = ListFrame {
            id: self.chunk.id,
            size: self.chunk.size,
            form,
            pos_start: self.chunk.pos_start,
        };
        self.read_chunk_header()
    }

    /// Step back from a sub list without moving the position; the
    /// reader is then inside the parent list chunk's data.
    ///
    /// At level 0 returns the non-critical [`RiffError::AtTopLevel`].
    pub fn level_parent(&mut self) -> Result<()> {
        if self.pop_frame() {
            Ok(())
        } else {
            Err(RiffError::AtTopLevel)
        }
    }

    /// Step back from a sub list, then seek to the parent chunk's data
    /// start.
    pub fn seek_level_parent_start(&mut self) -> Result<()> {
        self.level_parent()?;
        self.seek_chunk_start()
    }

    /// Step back from a sub list, then seek to the parent's next
    /// sibling.
    pub fn seek_level_parent_next(&mut self) -> Result<()> {
        self.level_parent()?;
        self.seek_next_chunk()
    }

    fn pop_frame(&mut self) -> bool {
        let Some(frame) = self.stack.pop() else {
            return false;
        };
        // The list we were inside becomes the current chunk again; its
        // data offset is recovered from the absolute position.
        self.chunk.id = self.list.id;
        self.chunk.size = self.list.size;
        self.chunk.pos_start = self.list.pos_start;
        self.chunk.pad = self.chunk.size & 1;
        self.chunk.pos = self.pos - self.chunk.pos_start - CHUNK_DATA_OFFSET;
        self.list = frame;
        true
    }

    /// Whether the current chunk's id allows it to contain sub chunks.
    pub fn can_be_chunk_list(&self) -> bool {
        let id = self.chunk.id;
        #[cfg(feature = "bw64")]
        if id == FourCc::BW64 {
            return true;
        }
        id == FourCc::RIFF || id == FourCc::LIST
    }

    /// Whether no further chunk follows in the current level.
    pub fn is_last_chunk_in_level(&self) -> bool {
        let next = self.chunk.pos_start + CHUNK_DATA_OFFSET + self.chunk.size + self.chunk.pad;
        let list_end = self.list.pos_start + CHUNK_DATA_OFFSET + self.list.size;
        list_end < next + CHUNK_DATA_OFFSET
    }

    /// Current absolute position, relative to the start of the RIFF data.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total source size passed at open time; 0 means unknown.
    pub fn source_size(&self) -> u64 {
        self.size
    }

    /// Id of the current chunk.
    pub fn chunk_id(&self) -> FourCc {
        self.chunk.id
    }

    /// Data size of the current chunk, as stored in the file.
    pub fn chunk_size(&self) -> u64 {
        self.chunk.size
    }

    /// Offset into the current chunk's data block.
    pub fn chunk_pos(&self) -> u64 {
        self.chunk.pos
    }

    /// Absolute position of the current chunk's header.
    pub fn chunk_start(&self) -> u64 {
        self.chunk.pos_start
    }

    /// Whether a pad byte trails the current chunk's data.
    pub fn has_pad(&self) -> bool {
        self.chunk.pad != 0
    }

    /// Id of the enclosing list: `RIFF`, `LIST` or `BW64`.
    pub fn list_id(&self) -> FourCc {
        self.list.id
    }

    /// Form type of the enclosing list.
    pub fn list_form(&self) -> FourCc {
        self.list.form
    }

    /// Size of the enclosing list, after any ds64 override.
    pub fn list_size(&self) -> u64 {
        self.list.size
    }

    /// Absolute position of the enclosing list's header.
    pub fn list_start(&self) -> u64 {
        self.list.pos_start
    }

    /// Current nesting depth; 0 is the file's outer level.
    pub fn level(&self) -> usize {
        self.stack.depth()
    }

    /// List frame for `level`, up to and including the current level.
    pub fn frame(&self, level: usize) -> Option<ListFrame> {
        if level == self.stack.depth() {
            Some(self.list)
        } else {
            self.stack.get(level).copied()
        }
    }

    /// Last non-fatal `ExcessData` condition that was swallowed, if any.
    pub fn last_warning(&self) -> Option<RiffError> {
        self.last_warning
    }

    /// Replace the diagnostic sink.
    pub fn set_diag(&mut self, sink: Box<dyn DiagSink>) {
        self.diag = sink;
    }

    /// Suppress all diagnostics.
    pub fn silence(&mut self) {
        self.diag = Box::new(NullSink);
    }

    pub(crate) fn note_warning(&mut self, warning: RiffError) {
        self.last_warning = Some(warning);
    }

    fn report(&mut self, msg: String) {
        self.diag.report(self.pos, &msg);
    }

    fn source_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.src.read(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                self.report(format!("byte source read failed: {e}"));
                Err(RiffError::access(e))
            }
        }
    }

    fn source_seek(&mut self, pos: u64) -> Result<()> {
        match self.src.seek(pos) {
            Ok(_) => Ok(()),
            Err(e) => {
                self.report(format!("byte source seek failed: {e}"));
                Err(RiffError::access(e))
            }
        }
    }
}
