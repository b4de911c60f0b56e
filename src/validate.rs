//! Structure validation and chunk counting.
//!
//! Thin walks over the navigator: a level walk seeks from header to
//! header, the whole-file walk additionally descends into every list
//! chunk it passes.

use crate::error::{Result, RiffError};
use crate::fourcc::FourCc;
use crate::reader::RiffReader;
use crate::source::ByteSource;

impl<S: ByteSource> RiffReader<S> {
    /// Validate the current level's chunk structure.
    ///
    /// Seeks to the first chunk of the level, then from header to
    /// header. Sub lists are not descended into. The position changes.
    pub fn level_validate(&mut self) -> Result<()> {
        self.seek_level_start()?;
        loop {
            match self.seek_next_chunk() {
                Ok(()) => continue,
                Err(RiffError::EndOfChunkList) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }

    /// Validate the whole file's chunk structure.
    ///
    /// Rewinds to the first chunk, then walks every level recursively,
    /// descending into each RIFF/LIST/BW64 chunk. Returns the first
    /// critical error; stray trailing bytes end a level non-fatally
    /// and are recorded as [`last_warning`](Self::last_warning). The
    /// position changes.
    pub fn file_validate(&mut self) -> Result<()> {
        self.rewind()?;
        self.validate_level_recursive()
    }

    fn validate_level_recursive(&mut self) -> Result<()> {
        loop {
            if self.can_be_chunk_list() {
                self.seek_level_sub()?;
                self.validate_level_recursive()?;
                self.level_parent()?;
            }
            match self.seek_next_chunk() {
                Ok(()) => continue,
                Err(RiffError::EndOfChunkList) => return Ok(()),
                Err(RiffError::ExcessData) => {
                    self.note_warning(RiffError::ExcessData);
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Count the chunks in the current level.
    ///
    /// Seeks to the first chunk of the level and walks to its end; sub
    /// chunks are not counted. Stray trailing bytes stop the walk, the
    /// count is still returned and the warning is recorded as
    /// [`last_warning`](Self::last_warning). The position changes.
    pub fn count_chunks_in_level(&mut self) -> Result<u64> {
        self.count_matching(None)
    }

    /// Count the chunks with the given id in the current level.
    pub fn count_chunks_in_level_with_id(&mut self, id: FourCc) -> Result<u64> {
        self.count_matching(Some(id))
    }

    fn count_matching(&mut self, id: Option<FourCc>) -> Result<u64> {
        self.seek_level_start()?;
        let mut count = 0u64;
        loop {
            if id.map_or(true, |want| self.chunk_id() == want) {
                count += 1;
            }
            match self.seek_next_chunk() {
                Ok(()) => continue,
                Err(RiffError::EndOfChunkList) => break,
                Err(RiffError::ExcessData) => {
                    self.note_warning(RiffError::ExcessData);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(count)
    }
}
