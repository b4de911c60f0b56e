//! # riffpull
//!
//! Pull-style navigable reader for RIFF and BW64 chunk containers.
//!
//! RIFF files (WAV, AVI, DLS, ANI and friends) are nested trees of
//! tagged chunks. This crate is not specialized to any of them: it
//! lets a caller traverse the chunk tree, read bytes from the current
//! chunk, validate structural integrity and count chunks, over a
//! pluggable byte source (file, memory buffer, or anything
//! implementing [`ByteSource`]).
//!
//! ```no_run
//! use std::fs::File;
//! use riffpull::{RiffError, RiffReader};
//!
//! # fn main() -> Result<(), RiffError> {
//! let mut file = File::open("take.wav").map_err(RiffError::access)?;
//! let size = file.metadata().map_err(RiffError::access)?.len();
//! let mut reader = RiffReader::open_file(&mut file, size)?;
//!
//! // After opening we sit at the first chunk of level 0.
//! loop {
//!     println!("{} ({} bytes)", reader.chunk_id(), reader.chunk_size());
//!     match reader.seek_next_chunk() {
//!         Ok(()) => continue,
//!         Err(RiffError::EndOfChunkList) => break,
//!         Err(e) => return Err(e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod diag;
pub mod error;
pub mod fourcc;
pub mod logging;
pub mod reader;
pub mod source;
pub mod stack;

mod validate;

pub use diag::{DiagSink, NullSink, TracingSink};
pub use error::{error_to_string, RiffError};
pub use fourcc::FourCc;
pub use reader::{RiffReader, CHUNK_DATA_OFFSET, HEADER_SIZE};
pub use source::{ByteSource, FileSource, MemSource};
pub use stack::ListFrame;
