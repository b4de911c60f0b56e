//! # Error Module
//!
//! Error taxonomy for RIFF navigation.
//! Non-critical errors are normal control flow (the caller may keep
//! navigating); critical errors leave the reader in an undefined state
//! and the caller must reopen or discard it.

use std::io;

use thiserror::Error;

/// First critical error code. Errors with `code() >= CRITICAL_THRESHOLD`
/// (up to the end of the table) leave the reader undefined.
pub const CRITICAL_THRESHOLD: u8 = 4;

/// Error type for all RIFF reader operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RiffError {
    /// Attempt to read or seek past the end of the current chunk's data
    #[error("end of chunk")]
    EndOfChunk,

    /// No more chunks in the current list level
    #[error("end of chunk list")]
    EndOfChunkList,

    /// Non-conforming trailing bytes at the end of a list or the file
    #[error("excess bytes at end of chunk list")]
    ExcessData,

    /// A FourCC contains non-printable bytes, or the outer id is wrong
    #[error("illegal four character id")]
    IllegalId,

    /// A declared chunk size exceeds its parent list or the file
    #[error("chunk size exceeds list level or file")]
    InvalidChunkSize,

    /// The byte source ended before the declared structure did
    #[error("unexpected end of riff data")]
    UnexpectedEof,

    /// The byte source reported an access failure
    #[error("source access failed: {0}")]
    Access(io::ErrorKind),

    /// The reader is not set up. Unreachable through this crate's
    /// constructors; kept for the stable code table.
    #[error("invalid riff handle")]
    InvalidHandle,

    /// `level_parent` was called at the outermost level
    #[error("already at top level")]
    AtTopLevel,
}

impl RiffError {
    /// Stable numeric code for this error.
    pub fn code(&self) -> u8 {
        match self {
            RiffError::EndOfChunk => 1,
            RiffError::EndOfChunkList => 2,
            RiffError::ExcessData => 3,
            RiffError::IllegalId => 4,
            RiffError::InvalidChunkSize => 5,
            RiffError::UnexpectedEof => 6,
            RiffError::Access(_) => 7,
            RiffError::InvalidHandle => 8,
            RiffError::AtTopLevel => 9,
        }
    }

    /// Whether this error leaves the reader in an undefined state.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            RiffError::IllegalId
                | RiffError::InvalidChunkSize
                | RiffError::UnexpectedEof
                | RiffError::Access(_)
                | RiffError::InvalidHandle
        )
    }

    /// Map an I/O failure from a byte source to the taxonomy.
    pub fn access(err: io::Error) -> Self {
        RiffError::Access(err.kind())
    }
}

/// Translate a numeric error code to a static message.
///
/// Code 0 is success; unknown codes map to a fallback string.
pub fn error_to_string(code: u8) -> &'static str {
    match code {
        0 => "no error",
        1 => "end of chunk",
        2 => "end of chunk list",
        3 => "excess bytes at end of chunk list",
        4 => "illegal four character id",
        5 => "chunk size exceeds list level or file",
        6 => "unexpected end of riff data",
        7 => "source access failed",
        8 => "invalid riff handle",
        9 => "already at top level",
        _ => "unknown riff error",
    }
}

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, RiffError>;
