//! Four-character chunk identifiers.
//!
//! Every chunk and list in a RIFF container is tagged with a FourCC:
//! four bytes that must all fall in the printable ASCII range
//! `[0x20, 0x7E]`.

use std::fmt;

/// Inclusive printable ASCII range for FourCC bytes.
const PRINTABLE_MIN: u8 = 0x20;
const PRINTABLE_MAX: u8 = 0x7e;

/// A four-character chunk identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// Outer header id of a classic RIFF container.
    pub const RIFF: FourCc = FourCc(*b"RIFF");
    /// Chunk id marking a nested chunk list.
    pub const LIST: FourCc = FourCc(*b"LIST");
    /// Outer header id of a 64-bit sized (BW64) container.
    pub const BW64: FourCc = FourCc(*b"BW64");
    /// First child of a BW64 container carrying the true 64-bit size.
    pub const DS64: FourCc = FourCc(*b"ds64");

    pub const fn new(bytes: [u8; 4]) -> Self {
        FourCc(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Whether all four bytes are printable ASCII.
    pub fn is_printable(&self) -> bool {
        self.0
            .iter()
            .all(|&b| (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&b))
    }
}

impl From<[u8; 4]> for FourCc {
    fn from(bytes: [u8; 4]) -> Self {
        FourCc(bytes)
    }
}

impl From<&[u8; 4]> for FourCc {
    fn from(bytes: &[u8; 4]) -> Self {
        FourCc(*bytes)
    }
}

impl fmt::Display for FourCc {
    /// Renders printable bytes as-is and everything else as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if (PRINTABLE_MIN..=PRINTABLE_MAX).contains(&b) {
                b as char
            } else {
                '.'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FourCc(\"{self}\")")
    }
}
