//! Big-endian primitive I/O and the version-variant width rule.
//!
//! Everything that reads or writes PSD/PSB bytes goes through [`Cursor`] (for
//! parsing, since whole sections are read into memory up front, mirroring
//! the teacher's `PsdCursor`) or [`Writer`] (for emission). [`stream`]
//! provides the file-backed and in-memory stream abstractions named in the
//! byte I/O component of the design.

mod byteswap;
mod cursor;
pub mod stream;
mod writer;

pub use byteswap::{swap_bytes_in_place, swap_sample_array};
pub use cursor::Cursor;
pub use writer::{LengthPatch, Writer};

/// Whether a document is the classic 2 GiB-limited PSD or the large-format
/// PSB. Selects the width of every variant-width field (§3 "Version-variant
/// width").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// Regular PSD. Version marker `1`. Width/height capped at 30,000.
    Psd,
    /// Large document format. Version marker `2`. Width/height capped at
    /// 300,000. Most length fields widen from `u32` to `u64`.
    Psb,
}

impl Version {
    /// Construct from the on-disk 2-byte version marker.
    pub fn from_marker(marker: u16) -> Option<Version> {
        match marker {
            1 => Some(Version::Psd),
            2 => Some(Version::Psb),
            _ => None,
        }
    }

    /// The on-disk 2-byte version marker.
    pub fn marker(self) -> u16 {
        match self {
            Version::Psd => 1,
            Version::Psb => 2,
        }
    }

    /// Maximum width/height for this version (§3).
    pub fn max_dimension(self) -> u32 {
        match self {
            Version::Psd => 30_000,
            Version::Psb => 300_000,
        }
    }

    /// Width in bytes of a "PSD=uint32, PSB=uint64" variant field.
    pub fn wide_len_width(self) -> usize {
        match self {
            Version::Psd => 4,
            Version::Psb => 8,
        }
    }

    /// Width in bytes of a "PSD=uint16, PSB=uint32" variant field (used for
    /// RLE per-scanline length arrays).
    pub fn narrow_len_width(self) -> usize {
        match self {
            Version::Psd => 2,
            Version::Psb => 4,
        }
    }
}

/// The closed set of tagged-block keys whose length field is 8 bytes wide in
/// PSB regardless of the surrounding section's version (§3
/// AdditionalLayerInfo).
pub const WIDE_LENGTH_TAGGED_BLOCK_KEYS: &[&[u8; 4]] = &[
    b"Lr16", b"Lr32", b"Alph", b"Mt16", b"Mt32", b"Mtrn", b"LMsk", b"FMsk", b"lnk2", b"lnk3",
    b"lnkE", b"FEid", b"FXid", b"PxSD", b"cinf",
];

/// Whether a tagged-block key uses the 8-byte PSB length rule.
pub fn tagged_block_uses_wide_length(key: &[u8; 4]) -> bool {
    WIDE_LENGTH_TAGGED_BLOCK_KEYS.contains(&key)
}
