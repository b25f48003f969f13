//! An owned, growable big-endian byte writer with length-prefix patching.
//!
//! PSD length prefixes precede the content they measure, so the writer
//! reserves space for a length field, keeps writing, and patches the
//! reserved bytes once the content's size is known — the same two-pass
//! trick the reference implementation's section writers use instead of
//! building sections out-of-order.

use crate::io::Version;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

/// A placeholder reserved by [`Writer::reserve_u32`] /
/// [`Writer::reserve_variant_wide`], to be filled in later via
/// [`Writer::patch_u32`] / [`Writer::patch_variant_wide`].
#[derive(Debug, Clone, Copy)]
pub struct LengthPatch {
    offset: usize,
    width: u8,
}

/// An in-memory, append-only byte buffer with big-endian primitive writes.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Construct an empty writer.
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    /// Current length of the buffer (also the position the next write lands at).
    pub fn position(&self) -> u64 {
        self.buf.len() as u64
    }

    /// Consume the writer, returning the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write `count` zero bytes, used for placeholder channels and padding.
    pub fn write_zeros(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0);
    }

    /// Pad the buffer to a multiple of `alignment` with zero bytes.
    pub fn pad_to(&mut self, alignment: usize) {
        let remainder = self.buf.len() % alignment;
        if remainder != 0 {
            self.write_zeros(alignment - remainder);
        }
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Write a signed byte.
    pub fn write_i8(&mut self, value: i8) {
        self.buf.push(value as u8);
    }

    /// Write a big-endian u16.
    pub fn write_u16(&mut self, value: u16) {
        self.buf.write_u16::<BigEndian>(value).unwrap();
    }

    /// Write a big-endian i16.
    pub fn write_i16(&mut self, value: i16) {
        self.buf.write_i16::<BigEndian>(value).unwrap();
    }

    /// Write a big-endian u32.
    pub fn write_u32(&mut self, value: u32) {
        self.buf.write_u32::<BigEndian>(value).unwrap();
    }

    /// Write a big-endian i32.
    pub fn write_i32(&mut self, value: i32) {
        self.buf.write_i32::<BigEndian>(value).unwrap();
    }

    /// Write a big-endian u64.
    pub fn write_u64(&mut self, value: u64) {
        self.buf.write_u64::<BigEndian>(value).unwrap();
    }

    /// Write a big-endian f32.
    pub fn write_f32(&mut self, value: f32) {
        self.buf.write_f32::<BigEndian>(value).unwrap();
    }

    /// Write a big-endian f64.
    pub fn write_f64(&mut self, value: f64) {
        self.buf.write_f64::<BigEndian>(value).unwrap();
    }

    /// Write a 4-byte ASCII signature.
    pub fn write_signature(&mut self, signature: &[u8; 4]) {
        self.buf.extend_from_slice(signature);
    }

    /// Write a width-class field (`u32` in PSD, `u64` in PSB).
    pub fn write_variant_wide(&mut self, version: Version, value: u64) {
        match version {
            Version::Psd => self.write_u32(value as u32),
            Version::Psb => self.write_u64(value),
        }
    }

    /// Write a `u16`-class field widened in PSB.
    pub fn write_variant_narrow(&mut self, version: Version, value: u32) {
        match version {
            Version::Psd => self.write_u16(value as u16),
            Version::Psb => self.write_u32(value),
        }
    }

    /// Write a Pascal string, padded so the record (length byte + bytes) is
    /// a multiple of `alignment`.
    pub fn write_pascal_string(&mut self, name: &str, alignment: usize) {
        // Pascal length is a single byte; truncate defensively (`luni` carries the
        // untruncated unicode name for anything longer, per §3).
        let bytes = name.as_bytes();
        let len = bytes.len().min(255);
        self.write_u8(len as u8);
        self.write_bytes(&bytes[..len]);

        let total = len + 1;
        let padding = (alignment - (total % alignment)) % alignment;
        self.write_zeros(padding);
    }

    /// Write a Unicode string: 4-byte length (UTF-16 code units) followed by
    /// the big-endian code units.
    pub fn write_unicode_string(&mut self, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_u32(units.len() as u32);
        for unit in units {
            self.write_u16(unit);
        }
    }

    /// Reserve 4 bytes for a later length patch, returning a handle to them.
    pub fn reserve_u32(&mut self) -> LengthPatch {
        let offset = self.buf.len();
        self.write_u32(0);
        LengthPatch { offset, width: 4 }
    }

    /// Reserve a width-class length field (4 bytes PSD, 8 bytes PSB).
    pub fn reserve_variant_wide(&mut self, version: Version) -> LengthPatch {
        let offset = self.buf.len();
        let width = version.wide_len_width();
        self.write_zeros(width);
        LengthPatch {
            offset,
            width: width as u8,
        }
    }

    /// Fill in a previously reserved length field with the number of bytes
    /// written since it was reserved (i.e. excluding the field itself).
    pub fn patch_length_since(&mut self, patch: LengthPatch) {
        let content_len = (self.buf.len() - patch.offset - patch.width as usize) as u64;
        self.patch_value(patch, content_len);
    }

    /// Fill in a previously reserved length field with an explicit value.
    pub fn patch_value(&mut self, patch: LengthPatch, value: u64) {
        let mut tmp = Vec::with_capacity(patch.width as usize);
        match patch.width {
            4 => tmp.write_u32::<BigEndian>(value as u32).unwrap(),
            8 => tmp.write_u64::<BigEndian>(value).unwrap(),
            other => unreachable!("unsupported length patch width {other}"),
        }
        self.buf[patch.offset..patch.offset + patch.width as usize].copy_from_slice(&tmp);
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
