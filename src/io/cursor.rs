//! A borrowing, big-endian cursor over an in-memory byte slice.
//!
//! This is the direct descendant of the teacher's `sections::PsdCursor`,
//! widened to understand the PSD/PSB variant-width rule and to hand out
//! zero-copy views via [`Cursor::read_view`] instead of only owned reads.

use crate::error::{PsdError, Result};
use crate::io::Version;
use byteorder::{BigEndian, ByteOrder};

/// A cursor over a borrowed byte slice. All multi-byte reads are big-endian.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
    /// Name of the enclosing section, used to build [`crate::error::Breadcrumb`]s.
    section: &'static str,
}

impl<'a> Cursor<'a> {
    /// Create a cursor over `bytes`, tagging errors with `section`.
    pub fn new(bytes: &'a [u8], section: &'static str) -> Self {
        Cursor {
            bytes,
            position: 0,
            section,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> u64 {
        self.position as u64
    }

    /// Total length of the underlying buffer.
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the cursor has reached the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Number of bytes remaining.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Jump to an absolute position.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.bytes.len() as u64 {
            return Err(self.err(format!(
                "seek to {} is past end of buffer ({} bytes)",
                position,
                self.bytes.len()
            )));
        }
        self.position = position as usize;
        Ok(())
    }

    fn err(&self, reason: impl Into<String>) -> PsdError {
        PsdError::format(self.section, self.position as u64, reason)
    }

    /// Borrow the entire underlying buffer.
    pub fn whole_buffer(&self) -> &'a [u8] {
        self.bytes
    }

    /// A zero-copy view into an arbitrary absolute range of the buffer. Does
    /// not move the cursor's own position.
    pub fn read_view(&self, offset: u64, len: u64) -> Result<&'a [u8]> {
        let start = offset as usize;
        let end = start
            .checked_add(len as usize)
            .ok_or_else(|| self.err("view length overflow"))?;
        if end > self.bytes.len() {
            return Err(self.err(format!(
                "requested view [{}, {}) but buffer is only {} bytes",
                start,
                end,
                self.bytes.len()
            )));
        }
        Ok(&self.bytes[start..end])
    }

    /// Read `n` bytes and advance, returning a zero-copy slice.
    pub fn read(&mut self, n: u64) -> Result<&'a [u8]> {
        let slice = self.read_view(self.position as u64, n)?;
        self.position += n as usize;
        Ok(slice)
    }

    /// Peek at the next `n` bytes without advancing.
    pub fn peek(&self, n: u64) -> Result<&'a [u8]> {
        self.read_view(self.position as u64, n)
    }

    /// Peek at the next 4 bytes, for tagged-block signature lookahead.
    pub fn peek_4(&self) -> Result<[u8; 4]> {
        let bytes = self.peek(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    /// Read a signed byte.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read(2)?))
    }

    /// Read a big-endian i16.
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read(2)?))
    }

    /// Read a big-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read(4)?))
    }

    /// Read a big-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read(4)?))
    }

    /// Read a big-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.read(8)?))
    }

    /// Read a big-endian f32.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.read(4)?))
    }

    /// Read a big-endian f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.read(8)?))
    }

    /// Read a 4-byte ASCII signature (blend mode keys, "8BIM", tagged block
    /// keys, …).
    pub fn read_signature(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Read a width/height-class field: `u32` in PSD, widened from `u64` in
    /// PSB. See §3 "Version-variant width".
    pub fn read_variant_wide(&mut self, version: Version) -> Result<u64> {
        match version {
            Version::Psd => Ok(self.read_u32()? as u64),
            Version::Psb => self.read_u64(),
        }
    }

    /// Read a `u16`-class field widened to `u32` in PSB (used for RLE
    /// per-scanline lengths).
    pub fn read_variant_narrow(&mut self, version: Version) -> Result<u32> {
        match version {
            Version::Psd => Ok(self.read_u16()? as u32),
            Version::Psb => self.read_u32(),
        }
    }

    /// Read a Pascal string: one length byte, that many bytes, then padding
    /// so the total record (including the length byte) is a multiple of
    /// `alignment`.
    pub fn read_pascal_string(&mut self, alignment: u64) -> Result<String> {
        let len = self.read_u8()? as u64;
        let bytes = self.read(len)?;
        let name = String::from_utf8_lossy(bytes).into_owned();

        let total = len + 1;
        let padding = (alignment - (total % alignment)) % alignment;
        self.read(padding)?;

        Ok(name)
    }

    /// Read a Unicode string: 4-byte length (in UTF-16 code units) followed
    /// by that many big-endian UTF-16 code units.
    pub fn read_unicode_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as u64;
        let mut units = Vec::with_capacity(len as usize);
        for _ in 0..len {
            units.push(self.read_u16()?);
        }
        Ok(String::from_utf16_lossy(&units))
    }
}
