//! The file header (§3 FileHeader): signature, version, channel count,
//! dimensions, depth, and color mode — the only part of the document whose
//! shape does not depend on the version it declares.

use crate::error::{PsdError, Result};
use crate::io::{Cursor, Version, Writer};

const SECTION: &str = "FileHeader";
const SIGNATURE: [u8; 4] = *b"8BPS";
const RESERVED: [u8; 6] = [0; 6];

/// Number of bits per channel sample. 1-bit bitmap data is accepted on read
/// but the codec layer treats it as byte-packed ([`crate::compression::SampleWidth::from_bit_depth`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Depth {
    One = 1,
    Eight = 8,
    Sixteen = 16,
    ThirtyTwo = 32,
}

impl Depth {
    fn from_u16(depth: u16) -> Result<Depth> {
        match depth {
            1 => Ok(Depth::One),
            8 => Ok(Depth::Eight),
            16 => Ok(Depth::Sixteen),
            32 => Ok(Depth::ThirtyTwo),
            other => Err(PsdError::format(
                SECTION,
                0,
                format!("depth {other} is not one of 1/8/16/32"),
            )),
        }
    }

    fn to_u16(self) -> u16 {
        self as u16
    }
}

/// The color mode of the document (§3 FileHeader, GLOSSARY "Color mode").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ColorMode {
    Bitmap = 0,
    Grayscale = 1,
    Indexed = 2,
    Rgb = 3,
    Cmyk = 4,
    Multichannel = 7,
    Duotone = 8,
    Lab = 9,
}

impl ColorMode {
    fn from_u16(mode: u16) -> Result<ColorMode> {
        match mode {
            0 => Ok(ColorMode::Bitmap),
            1 => Ok(ColorMode::Grayscale),
            2 => Ok(ColorMode::Indexed),
            3 => Ok(ColorMode::Rgb),
            4 => Ok(ColorMode::Cmyk),
            7 => Ok(ColorMode::Multichannel),
            8 => Ok(ColorMode::Duotone),
            9 => Ok(ColorMode::Lab),
            other => Err(PsdError::format(
                SECTION,
                0,
                format!("color mode {other} is not a recognized value"),
            )),
        }
    }

    fn to_u16(self) -> u16 {
        self as u16
    }

    /// Number of color channels implied by this mode, not counting alpha or
    /// spot channels (SPEC_FULL.md §B.4, "required channels per color mode").
    pub fn base_channel_count(self) -> u16 {
        match self {
            ColorMode::Bitmap | ColorMode::Grayscale | ColorMode::Duotone | ColorMode::Indexed => {
                1
            }
            ColorMode::Rgb | ColorMode::Lab => 3,
            ColorMode::Cmyk => 4,
            ColorMode::Multichannel => 0,
        }
    }
}

/// The 26-byte file header every document starts with.
#[derive(Debug, Clone)]
pub struct FileHeader {
    /// PSD vs PSB, which governs every variant-width field downstream.
    pub version: Version,
    /// Number of channels, including alpha and spot channels. 1 to 56.
    pub channel_count: u16,
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
    /// Bits per channel sample.
    pub depth: Depth,
    /// The document's color mode.
    pub color_mode: ColorMode,
}

impl FileHeader {
    /// Parse the 26-byte file header.
    pub fn read(bytes: &[u8]) -> Result<FileHeader> {
        let mut cursor = Cursor::new(bytes, SECTION);

        let signature = cursor.read_signature()?;
        if signature != SIGNATURE {
            return Err(PsdError::format(
                SECTION,
                0,
                "signature is not '8BPS'",
            ));
        }

        let version_marker = cursor.read_u16()?;
        let version = Version::from_marker(version_marker).ok_or_else(|| {
            PsdError::format(
                SECTION,
                cursor.position(),
                format!("version marker {version_marker} is neither 1 (PSD) nor 2 (PSB)"),
            )
        })?;

        let reserved = cursor.read(6)?;
        if reserved != RESERVED {
            return Err(PsdError::format(
                SECTION,
                cursor.position(),
                "reserved bytes are not all zero",
            ));
        }

        let channel_count = cursor.read_u16()?;
        if !(1..=56).contains(&channel_count) {
            return Err(PsdError::format(
                SECTION,
                cursor.position(),
                format!("channel count {channel_count} is out of range 1..=56"),
            ));
        }

        let height = cursor.read_u32()?;
        let width = cursor.read_u32()?;
        let max_dimension = version.max_dimension();
        if !(1..=max_dimension).contains(&height) || !(1..=max_dimension).contains(&width) {
            return Err(PsdError::format(
                SECTION,
                cursor.position(),
                format!(
                    "dimensions {width}x{height} are out of range 1..={max_dimension} for {version:?}"
                ),
            ));
        }

        let depth = Depth::from_u16(cursor.read_u16()?)?;
        let color_mode = ColorMode::from_u16(cursor.read_u16()?)?;

        Ok(FileHeader {
            version,
            channel_count,
            height,
            width,
            depth,
            color_mode,
        })
    }

    /// Serialize the 26-byte file header.
    pub fn write(&self, writer: &mut Writer) {
        writer.write_signature(&SIGNATURE);
        writer.write_u16(self.version.marker());
        writer.write_zeros(6);
        writer.write_u16(self.channel_count);
        writer.write_u32(self.height);
        writer.write_u32(self.width);
        writer.write_u16(self.depth.to_u16());
        writer.write_u16(self.color_mode.to_u16());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header_bytes(version_marker: u16) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_signature(&SIGNATURE);
        writer.write_u16(version_marker);
        writer.write_zeros(6);
        writer.write_u16(4);
        writer.write_u32(100);
        writer.write_u32(200);
        writer.write_u16(8);
        writer.write_u16(3);
        writer.into_bytes()
    }

    #[test]
    fn round_trips_psd_and_psb() {
        for marker in [1u16, 2] {
            let bytes = sample_header_bytes(marker);
            let header = FileHeader::read(&bytes).unwrap();
            assert_eq!(header.channel_count, 4);
            assert_eq!(header.height, 100);
            assert_eq!(header.width, 200);
            assert_eq!(header.depth, Depth::Eight);
            assert_eq!(header.color_mode, ColorMode::Rgb);

            let mut writer = Writer::new();
            header.write(&mut writer);
            assert_eq!(writer.into_bytes(), bytes);
        }
    }

    #[test]
    fn rejects_signature() {
        let mut bytes = sample_header_bytes(1);
        bytes[0] = b'X';
        assert!(FileHeader::read(&bytes).is_err());
    }

    #[test]
    fn rejects_dimensions_beyond_psd_max() {
        let mut writer = Writer::new();
        writer.write_signature(&SIGNATURE);
        writer.write_u16(1);
        writer.write_zeros(6);
        writer.write_u16(3);
        writer.write_u32(30_001);
        writer.write_u32(100);
        writer.write_u16(8);
        writer.write_u16(3);
        assert!(FileHeader::read(&writer.into_bytes()).is_err());
    }
}
