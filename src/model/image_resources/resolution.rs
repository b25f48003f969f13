//! Resource 1005, "ResolutionInfo" (SPEC_FULL.md §B.1): pixels-per-inch/cm
//! plus the unit each axis was last displayed in. Supplemented from
//! `original_source/` — the distilled spec never mentions dpi, but every
//! real PSD carries this resource and round-tripping it losslessly matters
//! for anyone re-exporting through this crate.

use crate::error::Result;
use crate::io::Cursor;
use byteorder::{BigEndian, WriteBytesExt};

const SECTION: &str = "ResolutionInfo";

/// Display unit for resolution (`hResUnit`/`vResUnit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    /// Pixels per inch.
    PixelsPerInch,
    /// Pixels per centimeter.
    PixelsPerCm,
}

impl ResolutionUnit {
    fn from_u16(v: u16) -> ResolutionUnit {
        match v {
            2 => ResolutionUnit::PixelsPerCm,
            _ => ResolutionUnit::PixelsPerInch,
        }
    }

    fn to_u16(self) -> u16 {
        match self {
            ResolutionUnit::PixelsPerInch => 1,
            ResolutionUnit::PixelsPerCm => 2,
        }
    }
}

/// Display unit for width/height (`widthUnit`/`heightUnit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayUnit {
    /// Inches.
    Inches,
    /// Centimeters.
    Cm,
    /// Points.
    Points,
    /// Picas.
    Picas,
    /// Columns (uses the app's column-width preference).
    Columns,
}

impl DisplayUnit {
    fn from_u16(v: u16) -> DisplayUnit {
        match v {
            2 => DisplayUnit::Cm,
            3 => DisplayUnit::Points,
            4 => DisplayUnit::Picas,
            5 => DisplayUnit::Columns,
            _ => DisplayUnit::Inches,
        }
    }

    fn to_u16(self) -> u16 {
        match self {
            DisplayUnit::Inches => 1,
            DisplayUnit::Cm => 2,
            DisplayUnit::Points => 3,
            DisplayUnit::Picas => 4,
            DisplayUnit::Columns => 5,
        }
    }
}

/// Horizontal and vertical resolution, stored on disk as 16.16 fixed point.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionInfo {
    /// Horizontal resolution in `h_res_unit` units per inch/cm.
    pub h_res: f32,
    /// Unit `h_res` is expressed in.
    pub h_res_unit: ResolutionUnit,
    /// Unit the document's width is displayed in.
    pub width_unit: DisplayUnit,
    /// Vertical resolution in `v_res_unit` units per inch/cm.
    pub v_res: f32,
    /// Unit `v_res` is expressed in.
    pub v_res_unit: ResolutionUnit,
    /// Unit the document's height is displayed in.
    pub height_unit: DisplayUnit,
}

fn fixed_16_16_to_f32(raw: i32) -> f32 {
    raw as f32 / 65536.0
}

fn f32_to_fixed_16_16(value: f32) -> i32 {
    (value * 65536.0).round() as i32
}

impl ResolutionInfo {
    /// Parse a 16-byte ResolutionInfo payload.
    pub fn read(bytes: &[u8]) -> Result<ResolutionInfo> {
        let mut cursor = Cursor::new(bytes, SECTION);
        let h_res = fixed_16_16_to_f32(cursor.read_i32()?);
        let h_res_unit = ResolutionUnit::from_u16(cursor.read_u16()?);
        let width_unit = DisplayUnit::from_u16(cursor.read_u16()?);
        let v_res = fixed_16_16_to_f32(cursor.read_i32()?);
        let v_res_unit = ResolutionUnit::from_u16(cursor.read_u16()?);
        let height_unit = DisplayUnit::from_u16(cursor.read_u16()?);

        Ok(ResolutionInfo {
            h_res,
            h_res_unit,
            width_unit,
            v_res,
            v_res_unit,
            height_unit,
        })
    }

    /// `h_res` normalized to pixels per inch, regardless of `h_res_unit`.
    pub fn width_dpi(&self) -> f32 {
        match self.h_res_unit {
            ResolutionUnit::PixelsPerInch => self.h_res,
            ResolutionUnit::PixelsPerCm => self.h_res * 2.54,
        }
    }

    /// `v_res` normalized to pixels per inch, regardless of `v_res_unit`.
    pub fn height_dpi(&self) -> f32 {
        match self.v_res_unit {
            ResolutionUnit::PixelsPerInch => self.v_res,
            ResolutionUnit::PixelsPerCm => self.v_res * 2.54,
        }
    }

    /// Serialize to the 16-byte on-disk payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        buf.write_i32::<BigEndian>(f32_to_fixed_16_16(self.h_res)).unwrap();
        buf.write_u16::<BigEndian>(self.h_res_unit.to_u16()).unwrap();
        buf.write_u16::<BigEndian>(self.width_unit.to_u16()).unwrap();
        buf.write_i32::<BigEndian>(f32_to_fixed_16_16(self.v_res)).unwrap();
        buf.write_u16::<BigEndian>(self.v_res_unit.to_u16()).unwrap();
        buf.write_u16::<BigEndian>(self.height_unit.to_u16()).unwrap();
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let info = ResolutionInfo {
            h_res: 300.0,
            h_res_unit: ResolutionUnit::PixelsPerInch,
            width_unit: DisplayUnit::Inches,
            v_res: 300.0,
            v_res_unit: ResolutionUnit::PixelsPerInch,
            height_unit: DisplayUnit::Inches,
        };
        let bytes = info.to_bytes();
        let restored = ResolutionInfo::read(&bytes).unwrap();
        assert_eq!(restored.h_res, 300.0);
        assert_eq!(restored.v_res, 300.0);
        assert_eq!(restored.h_res_unit, ResolutionUnit::PixelsPerInch);
    }

    #[test]
    fn dpi_normalizes_centimeter_units() {
        let info = ResolutionInfo {
            h_res: 100.0,
            h_res_unit: ResolutionUnit::PixelsPerCm,
            width_unit: DisplayUnit::Cm,
            v_res: 300.0,
            v_res_unit: ResolutionUnit::PixelsPerInch,
            height_unit: DisplayUnit::Inches,
        };
        assert_eq!(info.width_dpi(), 254.0);
        assert_eq!(info.height_dpi(), 300.0);
    }
}
