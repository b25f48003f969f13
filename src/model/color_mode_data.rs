//! The ColorModeData section (§3): opaque except for `Indexed`/`Duotone`
//! color modes, where it holds a 256-entry RGB palette / a duotone spec
//! Photoshop itself treats as opaque too. We keep the bytes verbatim and
//! only interpret them for [`ColorModeData::indexed_palette`].

use crate::model::header::ColorMode;

/// The raw ColorModeData section payload.
#[derive(Debug, Clone, Default)]
pub struct ColorModeData {
    bytes: Vec<u8>,
}

impl ColorModeData {
    /// Wrap a section's raw bytes.
    pub fn new(bytes: Vec<u8>) -> ColorModeData {
        ColorModeData { bytes }
    }

    /// The raw section bytes, as read or as will be written verbatim.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// For [`ColorMode::Indexed`], the 256-entry RGB palette (768 bytes: all
    /// red values, then all green, then all blue). `None` if the mode isn't
    /// indexed or the section is short.
    pub fn indexed_palette(&self, color_mode: ColorMode) -> Option<[[u8; 3]; 256]> {
        if color_mode != ColorMode::Indexed || self.bytes.len() < 768 {
            return None;
        }
        let mut palette = [[0u8; 3]; 256];
        for i in 0..256 {
            palette[i] = [self.bytes[i], self.bytes[256 + i], self.bytes[512 + i]];
        }
        Some(palette)
    }
}
