//! Per-layer mask geometry (§LayerMask, referenced from §4.6 "Mask
//! channels"): bounds, default color, and packed behavior flags for a
//! layer's user mask and (optionally) its vector-derived "real" mask.

use crate::channel::Channel;
use crate::error::Result;
use crate::io::{Cursor, Writer};

const SECTION: &str = "LayerMask";

/// Packed mask behavior bits (§3 "LayerMask": position-relative-to-layer,
/// disabled, vector, has-mask-params, plus 4 unknown bits for round-trip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskFlags {
    /// Position is relative to the layer.
    pub relative_to_layer: bool,
    /// The mask is disabled (not applied).
    pub disabled: bool,
    /// The mask is vector-derived rather than painted.
    pub vector: bool,
    /// Whether a [`MaskParams`] block follows this mask's geometry.
    pub has_mask_params: bool,
    /// The 4 remaining bits, unspecified but required to round-trip (§9
    /// Open Question i).
    pub unknown_bits: u8,
}

impl MaskFlags {
    fn from_u8(byte: u8) -> MaskFlags {
        MaskFlags {
            relative_to_layer: byte & 0x01 != 0,
            disabled: byte & 0x02 != 0,
            vector: byte & 0x04 != 0,
            has_mask_params: byte & 0x08 != 0,
            unknown_bits: (byte >> 4) & 0x0F,
        }
    }

    fn to_u8(self) -> u8 {
        let mut byte = 0u8;
        if self.relative_to_layer {
            byte |= 0x01;
        }
        if self.disabled {
            byte |= 0x02;
        }
        if self.vector {
            byte |= 0x04;
        }
        if self.has_mask_params {
            byte |= 0x08;
        }
        byte |= (self.unknown_bits & 0x0F) << 4;
        byte
    }
}

/// Optional density/feather parameters for a mask, present when the owning
/// [`MaskFlags::has_mask_params`] bit is set (§3 "LayerMask").
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskParams {
    /// User (pixel) mask density, `0..=255`.
    pub user_density: Option<u8>,
    /// User (pixel) mask feather radius.
    pub user_feather: Option<f64>,
    /// Vector mask density, `0..=255`.
    pub vector_density: Option<u8>,
    /// Vector mask feather radius.
    pub vector_feather: Option<f64>,
}

impl MaskParams {
    fn read(cursor: &mut Cursor) -> Result<MaskParams> {
        let which = cursor.read_u8()?;
        let mut params = MaskParams::default();
        if which & 0x01 != 0 {
            params.user_density = Some(cursor.read_u8()?);
        }
        if which & 0x02 != 0 {
            params.user_feather = Some(cursor.read_f64()?);
        }
        if which & 0x04 != 0 {
            params.vector_density = Some(cursor.read_u8()?);
        }
        if which & 0x08 != 0 {
            params.vector_feather = Some(cursor.read_f64()?);
        }
        Ok(params)
    }

    fn write(&self, writer: &mut Writer) {
        let mut which = 0u8;
        if self.user_density.is_some() {
            which |= 0x01;
        }
        if self.user_feather.is_some() {
            which |= 0x02;
        }
        if self.vector_density.is_some() {
            which |= 0x04;
        }
        if self.vector_feather.is_some() {
            which |= 0x08;
        }
        writer.write_u8(which);
        if let Some(d) = self.user_density {
            writer.write_u8(d);
        }
        if let Some(f) = self.user_feather {
            writer.write_f64(f);
        }
        if let Some(d) = self.vector_density {
            writer.write_u8(d);
        }
        if let Some(f) = self.vector_feather {
            writer.write_f64(f);
        }
    }
}

/// One mask's bounds, default fill color, and flags.
#[derive(Debug, Clone, Copy)]
pub struct MaskGeometry {
    /// Mask bounds, independent of the owning layer's bounds.
    pub top: i32,
    /// Left edge of the mask's bounding rectangle.
    pub left: i32,
    /// Bottom edge of the mask's bounding rectangle.
    pub bottom: i32,
    /// Right edge of the mask's bounding rectangle.
    pub right: i32,
    /// Fill color for pixels outside the mask's bounds (0 or 255).
    pub default_color: u8,
    /// Packed behavior flags.
    pub flags: MaskFlags,
}

impl MaskGeometry {
    /// Width implied by `left`/`right`.
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    /// Height implied by `top`/`bottom`.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }
}

/// A layer's mask data block: always a user mask, optionally followed by a
/// second "real" (vector-derived) mask when the block is long enough to
/// hold one.
#[derive(Debug, Clone)]
pub struct LayerMask {
    /// The user-painted mask.
    pub user_mask: MaskGeometry,
    /// A vector-derived mask, present on layers with both a pixel mask and
    /// a vector mask.
    pub real_mask: Option<MaskGeometry>,
    /// Density/feather parameters, present when `user_mask.flags.has_mask_params`.
    pub params: Option<MaskParams>,
    /// The user mask's pixel channel (role ID -2), split out of the
    /// layer's main channel map (§4.6 "Mask channels"). Populated by
    /// [`crate::layer::tree::build_tree`] from the parallel ChannelImageData
    /// entry, not by [`LayerMask::read`] itself (mask geometry and mask
    /// pixels live in different sections of the file).
    pub channel: Option<Channel>,
    /// The real (vector-derived) mask's pixel channel (role ID -3).
    pub real_channel: Option<Channel>,
}

impl LayerMask {
    /// Parse a LayerMaskData block body (already stripped of its own length
    /// prefix). Returns `None` for a zero-length block (no mask at all).
    pub fn read(bytes: &[u8]) -> Result<Option<LayerMask>> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let mut cursor = Cursor::new(bytes, SECTION);

        let top = cursor.read_i32()?;
        let left = cursor.read_i32()?;
        let bottom = cursor.read_i32()?;
        let right = cursor.read_i32()?;
        let default_color = cursor.read_u8()?;
        let flags = MaskFlags::from_u8(cursor.read_u8()?);

        let user_mask = MaskGeometry {
            top,
            left,
            bottom,
            right,
            default_color,
            flags,
        };

        // Mask params (if the flag says they're present) must be consumed
        // before deciding whether a real mask follows — otherwise their
        // bytes are mistaken for a second mask block.
        let params = if flags.has_mask_params {
            Some(MaskParams::read(&mut cursor)?)
        } else {
            None
        };

        // A block with no more bytes has no real mask; one with at least
        // 18 more bytes carries real-mask flags/color plus a second bounds
        // rectangle, per the format's "Mask Data" variable-length layout.
        let real_mask = if cursor.remaining() >= 18 {
            let real_flags = MaskFlags::from_u8(cursor.read_u8()?);
            let real_default_color = cursor.read_u8()?;
            let real_top = cursor.read_i32()?;
            let real_left = cursor.read_i32()?;
            let real_bottom = cursor.read_i32()?;
            let real_right = cursor.read_i32()?;
            Some(MaskGeometry {
                top: real_top,
                left: real_left,
                bottom: real_bottom,
                right: real_right,
                default_color: real_default_color,
                flags: real_flags,
            })
        } else {
            None
        };

        Ok(Some(LayerMask {
            user_mask,
            real_mask,
            params,
            channel: None,
            real_channel: None,
        }))
    }

    /// Serialize the mask data block body (the caller writes its own length
    /// prefix around this).
    pub fn write(&self, writer: &mut Writer) {
        let m = &self.user_mask;
        writer.write_i32(m.top);
        writer.write_i32(m.left);
        writer.write_i32(m.bottom);
        writer.write_i32(m.right);
        writer.write_u8(m.default_color);
        writer.write_u8(m.flags.to_u8());

        if let Some(params) = &self.params {
            params.write(writer);
        }

        if let Some(real) = &self.real_mask {
            writer.write_u8(real.flags.to_u8());
            writer.write_u8(real.default_color);
            writer.write_i32(real.top);
            writer.write_i32(real.left);
            writer.write_i32(real.bottom);
            writer.write_i32(real.right);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_all_bits() {
        let flags = MaskFlags {
            relative_to_layer: true,
            disabled: false,
            vector: true,
            has_mask_params: false,
            unknown_bits: 0b1011,
        };
        assert_eq!(MaskFlags::from_u8(flags.to_u8()), flags);
    }

    fn mask_with_params(params: MaskParams) -> LayerMask {
        LayerMask {
            user_mask: MaskGeometry {
                top: 0,
                left: 0,
                bottom: 10,
                right: 10,
                default_color: 255,
                flags: MaskFlags {
                    relative_to_layer: true,
                    disabled: false,
                    vector: false,
                    has_mask_params: true,
                    unknown_bits: 0,
                },
            },
            real_mask: None,
            params: Some(params),
            channel: None,
            real_channel: None,
        }
    }

    #[test]
    fn mask_params_round_trip_without_a_real_mask() {
        let mask = mask_with_params(MaskParams {
            user_density: Some(128),
            user_feather: Some(2.5),
            vector_density: None,
            vector_feather: None,
        });

        let mut writer = Writer::new();
        mask.write(&mut writer);
        let bytes = writer.into_bytes();

        let read_back = LayerMask::read(&bytes).unwrap().unwrap();
        assert_eq!(read_back.user_mask.flags, mask.user_mask.flags);
        assert_eq!(read_back.params, mask.params);
        assert!(read_back.real_mask.is_none());
    }

    #[test]
    fn mask_params_do_not_get_mistaken_for_a_real_mask() {
        // All four params present (1 + 1 + 8 + 1 + 8 = 19 bytes) leaves
        // more than 18 trailing bytes if they aren't consumed first.
        let mask = mask_with_params(MaskParams {
            user_density: Some(50),
            user_feather: Some(1.0),
            vector_density: Some(200),
            vector_feather: Some(4.0),
        });

        let mut writer = Writer::new();
        mask.write(&mut writer);
        let bytes = writer.into_bytes();

        let read_back = LayerMask::read(&bytes).unwrap().unwrap();
        assert_eq!(read_back.params, mask.params);
        assert!(read_back.real_mask.is_none());
    }

    #[test]
    fn params_then_real_mask_both_round_trip() {
        let mut mask = mask_with_params(MaskParams {
            user_density: Some(10),
            user_feather: None,
            vector_density: None,
            vector_feather: None,
        });
        mask.real_mask = Some(MaskGeometry {
            top: 1,
            left: 2,
            bottom: 11,
            right: 12,
            default_color: 0,
            flags: MaskFlags {
                relative_to_layer: false,
                disabled: true,
                vector: true,
                has_mask_params: false,
                unknown_bits: 0,
            },
        });

        let mut writer = Writer::new();
        mask.write(&mut writer);
        let bytes = writer.into_bytes();

        let read_back = LayerMask::read(&bytes).unwrap().unwrap();
        assert_eq!(read_back.params, mask.params);
        let real = read_back.real_mask.expect("real mask survived round trip");
        assert_eq!(real.top, 1);
        assert_eq!(real.flags, mask.real_mask.unwrap().flags);
    }
}
