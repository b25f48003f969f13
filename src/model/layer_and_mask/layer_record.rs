//! LayerRecord (§3): one layer's on-disk fixed-prefix record — bounds,
//! channel-info table, blend mode, opacity, packed flags, mask data,
//! blending ranges, Pascal name, and per-layer AdditionalLayerInfo.
//!
//! This is the raw, flat, reverse-ordered representation the format stores;
//! [`crate::layer::tree`] lifts a sequence of these (paired with their
//! ChannelImageData) into the nested [`crate::layer::Layer`] tree, and
//! flattens back down to this shape on write.

use crate::error::Result;
use crate::io::{Cursor, Version, Writer};
use crate::model::layer_and_mask::mask::LayerMask;
use crate::model::layer_and_mask::tagged_block::AdditionalLayerInfo;

const SECTION: &str = "LayerRecord";

/// One entry in a LayerRecord's channel-info table: which role, and how many
/// compressed bytes (including the 2-byte marker) its ChannelImageData
/// entry occupies.
#[derive(Debug, Clone, Copy)]
pub struct ChannelInfo {
    /// Signed channel role ID (§4.3 `role_id`).
    pub role_id: i16,
    /// Size in bytes of this channel's ChannelImageData entry, including its
    /// 2-byte compression marker (§3 invariant: must equal the actual bytes
    /// written).
    pub compressed_size: u64,
}

/// Packed per-layer bit flags (§3 LayerRecord, fully decoded per
/// SPEC_FULL.md §B.2 — the three trailing bits have no documented meaning
/// but must still round-trip).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerFlags {
    /// Bit 0: transparency is protected.
    pub transparency_protected: bool,
    /// Bit 1: the layer is hidden.
    pub hidden: bool,
    /// Bit 2: obsolete, must round-trip.
    pub obsolete: bool,
    /// Bit 3: whether bit 4 has a meaningful value (older readers ignore
    /// bit 4 unless this is set).
    pub bit4_meaningful: bool,
    /// Bit 4: pixel data is irrelevant to appearance (used by some
    /// adjustment/fill layers).
    pub pixel_data_irrelevant: bool,
    /// Bits 5-7: unknown meaning, preserved verbatim.
    pub unknown_bits: u8,
}

impl LayerFlags {
    /// Decode from the on-disk packed byte.
    pub fn from_u8(byte: u8) -> LayerFlags {
        LayerFlags {
            transparency_protected: byte & 0x01 != 0,
            hidden: byte & 0x02 != 0,
            obsolete: byte & 0x04 != 0,
            bit4_meaningful: byte & 0x08 != 0,
            pixel_data_irrelevant: byte & 0x10 != 0,
            unknown_bits: (byte >> 5) & 0x07,
        }
    }

    /// Encode to the on-disk packed byte.
    pub fn to_u8(self) -> u8 {
        let mut byte = 0u8;
        if self.transparency_protected {
            byte |= 0x01;
        }
        if self.hidden {
            byte |= 0x02;
        }
        if self.obsolete {
            byte |= 0x04;
        }
        if self.bit4_meaningful {
            byte |= 0x08;
        }
        if self.pixel_data_irrelevant {
            byte |= 0x10;
        }
        byte |= (self.unknown_bits & 0x07) << 5;
        byte
    }
}

/// A layer's blending-ranges block (composite gray range plus one per
/// channel): kept opaque, round-tripped verbatim (§3 "blending ranges
/// (2+4×N bytes)").
#[derive(Debug, Clone, Default)]
pub struct BlendingRanges(pub Vec<u8>);

/// One LayerRecord: geometry, channel-info table, and everything that
/// follows the fixed prefix.
#[derive(Debug, Clone)]
pub struct LayerRecord {
    /// Top edge of the layer's bounding rectangle.
    pub top: i32,
    /// Left edge of the layer's bounding rectangle.
    pub left: i32,
    /// Bottom edge of the layer's bounding rectangle.
    pub bottom: i32,
    /// Right edge of the layer's bounding rectangle.
    pub right: i32,
    /// Per-channel length/id table, in on-disk order.
    pub channel_info: Vec<ChannelInfo>,
    /// 4-byte blend mode signature.
    pub blend_mode_key: [u8; 4],
    /// Layer opacity, `0..=255`.
    pub opacity: u8,
    /// Clipping: `0` base, `1` non-base (clips to the layer below).
    pub clipping: u8,
    /// Visibility/lock/protection bit flags.
    pub flags: LayerFlags,
    /// Layer mask geometry and channel, if present.
    pub mask: Option<LayerMask>,
    /// Per-channel blending range pairs.
    pub blending_ranges: BlendingRanges,
    /// Layer name (legacy Pascal string; superseded by `luni` if present).
    pub name: String,
    /// Additional tagged blocks attached to this layer.
    pub tagged_blocks: AdditionalLayerInfo,
}

impl LayerRecord {
    /// Height implied by `top`/`bottom`.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// Width implied by `left`/`right`.
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    /// Parse one LayerRecord.
    pub fn read(cursor: &mut Cursor, version: Version) -> Result<LayerRecord> {
        let top = cursor.read_i32()?;
        let left = cursor.read_i32()?;
        let bottom = cursor.read_i32()?;
        let right = cursor.read_i32()?;

        let channel_count = cursor.read_u16()?;
        let mut channel_info = Vec::with_capacity(channel_count as usize);
        for _ in 0..channel_count {
            let role_id = cursor.read_i16()?;
            let compressed_size = cursor.read_variant_wide(version)?;
            channel_info.push(ChannelInfo {
                role_id,
                compressed_size,
            });
        }

        let blend_signature = cursor.read_signature()?;
        if &blend_signature != b"8BIM" {
            return Err(crate::error::PsdError::format(
                SECTION,
                cursor.position(),
                "blend mode block signature is not '8BIM'",
            ));
        }
        let blend_mode_key = cursor.read_signature()?;
        let opacity = cursor.read_u8()?;
        let clipping = cursor.read_u8()?;
        let flags = LayerFlags::from_u8(cursor.read_u8()?);
        let _filler = cursor.read_u8()?;

        let extra_len = cursor.read_u32()? as u64;
        let extra_end = cursor.position() + extra_len;

        let mask_len = cursor.read_u32()? as u64;
        let mask_bytes = cursor.read(mask_len)?;
        let mask = LayerMask::read(mask_bytes)?;

        let blending_len = cursor.read_u32()? as u64;
        let blending_ranges = BlendingRanges(cursor.read(blending_len)?.to_vec());

        let name = cursor.read_pascal_string(4)?;

        let remaining = extra_end.saturating_sub(cursor.position());
        let tagged_block_bytes = cursor.read(remaining)?;
        let tagged_blocks = AdditionalLayerInfo::read(tagged_block_bytes, version)?;

        Ok(LayerRecord {
            top,
            left,
            bottom,
            right,
            channel_info,
            blend_mode_key,
            opacity,
            clipping,
            flags,
            mask,
            blending_ranges,
            name,
            tagged_blocks,
        })
    }

    /// Serialize one LayerRecord.
    pub fn write(&self, writer: &mut Writer, version: Version) {
        writer.write_i32(self.top);
        writer.write_i32(self.left);
        writer.write_i32(self.bottom);
        writer.write_i32(self.right);

        writer.write_u16(self.channel_info.len() as u16);
        for info in &self.channel_info {
            writer.write_i16(info.role_id);
            writer.write_variant_wide(version, info.compressed_size);
        }

        writer.write_signature(b"8BIM");
        writer.write_signature(&self.blend_mode_key);
        writer.write_u8(self.opacity);
        writer.write_u8(self.clipping);
        writer.write_u8(self.flags.to_u8());
        writer.write_u8(0); // filler

        let extra_patch = writer.reserve_u32();

        let mask_patch = writer.reserve_u32();
        if let Some(mask) = &self.mask {
            mask.write(writer);
        }
        writer.patch_length_since(mask_patch);

        let blending_patch = writer.reserve_u32();
        writer.write_bytes(&self.blending_ranges.0);
        writer.patch_length_since(blending_patch);

        writer.write_pascal_string(&self.name, 4);

        self.tagged_blocks.write(writer, version);

        writer.patch_length_since(extra_patch);
    }
}

/// The LayerInfo block (§3): signed layer count (sign encodes whether the
/// first alpha channel is the merged-image alpha) plus the parallel
/// layer-record / channel-image-data arrays.
#[derive(Debug, Clone, Default)]
pub struct LayerInfo {
    /// Whether the first alpha channel (if any) is also the merged-image
    /// alpha — encoded as the sign of the on-disk layer count.
    pub merged_alpha: bool,
    /// Layer records, in on-disk (reverse tree) order.
    pub records: Vec<LayerRecord>,
    /// Each record's raw per-channel compressed bytes, same order/length as
    /// `records[i].channel_info`.
    pub channel_data: Vec<Vec<Vec<u8>>>,
}
