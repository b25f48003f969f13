//! AdditionalLayerInfo: a sequence of 4-byte-keyed tagged blocks (§3, GLOSSARY
//! "Tagged block"), both at the document level (trailing the LayerInfo) and
//! per-layer (trailing each LayerRecord's extra data).
//!
//! This is the tagged-block registry pattern named in the design: known keys
//! get a typed [`TaggedBlock`] variant, everything else round-trips as
//! [`TaggedBlock::Other`]. Every variant still remembers its own key so
//! `write` doesn't need a second lookup table.

pub mod linked_layer_block;
pub mod nested_layer_info;
pub mod placed_layer;

use crate::error::Result;
use crate::io::{tagged_block_uses_wide_length, Cursor, Version, Writer};
use linked_layer_block::LinkedLayerTableBlock;
use nested_layer_info::NestedLayerInfo;
use placed_layer::PlacedLayer;

const SECTION: &str = "AdditionalLayerInfo";

/// Section-divider kind, §4.4 "Group layer" / "SectionDivider".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionDividerKind {
    /// A plain layer, not a group boundary.
    Other,
    /// An open (expanded) group's start sentinel.
    OpenFolder,
    /// A closed (collapsed) group's start sentinel.
    ClosedFolder,
    /// A group's end-of-children sentinel (the "bounding" record).
    BoundingSectionDivider,
}

impl SectionDividerKind {
    fn from_u32(v: u32) -> SectionDividerKind {
        match v {
            1 => SectionDividerKind::OpenFolder,
            2 => SectionDividerKind::ClosedFolder,
            3 => SectionDividerKind::BoundingSectionDivider,
            _ => SectionDividerKind::Other,
        }
    }

    fn to_u32(self) -> u32 {
        match self {
            SectionDividerKind::Other => 0,
            SectionDividerKind::OpenFolder => 1,
            SectionDividerKind::ClosedFolder => 2,
            SectionDividerKind::BoundingSectionDivider => 3,
        }
    }
}

/// The `lsct` block: group boundary kind plus an optional blend-mode
/// override signature.
#[derive(Debug, Clone)]
pub struct SectionDivider {
    /// Which kind of boundary this is.
    pub kind: SectionDividerKind,
    /// Optional `8BIM` + blend-mode-key override, present in newer files.
    pub blend_mode_key: Option<[u8; 4]>,
}

/// One AdditionalLayerInfo block, known keys decoded, everything else kept
/// as opaque bytes.
#[derive(Debug, Clone)]
pub enum TaggedBlock {
    /// `lsct`: group boundary sentinel.
    SectionDivider(SectionDivider),
    /// `luni`: the layer's full Unicode name (Pascal name is truncated to
    /// 255 bytes, this carries the untruncated version).
    UnicodeName(String),
    /// `fxrp`: the layer's reference point, used by some adjustment/shape
    /// tools.
    ReferencePoint {
        /// Horizontal reference point coordinate.
        x: f64,
        /// Vertical reference point coordinate.
        y: f64,
    },
    /// `lspf`: protected-settings bit flags (transparency/composite/position
    /// locks), stored as the raw packed bits.
    ProtectedSettings(u32),
    /// `Lr16`/`Lr32`: the real LayerInfo for 16/32-bit-per-channel
    /// documents, which otherwise leave the top-level LayerInfo empty.
    NestedLayerInfo(NestedLayerInfo),
    /// `SoLd`/legacy `PlacedLayer`: a smart object's placement (linked-layer
    /// hash reference, transform, warp).
    PlacedLayer(PlacedLayer),
    /// `lnk2`/`lnk3`/`lnkE`: the document-level linked-layer table.
    LinkedLayers(LinkedLayerTableBlock),
    /// Any other key, round-tripped verbatim.
    Other {
        /// The block's 4-byte key.
        key: [u8; 4],
        /// The block's raw, unparsed payload.
        data: Vec<u8>,
    },
}

impl TaggedBlock {
    /// The 4-byte key this block will be written under.
    pub fn key(&self) -> [u8; 4] {
        match self {
            TaggedBlock::SectionDivider(_) => *b"lsct",
            TaggedBlock::UnicodeName(_) => *b"luni",
            TaggedBlock::ReferencePoint { .. } => *b"fxrp",
            TaggedBlock::ProtectedSettings(_) => *b"lspf",
            TaggedBlock::NestedLayerInfo(info) => info.key(),
            TaggedBlock::PlacedLayer(placed) => placed.key(),
            TaggedBlock::LinkedLayers(table) => table.key(),
            TaggedBlock::Other { key, .. } => *key,
        }
    }

    fn decode(key: [u8; 4], data: &[u8], version: Version) -> Result<TaggedBlock> {
        match &key {
            b"lsct" => {
                let mut cursor = Cursor::new(data, SECTION);
                let kind = SectionDividerKind::from_u32(cursor.read_u32()?);
                let blend_mode_key = if cursor.remaining() >= 8 {
                    let sig = cursor.read_signature()?;
                    if &sig == b"8BIM" {
                        Some(cursor.read_signature()?)
                    } else {
                        None
                    }
                } else {
                    None
                };
                Ok(TaggedBlock::SectionDivider(SectionDivider {
                    kind,
                    blend_mode_key,
                }))
            }
            b"luni" => {
                let mut cursor = Cursor::new(data, SECTION);
                Ok(TaggedBlock::UnicodeName(cursor.read_unicode_string()?))
            }
            b"fxrp" => {
                let mut cursor = Cursor::new(data, SECTION);
                let x = cursor.read_f64()?;
                let y = cursor.read_f64()?;
                Ok(TaggedBlock::ReferencePoint { x, y })
            }
            b"lspf" => {
                let mut cursor = Cursor::new(data, SECTION);
                Ok(TaggedBlock::ProtectedSettings(cursor.read_u32()?))
            }
            b"Lr16" | b"Lr32" => Ok(TaggedBlock::NestedLayerInfo(NestedLayerInfo::read(
                key, data, version,
            )?)),
            b"SoLd" | b"PlLd" => Ok(TaggedBlock::PlacedLayer(PlacedLayer::read(key, data)?)),
            b"lnk2" | b"lnk3" | b"lnkE" => Ok(TaggedBlock::LinkedLayers(
                LinkedLayerTableBlock::read(key, data, version)?,
            )),
            _ => Ok(TaggedBlock::Other {
                key,
                data: data.to_vec(),
            }),
        }
    }

    fn encode(&self, writer: &mut Writer, version: Version) {
        match self {
            TaggedBlock::SectionDivider(div) => {
                writer.write_u32(div.kind.to_u32());
                if let Some(blend_mode_key) = div.blend_mode_key {
                    writer.write_signature(b"8BIM");
                    writer.write_signature(&blend_mode_key);
                }
            }
            TaggedBlock::UnicodeName(name) => writer.write_unicode_string(name),
            TaggedBlock::ReferencePoint { x, y } => {
                writer.write_f64(*x);
                writer.write_f64(*y);
            }
            TaggedBlock::ProtectedSettings(bits) => writer.write_u32(*bits),
            TaggedBlock::NestedLayerInfo(info) => info.write(writer, version),
            TaggedBlock::PlacedLayer(placed) => placed.write(writer),
            TaggedBlock::LinkedLayers(table) => table.write(writer, version),
            TaggedBlock::Other { data, .. } => writer.write_bytes(data),
        }
    }
}

/// An ordered sequence of tagged blocks (document- or layer-level), kept in
/// file order so unknown blocks round-trip byte-for-byte.
#[derive(Debug, Clone, Default)]
pub struct AdditionalLayerInfo {
    /// All blocks, in file order.
    pub blocks: Vec<TaggedBlock>,
}

impl AdditionalLayerInfo {
    /// Parse a run of tagged blocks filling the rest of a cursor's buffer.
    pub fn read(bytes: &[u8], version: Version) -> Result<AdditionalLayerInfo> {
        let mut cursor = Cursor::new(bytes, SECTION);
        let mut blocks = Vec::new();

        while cursor.remaining() >= 8 {
            let signature = cursor.read_signature()?;
            if &signature != b"8BIM" && &signature != b"8B64" {
                break;
            }
            let key = cursor.read_signature()?;
            let wide = tagged_block_uses_wide_length(&key) && version == Version::Psb;
            let len = if wide {
                cursor.read_u64()?
            } else {
                cursor.read_u32()? as u64
            };
            let data = cursor.read(len)?;
            blocks.push(TaggedBlock::decode(key, data, version)?);
            if len % 2 == 1 {
                cursor.read(1)?;
            }
        }

        Ok(AdditionalLayerInfo { blocks })
    }

    /// Serialize the block sequence (no enclosing length prefix; the parent
    /// section owns that).
    pub fn write(&self, writer: &mut Writer, version: Version) {
        for block in &self.blocks {
            let key = block.key();
            writer.write_signature(b"8BIM");
            writer.write_signature(&key);

            let wide = tagged_block_uses_wide_length(&key) && version == Version::Psb;
            let patch = if wide {
                writer.reserve_variant_wide(Version::Psb)
            } else {
                writer.reserve_u32()
            };
            block.encode(writer, version);
            writer.patch_length_since(patch);
            if (writer.position() as usize) % 2 == 1 {
                writer.write_zeros(1);
            }
        }
    }

    /// Find the first block with the given key, if any.
    pub fn find(&self, key: &[u8; 4]) -> Option<&TaggedBlock> {
        self.blocks.iter().find(|b| &b.key() == key)
    }
}
