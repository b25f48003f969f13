//! Lifting the flat, reverse-ordered on-disk layer-record array into the
//! nested [`Layer`] tree, and flattening back down (§4.6 "Tree construction
//! (read)" / "Tree deconstruction (write)").
//!
//! The on-disk array stores a group as `[group_record, child_1, ...,
//! child_n, bounding_sentinel]` written depth-first and then reversed once,
//! as a whole, at the very end. So reading the array from its last index
//! down to its first recovers exactly that depth-first order: the group's
//! own record comes first (carrying the open/closed `lsct` block), then its
//! children, then the bounding sentinel closes it. [`build_tree`] walks the
//! array in that direction; [`flatten`] emits depth-first and reverses once.

use crate::channel::{Channel, ChannelStore, RoleKind};
use crate::compression::{Compression, SampleWidth};
use crate::error::{PsdError, Result};
use crate::io::Version;
use crate::layer::header::LayerHeader;
use crate::layer::smart_object::warp::{Corners, Warp};
use crate::layer::smart_object::SmartObject;
use crate::layer::{
    AdjustmentLayer, ArtboardLayer, GroupLayer, ImageLayer, Layer, SectionDividerLayer,
    ShapeLayer, SmartObjectLayer, TextLayer,
};
use crate::model::header::ColorMode;
use crate::model::layer_and_mask::layer_record::{BlendingRanges, LayerRecord};
use crate::model::layer_and_mask::mask::LayerMask;
use crate::model::layer_and_mask::tagged_block::{
    placed_layer::PlacedLayer, AdditionalLayerInfo, SectionDivider, SectionDividerKind,
    TaggedBlock,
};
use crate::model::layer_and_mask::LayerAndMaskInformation;

const SECTION: &str = "LayerTree";

const TEXT_KEY: [u8; 4] = *b"TySh";
const PLACED_KEYS: [[u8; 4]; 2] = [*b"SoLd", *b"PlLd"];
const ARTBOARD_KEY: [u8; 4] = *b"artb";
const ADJUSTMENT_KEYS: [[u8; 4]; 16] = [
    *b"brit", *b"levl", *b"curv", *b"expA", *b"blnc", *b"hue ", *b"hue2", *b"blwh", *b"phfl",
    *b"mixr", *b"clrL", *b"nvrt", *b"post", *b"thrs", *b"grdm", *b"selc",
];
const VECTOR_KEYS: [[u8; 4]; 5] = [*b"vmsk", *b"vsms", *b"vstk", *b"vscg", *b"vogk"];

fn find_any<'a>(blocks: &'a AdditionalLayerInfo, keys: &[[u8; 4]]) -> Option<(&'a TaggedBlock, [u8; 4])> {
    keys.iter()
        .find_map(|key| blocks.find(key).map(|b| (b, *key)))
}

fn raw_payload(block: &TaggedBlock) -> Vec<u8> {
    match block {
        TaggedBlock::Other { data, .. } => data.clone(),
        other => {
            tracing::warn!(key = ?other.key(), "expected an opaque tagged block for classification, found a typed one");
            Vec::new()
        }
    }
}

/// Required color-plane role IDs for a document's color mode, excluding
/// alpha (SPEC_FULL.md §B, "Color-mode required channels").
fn required_channel_ids(color_mode: ColorMode) -> Vec<i16> {
    match color_mode {
        ColorMode::Rgb | ColorMode::Lab => vec![0, 1, 2],
        ColorMode::Cmyk => vec![0, 1, 2, 3],
        ColorMode::Grayscale | ColorMode::Bitmap | ColorMode::Duotone | ColorMode::Indexed => {
            vec![0]
        }
        ColorMode::Multichannel => Vec::new(),
    }
}

/// Lift the effective flat LayerInfo of `info` into the nested tree.
/// `sample` is the document's sample width (from the file header's bit
/// depth), needed to build each [`Channel`].
pub fn build_tree(
    info: &LayerAndMaskInformation,
    sample: SampleWidth,
    version: Version,
) -> Result<Vec<Layer>> {
    let layer_info = info.effective_layer_info();
    let mut cursor = ReadCursor {
        records: &layer_info.records,
        channel_data: &layer_info.channel_data,
        next: layer_info.records.len(),
        sample,
        version,
    };
    build_children(&mut cursor, false)
}

struct ReadCursor<'a> {
    records: &'a [LayerRecord],
    channel_data: &'a [Vec<Vec<u8>>],
    next: usize,
    sample: SampleWidth,
    version: Version,
}

impl<'a> ReadCursor<'a> {
    fn pop(&mut self) -> Option<(&'a LayerRecord, &'a [Vec<u8>])> {
        if self.next == 0 {
            return None;
        }
        self.next -= 1;
        Some((&self.records[self.next], &self.channel_data[self.next]))
    }
}

fn build_children(cursor: &mut ReadCursor, in_group: bool) -> Result<Vec<Layer>> {
    let mut children = Vec::new();

    while let Some((record, payloads)) = cursor.pop() {
        let divider = match record.tagged_blocks.find(b"lsct") {
            Some(TaggedBlock::SectionDivider(d)) => Some(d),
            _ => None,
        };

        if let Some(div) = divider {
            match div.kind {
                SectionDividerKind::OpenFolder | SectionDividerKind::ClosedFolder => {
                    let is_open = div.kind == SectionDividerKind::OpenFolder;
                    let blend_mode = div.blend_mode_key.unwrap_or(record.blend_mode_key);
                    let artboard_data = record
                        .tagged_blocks
                        .find(&ARTBOARD_KEY)
                        .map(raw_payload);
                    let header = build_header(
                        cursor.sample,
                        cursor.version,
                        record,
                        payloads,
                        blend_mode,
                        &[*b"lsct", ARTBOARD_KEY],
                    )?;
                    let sub_children = build_children(cursor, true)?;
                    if let Some(artboard_data) = artboard_data {
                        children.push(Layer::Artboard(ArtboardLayer {
                            header,
                            children: sub_children,
                            is_open,
                            artboard_data,
                        }));
                    } else {
                        children.push(Layer::Group(GroupLayer {
                            header,
                            children: sub_children,
                            is_open,
                        }));
                    }
                    continue;
                }
                SectionDividerKind::BoundingSectionDivider => {
                    if in_group {
                        return Ok(children);
                    }
                    tracing::warn!(
                        "orphan bounding section-divider record with no enclosing group"
                    );
                    let header = build_header(
                        cursor.sample,
                        cursor.version,
                        record,
                        payloads,
                        record.blend_mode_key,
                        &[*b"lsct"],
                    )?;
                    children.push(Layer::SectionDivider(SectionDividerLayer {
                        header,
                        kind: div.kind,
                    }));
                    continue;
                }
                SectionDividerKind::Other => {}
            }
        }

        if let Some(block) = record.tagged_blocks.find(&TEXT_KEY) {
            let text_data = raw_payload(block);
            let header = build_header(
                cursor.sample,
                cursor.version,
                record,
                payloads,
                record.blend_mode_key,
                &[TEXT_KEY],
            )?;
            children.push(Layer::Text(TextLayer { header, text_data }));
        } else if let Some((block, key)) = find_any(&record.tagged_blocks, &PLACED_KEYS) {
            let placed = match block {
                TaggedBlock::PlacedLayer(p) => p.clone(),
                _ => {
                    return Err(PsdError::format(
                        SECTION,
                        0,
                        "expected a decoded PlacedLayer tagged block",
                    ))
                }
            };
            let header = build_header(
                cursor.sample,
                cursor.version,
                record,
                payloads,
                record.blend_mode_key,
                &[key],
            )?;
            children.push(Layer::SmartObject(build_smart_object(
                record, placed, header,
            )?));
        } else if let Some((block, key)) = find_any(&record.tagged_blocks, &ADJUSTMENT_KEYS) {
            let data = raw_payload(block);
            let header = build_header(
                cursor.sample,
                cursor.version,
                record,
                payloads,
                record.blend_mode_key,
                &[key],
            )?;
            children.push(Layer::Adjustment(AdjustmentLayer {
                header,
                adjustment_type: key,
                data,
            }));
        } else if find_any(&record.tagged_blocks, &VECTOR_KEYS).is_some() {
            let vector_data: Vec<u8> = VECTOR_KEYS
                .iter()
                .filter_map(|k| record.tagged_blocks.find(k))
                .flat_map(raw_payload)
                .collect();
            let header = build_header(
                cursor.sample,
                cursor.version,
                record,
                payloads,
                record.blend_mode_key,
                &VECTOR_KEYS,
            )?;
            children.push(Layer::Shape(ShapeLayer {
                header,
                vector_data,
            }));
        } else {
            let header = build_header(
                cursor.sample,
                cursor.version,
                record,
                payloads,
                record.blend_mode_key,
                &[],
            )?;
            children.push(Layer::Image(ImageLayer { header }));
        }
    }

    if in_group {
        tracing::warn!("group ran out of sibling records before its bounding section-divider");
    }
    Ok(children)
}

fn channel_dims(record: &LayerRecord, role_id: i16) -> (u32, u32) {
    if let Some(mask) = &record.mask {
        match RoleKind::from_role_id(role_id) {
            RoleKind::UserMask => return (mask.user_mask.width(), mask.user_mask.height()),
            RoleKind::RealUserMask => {
                if let Some(real) = &mask.real_mask {
                    return (real.width(), real.height());
                }
            }
            _ => {}
        }
    }
    (record.width(), record.height())
}

fn build_header(
    sample: SampleWidth,
    version: Version,
    record: &LayerRecord,
    payloads: &[Vec<u8>],
    blend_mode: [u8; 4],
    consumed_keys: &[[u8; 4]],
) -> Result<LayerHeader> {
    let mut channels = ChannelStore::new();
    for (info, payload) in record.channel_info.iter().zip(payloads) {
        if payload.len() < 2 {
            return Err(PsdError::format(
                SECTION,
                0,
                "channel payload shorter than its 2-byte compression marker",
            ));
        }
        let marker = u16::from_be_bytes([payload[0], payload[1]]);
        let compression = Compression::from_marker(marker)
            .map_err(|e| PsdError::codec(SECTION, 0, e))?;
        let (width, height) = channel_dims(record, info.role_id);
        channels.set(Channel::from_compressed(
            info.role_id,
            width,
            height,
            sample,
            compression,
            payload[2..].to_vec(),
        ));
    }

    let user_channel = channels.remove(-2);
    let real_channel = channels.remove(-3);
    let mask = match (&record.mask, &user_channel, &real_channel) {
        (Some(mask), _, _) => Some(LayerMask {
            user_mask: mask.user_mask,
            real_mask: mask.real_mask,
            params: mask.params,
            channel: user_channel,
            real_channel,
        }),
        (None, None, None) => None,
        (None, _, _) => {
            tracing::warn!("mask channel present with no LayerMaskData geometry; synthesizing defaults");
            Some(LayerMask {
                user_mask: crate::model::layer_and_mask::mask::MaskGeometry {
                    top: record.top,
                    left: record.left,
                    bottom: record.bottom,
                    right: record.right,
                    default_color: 0,
                    flags: Default::default(),
                },
                real_mask: None,
                params: None,
                channel: user_channel,
                real_channel,
            })
        }
    };

    let name = match record.tagged_blocks.find(b"luni") {
        Some(TaggedBlock::UnicodeName(name)) => name.clone(),
        _ => record.name.clone(),
    };
    let reference_point = match record.tagged_blocks.find(b"fxrp") {
        Some(TaggedBlock::ReferencePoint { x, y }) => Some((*x, *y)),
        _ => None,
    };
    let protected_settings = match record.tagged_blocks.find(b"lspf") {
        Some(TaggedBlock::ProtectedSettings(bits)) => Some(*bits),
        _ => None,
    };

    let extra_tagged_blocks = record
        .tagged_blocks
        .blocks
        .iter()
        .filter(|b| {
            let key = b.key();
            key != *b"luni"
                && key != *b"fxrp"
                && key != *b"lspf"
                && !consumed_keys.contains(&key)
        })
        .cloned()
        .collect();

    let _ = version;
    Ok(LayerHeader {
        name,
        blend_mode,
        opacity: record.opacity,
        clipping: record.clipping,
        flags: record.flags,
        top: record.top,
        left: record.left,
        bottom: record.bottom,
        right: record.right,
        channels,
        mask,
        reference_point,
        protected_settings,
        extra_tagged_blocks,
    })
}

fn build_smart_object(
    record: &LayerRecord,
    placed: PlacedLayer,
    header: LayerHeader,
) -> Result<SmartObjectLayer> {
    let hash = placed.linked_layer_identifier().ok_or_else(|| {
        PsdError::Validation(format!(
            "{} block ({}) has no resolvable linked-layer identifier; legacy PlacedLayer \
             descriptors without a PlacedLayerData counterpart are only partially supported",
            String::from_utf8_lossy(&placed.key()),
            record.name,
        ))
    })?;
    let corners = Corners::rect(
        record.left as f64,
        record.top as f64,
        record.right as f64,
        record.bottom as f64,
    );
    let warp = Warp::identity_normal(corners);
    Ok(SmartObjectLayer {
        header,
        placement: SmartObject::from_disk(hash, corners, warp),
        raw_placed_layer: Some(placed),
    })
}

/// Flatten the nested tree back into on-disk (reverse depth-first) order
/// (§4.6 "Tree deconstruction (write)").
pub fn flatten(
    layers: &[Layer],
    color_mode: ColorMode,
    sample: SampleWidth,
    version: Version,
) -> Result<(Vec<LayerRecord>, Vec<Vec<Vec<u8>>>)> {
    let mut out = Vec::new();
    flatten_children(layers, color_mode, sample, version, &mut out)?;
    out.reverse();
    let (records, channel_data) = out.into_iter().unzip();
    Ok((records, channel_data))
}

fn flatten_children(
    layers: &[Layer],
    color_mode: ColorMode,
    sample: SampleWidth,
    version: Version,
    out: &mut Vec<(LayerRecord, Vec<Vec<u8>>)>,
) -> Result<()> {
    for layer in layers {
        match layer {
            Layer::Group(group) => {
                let kind = if group.is_open {
                    SectionDividerKind::OpenFolder
                } else {
                    SectionDividerKind::ClosedFolder
                };
                let (record_blend, divider_blend) = resolve_group_blend(group.header.blend_mode);
                let divider = SectionDivider {
                    kind,
                    blend_mode_key: divider_blend,
                };
                out.push(build_record(
                    &group.header,
                    record_blend,
                    Some(divider),
                    &[],
                    sample,
                    version,
                )?);
                flatten_children(&group.children, color_mode, sample, version, out)?;
                out.push(bounding_sentinel(color_mode, sample, version)?);
            }
            Layer::Artboard(artboard) => {
                let kind = if artboard.is_open {
                    SectionDividerKind::OpenFolder
                } else {
                    SectionDividerKind::ClosedFolder
                };
                let (record_blend, divider_blend) = resolve_group_blend(artboard.header.blend_mode);
                let divider = SectionDivider {
                    kind,
                    blend_mode_key: divider_blend,
                };
                out.push(build_record(
                    &artboard.header,
                    record_blend,
                    Some(divider),
                    &[(ARTBOARD_KEY, artboard.artboard_data.clone())],
                    sample,
                    version,
                )?);
                flatten_children(&artboard.children, color_mode, sample, version, out)?;
                out.push(bounding_sentinel(color_mode, sample, version)?);
            }
            Layer::Image(image) => out.push(build_record(
                &image.header,
                image.header.blend_mode,
                None,
                &[],
                sample,
                version,
            )?),
            Layer::Adjustment(adjustment) => out.push(build_record(
                &adjustment.header,
                adjustment.header.blend_mode,
                None,
                &[(adjustment.adjustment_type, adjustment.data.clone())],
                sample,
                version,
            )?),
            Layer::Shape(shape) => out.push(build_record(
                &shape.header,
                shape.header.blend_mode,
                None,
                &[(VECTOR_KEYS[0], shape.vector_data.clone())],
                sample,
                version,
            )?),
            Layer::Text(text) => out.push(build_record(
                &text.header,
                text.header.blend_mode,
                None,
                &[(TEXT_KEY, text.text_data.clone())],
                sample,
                version,
            )?),
            Layer::SmartObject(smart_object) => {
                let blend_mode = smart_object.header.blend_mode;
                let placed_block = match &smart_object.raw_placed_layer {
                    Some(placed) => placed.clone(),
                    None => {
                        return Err(PsdError::Validation(format!(
                            "smart object layer {:?} has no placed-layer descriptor to serialize \
                             (this crate does not synthesize one from scratch)",
                            smart_object.header.name
                        )))
                    }
                };
                out.push(build_record(
                    &smart_object.header,
                    blend_mode,
                    None,
                    &[],
                    sample,
                    version,
                )
                .map(|(mut record, channel_data)| {
                    record
                        .tagged_blocks
                        .blocks
                        .push(TaggedBlock::PlacedLayer(placed_block));
                    (record, channel_data)
                })?);
            }
            Layer::SectionDivider(divider_layer) => out.push(build_record(
                &divider_layer.header,
                divider_layer.header.blend_mode,
                Some(SectionDivider {
                    kind: divider_layer.kind,
                    blend_mode_key: None,
                }),
                &[],
                sample,
                version,
            )?),
        }
    }
    Ok(())
}

/// The group "passthrough" blend mode is stored on the section-divider
/// block, with the record itself carrying "normal" for old readers (§3
/// invariants); any other group blend mode is stored directly on the
/// record with no divider override.
fn resolve_group_blend(blend_mode: [u8; 4]) -> ([u8; 4], Option<[u8; 4]>) {
    if blend_mode == *b"pass" {
        (*b"norm", Some(*b"pass"))
    } else {
        (blend_mode, None)
    }
}

fn build_record(
    header: &LayerHeader,
    blend_mode: [u8; 4],
    divider: Option<SectionDivider>,
    extra_blocks: &[([u8; 4], Vec<u8>)],
    sample: SampleWidth,
    version: Version,
) -> Result<(LayerRecord, Vec<Vec<u8>>)> {
    let mut channel_info = Vec::new();
    let mut channel_data = Vec::new();

    for channel in header.channels.iter() {
        channel_info.push(crate::model::layer_and_mask::layer_record::ChannelInfo {
            role_id: channel.role_id(),
            compressed_size: channel.compressed_size(),
        });
        channel_data.push(channel_bytes(channel));
    }
    if let Some(mask) = &header.mask {
        if let Some(channel) = &mask.real_channel {
            channel_info.push(crate::model::layer_and_mask::layer_record::ChannelInfo {
                role_id: channel.role_id(),
                compressed_size: channel.compressed_size(),
            });
            channel_data.push(channel_bytes(channel));
        }
        if let Some(channel) = &mask.channel {
            channel_info.push(crate::model::layer_and_mask::layer_record::ChannelInfo {
                role_id: channel.role_id(),
                compressed_size: channel.compressed_size(),
            });
            channel_data.push(channel_bytes(channel));
        }
    }

    let mut tagged_blocks = header.extra_tagged_blocks.clone();
    if let Some(divider) = divider {
        tagged_blocks.push(TaggedBlock::SectionDivider(divider));
    }
    if header.name.len() > 255 || !header.name.is_ascii() {
        tagged_blocks.push(TaggedBlock::UnicodeName(header.name.clone()));
    }
    if let Some((x, y)) = header.reference_point {
        tagged_blocks.push(TaggedBlock::ReferencePoint { x, y });
    }
    if let Some(bits) = header.protected_settings {
        tagged_blocks.push(TaggedBlock::ProtectedSettings(bits));
    }
    for (key, data) in extra_blocks {
        tagged_blocks.push(TaggedBlock::Other { key: *key, data: data.clone() });
    }

    let mask_bytes = mask_geometry_bytes(header);

    let record = LayerRecord {
        top: header.top,
        left: header.left,
        bottom: header.bottom,
        right: header.right,
        channel_info,
        blend_mode_key: blend_mode,
        opacity: header.opacity,
        clipping: header.clipping,
        flags: header.flags,
        mask: mask_bytes,
        blending_ranges: BlendingRanges::default(),
        name: truncate_pascal_name(&header.name),
        tagged_blocks: AdditionalLayerInfo { blocks: tagged_blocks },
    };

    let _ = sample;
    let _ = version;
    Ok((record, channel_data))
}

fn mask_geometry_bytes(header: &LayerHeader) -> Option<LayerMask> {
    header.mask.as_ref().map(|mask| LayerMask {
        user_mask: mask.user_mask,
        real_mask: mask.real_mask,
        params: mask.params,
        channel: None,
        real_channel: None,
    })
}

fn truncate_pascal_name(name: &str) -> String {
    if name.len() <= 255 {
        return name.to_string();
    }
    let mut truncated = name.to_string();
    truncated.truncate(255);
    while !truncated.is_char_boundary(truncated.len()) {
        truncated.pop();
    }
    truncated
}

fn channel_bytes(channel: &Channel) -> Vec<u8> {
    let mut bytes = channel.compression().marker().to_be_bytes().to_vec();
    bytes.extend_from_slice(channel.compressed_payload());
    bytes
}

fn bounding_sentinel(
    color_mode: ColorMode,
    sample: SampleWidth,
    version: Version,
) -> Result<(LayerRecord, Vec<Vec<u8>>)> {
    let mut channels = ChannelStore::new();
    for role_id in required_channel_ids(color_mode) {
        channels.set(Channel::from_samples(
            role_id,
            &[],
            0,
            0,
            0.0,
            0.0,
            sample,
            Compression::Raw,
            version,
        )?);
    }

    let mut channel_info = Vec::new();
    let mut channel_data = Vec::new();
    for channel in channels.iter() {
        channel_info.push(crate::model::layer_and_mask::layer_record::ChannelInfo {
            role_id: channel.role_id(),
            compressed_size: channel.compressed_size(),
        });
        channel_data.push(channel_bytes(channel));
    }

    let record = LayerRecord {
        top: 0,
        left: 0,
        bottom: 0,
        right: 0,
        channel_info,
        blend_mode_key: *b"norm",
        opacity: 255,
        clipping: 0,
        flags: Default::default(),
        mask: None,
        blending_ranges: BlendingRanges::default(),
        name: String::new(),
        tagged_blocks: AdditionalLayerInfo {
            blocks: vec![TaggedBlock::SectionDivider(SectionDivider {
                kind: SectionDividerKind::BoundingSectionDivider,
                blend_mode_key: None,
            })],
        },
    };

    Ok((record, channel_data))
}

/// Find a layer by a `/`-separated path of names, depth-first.
pub fn find<'a>(layers: &'a [Layer], path: &str) -> Option<&'a Layer> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let first = segments.next()?;
    let mut current = layers.iter().find(|l| l.name() == first)?;
    for segment in segments {
        current = current.children().iter().find(|l| l.name() == segment)?;
    }
    Some(current)
}

/// Find a layer by path, mutably.
pub fn find_mut<'a>(layers: &'a mut [Layer], path: &str) -> Option<&'a mut Layer> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let first = segments.next()?;
    let mut current = layers.iter_mut().find(|l| l.name() == first)?;
    for segment in segments {
        current = current
            .children_mut()?
            .iter_mut()
            .find(|l| l.name() == segment)?;
    }
    Some(current)
}

/// Remove a layer by path, returning it. Recurses into groups/artboards.
pub fn remove(layers: &mut Vec<Layer>, path: &str) -> Option<Layer> {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let last = segments.pop()?;
    let parent_children = if segments.is_empty() {
        layers
    } else {
        let parent_path = segments.join("/");
        find_mut(layers, &parent_path)?.children_mut()?
    };
    let index = parent_children.iter().position(|l| l.name() == last)?;
    Some(parent_children.remove(index))
}

/// Move a layer from `source_path` to become a child of `dest_parent_path`
/// (or the root, if `dest_parent_path` is empty). Fails if the destination
/// is the source itself or one of its descendants (§4.6 "Find / move /
/// remove").
pub fn move_layer(layers: &mut Vec<Layer>, source_path: &str, dest_parent_path: &str) -> Result<()> {
    if !dest_parent_path.is_empty() && path_is_within(dest_parent_path, source_path) {
        return Err(PsdError::Validation(format!(
            "cannot move {source_path:?} into its own descendant {dest_parent_path:?}"
        )));
    }
    let layer = remove(layers, source_path)
        .ok_or_else(|| PsdError::NotFound(format!("layer path {source_path:?}")))?;

    let dest_children = if dest_parent_path.is_empty() {
        layers
    } else {
        find_mut(layers, dest_parent_path)
            .ok_or_else(|| PsdError::NotFound(format!("layer path {dest_parent_path:?}")))?
            .children_mut()
            .ok_or_else(|| {
                PsdError::Validation(format!("{dest_parent_path:?} is not a group or artboard"))
            })?
    };
    dest_children.push(layer);
    Ok(())
}

fn path_is_within(candidate: &str, ancestor: &str) -> bool {
    candidate == ancestor || candidate.starts_with(&format!("{ancestor}/"))
}

/// Walk every layer in the tree, recursing into groups/artboards, calling
/// `f` on each (§B.3 "`set_compression` recursion depth").
pub fn walk_mut<F: FnMut(&mut Layer)>(layers: &mut [Layer], f: &mut F) {
    for layer in layers {
        f(layer);
        if let Some(children) = layer.children_mut() {
            walk_mut(children, f);
        }
    }
}
