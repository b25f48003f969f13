//! The top-level document API (§6 "Library surface"): `LayeredFile<T>` ties
//! the raw section model ([`crate::model`]), the layer tree
//! ([`crate::layer::tree`]), and the linked-layer table
//! ([`crate::linked_layer`]) into the single type an application actually
//! works with, refusing at read time to hand back a tree built under the
//! wrong bit depth (§3 "A bit-depth-T LayeredFile refuses to read a file
//! whose header declares a different bit depth").

use std::marker::PhantomData;
use std::path::Path;

use crate::compression::{Compression, SampleWidth};
use crate::error::{PsdError, Result};
use crate::io::Version;
use crate::layer::tree;
use crate::layer::Layer;
use crate::linked_layer::LinkedLayerTable;
use crate::model::color_mode_data::ColorModeData;
use crate::model::header::{ColorMode, Depth, FileHeader};
use crate::model::image_data::ImageData;
use crate::model::image_resources::resolution::ResolutionInfo;
use crate::model::image_resources::ImageResources;
use crate::model::layer_and_mask::layer_record::LayerInfo;
use crate::model::layer_and_mask::tagged_block::nested_layer_info::NestedLayerInfo;
use crate::model::layer_and_mask::tagged_block::{AdditionalLayerInfo, TaggedBlock};
use crate::model::layer_and_mask::LayerAndMaskInformation;
use crate::model::photoshop_file::PhotoshopFile;
use crate::progress::{ControlFlow, Progress};

/// A document's declared bit depth, checked on read.
pub trait BitDepth {
    /// The on-disk depth marker this type corresponds to.
    const DEPTH: Depth;
    /// The matching codec-level sample width.
    const SAMPLE: SampleWidth;
}

/// 8 bits per channel sample.
#[derive(Debug, Clone, Copy)]
pub struct U8;
/// 16 bits per channel sample.
#[derive(Debug, Clone, Copy)]
pub struct U16;
/// 32-bit IEEE float per channel sample.
#[derive(Debug, Clone, Copy)]
pub struct F32;

impl BitDepth for U8 {
    const DEPTH: Depth = Depth::Eight;
    const SAMPLE: SampleWidth = SampleWidth::Eight;
}

impl BitDepth for U16 {
    const DEPTH: Depth = Depth::Sixteen;
    const SAMPLE: SampleWidth = SampleWidth::Sixteen;
}

impl BitDepth for F32 {
    const DEPTH: Depth = Depth::ThirtyTwo;
    const SAMPLE: SampleWidth = SampleWidth::ThirtyTwoFloat;
}

/// Options bundle for [`LayeredFile::read`] (SPEC_FULL.md §A.3).
#[derive(Default)]
pub struct ReadOptions<'a> {
    /// Progress/cancellation sink invoked at section boundaries.
    pub progress: Progress<'a>,
    /// Drop any tagged block this crate doesn't recognize instead of
    /// round-tripping it verbatim (SPEC_FULL.md §A.3).
    pub skip_unknown_tagged_blocks: bool,
}

/// Options bundle for [`LayeredFile::write`].
#[derive(Default)]
pub struct WriteOptions<'a> {
    /// Progress/cancellation sink invoked at section boundaries.
    pub progress: Progress<'a>,
    /// Refuse to clobber an existing file unless set.
    pub overwrite: bool,
}

/// A parsed, editable Photoshop document (§6).
pub struct LayeredFile<T: BitDepth> {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// The document's color mode.
    pub color_mode: ColorMode,
    /// Number of channels in the flat image data.
    pub channel_count: u16,
    /// Whether this document is a PSD or a large-format PSB.
    pub version: Version,
    /// Opaque ColorModeData passthrough (§3).
    pub color_mode_data: Vec<u8>,
    /// Parsed image resource blocks (§3 "ImageResources").
    pub image_resources: ImageResources,
    /// Opaque GlobalLayerMaskInfo passthrough (§9 Open Question ii).
    pub global_layer_mask_info: Vec<u8>,
    /// Whether the document's first alpha channel doubles as the merged
    /// preview's alpha.
    pub merged_alpha: bool,
    /// The flat document preview (§3 "ImageData (flat)").
    pub image_data: ImageData,
    /// The document-level smart-object source store (§4.7).
    pub linked_layers: LinkedLayerTable,
    /// The top-level layer tree.
    pub layers: Vec<Layer>,
    _depth: PhantomData<T>,
}

impl<T: BitDepth> LayeredFile<T> {
    /// Read and parse a document from `path`, lifting its layer-record
    /// array into a tree.
    pub fn read(path: impl AsRef<Path>, mut options: ReadOptions) -> Result<LayeredFile<T>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| PsdError::io("LayeredFile::read", 0, e))?;

        if options.progress.report("header", 0.0) == ControlFlow::Break {
            return Err(PsdError::Cancelled("header"));
        }
        let file = PhotoshopFile::read(&bytes)?;

        if file.header.depth != T::DEPTH {
            return Err(PsdError::Validation(format!(
                "document declares bit depth {:?}, but this LayeredFile is typed for {:?}",
                file.header.depth,
                T::DEPTH
            )));
        }

        if options.progress.report("layer_tree", 0.5) == ControlFlow::Break {
            return Err(PsdError::Cancelled("layer_tree"));
        }
        let mut layers = tree::build_tree(&file.layer_and_mask, T::SAMPLE, file.header.version)?;

        if options.skip_unknown_tagged_blocks {
            tree::walk_mut(&mut layers, &mut |layer| {
                layer
                    .header_mut()
                    .extra_tagged_blocks
                    .retain(|block| !matches!(block, TaggedBlock::Other { .. }));
            });
        }

        let linked_layers = file
            .layer_and_mask
            .additional_layer_info
            .blocks
            .iter()
            .find_map(|b| match b {
                TaggedBlock::LinkedLayers(table) => Some(LinkedLayerTable::from_block(table)),
                _ => None,
            })
            .unwrap_or_default();

        if options.progress.report("image_data", 0.9) == ControlFlow::Break {
            return Err(PsdError::Cancelled("image_data"));
        }

        let merged_alpha = file.layer_and_mask.effective_layer_info().merged_alpha;
        options.progress.report("done", 1.0);

        Ok(LayeredFile {
            width: file.header.width,
            height: file.header.height,
            color_mode: file.header.color_mode,
            channel_count: file.header.channel_count,
            version: file.header.version,
            color_mode_data: file.color_mode_data.as_bytes().to_vec(),
            image_resources: file.image_resources,
            global_layer_mask_info: file.layer_and_mask.global_layer_mask_info,
            merged_alpha,
            image_data: file.image_data,
            linked_layers,
            layers,
            _depth: PhantomData,
        })
    }

    /// Flatten the tree and serialize the whole document to `path`.
    pub fn write(&self, path: impl AsRef<Path>, mut options: WriteOptions) -> Result<()> {
        let path = path.as_ref();
        if !options.overwrite && path.exists() {
            return Err(PsdError::Validation(format!(
                "{path:?} already exists and overwrite was not requested"
            )));
        }

        if options.progress.report("flatten_tree", 0.0) == ControlFlow::Break {
            return Err(PsdError::Cancelled("flatten_tree"));
        }
        let (records, channel_data) =
            tree::flatten(&self.layers, self.color_mode, T::SAMPLE, self.version)?;
        let layer_info = LayerInfo {
            merged_alpha: self.merged_alpha,
            records,
            channel_data,
        };

        let mut additional_layer_info = AdditionalLayerInfo::default();
        if !self.linked_layers.is_empty() {
            additional_layer_info
                .blocks
                .push(TaggedBlock::LinkedLayers(self.linked_layers.to_block()));
        }

        // §3 "In 16- and 32-bit files...": the main LayerInfo is only ever
        // populated for 8-bit documents; deeper bit depths carry the same
        // records inside an Lr16/Lr32 block instead, or Photoshop reads zero
        // layers.
        let layer_and_mask = match T::DEPTH {
            Depth::Sixteen | Depth::ThirtyTwo => {
                let key = if T::DEPTH == Depth::Sixteen {
                    *b"Lr16"
                } else {
                    *b"Lr32"
                };
                additional_layer_info
                    .blocks
                    .push(TaggedBlock::NestedLayerInfo(NestedLayerInfo::new(
                        key, layer_info,
                    )));
                LayerAndMaskInformation {
                    layer_info: LayerInfo::default(),
                    global_layer_mask_info: self.global_layer_mask_info.clone(),
                    additional_layer_info,
                }
            }
            _ => LayerAndMaskInformation {
                layer_info,
                global_layer_mask_info: self.global_layer_mask_info.clone(),
                additional_layer_info,
            },
        };

        if options.progress.report("sections", 0.5) == ControlFlow::Break {
            return Err(PsdError::Cancelled("sections"));
        }
        let file = PhotoshopFile {
            header: FileHeader {
                version: self.version,
                channel_count: self.channel_count,
                height: self.height,
                width: self.width,
                depth: T::DEPTH,
                color_mode: self.color_mode,
            },
            color_mode_data: ColorModeData::new(self.color_mode_data.clone()),
            image_resources: self.image_resources.clone(),
            layer_and_mask,
            image_data: self.image_data.clone(),
        };

        let bytes = file.write()?;
        if options.progress.report("write_file", 0.9) == ControlFlow::Break {
            return Err(PsdError::Cancelled("write_file"));
        }
        std::fs::write(path, bytes).map_err(|e| PsdError::io("LayeredFile::write", 0, e))?;
        options.progress.report("done", 1.0);
        Ok(())
    }

    /// Find a layer by a `/`-separated path of names.
    pub fn find_layer(&self, path: &str) -> Option<&Layer> {
        tree::find(&self.layers, path)
    }

    /// Find a layer by path, mutably.
    pub fn find_layer_mut(&mut self, path: &str) -> Option<&mut Layer> {
        tree::find_mut(&mut self.layers, path)
    }

    /// Add a top-level layer.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Move a layer from `source_path` to become a child of
    /// `dest_parent_path` (or the root, if empty).
    pub fn move_layer(&mut self, source_path: &str, dest_parent_path: &str) -> Result<()> {
        tree::move_layer(&mut self.layers, source_path, dest_parent_path)
    }

    /// Remove a layer by path, returning it if found.
    pub fn remove_layer(&mut self, path: &str) -> Option<Layer> {
        tree::remove(&mut self.layers, path)
    }

    /// Re-encode every channel in the tree at `compression`, recursing into
    /// every group (SPEC_FULL.md §B.3).
    pub fn set_compression(&mut self, compression: Compression) -> Result<()> {
        let version = self.version;
        let mut first_error = None;
        tree::walk_mut(&mut self.layers, &mut |layer| {
            if first_error.is_some() {
                return;
            }
            let header = layer.header_mut();
            if let Err(e) = header.channels.set_compression(compression, version) {
                first_error = Some(e);
                return;
            }
            if let Some(mask) = &mut header.mask {
                if let Some(channel) = &mut mask.channel {
                    if let Err(e) = channel.set_compression(compression, version) {
                        first_error = Some(e);
                        return;
                    }
                }
                if let Some(channel) = &mut mask.real_channel {
                    if let Err(e) = channel.set_compression(compression, version) {
                        first_error = Some(e);
                    }
                }
            }
        });
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Remove any linked-layer table entry no longer referenced by a
    /// smart-object layer (§4.7 "cleanup"; §8 invariant 9).
    pub fn cleanup_linked_layers(&mut self) {
        self.linked_layers.cleanup(&self.layers);
    }

    /// The document's resolution info (SPEC_FULL.md §B.1), if present.
    pub fn resolution(&self) -> Option<Result<ResolutionInfo>> {
        self.image_resources.resolution()
    }

    /// Replace (or insert) the document's resolution info.
    pub fn set_resolution(&mut self, info: ResolutionInfo) {
        self.image_resources.set_resolution(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_depth_markers_match_their_sample_width() {
        assert_eq!(U8::DEPTH, Depth::Eight);
        assert_eq!(U8::SAMPLE, SampleWidth::Eight);
        assert_eq!(F32::DEPTH, Depth::ThirtyTwo);
        assert_eq!(F32::SAMPLE, SampleWidth::ThirtyTwoFloat);
    }
}
