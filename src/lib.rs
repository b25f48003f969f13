//! Read and write Adobe Photoshop documents (PSD and its large-format
//! sibling PSB) as a hierarchical layer tree.
//!
//! [`LayeredFile`] is the entry point: [`LayeredFile::read`] parses a
//! document's flat, reverse-ordered on-disk layer-record array into a
//! nested [`layer::Layer`] tree; [`LayeredFile::write`] flattens it back
//! down and serializes it byte-for-byte.
//!
//! psd/psb spec: https://www.adobe.com/devnet-apps/photoshop/fileformatashtml/

#![deny(missing_docs)]

pub mod channel;
pub mod compression;
pub mod error;
pub mod io;
pub mod layer;
pub mod layered_file;
pub mod linked_layer;
pub mod model;
pub mod progress;

pub use channel::{Channel, ChannelStore, RoleKind};
pub use error::{PsdError, Result};
pub use io::Version;
pub use layer::{
    header::LayerHeader, AdjustmentLayer, ArtboardLayer, GroupLayer, ImageLayer, Layer,
    SectionDividerLayer, ShapeLayer, SmartObjectLayer, TextLayer,
};
pub use layered_file::{BitDepth, LayeredFile, ReadOptions, WriteOptions, F32, U16, U8};
pub use linked_layer::{LinkedLayerRecord, LinkedLayerSource, LinkedLayerTable};
pub use model::{ColorMode, Depth, FileHeader};
pub use progress::{ControlFlow, Progress};
