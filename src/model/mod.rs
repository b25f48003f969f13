//! The four major on-disk sections (§3, §4.4 "PhotoshopFile"), parsed into
//! an owned, lazily-decoded representation. This is the layer below the
//! public [`crate::layer`] tree: [`photoshop_file::PhotoshopFile`] mirrors
//! the flat disk layout exactly, and [`crate::layer::tree`] lifts it into
//! the nested layer tree applications actually want to work with.

pub mod color_mode_data;
pub mod header;
pub mod image_data;
pub mod image_resources;
pub mod layer_and_mask;
pub mod photoshop_file;

pub use header::{ColorMode, Depth, FileHeader};
pub use photoshop_file::PhotoshopFile;
