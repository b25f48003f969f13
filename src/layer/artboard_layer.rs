//! An artboard layer (SPEC_FULL §B.6, grounded on `ArtboardLayer.h`): a
//! group layer additionally carrying an `artb`/`artd` tagged block. Modeled
//! as its own variant rather than a group-with-a-flag so callers can match
//! on it directly, matching the reference's separate `ArtboardLayer` type.

use crate::layer::header::LayerHeader;
use crate::layer::Layer;

/// An artboard layer: a group layer that additionally carries artboard data.
#[derive(Debug, Clone)]
pub struct ArtboardLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// Children in display order, same shape as [`crate::layer::group_layer::GroupLayer`].
    pub children: Vec<Layer>,
    /// Whether the artboard is expanded in Photoshop's layers panel.
    pub is_open: bool,
    /// Raw `artb` descriptor payload (artboard rect, color, presets).
    pub artboard_data: Vec<u8>,
}
