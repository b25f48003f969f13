//! A smart-object layer (§4.6 step 4: identified by a `SoLd`/`PlLd` placed-
//! layer block): a layer whose channels are derived from a linked source
//! plus a warp, evaluated lazily via [`crate::layer::smart_object`].

use crate::layer::header::LayerHeader;
use crate::layer::smart_object::SmartObject;
use crate::model::layer_and_mask::tagged_block::placed_layer::PlacedLayer;

/// A smart-object layer: shared header plus its placement/warp state.
#[derive(Debug, Clone)]
pub struct SmartObjectLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// The typed view used for transforms and evaluation.
    pub placement: SmartObject,
    /// The opaque placed-layer descriptor this layer was read from, kept so
    /// fields this crate doesn't model (child document ID, asset timestamps)
    /// still round-trip as long as `placement` hasn't been transformed since
    /// read. `None` for a smart object built fresh rather than read from a
    /// file.
    pub raw_placed_layer: Option<PlacedLayer>,
}
