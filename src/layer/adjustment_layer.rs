//! An adjustment layer (§4.6 step 5: a fixed set of adjustment tagged-block
//! keys). The adjustment parameters themselves (curves points, hue/sat
//! sliders, ...) are out of scope per spec.md's non-goals on editing
//! adjustment/effect parameters, so they're kept as one opaque blob.

use crate::layer::header::LayerHeader;

/// A fill/adjustment layer: shared header plus one opaque adjustment block.
#[derive(Debug, Clone)]
pub struct AdjustmentLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// The tagged-block key that identified this as an adjustment layer
    /// (e.g. `brit`, `curv`, `hue2`, `blwh`).
    pub adjustment_type: [u8; 4],
    /// That block's raw, unparsed payload.
    pub data: Vec<u8>,
}
