//! A vector shape layer (§4.6 step 6: a fixed set of vector tagged-block
//! keys). Vector path editing is out of scope (spec.md non-goals), so the
//! path/stroke/fill descriptor is kept opaque.

use crate::layer::header::LayerHeader;

/// A vector shape layer: shared header plus the opaque vector descriptor.
#[derive(Debug, Clone)]
pub struct ShapeLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// Raw `vmsk`/`vsms`/`vstk`/`vscg` payload, concatenated in file order.
    pub vector_data: Vec<u8>,
}
