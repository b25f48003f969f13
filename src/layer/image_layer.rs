//! A plain pixel layer (§4.6 step 7, the fallback classification): nothing
//! beyond the shared [`LayerHeader`] fields.

use crate::layer::header::LayerHeader;

/// A plain pixel layer: nothing beyond the shared header fields.
#[derive(Debug, Clone)]
pub struct ImageLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
}
