//! A text layer (§4.6 step 3: identified by a `TySh` type-tool block).
//! Editing the text engine's descriptor is out of scope (spec.md
//! non-goals), so the block is kept opaque.

use crate::layer::header::LayerHeader;

/// A text layer: shared header plus the opaque type-tool descriptor.
#[derive(Debug, Clone)]
pub struct TextLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// Raw `TySh` payload.
    pub text_data: Vec<u8>,
}
