//! The defensive fallback for a `lsct` bounding-divider record with no
//! enclosing group in scope (§4.6 "Tree construction": a malformed or
//! hand-edited file could have an orphan divider). Normal group boundaries
//! never surface as this variant — [`crate::layer::tree::build_tree`]
//! consumes them into [`crate::layer::group_layer::GroupLayer`].

use crate::layer::header::LayerHeader;
use crate::model::layer_and_mask::tagged_block::SectionDividerKind;

/// An orphan `lsct` bounding-divider record with no enclosing group in scope.
#[derive(Debug, Clone)]
pub struct SectionDividerLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// The divider's own kind (open/closed/bounding).
    pub kind: SectionDividerKind,
}
