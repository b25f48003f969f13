//! A group ("folder") layer (§4.6 step 1): an ordered list of children plus
//! the open/closed state recovered from its `lsct` divider.

use crate::layer::header::LayerHeader;
use crate::layer::Layer;

/// A group ("folder") layer: shared header plus its ordered children.
#[derive(Debug, Clone)]
pub struct GroupLayer {
    /// Fields shared by every layer variant.
    pub header: LayerHeader,
    /// Children in display order (top of the stack first), matching the
    /// tree shape §4.6 "Tree construction" recovers.
    pub children: Vec<Layer>,
    /// Whether the group is expanded in Photoshop's layers panel.
    pub is_open: bool,
}

impl GroupLayer {
    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
