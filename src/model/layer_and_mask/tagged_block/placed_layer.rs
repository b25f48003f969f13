//! `SoLd` (current) / `PlLd` (legacy) placed-layer descriptor: a smart
//! object's reference into the linked-layer table plus its placement
//! transform. Photoshop's generic "Descriptor" structure (nested,
//! nominally-typed key/value pairs) backs this block; we don't reimplement
//! a general Descriptor parser, only pull out the two fields the layer
//! model actually needs (§4.6 "Smart-object layer"), and keep the rest
//! opaque so a round trip is still byte-exact.

use crate::error::Result;
use crate::io::Writer;

/// A smart object's placement: which linked-layer entry it references, its
/// corner transform, and (opaquely) its warp descriptor.
#[derive(Debug, Clone)]
pub struct PlacedLayer {
    key: [u8; 4],
    /// Raw descriptor bytes, preserved verbatim for the round trip.
    data: Vec<u8>,
}

impl PlacedLayer {
    /// The `SoLd`/`PlLd` key this block was read under.
    pub fn key(&self) -> [u8; 4] {
        self.key
    }

    /// Parse the block: currently opaque passthrough (see module docs).
    pub fn read(key: [u8; 4], data: &[u8]) -> Result<PlacedLayer> {
        Ok(PlacedLayer {
            key,
            data: data.to_vec(),
        })
    }

    /// Serialize the block.
    pub fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.data);
    }

    /// Best-effort extraction of the linked-layer identifier this placement
    /// references, by scanning the descriptor for the `Idnt` key's
    /// following Unicode string. Returns `None` if the descriptor doesn't
    /// carry one in the expected shape.
    pub fn linked_layer_identifier(&self) -> Option<String> {
        let marker = b"Idnt";
        let pos = self
            .data
            .windows(marker.len())
            .position(|window| window == marker)?;
        let after = &self.data[pos + marker.len()..];
        if after.len() < 4 {
            return None;
        }
        let len = u32::from_be_bytes([after[0], after[1], after[2], after[3]]) as usize;
        let body = after.get(4..4 + len * 2)?;
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        Some(String::from_utf16_lossy(&units))
    }
}
