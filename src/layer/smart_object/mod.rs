//! Smart-object placement and evaluation (§4.6 "Smart-object layer", §9
//! "warp_apply is an external pure function").
//!
//! A smart object holds a reference into the document's
//! [`crate::linked_layer::LinkedLayerTable`] by content hash, a corner
//! transform, and a warp mesh. It never decodes or resamples pixels itself —
//! [`SmartObject::evaluate`] takes the caller-supplied `warp_apply` function
//! and only decides *when* to call it (the `dirty` flag) and *what* to do
//! with the result (write it back into the owning layer's channel store and
//! refresh its bounds).

pub mod warp;

use crate::channel::ChannelStore;
use crate::compression::{Compression, SampleWidth};
use crate::error::Result;
use crate::io::Version;
use warp::{Corners, Warp};

/// A smart object's placement: which linked-layer entry it sources from,
/// its corner transform, and its warp mesh.
#[derive(Debug, Clone)]
pub struct SmartObject {
    /// Content hash key into the [`crate::linked_layer::LinkedLayerTable`].
    pub linked_layer_hash: String,
    /// The quad the source image is placed onto before warping.
    pub corners: Corners,
    /// The warp mesh applied on top of `corners`.
    pub warp: Warp,
    dirty: bool,
}

impl SmartObject {
    /// Build a smart object referencing `linked_layer_hash`, placed at
    /// `corners` with no warp applied yet.
    pub fn new(linked_layer_hash: String, corners: Corners) -> SmartObject {
        let warp = Warp::identity_normal(corners);
        SmartObject {
            linked_layer_hash,
            corners,
            warp,
            dirty: true,
        }
    }

    /// Rebuild a smart object read from disk, whose channels already
    /// reflect `corners`/`warp` (so the cache starts clean).
    pub(crate) fn from_disk(linked_layer_hash: String, corners: Corners, warp: Warp) -> SmartObject {
        SmartObject {
            linked_layer_hash,
            corners,
            warp,
            dirty: false,
        }
    }

    /// Whether this smart object's channels need re-evaluating before their
    /// next read (§9: any transform marks the cache dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Translate the placement, marking the cache dirty.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.corners.translate(dx, dy);
        self.dirty = true;
    }

    /// Scale the placement about its own center, marking the cache dirty.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let (cx, cy) = self.center();
        self.corners.scale(cx, cy, sx, sy);
        self.dirty = true;
    }

    /// Rotate the placement about its own center, marking the cache dirty.
    pub fn rotate(&mut self, radians: f64) {
        let (cx, cy) = self.center();
        self.corners.rotate(cx, cy, radians);
        self.dirty = true;
    }

    /// Replace the warp mesh outright, marking the cache dirty.
    pub fn set_warp(&mut self, warp: Warp) {
        self.warp = warp;
        self.dirty = true;
    }

    fn center(&self) -> (f64, f64) {
        let sum = self
            .corners
            .points
            .iter()
            .fold((0.0, 0.0), |acc, p| (acc.0 + p.0, acc.1 + p.1));
        (sum.0 / 4.0, sum.1 / 4.0)
    }

    /// Re-run `warp_apply` against `source_channels` if dirty, writing the
    /// result into `channels` (role IDs `0..source_channels.len() as u16`)
    /// and clearing the dirty flag. A no-op if the cache is already clean.
    ///
    /// `warp_apply(source_channels, corners, warp) -> per_channel_samples`
    /// is the external pure function named in spec.md §9; this crate only
    /// decides when to call it.
    pub fn evaluate<F>(
        &mut self,
        channels: &mut ChannelStore,
        source_channels: &[Vec<u8>],
        width: u32,
        height: u32,
        sample: SampleWidth,
        compression: Compression,
        version: Version,
        warp_apply: F,
    ) -> Result<()>
    where
        F: FnOnce(&[Vec<u8>], &Corners, &Warp) -> Vec<Vec<u8>>,
    {
        if !self.dirty {
            return Ok(());
        }

        let evaluated = warp_apply(source_channels, &self.corners, &self.warp);
        for (role_id, samples) in evaluated.into_iter().enumerate() {
            let channel = crate::channel::Channel::from_samples(
                role_id as i16,
                &samples,
                width,
                height,
                0.0,
                0.0,
                sample,
                compression,
                version,
            )?;
            channels.set(channel);
        }

        self.dirty = false;
        Ok(())
    }
}
