//! The channel store (§4.3): per-layer channel buffers kept compressed in
//! memory, decoded lazily, keyed by role ID.
//!
//! Grounded on the reference's channel-store design (§4.3) and the
//! teacher's `psd_channel`/`PsdChannelKind` split between "what role does
//! this channel play" and "what bytes does it hold" — generalized here from
//! the teacher's R/G/B/A-only enum to the full signed role-ID space (color
//! planes, alpha, user mask, real user mask) the tagged variants need.

use crate::compression::{self, Compression, SampleWidth};
use crate::error::{PsdError, Result};
use crate::io::Version;

/// What role a channel plays, independent of its numeric ID. Negative role
/// IDs are reserved for alpha and masks; non-negative IDs are color planes
/// indexed by the document's color mode (§4.3, "role_kind").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    /// A color plane, e.g. R/G/B or C/M/Y/K, identified by its role ID.
    Color(u16),
    /// Layer transparency (role ID -1).
    Alpha,
    /// A user-painted layer mask (role ID -2).
    UserMask,
    /// A "real" (vector-derived) user mask (role ID -3).
    RealUserMask,
}

impl RoleKind {
    /// Classify a raw role ID as read from a LayerRecord channel-info entry.
    pub fn from_role_id(role_id: i16) -> RoleKind {
        match role_id {
            -1 => RoleKind::Alpha,
            -2 => RoleKind::UserMask,
            -3 => RoleKind::RealUserMask,
            other => RoleKind::Color(other as u16),
        }
    }

    /// The role ID this kind maps back to.
    pub fn role_id(self) -> i16 {
        match self {
            RoleKind::Color(id) => id as i16,
            RoleKind::Alpha => -1,
            RoleKind::UserMask => -2,
            RoleKind::RealUserMask => -3,
        }
    }
}

/// One channel's compressed-in-memory payload plus the geometry needed to
/// decode it (§4.3). Masks carry their own width/height/center distinct
/// from their owning layer's bounds.
#[derive(Debug, Clone)]
pub struct Channel {
    role_id: i16,
    width: u32,
    height: u32,
    center_x: f32,
    center_y: f32,
    sample: SampleWidth,
    compression: Compression,
    /// Compressed on-disk bytes, not including the 2-byte compression marker.
    payload: Vec<u8>,
}

impl Channel {
    /// Build a channel directly from an already-compressed on-disk payload,
    /// as read from ChannelImageData.
    pub fn from_compressed(
        role_id: i16,
        width: u32,
        height: u32,
        sample: SampleWidth,
        compression: Compression,
        payload: Vec<u8>,
    ) -> Channel {
        Channel {
            role_id,
            width,
            height,
            center_x: 0.0,
            center_y: 0.0,
            sample,
            compression,
            payload,
        }
    }

    /// Build a channel from caller-supplied decoded samples (§4.3, "set").
    /// Validates that `samples.len() == width * height * sample.bytes()`.
    pub fn from_samples(
        role_id: i16,
        samples: &[u8],
        width: u32,
        height: u32,
        center_x: f32,
        center_y: f32,
        sample: SampleWidth,
        compression: Compression,
        version: Version,
    ) -> Result<Channel> {
        let expected = width as usize * height as usize * sample.bytes();
        if samples.len() != expected {
            return Err(PsdError::Validation(format!(
                "channel {role_id}: decoded size {} does not match width*height*sample_bytes {expected}",
                samples.len()
            )));
        }
        let payload = compression::encode(compression, samples, width, height, sample, version)
            .map_err(|e| PsdError::codec("Channel::from_samples", 0, e))?;
        Ok(Channel {
            role_id,
            width,
            height,
            center_x,
            center_y,
            sample,
            compression,
            payload,
        })
    }

    /// This channel's role ID.
    pub fn role_id(&self) -> i16 {
        self.role_id
    }

    /// This channel's role, classified from its ID.
    pub fn role_kind(&self) -> RoleKind {
        RoleKind::from_role_id(self.role_id)
    }

    /// Channel width in pixels (equals the owning layer's bounds, except for
    /// masks which use the mask's own bounds).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Channel height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The channel's current on-disk compression.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// The channel's sample width (bit depth).
    pub fn sample(&self) -> SampleWidth {
        self.sample
    }

    /// Size of the compressed payload, including the 2-byte marker — what a
    /// LayerRecord channel-info entry must declare (§3 invariant).
    pub fn compressed_size(&self) -> u64 {
        self.payload.len() as u64 + 2
    }

    /// Decode this channel's samples into an owned, host-native byte buffer
    /// (§4.3, "extract" without nulling the slot — see
    /// [`crate::channel::ChannelStore::extract`] for the owning version).
    pub fn decode(&self, version: Version) -> Result<Vec<u8>> {
        compression::decode(
            self.compression,
            &self.payload,
            self.width,
            self.height,
            self.sample,
            version,
        )
        .map_err(|e| PsdError::codec("Channel::decode", 0, e))
    }

    /// Re-encode this channel at a new compression codec, in place.
    pub fn set_compression(&mut self, compression: Compression, version: Version) -> Result<()> {
        if compression == self.compression {
            return Ok(());
        }
        let samples = self.decode(version)?;
        self.payload = compression::encode(
            compression,
            &samples,
            self.width,
            self.height,
            self.sample,
            version,
        )
        .map_err(|e| PsdError::codec("Channel::set_compression", 0, e))?;
        self.compression = compression;
        Ok(())
    }

    /// The raw compressed payload bytes (excluding the 2-byte marker), as
    /// will be written verbatim to ChannelImageData.
    pub fn compressed_payload(&self) -> &[u8] {
        &self.payload
    }

    /// Size in bytes of this channel's samples once decoded, without
    /// actually decoding them (SPEC_FULL.md §B.2).
    pub fn original_uncompressed_byte_size(&self) -> usize {
        self.width as usize * self.height as usize * self.sample.bytes()
    }
}

/// A layer's channel map: role ID → channel, preserving role-kind identity
/// (§4.3). Backed by a `Vec` rather than a `HashMap` since layers rarely
/// carry more than a handful of channels and insertion order matters for
/// round-tripping a LayerRecord's channel-info table.
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    channels: Vec<Channel>,
}

impl ChannelStore {
    /// An empty store.
    pub fn new() -> ChannelStore {
        ChannelStore {
            channels: Vec::new(),
        }
    }

    /// Number of channels currently held.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the store holds no channels.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Iterate channels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter()
    }

    /// Look up a channel by role ID.
    pub fn get(&self, role_id: i16) -> Option<&Channel> {
        self.channels.iter().find(|c| c.role_id == role_id)
    }

    /// Look up a channel by role ID, mutably.
    pub fn get_mut(&mut self, role_id: i16) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.role_id == role_id)
    }

    /// Insert or replace a channel, keyed by its own role ID.
    pub fn set(&mut self, channel: Channel) {
        if let Some(existing) = self.get_mut(channel.role_id) {
            *existing = channel;
        } else {
            self.channels.push(channel);
        }
    }

    /// Move a channel's decoded samples out, leaving its slot empty (§4.3,
    /// "extract moves the decoded samples out and nulls the slot").
    pub fn extract(&mut self, role_id: i16, version: Version) -> Result<Option<Vec<u8>>> {
        let index = self.channels.iter().position(|c| c.role_id == role_id);
        match index {
            Some(i) => {
                let channel = self.channels.remove(i);
                Ok(Some(channel.decode(version)?))
            }
            None => Ok(None),
        }
    }

    /// Remove and return the channel at `role_id`, still compressed, without
    /// decoding it.
    pub fn remove(&mut self, role_id: i16) -> Option<Channel> {
        let index = self.channels.iter().position(|c| c.role_id == role_id);
        index.map(|i| self.channels.remove(i))
    }

    /// Remove and return a mask channel (role ID -2 or -3), used when
    /// splitting masks out of the per-layer channel map into a layer's mask
    /// descriptor (§4.6 "Mask channels").
    pub fn take_mask(&mut self) -> Option<Channel> {
        let index = self
            .channels
            .iter()
            .position(|c| matches!(c.role_kind(), RoleKind::UserMask | RoleKind::RealUserMask));
        index.map(|i| self.channels.remove(i))
    }

    /// Re-encode every channel in the store at `compression` (§8 invariant
    /// 8, "no channel whose codec differs from `codec`").
    pub fn set_compression(&mut self, compression: Compression, version: Version) -> Result<()> {
        for channel in &mut self.channels {
            channel.set_compression(compression, version)?;
        }
        Ok(())
    }

    /// Total decoded size, in bytes, of every channel currently held
    /// (SPEC_FULL.md §B.2) — lets a caller estimate memory pressure before
    /// calling [`ChannelStore::extract`] on everything.
    pub fn original_uncompressed_byte_size(&self) -> usize {
        self.channels
            .iter()
            .map(Channel::original_uncompressed_byte_size)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncompressed_size_sums_across_channels() {
        let mut store = ChannelStore::new();
        let samples = vec![0u8; 4 * 4];
        store.set(
            Channel::from_samples(
                0,
                &samples,
                4,
                4,
                0.0,
                0.0,
                SampleWidth::Eight,
                Compression::Raw,
                Version::Psd,
            )
            .unwrap(),
        );
        store.set(
            Channel::from_samples(
                1,
                &samples,
                4,
                4,
                0.0,
                0.0,
                SampleWidth::Eight,
                Compression::Raw,
                Version::Psd,
            )
            .unwrap(),
        );
        assert_eq!(store.original_uncompressed_byte_size(), 32);
    }
}
