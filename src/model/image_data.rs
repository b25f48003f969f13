//! The flat, document-level ImageData section (§3): the merged preview,
//! compressed once across all channels rather than per-channel like layer
//! data.
//!
//! The on-disk scanline-length table (for RLE) and the delta/plane
//! structure (for prediction) don't care whether a "row" belongs to the
//! red, green, or blue plane — they only care about `width` and a total
//! scanline count. So this reuses [`crate::compression::decode`]/`encode`
//! directly, passing `channel_count * height` as the scanline count instead
//! of introducing a second codec path.

use crate::compression::{self, Compression, SampleWidth};
use crate::error::{PsdError, Result};
use crate::io::{Cursor, Version, Writer};

const SECTION: &str = "ImageData";

/// The flat composite image: one planar byte buffer per channel, in channel
/// order (no masks, no alpha unless the document declares one as a regular
/// channel).
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Compression used for the whole section.
    pub compression: Compression,
    /// Decoded samples, one `Vec<u8>` per channel, each
    /// `width * height * sample.bytes()` long, in host-native byte order.
    pub channels: Vec<Vec<u8>>,
}

impl ImageData {
    /// Parse the section body.
    pub fn read(
        bytes: &[u8],
        width: u32,
        height: u32,
        channel_count: u16,
        sample: SampleWidth,
        version: Version,
    ) -> Result<ImageData> {
        let mut cursor = Cursor::new(bytes, SECTION);
        let marker = cursor.read_u16()?;
        let compression = Compression::from_marker(marker)
            .map_err(|e| PsdError::codec(SECTION, cursor.position(), e))?;

        let payload = cursor.read(cursor.remaining() as u64)?;
        let total_height = height * channel_count as u32;
        let flat = compression::decode(compression, payload, width, total_height, sample, version)
            .map_err(|e| PsdError::codec(SECTION, 0, e))?;

        let channel_bytes = width as usize * height as usize * sample.bytes();
        let channels = flat
            .chunks(channel_bytes)
            .map(|chunk| chunk.to_vec())
            .collect();

        Ok(ImageData {
            compression,
            channels,
        })
    }

    /// Serialize the section body.
    pub fn write(
        &self,
        writer: &mut Writer,
        width: u32,
        height: u32,
        sample: SampleWidth,
        version: Version,
    ) -> Result<()> {
        writer.write_u16(self.compression.marker());

        let mut flat = Vec::new();
        for channel in &self.channels {
            flat.extend_from_slice(channel);
        }
        let total_height = height * self.channels.len() as u32;
        let payload = compression::encode(self.compression, &flat, width, total_height, sample, version)
            .map_err(|e| PsdError::codec(SECTION, 0, e))?;
        writer.write_bytes(&payload);
        Ok(())
    }
}
