//! `Lr16`/`Lr32` (§3 LayerAndMaskInformation): in 16- and 32-bit-per-channel
//! documents the top-level LayerInfo is empty and the real layer records
//! live in one of these tagged blocks instead. The body has the same shape
//! as a top-level LayerInfo minus its own outer length prefix (that's
//! supplied by the enclosing tagged block).

use crate::error::Result;
use crate::io::{Cursor, Version, Writer};
use crate::model::layer_and_mask::layer_record::{LayerInfo, LayerRecord};

const SECTION: &str = "NestedLayerInfo";

/// The decoded `Lr16`/`Lr32` block body.
#[derive(Debug, Clone)]
pub struct NestedLayerInfo {
    key: [u8; 4],
    /// The nested LayerInfo, in the same shape as the top-level one.
    pub layer_info: LayerInfo,
}

impl NestedLayerInfo {
    /// Build a block to be written under `key` (`Lr16` or `Lr32`).
    pub fn new(key: [u8; 4], layer_info: LayerInfo) -> NestedLayerInfo {
        NestedLayerInfo { key, layer_info }
    }

    /// The `Lr16` or `Lr32` key this block was read under / will be written
    /// under.
    pub fn key(&self) -> [u8; 4] {
        self.key
    }

    /// Parse the block body.
    pub fn read(key: [u8; 4], bytes: &[u8], version: Version) -> Result<NestedLayerInfo> {
        let mut cursor = Cursor::new(bytes, SECTION);

        let raw_count = cursor.read_i16()?;
        let merged_alpha = raw_count < 0;
        let count = raw_count.unsigned_abs() as usize;

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(LayerRecord::read(&mut cursor, version)?);
        }

        let mut channel_data = Vec::with_capacity(count);
        for record in &records {
            let mut channels = Vec::with_capacity(record.channel_info.len());
            for info in &record.channel_info {
                channels.push(cursor.read(info.compressed_size)?.to_vec());
            }
            channel_data.push(channels);
        }

        Ok(NestedLayerInfo {
            key,
            layer_info: LayerInfo {
                merged_alpha,
                records,
                channel_data,
            },
        })
    }

    /// Serialize the block body.
    pub fn write(&self, writer: &mut Writer, version: Version) {
        let count = self.layer_info.records.len() as i16;
        let signed_count = if self.layer_info.merged_alpha {
            -count
        } else {
            count
        };
        writer.write_i16(signed_count);

        for record in &self.layer_info.records {
            record.write(writer, version);
        }
        for channels in &self.layer_info.channel_data {
            for channel in channels {
                writer.write_bytes(channel);
            }
        }
    }
}
