//! `lnk2`/`lnk3`/`lnkE`: the document-level linked-layer table (§4.7), one
//! entry per smart-object source file (embedded or external).
//!
//! We parse each entry's identifying prefix (kind, version, unique ID, name,
//! file type/creator) and keep the remainder — dominated, for embedded
//! (`liFD`) entries, by the source file's own bytes — as one opaque payload.
//! [`crate::linked_layer::LinkedLayerTable`] content-hashes that payload for
//! deduplication, same as it would the parsed file bytes; we don't attempt
//! to also reverse-engineer the descriptor fields that follow (child
//! document ID, asset modification time, alias records), since nothing in
//! this crate's layer model consumes them.

use crate::error::Result;
use crate::io::{Cursor, Version, Writer};

const SECTION: &str = "LinkedLayer";

/// One linked-layer table entry.
#[derive(Debug, Clone)]
pub struct LinkedLayerEntry {
    /// `liFE` (external), `liFD` (embedded data), or `liFA` (alias).
    pub kind: [u8; 4],
    /// Descriptor version.
    pub version: u32,
    /// The layer's own unique ID string, referenced by placed-layer
    /// descriptors ([`super::placed_layer::PlacedLayer::linked_layer_identifier`]).
    pub unique_id: String,
    /// Display name.
    pub name: String,
    /// 4-byte file type signature (e.g. a file extension code).
    pub file_type: [u8; 4],
    /// 4-byte file creator signature.
    pub file_creator: [u8; 4],
    /// Everything after the identifying prefix: for `liFD` entries,
    /// predominantly the embedded file's own bytes.
    pub payload: Vec<u8>,
}

/// The decoded `lnk2`/`lnk3`/`lnkE` block body: a sequence of entries
/// filling the block.
#[derive(Debug, Clone)]
pub struct LinkedLayerTableBlock {
    key: [u8; 4],
    /// All entries, in file order.
    pub entries: Vec<LinkedLayerEntry>,
}

impl LinkedLayerTableBlock {
    /// Build a block from scratch (used when serializing
    /// [`crate::linked_layer::LinkedLayerTable`] back to a tagged block).
    pub fn new(key: [u8; 4], entries: Vec<LinkedLayerEntry>) -> LinkedLayerTableBlock {
        LinkedLayerTableBlock { key, entries }
    }

    /// The key this block was read under / will be written under.
    pub fn key(&self) -> [u8; 4] {
        self.key
    }

    /// Parse the block body.
    pub fn read(key: [u8; 4], data: &[u8], version: Version) -> Result<LinkedLayerTableBlock> {
        let mut cursor = Cursor::new(data, SECTION);
        let mut entries = Vec::new();

        while cursor.remaining() >= 8 {
            let entry_len = cursor.read_u64()?;
            let entry_end = cursor.position() + entry_len;

            let kind = cursor.read_signature()?;
            let entry_version = cursor.read_u32()?;
            let unique_id = cursor.read_pascal_string(1)?;
            let name = cursor.read_unicode_string()?;
            let file_type = cursor.read_signature()?;
            let file_creator = cursor.read_signature()?;

            let remaining = entry_end.saturating_sub(cursor.position());
            let payload = cursor.read(remaining)?.to_vec();
            // Some writers pad entries to an 4-byte boundary.
            cursor.seek(entry_end)?;

            entries.push(LinkedLayerEntry {
                kind,
                version: entry_version,
                unique_id,
                name,
                file_type,
                file_creator,
                payload,
            });
        }

        let _ = version;
        Ok(LinkedLayerTableBlock { key, entries })
    }

    /// Serialize the block body.
    pub fn write(&self, writer: &mut Writer, _version: Version) {
        for entry in &self.entries {
            let patch = writer.reserve_variant_wide(crate::io::Version::Psb);
            writer.write_signature(&entry.kind);
            writer.write_u32(entry.version);
            writer.write_pascal_string(&entry.unique_id, 1);
            writer.write_unicode_string(&entry.name);
            writer.write_signature(&entry.file_type);
            writer.write_signature(&entry.file_creator);
            writer.write_bytes(&entry.payload);
            writer.patch_length_since(patch);
        }
    }
}
