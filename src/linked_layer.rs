//! The document-level linked-layer table (§4.7): a content-addressed store
//! of smart-object source files, keyed by the identifier smart-object
//! layers reference via [`crate::layer::smart_object::SmartObject::linked_layer_hash`].
//!
//! Entries read from disk keep the `unique_id` Photoshop itself assigned to
//! them. Entries inserted fresh (via [`LinkedLayerTable::insert_embedded_bytes`]
//! or [`LinkedLayerTable::insert_embedded_from_path`]) are keyed by a SHA-256
//! hash of their content instead, so two smart objects built from the same
//! source file collide onto a single table entry (§8 invariant 9).

use crate::error::{PsdError, Result};
use crate::layer::Layer;
use crate::model::layer_and_mask::tagged_block::linked_layer_block::{
    LinkedLayerEntry, LinkedLayerTableBlock,
};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Where a linked layer's bytes live.
#[derive(Debug, Clone)]
pub enum LinkedLayerSource {
    /// The source file's bytes are embedded in the document itself.
    Embedded {
        /// The source file's raw, undecoded bytes.
        raw_bytes: Vec<u8>,
    },
    /// Only a path to an external file is recorded; resolving it to bytes is
    /// left to the caller (this crate never reaches outside the document
    /// it's given).
    External {
        /// Path to the external source file as recorded in the document.
        path: PathBuf,
    },
}

/// One linked-layer table entry.
#[derive(Debug, Clone)]
pub struct LinkedLayerRecord {
    /// Display name of the source file.
    pub filename: String,
    /// Where the bytes actually live.
    pub source: LinkedLayerSource,
    /// 4-byte file type signature.
    pub file_type: [u8; 4],
    /// 4-byte file creator signature.
    pub file_creator: [u8; 4],
}

/// The document's de-duplicated linked-layer store.
#[derive(Debug, Clone, Default)]
pub struct LinkedLayerTable {
    entries: HashMap<String, LinkedLayerRecord>,
}

impl LinkedLayerTable {
    /// An empty table.
    pub fn new() -> LinkedLayerTable {
        LinkedLayerTable {
            entries: HashMap::new(),
        }
    }

    /// Number of distinct source files tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its hash/identifier.
    pub fn get(&self, hash: &str) -> Option<&LinkedLayerRecord> {
        self.entries.get(hash)
    }

    /// Iterate all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &LinkedLayerRecord)> {
        self.entries.iter()
    }

    /// Read a file from disk and insert it as an embedded source, returning
    /// the identifier a smart object should reference. If a byte-identical
    /// file was already inserted, its existing identifier is reused instead
    /// of creating a duplicate entry.
    pub fn insert_embedded_from_path(&mut self, path: &Path) -> Result<String> {
        let raw_bytes = std::fs::read(path).map_err(|e| PsdError::io("LinkedLayerTable", 0, e))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.insert_embedded_bytes(filename, raw_bytes))
    }

    /// Insert an embedded source file's raw bytes directly, deduplicating by
    /// content hash.
    pub fn insert_embedded_bytes(&mut self, filename: String, raw_bytes: Vec<u8>) -> String {
        let hash = content_hash(&raw_bytes);
        self.entries.entry(hash.clone()).or_insert_with(|| LinkedLayerRecord {
            filename,
            source: LinkedLayerSource::Embedded { raw_bytes },
            file_type: *b"    ",
            file_creator: *b"    ",
        });
        hash
    }

    /// Reference an external file by path without reading it, deduplicating
    /// by path.
    pub fn insert_external(&mut self, path: &Path) -> String {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let hash = content_hash(path.to_string_lossy().as_bytes());
        self.entries.entry(hash.clone()).or_insert_with(|| LinkedLayerRecord {
            filename,
            source: LinkedLayerSource::External {
                path: path.to_path_buf(),
            },
            file_type: *b"    ",
            file_creator: *b"    ",
        });
        hash
    }

    /// Remove every entry not referenced by a smart-object layer still
    /// present in `tree` (§4.7 "cleanup"; §8 invariant 9).
    pub fn cleanup(&mut self, tree: &[Layer]) {
        let mut referenced = HashSet::new();
        collect_referenced_hashes(tree, &mut referenced);
        self.entries.retain(|hash, _| referenced.contains(hash));
    }

    /// Build the table from a decoded `lnk2`/`lnk3`/`lnkE` tagged block.
    pub fn from_block(block: &LinkedLayerTableBlock) -> LinkedLayerTable {
        let mut entries = HashMap::new();
        for entry in &block.entries {
            let source = match &entry.kind {
                b"liFE" => LinkedLayerSource::External {
                    path: PathBuf::from(&entry.name),
                },
                _ => LinkedLayerSource::Embedded {
                    raw_bytes: entry.payload.clone(),
                },
            };
            entries.insert(
                entry.unique_id.clone(),
                LinkedLayerRecord {
                    filename: entry.name.clone(),
                    source,
                    file_type: entry.file_type,
                    file_creator: entry.file_creator,
                },
            );
        }
        LinkedLayerTable { entries }
    }

    /// Serialize the table into a `lnk2` tagged block.
    pub fn to_block(&self) -> LinkedLayerTableBlock {
        let entries = self
            .entries
            .iter()
            .map(|(hash, record)| {
                let (kind, payload) = match &record.source {
                    LinkedLayerSource::Embedded { raw_bytes } => (*b"liFD", raw_bytes.clone()),
                    LinkedLayerSource::External { .. } => (*b"liFE", Vec::new()),
                };
                LinkedLayerEntry {
                    kind,
                    version: 1,
                    unique_id: hash.clone(),
                    name: record.filename.clone(),
                    file_type: record.file_type,
                    file_creator: record.file_creator,
                    payload,
                }
            })
            .collect();
        LinkedLayerTableBlock::new(*b"lnk2", entries)
    }
}

fn content_hash(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    hex::encode(digest)
}

fn collect_referenced_hashes(layers: &[Layer], out: &mut HashSet<String>) {
    for layer in layers {
        if let Layer::SmartObject(smart_object) = layer {
            out.insert(smart_object.placement.linked_layer_hash.clone());
        }
        collect_referenced_hashes(layer.children(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserting_identical_bytes_twice_deduplicates() {
        let mut table = LinkedLayerTable::new();
        let a = table.insert_embedded_bytes("a.png".to_string(), vec![1, 2, 3]);
        let b = table.insert_embedded_bytes("b.png".to_string(), vec![1, 2, 3]);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn cleanup_removes_unreferenced_entries() {
        let mut table = LinkedLayerTable::new();
        table.insert_embedded_bytes("orphan.png".to_string(), vec![9, 9, 9]);
        assert_eq!(table.len(), 1);
        table.cleanup(&[]);
        assert!(table.is_empty());
    }
}
