use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::DESCRIPTOR_SUFFIX;
use crate::core::error::Result;
use crate::core::types::DocId;

/// The sidecar persisted alongside an index, recording everything needed
/// to search it without re-reading the corpus. Grounded on
/// `original_source/irspimi/inverted_index.py`'s `InvertedIndexDescriptor`,
/// with the Python `eval(repr(compression))` round-trip replaced by the
/// flat recipe string from `compression::Filter::to_recipe`/`from_recipe`
/// — the recipe must be a portable string, not an evaluated code literal.
/// `doc_lengths` is a `BTreeMap` rather than a `HashMap` so the
/// serialized JSON has a deterministic key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Descriptor {
    pub doc_id_list: Vec<DocId>,
    pub doc_lengths: BTreeMap<u64, u32>,
    /// Empty string means no compression chain was applied at build time.
    pub compression_recipe: String,
}

impl Descriptor {
    pub fn new(mut doc_id_list: Vec<DocId>, doc_lengths: BTreeMap<u64, u32>, compression_recipe: String) -> Self {
        doc_id_list.sort();
        Descriptor {
            doc_id_list,
            doc_lengths,
            compression_recipe,
        }
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn read_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let descriptor = serde_json::from_reader(reader)?;
        Ok(descriptor)
    }

    pub fn avg_doc_length(&self) -> f64 {
        if self.doc_lengths.is_empty() {
            return 0.0;
        }
        let total: u64 = self.doc_lengths.values().map(|&l| l as u64).sum();
        total as f64 / self.doc_lengths.len() as f64
    }

    pub fn doc_length(&self, doc_id: DocId) -> u32 {
        self.doc_lengths.get(&doc_id.value()).copied().unwrap_or(0)
    }

    pub fn doc_count(&self) -> usize {
        self.doc_lengths.len()
    }
}

pub fn descriptor_path(index_path: &Path) -> std::path::PathBuf {
    let mut name = index_path.as_os_str().to_owned();
    name.push(".");
    name.push(DESCRIPTOR_SUFFIX);
    std::path::PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut lengths = BTreeMap::new();
        lengths.insert(1, 10);
        lengths.insert(2, 20);
        let descriptor = Descriptor::new(vec![DocId(2), DocId(1)], lengths, "casefold,portstem".to_string());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inverted_index.ii.desc");
        descriptor.write_to_file(&path).unwrap();
        let loaded = Descriptor::read_from_file(&path).unwrap();

        assert_eq!(loaded, descriptor);
        assert_eq!(loaded.doc_id_list, vec![DocId(1), DocId(2)]);
    }

    #[test]
    fn computes_average_doc_length_and_lookups() {
        let mut lengths = BTreeMap::new();
        lengths.insert(1, 10);
        lengths.insert(2, 30);
        let descriptor = Descriptor::new(vec![DocId(1), DocId(2)], lengths, String::new());

        assert_eq!(descriptor.avg_doc_length(), 20.0);
        assert_eq!(descriptor.doc_length(DocId(1)), 10);
        assert_eq!(descriptor.doc_length(DocId(99)), 0);
        assert_eq!(descriptor.doc_count(), 2);
    }
}
