use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::compression::Filter;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::index::codec::parse_line;
use crate::index::descriptor::{descriptor_path, Descriptor};
use crate::index::merger::dictionary_path;
use crate::index::posting::{universe_postings, PostingsList, TermPostings};

/// The three outcomes `get_postings` distinguishes, mirroring
/// `inverted_index.py`'s `get_postings` comment about telling "no postings
/// found" apart from "the term should be disregarded": a real hit, a term
/// legitimately absent from the index, and a query term the build-time
/// compression chain would have dropped outright (so it can never occur
/// in any document, by construction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(TermPostings),
    Empty(String),
    Filtered,
}

/// Read-side access to a merged index, reapplying the same compression
/// chain a query term would have gone through at build time (the
/// build/query symmetry invariant) before looking it up in the
/// in-memory `term -> byte offset` dictionary and seeking the main
/// index file. Grounded on `inverted_index.py`'s `InvertedIndex`.
pub struct IndexReader {
    index_path: PathBuf,
    index_file: File,
    dictionary: HashMap<String, u64>,
    descriptor: Descriptor,
    compression: Option<Filter>,
}

impl IndexReader {
    pub fn open(index_path: impl Into<PathBuf>) -> Result<Self> {
        let index_path = index_path.into();
        let index_file = File::open(&index_path).map_err(|e| {
            Error::new(
                ErrorKind::NotFound,
                format!("cannot open index file {}: {}", index_path.display(), e),
            )
        })?;

        let dictionary = load_dictionary(&dictionary_path(&index_path))?;

        let desc_path = descriptor_path(&index_path);
        let descriptor = Descriptor::read_from_file(&desc_path).map_err(|e| {
            Error::new(
                ErrorKind::Descriptor,
                format!("cannot load descriptor {}: {}", desc_path.display(), e),
            )
        })?;

        let compression = if descriptor.compression_recipe.trim().is_empty() {
            None
        } else {
            Some(Filter::from_recipe(&descriptor.compression_recipe)?)
        };

        Ok(IndexReader {
            index_path,
            index_file,
            dictionary,
            descriptor,
            compression,
        })
    }

    pub fn get_postings(&mut self, term: &str) -> Result<Lookup> {
        let term = match &self.compression {
            Some(filter) => match filter.apply(term) {
                Some(t) => t,
                None => return Ok(Lookup::Filtered),
            },
            None => term.to_string(),
        };

        match self.dictionary.get(&term) {
            Some(&offset) => {
                self.index_file.seek(SeekFrom::Start(offset))?;
                let mut line = String::new();
                BufReader::new(&self.index_file).read_line(&mut line)?;
                let tp = parse_line(&line, &self.index_path, offset)?;
                Ok(Lookup::Found(tp))
            }
            None => Ok(Lookup::Empty(term)),
        }
    }

    pub fn universe(&self) -> PostingsList {
        universe_postings(&self.descriptor.doc_id_list)
    }

    pub fn doc_ids(&self) -> &[DocId] {
        &self.descriptor.doc_id_list
    }

    pub fn doc_length(&self, doc_id: DocId) -> u32 {
        self.descriptor.doc_length(doc_id)
    }

    pub fn avg_doc_length(&self) -> f64 {
        self.descriptor.avg_doc_length()
    }

    pub fn doc_count(&self) -> usize {
        self.descriptor.doc_count()
    }
}

fn load_dictionary(path: &Path) -> Result<HashMap<String, u64>> {
    let file = File::open(path).map_err(|e| {
        Error::new(
            ErrorKind::NotFound,
            format!("cannot open dictionary sidecar {}: {}", path.display(), e),
        )
    })?;
    let mut dictionary = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (term, offset_str) = line.split_once(" : ").ok_or_else(|| {
            Error::new(
                ErrorKind::Descriptor,
                format!("malformed dictionary line in {}: {}", path.display(), line),
            )
        })?;
        let offset: u64 = offset_str.parse().map_err(|_| {
            Error::new(
                ErrorKind::Descriptor,
                format!("malformed byte offset in {}: {}", path.display(), line),
            )
        })?;
        dictionary.insert(term.to_string(), offset);
    }
    Ok(dictionary)
}
