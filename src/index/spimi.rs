use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::index::codec::format_line;
use crate::index::posting::{Posting, TermPostings};

/// Builds bounded-memory SPIMI blocks from a token stream, spilling each
/// block to its own sorted-by-term file. Grounded on
/// `original_source/irspimi/spimi.py`'s `SPIMI` class, with a `BTreeMap`
/// standing in for the Python dict-then-`sorted(dictionary.keys())` step —
/// the map keeps the block's terms sorted as it accumulates, so there is
/// no separate sort before writing.
pub struct SpimiInverter<I> {
    tokens: I,
    spill_dir: PathBuf,
    block_entry_budget: usize,
    next_block_suffix: usize,
    exhausted: bool,
}

impl<I: Iterator<Item = (String, DocId, u32)>> SpimiInverter<I> {
    pub fn new(tokens: I, spill_dir: PathBuf, block_entry_budget: usize) -> Result<Self> {
        fs::create_dir_all(&spill_dir)?;
        Ok(SpimiInverter {
            tokens,
            spill_dir,
            block_entry_budget,
            next_block_suffix: 0,
            exhausted: false,
        })
    }

    /// Build one block from the underlying token stream and spill it to
    /// disk, returning its path. Call repeatedly until it returns `Ok(None)`
    /// — the stream is exhausted with no pending terms.
    pub fn invert(&mut self) -> Result<Option<PathBuf>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut dictionary: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        while dictionary.len() < self.block_entry_budget {
            match self.tokens.next() {
                Some((term, doc_id, pos)) => {
                    let postings = dictionary.entry(term).or_default();
                    match postings.last_mut() {
                        Some(last) if last.doc_id == doc_id => last.positions.push(pos),
                        _ => postings.push(Posting {
                            doc_id,
                            positions: vec![pos],
                        }),
                    }
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if dictionary.is_empty() {
            return Ok(None);
        }

        let path = self
            .spill_dir
            .join(format!("SPIMIBLOCK_{}.blk", self.next_block_suffix));
        self.next_block_suffix += 1;

        let file = File::create(&path).map_err(|e| {
            Error::new(
                ErrorKind::Spill,
                format!("failed to open spill block {}: {}", path.display(), e),
            )
        })?;
        let mut writer = BufWriter::new(file);
        for (term, postings) in dictionary {
            let tp = TermPostings { term, postings };
            writer.write_all(format_line(&tp).as_bytes())?;
        }
        writer.flush()?;

        Ok(Some(path))
    }

    /// Drain the stream into as many blocks as needed, returning all block
    /// paths in creation order.
    pub fn invert_all(&mut self) -> Result<Vec<PathBuf>> {
        let mut blocks = Vec::new();
        while let Some(path) = self.invert()? {
            blocks.push(path);
        }
        Ok(blocks)
    }
}
