use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::config::DICTIONARY_SUFFIX;
use crate::core::error::{Error, ErrorKind, Result};
use crate::index::codec::{format_line, parse_line};
use crate::index::posting::{merge_postings, PostingsList, TermPostings};

/// One open input block: a buffered reader plus the file's own path (kept
/// for `Codec` error context) and a running byte offset used the same way.
struct InputFile {
    path: PathBuf,
    reader: BufReader<File>,
    offset: u64,
}

/// An external k-way merge over sorted-by-term block
/// files, bounded by a fixed input buffer per file and a fixed output
/// buffer before each flush. Grounded on
/// `original_source/irspimi/merge.py`'s `MergeSPIMI`, with Python's list
/// `(term, file_index)` heap entries replaced by a `BinaryHeap<Reverse<_>>`
/// (a min-heap by `(term, file_index)`, matching the Python heap's
/// tie-break on file index).
pub struct KWayMerger {
    files: Vec<InputFile>,
    input_buffers: Vec<VecDeque<TermPostings>>,
    heap: BinaryHeap<Reverse<(String, usize)>>,
    input_buffer_len: usize,
}

impl KWayMerger {
    pub fn new(in_files: &[PathBuf], input_buffer_len: usize) -> Result<Self> {
        let mut files = Vec::with_capacity(in_files.len());
        for path in in_files {
            let file = File::open(path).map_err(|e| {
                Error::new(
                    ErrorKind::MergeIo,
                    format!("failed to open merge input {}: {}", path.display(), e),
                )
            })?;
            files.push(InputFile {
                path: path.clone(),
                reader: BufReader::new(file),
                offset: 0,
            });
        }

        let mut merger = KWayMerger {
            input_buffers: (0..files.len()).map(|_| VecDeque::new()).collect(),
            files,
            heap: BinaryHeap::new(),
            input_buffer_len,
        };
        for i in 0..merger.files.len() {
            merger.refill(i)?;
        }
        Ok(merger)
    }

    fn refill(&mut self, i: usize) -> Result<()> {
        let mut filled = 0;
        while filled < self.input_buffer_len {
            let mut line = String::new();
            let n = self.files[i].reader.read_line(&mut line)?;
            if n == 0 {
                break;
            }
            self.files[i].offset += n as u64;
            if line.trim().is_empty() {
                continue;
            }
            let tp = parse_line(&line, &self.files[i].path, self.files[i].offset)?;
            let term = tp.term.clone();
            self.input_buffers[i].push_back(tp);
            self.heap.push(Reverse((term, i)));
            filled += 1;
        }
        Ok(())
    }

    /// Pop every heap entry for the current minimum term (there is one per
    /// input file that currently holds it), cross-merge their postings,
    /// and refill any input buffer that just went empty.
    fn next_merged_term(&mut self) -> Result<TermPostings> {
        let Reverse((term, _)) = self.heap.peek().cloned().expect("called with a non-empty heap");
        let mut merged: PostingsList = Vec::new();
        while let Some(Reverse((t, _))) = self.heap.peek() {
            if *t != term {
                break;
            }
            let Reverse((_, i)) = self.heap.pop().expect("just peeked");
            let tp = self.input_buffers[i]
                .pop_front()
                .expect("a heap entry always has a matching buffered term");
            merged = merge_postings(&merged, &tp.postings);
            if self.input_buffers[i].is_empty() {
                self.refill(i)?;
            }
        }
        Ok(TermPostings { term, postings: merged })
    }

    /// Run the merge to completion, writing `out_path` and, when
    /// `emit_dictionary` is set, `out_path.dictionary` — a `term : byte
    /// offset` sidecar recording where each merged term's line begins
    /// built only on the final pass.
    pub fn merge_into(
        self,
        out_path: &Path,
        output_buffer_len: usize,
        emit_dictionary: bool,
    ) -> Result<()> {
        let mut merger = self;
        let out_file = File::create(out_path).map_err(|e| {
            Error::new(
                ErrorKind::MergeIo,
                format!("failed to open merge output {}: {}", out_path.display(), e),
            )
        })?;
        let mut out = BufWriter::new(out_file);

        let dict_path = dictionary_path(out_path);
        let mut out_dict = if emit_dictionary {
            Some(BufWriter::new(File::create(&dict_path).map_err(|e| {
                Error::new(
                    ErrorKind::MergeIo,
                    format!("failed to open dictionary sidecar {}: {}", dict_path.display(), e),
                )
            })?))
        } else {
            None
        };

        let mut output_buffer: VecDeque<TermPostings> = VecDeque::new();
        let mut bytes_written: u64 = 0;

        while !merger.heap.is_empty() {
            let tp = merger.next_merged_term()?;
            output_buffer.push_back(tp);
            if output_buffer.len() >= output_buffer_len || merger.heap.is_empty() {
                flush_buffer(&mut out, out_dict.as_mut(), &mut output_buffer, &mut bytes_written)?;
            }
        }

        out.flush()?;
        if let Some(d) = out_dict.as_mut() {
            d.flush()?;
        }
        Ok(())
    }
}

fn flush_buffer(
    out: &mut BufWriter<File>,
    mut out_dict: Option<&mut BufWriter<File>>,
    output_buffer: &mut VecDeque<TermPostings>,
    bytes_written: &mut u64,
) -> Result<()> {
    while let Some(tp) = output_buffer.pop_front() {
        let line = format_line(&tp);
        if let Some(d) = out_dict.as_deref_mut() {
            writeln!(d, "{} : {}", tp.term, bytes_written)?;
        }
        out.write_all(line.as_bytes())?;
        *bytes_written += line.len() as u64;
    }
    Ok(())
}

pub fn dictionary_path(index_path: &Path) -> PathBuf {
    let mut name = index_path.as_os_str().to_owned();
    name.push(".");
    name.push(DICTIONARY_SUFFIX);
    PathBuf::from(name)
}
