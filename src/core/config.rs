use std::path::PathBuf;

pub const INDEX_FILE_NAME: &str = "inverted_index.ii";
pub const DICTIONARY_SUFFIX: &str = "dictionary";
pub const DESCRIPTOR_SUFFIX: &str = "desc";

/// Tunables for the build pipeline: `B` (SPIMI memory budget,
/// approximated here as a dictionary-entry count), `k` (merge fan-in),
/// `L` (input buffer length) and `O` (output buffer length).
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub dest_dir: PathBuf,
    pub spill_dir: PathBuf,
    /// SPIMI in-memory budget `B`, approximated as a count of distinct
    /// terms buffered per block.
    pub block_entry_budget: usize,
    /// Merge fan-in `k`: max input files held open by one merge pass.
    pub merge_fan_in: usize,
    /// Input buffer length `L`: lines pre-read per input file per refill.
    pub input_buffer_len: usize,
    /// Output buffer length `O`: merged lines buffered before a flush.
    pub output_buffer_len: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            dest_dir: PathBuf::from("."),
            spill_dir: PathBuf::from("./blocks"),
            block_entry_budget: 65536 / 8, // ~64KB budget, ~8 bytes/entry estimate
            merge_fan_in: 8,
            input_buffer_len: 64,
            output_buffer_len: 64,
        }
    }
}

/// Tunables for a search session (§6 CLI flags for `search`).
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub src_dir: PathBuf,
    pub show_title: bool,
    pub ranked: bool,
    pub k1: f32,
    pub b: f32,
    pub limit: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            src_dir: PathBuf::from("."),
            show_title: false,
            ranked: false,
            k1: 1.2,
            b: 0.75,
            limit: None,
        }
    }
}
