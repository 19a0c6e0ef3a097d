use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::index::merger::KWayMerger;

/// Repeatedly merge batches of at most `fan_in` files until a single file
/// remains, so no pass ever holds more than `fan_in` input files open at
/// once. Grounded on `original_source/irspimi/irsystem.py`'s
/// `build_index`/`_merge_index`, which hands SPIMI's block list to a
/// fan-in-bounded multi-pass merger; the merger class body itself
/// (`MultiPassMergeSPIMI`) wasn't present in the available source, so the
/// pass-batching loop below was designed directly against that
/// fan-in-bounded behavior, reusing [`KWayMerger`] as its single-pass
/// primitive.
pub fn merge_multi_pass(
    blocks: Vec<PathBuf>,
    out_path: &Path,
    fan_in: usize,
    input_buffer_len: usize,
    output_buffer_len: usize,
) -> Result<()> {
    assert!(fan_in >= 2, "fan_in must allow at least a 2-way merge");

    let scratch_dir = out_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut current = blocks;
    let mut pass = 0usize;

    loop {
        if current.len() <= fan_in {
            let merger = KWayMerger::new(&current, input_buffer_len)?;
            merger.merge_into(out_path, output_buffer_len, true)?;
            break;
        }

        let mut next_round = Vec::new();
        for (batch_index, batch) in current.chunks(fan_in).enumerate() {
            let partial = scratch_dir.join(format!("SPIMIPASS_{pass}_{batch_index}.blk"));
            let merger = KWayMerger::new(batch, input_buffer_len)?;
            merger.merge_into(&partial, output_buffer_len, false)?;
            next_round.push(partial);
        }

        for old in &current {
            let _ = fs::remove_file(old);
        }

        current = next_round;
        pass += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::codec::parse_line;
    use std::fs::File;
    use std::io::Write;

    fn write_block(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn single_pass_when_blocks_fit_in_one_batch() {
        let dir = tempfile::tempdir().unwrap();
        let b1 = write_block(dir.path(), "b1.blk", &["cat : 1[1]"]);
        let b2 = write_block(dir.path(), "b2.blk", &["dog : 2[1]"]);
        let out = dir.path().join("inverted_index.ii");

        merge_multi_pass(vec![b1, b2], &out, 4, 10, 10).unwrap();

        let contents = std::fs::read_to_string(&out).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn multi_pass_matches_a_single_pass_over_the_same_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let blocks: Vec<PathBuf> = (0..6)
            .map(|i| write_block(dir.path(), &format!("b{i}.blk"), &[&format!("term{i} : {}[1]", i + 1)]))
            .collect();

        let out_single = dir.path().join("single.ii");
        let merger = KWayMerger::new(&blocks, 10).unwrap();
        merger.merge_into(&out_single, 10, true).unwrap();

        let out_multi = dir.path().join("multi.ii");
        merge_multi_pass(blocks.clone(), &out_multi, 2, 10, 10).unwrap();

        let multi_contents = std::fs::read_to_string(&out_multi).unwrap();
        let single_contents = std::fs::read_to_string(&out_single).unwrap();
        let mut multi_terms: Vec<_> = multi_contents
            .lines()
            .map(|l| parse_line(l, &out_multi, 0).unwrap())
            .collect();
        let mut single_terms: Vec<_> = single_contents
            .lines()
            .map(|l| parse_line(l, &out_single, 0).unwrap())
            .collect();
        multi_terms.sort_by(|a, b| a.term.cmp(&b.term));
        single_terms.sort_by(|a, b| a.term.cmp(&b.term));
        assert_eq!(multi_terms, single_terms);
    }

    #[test]
    fn intermediate_partial_files_are_cleaned_up() {
        let dir = tempfile::tempdir().unwrap();
        let blocks: Vec<PathBuf> = (0..5)
            .map(|i| write_block(dir.path(), &format!("b{i}.blk"), &[&format!("term{i} : 1[1]")]))
            .collect();
        let out = dir.path().join("inverted_index.ii");
        merge_multi_pass(blocks, &out, 2, 10, 10).unwrap();

        let leftover: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with("SPIMIPASS") || n.starts_with('b'))
            .collect();
        assert!(leftover.is_empty(), "leftover intermediate files: {leftover:?}");
    }
}
