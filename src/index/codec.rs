use std::path::Path;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::DocId;
use crate::index::posting::{Posting, TermPostings};

/// Serialize one term's postings to the external line format:
/// `<term> : <docId>[<p1>|<p2>|…],<docId2>[…],…\n`. The exact inverse
/// of [`parse_line`] (the codec round-trip law).
pub fn format_line(tp: &TermPostings) -> String {
    let postings = tp
        .postings
        .iter()
        .map(|p| {
            let positions = p
                .positions
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("|");
            format!("{}[{}]", p.doc_id.value(), positions)
        })
        .collect::<Vec<_>>()
        .join(",");
    format!("{} : {}\n", tp.term, postings)
}

/// Parse one codec line. `file`/`offset` are attached to any `Codec`
/// error for debugging context.
pub fn parse_line(line: &str, file: &Path, offset: u64) -> Result<TermPostings> {
    let line = line.trim_end_matches(['\n', '\r']);
    let (term, raw_postings) = line.split_once(" : ").ok_or_else(|| {
        Error::codec_at("missing ' : ' separator in postings line", file, offset)
    })?;

    let mut postings = Vec::new();
    if !raw_postings.is_empty() {
        for entry in raw_postings.split(',') {
            postings.push(parse_entry(entry, file, offset)?);
        }
    }

    Ok(TermPostings {
        term: term.to_string(),
        postings,
    })
}

fn parse_entry(entry: &str, file: &Path, offset: u64) -> Result<Posting> {
    let open = entry
        .find('[')
        .ok_or_else(|| Error::codec_at(format!("missing '[' in posting entry '{entry}'"), file, offset))?;
    let close = entry
        .rfind(']')
        .ok_or_else(|| Error::codec_at(format!("missing ']' in posting entry '{entry}'"), file, offset))?;
    if close < open {
        return Err(Error::codec_at(
            format!("malformed posting entry '{entry}'"),
            file,
            offset,
        ));
    }

    let doc_id: u64 = entry[..open]
        .parse()
        .map_err(|_| Error::codec_at(format!("bad docId in posting entry '{entry}'"), file, offset))?;

    let positions_str = &entry[open + 1..close];
    let mut positions = Vec::new();
    if !positions_str.is_empty() {
        for pos_str in positions_str.split('|') {
            let pos: u32 = pos_str
                .parse()
                .map_err(|_| Error::codec_at(format!("bad position in posting entry '{entry}'"), file, offset))?;
            positions.push(pos);
        }
    }

    Ok(Posting {
        doc_id: DocId(doc_id),
        positions,
    })
}
