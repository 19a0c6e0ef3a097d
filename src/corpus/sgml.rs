use std::fs;
use std::path::Path;

use crate::core::error::Result;

/// One parsed `<REUTERS>` record: a document identifier plus its
/// indexable text. A minimal, tolerant scanner grounded on
/// `original_source/irspimi/reuters.py`'s `ReutersDocument`, which strips
/// the `UNKNOWN`/`MKNOTE` tags and concatenates `TITLE` + body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReutersDocument {
    pub doc_id: u64,
    pub title: String,
    pub body: String,
}

impl ReutersDocument {
    /// Text to tokenize for indexing: title followed by body.
    pub fn indexable_text(&self) -> String {
        if self.title.is_empty() {
            self.body.clone()
        } else {
            format!("{} {}", self.title, self.body)
        }
    }
}

/// Parse every `<REUTERS ...>...</REUTERS>` record out of one SGML file,
/// in file order. Unreadable files are the caller's concern — an
/// `InputMissing` error is handled by the corpus stream, not here.
pub fn parse_reuters_file(path: &Path) -> Result<Vec<ReutersDocument>> {
    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    Ok(parse_reuters_str(&text))
}

pub fn parse_reuters_str(text: &str) -> Vec<ReutersDocument> {
    let mut docs = Vec::new();
    let lower = text.to_ascii_lowercase();
    let mut search_from = 0usize;

    while let Some(open_start) = find_ci(&lower, search_from, "<reuters") {
        let open_end = match lower[open_start..].find('>') {
            Some(rel) => open_start + rel + 1,
            None => break,
        };
        let close = match find_ci(&lower, open_end, "</reuters>") {
            Some(pos) => pos,
            None => break,
        };
        let close_end = close + "</reuters>".len();

        let open_tag = &text[open_start..open_end];
        let body_block = &text[open_end..close];

        if let Some(doc_id) = extract_attr(open_tag, "newid") {
            let title = extract_tag(body_block, "title")
                .map(|s| clean_inline(&s))
                .unwrap_or_default();
            let body = extract_tag(body_block, "body")
                .map(|s| clean_inline(&s))
                .unwrap_or_else(|| {
                    extract_tag(body_block, "text")
                        .map(|s| clean_text_fallback(&s))
                        .unwrap_or_default()
                });
            docs.push(ReutersDocument { doc_id, title, body });
        }

        search_from = close_end;
    }

    docs
}

fn find_ci(lower_haystack: &str, from: usize, needle_lower: &str) -> Option<usize> {
    lower_haystack[from..].find(needle_lower).map(|rel| from + rel)
}

/// Extract `name="value"` (or `name=value`) from a tag's opening angle
/// bracket text, case-insensitively.
fn extract_attr(open_tag: &str, name: &str) -> Option<u64> {
    let lower = open_tag.to_ascii_lowercase();
    let needle = format!("{name}=");
    let pos = lower.find(&needle)? + needle.len();
    let rest = &open_tag[pos..];
    let rest = rest.strip_prefix('"').unwrap_or(rest);
    let value: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    value.parse().ok()
}

/// Extract the content of the first `<tag>...</tag>` found in `haystack`,
/// case-insensitively.
fn extract_tag(haystack: &str, tag: &str) -> Option<String> {
    let lower = haystack.to_ascii_lowercase();
    let open_needle = format!("<{tag}");
    let open_start = find_ci(&lower, 0, &open_needle)?;
    let open_end = open_start + lower[open_start..].find('>')? + 1;
    let close_needle = format!("</{tag}>");
    let close = find_ci(&lower, open_end, &close_needle)?;
    Some(haystack[open_end..close].to_string())
}

/// Remove nested tags (e.g. `UNKNOWN`, `MKNOTE` inside `BODY`) and fold
/// newlines/carriage returns to spaces, mirroring `get_tokens`'
/// `translate(str.maketrans('\n\r', '  '))`.
fn clean_inline(s: &str) -> String {
    clean_text_fallback(s)
}

/// Used only for the `<TEXT>` fallback path: drop the `UNKNOWN`/`MKNOTE`
/// tags *and* their content (the "bogus or unnecessary tags" `reuters.py`'s
/// `_clean_tags` extracts wholesale), then strip any remaining markup.
fn clean_text_fallback(s: &str) -> String {
    let without_unknown = remove_tag_with_content(s, "unknown");
    let without_mknote = remove_tag_with_content(&without_unknown, "mknote");
    strip_tags(&without_mknote).replace(['\n', '\r'], " ")
}

fn remove_tag_with_content(haystack: &str, tag: &str) -> String {
    let mut result = String::new();
    let mut rest = haystack;
    loop {
        let lower = rest.to_ascii_lowercase();
        let open_needle = format!("<{tag}");
        let Some(open_start) = lower.find(&open_needle) else {
            result.push_str(rest);
            break;
        };
        let Some(gt_rel) = lower[open_start..].find('>') else {
            result.push_str(rest);
            break;
        };
        let close_needle = format!("</{tag}>");
        let search_from = open_start + gt_rel + 1;
        match find_ci(&lower, search_from, &close_needle) {
            Some(close) => {
                result.push_str(&rest[..open_start]);
                rest = &rest[close + close_needle.len()..];
            }
            None => {
                result.push_str(&rest[..open_start]);
                break;
            }
        }
    }
    result
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = (depth - 1).max(0),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
