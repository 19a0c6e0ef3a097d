use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;

use crate::analysis::tokenizer::word_tokenize;
use crate::compression::Filter;
use crate::core::types::DocId;
use crate::corpus::sgml::{parse_reuters_file, ReutersDocument};

/// A lazy `(term, docId, position)` stream over an ordered list of
/// source files, with the compression chain applied per token. Mirrors
/// `original_source/irspimi/reuters.py`'s `ReutersCorpusStream`, with one
/// deliberate change: position only advances on an *emitted* token (the
/// Python original advances position before testing the drop — see
/// DESIGN.md for why this crate locks the other behavior instead).
pub struct CorpusTokenStream {
    files: VecDeque<PathBuf>,
    pending_docs: VecDeque<ReutersDocument>,
    compression: Option<Filter>,
    current_doc_id: Option<DocId>,
    current_tokens: VecDeque<String>,
    current_pos: u32,
    pub doc_id_list: Vec<DocId>,
    pub doc_lengths: BTreeMap<u64, u32>,
}

impl CorpusTokenStream {
    pub fn new(files: Vec<PathBuf>, compression: Option<Filter>) -> Self {
        CorpusTokenStream {
            files: files.into(),
            pending_docs: VecDeque::new(),
            compression,
            current_doc_id: None,
            current_tokens: VecDeque::new(),
            current_pos: 0,
            doc_id_list: Vec::new(),
            doc_lengths: BTreeMap::new(),
        }
    }

    /// Pull the next document, parsing source files one at a time until
    /// one yields documents or the file list is exhausted. Unreadable
    /// files are skipped with a warning, never fatal.
    fn next_doc(&mut self) -> Option<ReutersDocument> {
        loop {
            if let Some(doc) = self.pending_docs.pop_front() {
                return Some(doc);
            }
            let path = self.files.pop_front()?;
            match parse_reuters_file(&path) {
                Ok(docs) => self.pending_docs = docs.into(),
                Err(e) => eprintln!("warning: skipping unreadable source file {}: {}", path.display(), e),
            }
        }
    }
}

impl Iterator for CorpusTokenStream {
    type Item = (String, DocId, u32);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while self.current_tokens.is_empty() {
                if let Some(doc_id) = self.current_doc_id.take() {
                    self.doc_lengths.insert(doc_id.value(), self.current_pos);
                }
                let doc = self.next_doc()?;
                let doc_id = DocId::new(doc.doc_id);
                self.current_doc_id = Some(doc_id);
                self.doc_id_list.push(doc_id);
                self.current_tokens = word_tokenize(&doc.indexable_text()).into();
                self.current_pos = 0;
            }

            let raw = self.current_tokens.pop_front().expect("checked non-empty above");
            let compressed = match &self.compression {
                Some(filter) => filter.apply(&raw),
                None => Some(raw),
            };

            if let Some(term) = compressed {
                self.current_pos += 1;
                let doc_id = self.current_doc_id.expect("set when a document starts");
                return Some((term, doc_id, self.current_pos));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_sgml(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn emits_positional_tokens_in_reading_order() {
        let f1 = write_sgml(
            r#"<REUTERS NEWID="1"><TITLE></TITLE><BODY>The cat sat</BODY></REUTERS>"#,
        );
        let f2 = write_sgml(
            r#"<REUTERS NEWID="2"><TITLE></TITLE><BODY>The dog sat</BODY></REUTERS>"#,
        );
        let stream = CorpusTokenStream::new(
            vec![f1.path().to_path_buf(), f2.path().to_path_buf()],
            Some(Filter::CaseFolding),
        );
        let tokens: Vec<_> = stream.collect();
        assert_eq!(
            tokens,
            vec![
                ("the".to_string(), DocId(1), 1),
                ("cat".to_string(), DocId(1), 2),
                ("sat".to_string(), DocId(1), 3),
                ("the".to_string(), DocId(2), 1),
                ("dog".to_string(), DocId(2), 2),
                ("sat".to_string(), DocId(2), 3),
            ]
        );
    }

    #[test]
    fn dropped_tokens_do_not_advance_position() {
        use crate::compression::StopWordSet;
        let mut stopfile = tempfile::NamedTempFile::new().unwrap();
        writeln!(stopfile, "the").unwrap();
        let f1 = write_sgml(
            r#"<REUTERS NEWID="1"><TITLE></TITLE><BODY>The cat The sat</BODY></REUTERS>"#,
        );
        let chain = Filter::Chain(vec![
            Filter::CaseFolding,
            Filter::NoStopWords(StopWordSet::load(1, stopfile.path()).unwrap()),
        ]);
        let stream = CorpusTokenStream::new(vec![f1.path().to_path_buf()], Some(chain));
        let tokens: Vec<_> = stream.collect();
        assert_eq!(
            tokens,
            vec![
                ("cat".to_string(), DocId(1), 1),
                ("sat".to_string(), DocId(1), 2),
            ]
        );
    }

    #[test]
    fn records_doc_id_list_and_doc_lengths() {
        let f1 = write_sgml(
            r#"<REUTERS NEWID="7"><TITLE></TITLE><BODY>one two three</BODY></REUTERS>"#,
        );
        let mut stream = CorpusTokenStream::new(vec![f1.path().to_path_buf()], None);
        let _: Vec<_> = (&mut stream).collect();
        assert_eq!(stream.doc_id_list, vec![DocId(7)]);
        assert_eq!(stream.doc_lengths.get(&7), Some(&3));
    }

    #[test]
    fn skips_a_content_empty_document_and_continues() {
        let f1 = write_sgml(
            r#"<REUTERS NEWID="1"></REUTERS><REUTERS NEWID="2"><TITLE></TITLE><BODY>cat</BODY></REUTERS>"#,
        );
        let stream = CorpusTokenStream::new(vec![f1.path().to_path_buf()], None);
        let tokens: Vec<_> = stream.collect();
        assert_eq!(tokens, vec![("cat".to_string(), DocId(2), 1)]);
    }

    #[test]
    fn skips_unreadable_file_and_continues() {
        let missing = PathBuf::from("/nonexistent/path/does-not-exist.sgm");
        let f1 = write_sgml(
            r#"<REUTERS NEWID="1"><TITLE></TITLE><BODY>cat</BODY></REUTERS>"#,
        );
        let stream = CorpusTokenStream::new(vec![missing, f1.path().to_path_buf()], None);
        let tokens: Vec<_> = stream.collect();
        assert_eq!(tokens, vec![("cat".to_string(), DocId(1), 1)]);
    }
}
