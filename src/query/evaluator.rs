use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::index::posting::{intersect, subtract, union, PostingsList};
use crate::index::reader::{IndexReader, Lookup};
use crate::query::ast::{BinOpKind, Node};

/// Tree-walking evaluator, ported from `expression_eval.py`'s
/// `Evaluator`. The filtered-term rule: `AND` treats a filtered operand as
/// identity (the non-filtered side stands alone), `OR` treats it as the
/// empty postings list (so the non-filtered side still stands alone), and
/// `NOT` treats its filtered child as empty (so `NOT <filtered> =
/// universe`). `postings_by_term` collects one entry per distinct term
/// actually looked up, for the result module's term attribution.
pub struct Evaluator<'a> {
    reader: &'a mut IndexReader,
    pub postings_by_term: BTreeMap<String, PostingsList>,
}

impl<'a> Evaluator<'a> {
    pub fn new(reader: &'a mut IndexReader) -> Self {
        Evaluator {
            reader,
            postings_by_term: BTreeMap::new(),
        }
    }

    pub fn evaluate(&mut self, node: &Node) -> Result<PostingsList> {
        Ok(self.visit(node)?.unwrap_or_default())
    }

    /// `None` means "this subtree is the identity element" (an
    /// all-filtered term or subtree), distinct from a present-but-empty
    /// result list.
    fn visit(&mut self, node: &Node) -> Result<Option<PostingsList>> {
        match node {
            Node::Term(term) => self.visit_term(term),
            Node::BinOp(BinOpKind::And, left, right) => {
                let lp = self.visit(left)?;
                let rp = self.visit(right)?;
                Ok(match (lp, rp) {
                    (None, None) => None,
                    (None, Some(r)) => Some(r),
                    (Some(l), None) => Some(l),
                    (Some(l), Some(r)) => Some(intersect(&l, &r)),
                })
            }
            Node::BinOp(BinOpKind::Or, left, right) => {
                let lp = self.visit(left)?.unwrap_or_default();
                let rp = self.visit(right)?.unwrap_or_default();
                Ok(Some(union(&lp, &rp)))
            }
            Node::Not(child) => {
                let cp = self.visit(child)?.unwrap_or_default();
                let universe = self.reader.universe();
                Ok(Some(subtract(&universe, &cp)))
            }
        }
    }

    fn visit_term(&mut self, term: &str) -> Result<Option<PostingsList>> {
        match self.reader.get_postings(term)? {
            Lookup::Filtered => Ok(None),
            Lookup::Empty(t) => {
                self.postings_by_term.insert(t, Vec::new());
                Ok(Some(Vec::new()))
            }
            Lookup::Found(tp) => {
                self.postings_by_term.insert(tp.term.clone(), tp.postings.clone());
                Ok(Some(tp.postings))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DocId;
    use crate::index::descriptor::{descriptor_path, Descriptor};
    use crate::index::merger::dictionary_path;
    use crate::index::posting::Posting;
    use crate::query::parser::Parser;
    use std::collections::BTreeMap as StdBTreeMap;
    use std::fs::File;
    use std::io::Write;

    fn fixture(dir: &std::path::Path, compression_recipe: &str) -> std::path::PathBuf {
        let index_path = dir.join("inverted_index.ii");
        let mut f = File::create(&index_path).unwrap();
        let line1 = "cat : 1[1],2[3]\n";
        write!(f, "{line1}").unwrap();
        let line2 = "dog : 2[1],3[2]\n";
        write!(f, "{line2}").unwrap();

        let mut dict = File::create(dictionary_path(&index_path)).unwrap();
        writeln!(dict, "cat : 0").unwrap();
        writeln!(dict, "dog : {}", line1.len()).unwrap();

        let mut lengths = StdBTreeMap::new();
        lengths.insert(1, 1);
        lengths.insert(2, 2);
        lengths.insert(3, 1);
        let descriptor = Descriptor::new(vec![DocId(1), DocId(2), DocId(3)], lengths, compression_recipe.to_string());
        descriptor.write_to_file(&descriptor_path(&index_path)).unwrap();

        index_path
    }

    #[test]
    fn and_intersects() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = fixture(dir.path(), "");
        let mut reader = IndexReader::open(&index_path).unwrap();
        let node = Parser::new("cat AND dog").parse().unwrap();
        let result = Evaluator::new(&mut reader).evaluate(&node).unwrap();
        assert_eq!(result, vec![Posting { doc_id: DocId(2), positions: vec![1, 3] }]);
    }

    #[test]
    fn or_unions() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = fixture(dir.path(), "");
        let mut reader = IndexReader::open(&index_path).unwrap();
        let node = Parser::new("cat OR dog").parse().unwrap();
        let result = Evaluator::new(&mut reader).evaluate(&node).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn not_subtracts_from_universe() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = fixture(dir.path(), "");
        let mut reader = IndexReader::open(&index_path).unwrap();
        let node = Parser::new("NOT cat").parse().unwrap();
        let result = Evaluator::new(&mut reader).evaluate(&node).unwrap();
        assert_eq!(result.iter().map(|p| p.doc_id).collect::<Vec<_>>(), vec![DocId(3)]);
    }

    #[test]
    fn filtered_term_is_identity_under_and_and_or() {
        let dir = tempfile::tempdir().unwrap();
        let mut stopfile = tempfile::NamedTempFile::new().unwrap();
        writeln!(stopfile, "the").unwrap();
        let recipe = format!("stopw:1:{}", stopfile.path().display());
        let index_path = fixture(dir.path(), &recipe);

        let mut reader = IndexReader::open(&index_path).unwrap();
        let and_node = Parser::new("cat AND the").parse().unwrap();
        let and_result = Evaluator::new(&mut reader).evaluate(&and_node).unwrap();
        assert_eq!(and_result, vec![
            Posting { doc_id: DocId(1), positions: vec![1] },
            Posting { doc_id: DocId(2), positions: vec![3] },
        ]);

        let mut reader2 = IndexReader::open(&index_path).unwrap();
        let or_node = Parser::new("cat OR the").parse().unwrap();
        let or_result = Evaluator::new(&mut reader2).evaluate(&or_node).unwrap();
        assert_eq!(or_result, and_result);
    }

    #[test]
    fn not_filtered_is_the_full_universe() {
        let dir = tempfile::tempdir().unwrap();
        let mut stopfile = tempfile::NamedTempFile::new().unwrap();
        writeln!(stopfile, "the").unwrap();
        let recipe = format!("stopw:1:{}", stopfile.path().display());
        let index_path = fixture(dir.path(), &recipe);
        let mut reader = IndexReader::open(&index_path).unwrap();
        let node = Parser::new("NOT the").parse().unwrap();
        let result = Evaluator::new(&mut reader).evaluate(&node).unwrap();
        assert_eq!(result.len(), 3);
    }
}
