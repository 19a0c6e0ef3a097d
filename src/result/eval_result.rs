use std::collections::BTreeMap;
use std::path::Path;

use crate::core::types::DocId;
use crate::corpus::sgml::parse_reuters_file;
use crate::index::posting::{Posting, PostingsList, TermPostings};
use crate::rank::RankedHit;

/// Per-document attribution and (optionally) enrichment, ported from
/// `eval_result.py`'s `EvaluationResult`. `terms` is the distinct set of
/// query terms whose postings mention this document (insertion order,
/// built incrementally as the evaluator/ranker visits each term);
/// `positions` is only populated for a Boolean result (the merged
/// positions from the final postings list) and left empty for a ranked
/// result, which has no single combined position list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvalEntry {
    pub terms: Vec<String>,
    pub positions: Vec<u32>,
    pub weight: Option<f64>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EvalResult {
    pub entries: BTreeMap<DocId, EvalEntry>,
    pub ranked: bool,
    /// Populated only by [`EvalResult::update_ranked_results`]: the
    /// matched `DocId`s in ranked order, since `entries` (a `BTreeMap`)
    /// always iterates in `DocId` order regardless of rank.
    pub ranked_order: Vec<DocId>,
}

impl EvalResult {
    pub fn new() -> Self {
        EvalResult::default()
    }

    /// Record which documents a term's postings touch, before the final
    /// Boolean/ranked result is known — mirrors `add_postings` being
    /// called once per visited term during evaluation.
    pub fn add_postings(&mut self, term: &str, postings: &[Posting]) {
        for posting in postings {
            let entry = self.entries.entry(posting.doc_id).or_default();
            if !entry.terms.iter().any(|t| t == term) {
                entry.terms.push(term.to_string());
            }
        }
    }

    pub fn from_term_postings(term_postings: &[TermPostings]) -> Self {
        let mut result = EvalResult::new();
        for tp in term_postings {
            result.add_postings(&tp.term, &tp.postings);
        }
        result
    }

    /// Finalize a Boolean query's result: one entry per matched document,
    /// keeping only the documents in `query_result` but preserving any
    /// term attribution already recorded for them.
    pub fn update_results(&mut self, query_result: &PostingsList) {
        let attributed = std::mem::take(&mut self.entries);
        let mut finalized = BTreeMap::new();
        for posting in query_result {
            let mut entry = attributed.get(&posting.doc_id).cloned().unwrap_or_default();
            entry.positions = posting.positions.clone();
            finalized.insert(posting.doc_id, entry);
        }
        self.entries = finalized;
        self.ranked = false;
    }

    /// Finalize a ranked query's result, in the hits' already-sorted
    /// order (descending weight, ties ascending `DocId`) — `entries`
    /// being a `BTreeMap` would otherwise re-sort by `DocId`, so callers
    /// that need the ranked order should iterate `ranked_order` instead.
    pub fn update_ranked_results(&mut self, hits: &[RankedHit]) {
        let attributed = std::mem::take(&mut self.entries);
        let mut finalized = BTreeMap::new();
        for hit in hits {
            let mut entry = attributed.get(&hit.doc_id).cloned().unwrap_or_default();
            entry.weight = Some(hit.weight);
            finalized.insert(hit.doc_id, entry);
        }
        self.entries = finalized;
        self.ranked = true;
        self.ranked_order = hits.iter().map(|h| h.doc_id).collect();
    }

    pub fn terms_for(&self, doc_id: DocId) -> &[String] {
        self.entries.get(&doc_id).map(|e| e.terms.as_slice()).unwrap_or(&[])
    }

    /// Lazily fetch title/body for the result's documents from the
    /// original corpus files, mirroring `update_details`. `doc_locations`
    /// maps a `DocId` to the source file it was parsed from (the crate
    /// does not index file-per-doc layout, so the caller supplies it).
    pub fn enrich(&mut self, doc_locations: &BTreeMap<DocId, &Path>) {
        for (doc_id, path) in doc_locations {
            if !self.entries.contains_key(doc_id) {
                continue;
            }
            if let Ok(docs) = parse_reuters_file(path) {
                if let Some(doc) = docs.into_iter().find(|d| d.doc_id == doc_id.value()) {
                    if let Some(entry) = self.entries.get_mut(doc_id) {
                        entry.title = Some(doc.title);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_postings_deduplicates_repeated_terms() {
        let mut result = EvalResult::new();
        result.add_postings("cat", &[Posting { doc_id: DocId(1), positions: vec![1] }]);
        result.add_postings("cat", &[Posting { doc_id: DocId(1), positions: vec![4] }]);
        assert_eq!(result.entries[&DocId(1)].terms, vec!["cat".to_string()]);
    }

    #[test]
    fn update_results_keeps_only_matched_docs_with_their_attribution() {
        let mut result = EvalResult::new();
        result.add_postings("cat", &[Posting { doc_id: DocId(1), positions: vec![1] }]);
        result.add_postings("dog", &[Posting { doc_id: DocId(2), positions: vec![2] }]);

        let query_result = vec![Posting { doc_id: DocId(1), positions: vec![1] }];
        result.update_results(&query_result);

        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[&DocId(1)].terms, vec!["cat".to_string()]);
        assert!(!result.ranked);
    }

    #[test]
    fn update_ranked_results_attaches_weights() {
        let mut result = EvalResult::new();
        result.add_postings("cat", &[Posting { doc_id: DocId(1), positions: vec![1] }]);
        let hits = vec![RankedHit { doc_id: DocId(1), weight: 2.5 }];
        result.update_ranked_results(&hits);

        assert_eq!(result.entries[&DocId(1)].weight, Some(2.5));
        assert!(result.ranked);
        assert_eq!(result.ranked_order, vec![DocId(1)]);
    }
}
