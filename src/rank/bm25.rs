use std::collections::HashMap;

use crate::analysis::tokenizer::word_tokenize;
use crate::core::error::Result;
use crate::core::types::DocId;
use crate::index::reader::{IndexReader, Lookup};
use crate::index::posting::TermPostings;

/// One ranked hit: a document and its accumulated BM25 weight.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHit {
    pub doc_id: DocId,
    pub weight: f64,
}

/// Ported from `rank_bm25_eval.py`'s `RankedSearchBM25`. Term-at-a-time
/// Okapi BM25 over a bag-of-words query (no Boolean operators):
/// accumulates one score per `DocId` as each query term's postings are
/// visited in turn.
pub struct Bm25Ranker<'a> {
    reader: &'a mut IndexReader,
    k1: f64,
    b: f64,
}

impl<'a> Bm25Ranker<'a> {
    pub fn new(reader: &'a mut IndexReader, k1: f64, b: f64) -> Self {
        Bm25Ranker { reader, k1, b }
    }

    /// Tokenizes `query` as a bag of words, scores every document that
    /// contains at least one query term, and returns hits sorted
    /// descending by weight, ties broken ascending by `DocId` (the
    /// Python original leaves ties in whatever order `sorted` happens to
    /// produce).
    pub fn search(&mut self, query: &str) -> Result<(Vec<RankedHit>, Vec<TermPostings>)> {
        let terms = word_tokenize(query);
        let mut term_postings_list = Vec::new();
        for term in &terms {
            match self.reader.get_postings(term)? {
                Lookup::Filtered => {}
                Lookup::Empty(t) => term_postings_list.push(TermPostings { term: t, postings: Vec::new() }),
                Lookup::Found(tp) => term_postings_list.push(tp),
            }
        }

        let doc_count = self.reader.doc_count() as f64;
        let avg_doc_length = self.reader.avg_doc_length();

        let mut accumulators: HashMap<DocId, f64> = HashMap::new();
        for tp in &term_postings_list {
            let idf = if tp.postings.is_empty() {
                0.0
            } else {
                (doc_count / tp.postings.len() as f64).log2()
            };
            for posting in &tp.postings {
                let tf = posting.positions.len() as f64;
                let dl = self.reader.doc_length(posting.doc_id) as f64;
                let term_weight = self.bm25_term_weight(idf, tf, dl, avg_doc_length);
                *accumulators.entry(posting.doc_id).or_insert(0.0) += term_weight;
            }
        }

        let mut hits: Vec<RankedHit> = accumulators
            .into_iter()
            .map(|(doc_id, weight)| RankedHit { doc_id, weight })
            .collect();
        hits.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });

        Ok((hits, term_postings_list))
    }

    fn bm25_term_weight(&self, idf: f64, tf: f64, dl: f64, avg_doc_length: f64) -> f64 {
        let denom = self.k1 * ((1.0 - self.b) + self.b * (dl / avg_doc_length)) + tf;
        idf * ((self.k1 + 1.0) * tf) / denom
    }
}
