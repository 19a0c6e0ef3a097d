//! A SPIMI-based positional inverted index builder and Boolean/BM25
//! query engine over a Reuters-21578-style newswire corpus.
//!
//! ```text
//!  corpus files --> corpus::CorpusTokenStream --> index::spimi::SpimiInverter
//!                                                        |
//!                                                        v
//!                                               index::driver::merge_multi_pass
//!                                           (index::merger::KWayMerger, repeated)
//!                                                        |
//!                                                        v
//!                                   inverted_index.ii / .dictionary / .desc
//!                                                        |
//!                                                        v
//!                                              index::reader::IndexReader
//!                                              /                        \
//!                                query::{Parser, Evaluator}        rank::Bm25Ranker
//!                                                        \                /
//!                                                         v              v
//!                                                     result::EvalResult
//! ```

pub mod analysis;
pub mod cli;
pub mod compression;
pub mod core;
pub mod corpus;
pub mod index;
pub mod query;
pub mod rank;
pub mod result;
