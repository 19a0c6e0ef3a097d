pub mod codec;
pub mod descriptor;
pub mod driver;
pub mod merger;
pub mod posting;
pub mod reader;
pub mod spimi;

pub use descriptor::Descriptor;
pub use posting::{intersect, merge_postings, subtract, union, universe_postings, Posting, PostingsList, TermPostings};
pub use reader::{IndexReader, Lookup};
