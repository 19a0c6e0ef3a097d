pub mod sgml;
pub mod stream;

pub use stream::CorpusTokenStream;
