pub mod recipe;

pub use recipe::{Filter, StopWordSet};
