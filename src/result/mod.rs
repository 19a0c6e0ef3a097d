pub mod eval_result;

pub use eval_result::{EvalEntry, EvalResult};
