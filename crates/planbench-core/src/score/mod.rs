//! Score types for representing solution quality
//!
//! A benchmark run that succeeds carries exactly one score. Scores are
//! immutable, totally ordered (higher is better) and have a textual form
//! that round-trips through [`ParseableScore`].

mod hard_soft;
mod simple;
mod traits;

#[cfg(test)]
mod tests;

pub use hard_soft::HardSoftScore;
pub use simple::SimpleScore;
pub use traits::{ParseableScore, Score, ScoreParseError};
