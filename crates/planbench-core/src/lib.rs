//! planbench Core - score and error types shared by the benchmark crates
//!
//! This crate provides:
//! - Score types representing the quality of a solved planning problem
//! - The error taxonomy for benchmark record protocol violations

pub mod error;
pub mod score;

pub use error::{BenchmarkError, Result};
pub use score::{HardSoftScore, ParseableScore, Score, ScoreParseError, SimpleScore};
