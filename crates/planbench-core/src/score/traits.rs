//! Core Score trait definition

use std::fmt::{Debug, Display};
use std::ops::{Add, Sub};

use thiserror::Error;

/// Core trait for all score types.
///
/// Scores compare solutions produced by different solver configurations.
/// When comparing multi-level scores, higher-priority levels are compared
/// first; a greater score is a better one.
pub trait Score:
    Copy
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + Add<Output = Self>
    + Sub<Output = Self>
    + 'static
{
    /// Returns true if all hard constraints are satisfied.
    fn is_feasible(&self) -> bool;

    /// Returns the zero score (identity element for addition).
    fn zero() -> Self;

    /// Returns the number of score levels.
    fn levels_count() -> usize;

    /// Returns the level values, highest priority first.
    fn to_level_numbers(&self) -> Vec<i64>;

    /// Creates a score from level numbers, highest priority first.
    ///
    /// # Panics
    /// Panics if the number of levels doesn't match `levels_count()`.
    fn from_level_numbers(levels: &[i64]) -> Self;

    /// Divides every level by a scalar, rounding to the nearest integer.
    ///
    /// Used to average scores across runs.
    fn divide(&self, divisor: f64) -> Self;

    /// Returns true if this score is better than the other score.
    fn is_better_than(&self, other: &Self) -> bool {
        self > other
    }
}

/// Scores with a stable textual representation.
///
/// The textual form is what reports and serialized run records carry.
pub trait ParseableScore: Score {
    /// Parses a score from its string representation.
    ///
    /// # Format
    /// - SimpleScore: "42"
    /// - HardSoftScore: "0hard/-100soft"
    fn parse(s: &str) -> Result<Self, ScoreParseError>;

    /// Returns the string representation of this score.
    fn to_string_repr(&self) -> String;
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
