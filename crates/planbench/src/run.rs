//! Per-run result record and its lifecycle.
//!
//! A run starts as a [`PendingRun`] owned by the runner that executes it.
//! Finalizing consumes the pending run and produces an immutable
//! [`BenchmarkRunResult`], so a record can never be written after it was
//! handed to aggregation or reporting.
//!
//! `PendingRun` is a single-writer value: it is not meant to be shared
//! between threads while pending. A finalized `BenchmarkRunResult` has no
//! mutators and can be shared freely (for example behind an `Arc`).

use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use planbench_core::{BenchmarkError, Result, Score};

use crate::failure::RunFailure;

/// Lifecycle state of a run.
///
/// `Pending` only ever describes a [`PendingRun`]; finalized records are
/// always `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Still owned by its runner; no terminal metric is fixed.
    Pending,
    /// Finished with a score.
    Succeeded,
    /// Finished with a captured failure.
    Failed,
}

impl RunState {
    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, RunState::Pending)
    }

    /// The tri-state `succeeded` flag: `None` while pending.
    pub fn succeeded(self) -> Option<bool> {
        match self {
            RunState::Pending => None,
            RunState::Succeeded => Some(true),
            RunState::Failed => Some(false),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Pending => "PENDING",
            RunState::Succeeded => "SUCCEEDED",
            RunState::Failed => "FAILED",
        };
        f.write_str(label)
    }
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<Sc: Score> {
    Succeeded { score: Sc },
    Failed { failure: RunFailure },
}

// Metrics writable while pending, carried unchanged into the finalized record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunMetrics {
    pub(crate) calculate_count: u64,
    pub(crate) planning_entity_count: Option<u64>,
    pub(crate) problem_scale: u64,
    pub(crate) used_memory_after_input_solution: Option<u64>,
}

pub(crate) fn non_negative(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| {
        BenchmarkError::InvalidArgument(format!("{} must be >= 0, got {}", field, value))
    })
}

pub(crate) fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(BenchmarkError::InvalidArgument(
            "run id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// A run that has been scheduled but not finalized.
///
/// # Example
///
/// ```
/// use planbench::{PendingRun, RunState};
/// use planbench_core::SimpleScore;
///
/// let mut run = PendingRun::<SimpleScore>::new("bench-1").unwrap();
/// assert_eq!(run.state(), RunState::Pending);
///
/// run.record_problem_metrics(Some(50), Some(1000), Some(2_000_000)).unwrap();
/// run.record_calculate_count(12_000).unwrap();
///
/// let result = run.succeed(SimpleScore::of(-120), 3400).unwrap();
/// assert_eq!(result.state(), RunState::Succeeded);
/// assert_eq!(result.score(), Some(&SimpleScore::of(-120)));
/// assert!(result.failure().is_none());
/// ```
///
/// A pending run cannot be duplicated, so it is finalized at most once:
///
/// ```compile_fail
/// use planbench::{PendingRun, RunFailure};
/// use planbench_core::SimpleScore;
///
/// let run = PendingRun::<SimpleScore>::new("bench-1").unwrap();
/// let twin = run.clone();
/// run.succeed(SimpleScore::of(-120), 3400).unwrap();
/// twin.fail(RunFailure::new("OutOfMemory"), 500).unwrap();
/// ```
#[derive(Debug)]
pub struct PendingRun<Sc: Score> {
    id: String,
    metrics: RunMetrics,
    _score: PhantomData<fn() -> Sc>,
}

impl<Sc: Score> PendingRun<Sc> {
    /// Creates a pending run.
    ///
    /// Session-wide uniqueness of `id` is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `id` is empty or only whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_id(&id)?;
        Ok(Self {
            id,
            metrics: RunMetrics::default(),
            _score: PhantomData,
        })
    }

    /// Sets the number of evaluation steps performed so far.
    ///
    /// Overwrites the previous value.
    pub fn record_calculate_count(&mut self, count: i64) -> Result<()> {
        self.metrics.calculate_count = non_negative("calculateCount", count)?;
        Ok(())
    }

    /// Sets problem-size metrics.
    ///
    /// Each argument is optional; `None` keeps the current value. If any
    /// present value is negative nothing is written.
    pub fn record_problem_metrics(
        &mut self,
        planning_entity_count: Option<i64>,
        problem_scale: Option<i64>,
        used_memory_bytes: Option<i64>,
    ) -> Result<()> {
        let entity_count = planning_entity_count
            .map(|n| non_negative("planningEntityCount", n))
            .transpose()?;
        let scale = problem_scale
            .map(|n| non_negative("problemScale", n))
            .transpose()?;
        let memory = used_memory_bytes
            .map(|n| non_negative("usedMemoryAfterInputSolution", n))
            .transpose()?;

        self.set_problem_metrics(entity_count, scale, memory);
        Ok(())
    }

    pub(crate) fn set_calculate_count(&mut self, count: u64) {
        self.metrics.calculate_count = count;
    }

    pub(crate) fn set_problem_metrics(
        &mut self,
        planning_entity_count: Option<u64>,
        problem_scale: Option<u64>,
        used_memory_bytes: Option<u64>,
    ) {
        if let Some(n) = planning_entity_count {
            self.metrics.planning_entity_count = Some(n);
        }
        if let Some(n) = problem_scale {
            self.metrics.problem_scale = n;
        }
        if let Some(n) = used_memory_bytes {
            self.metrics.used_memory_after_input_solution = Some(n);
        }
    }

    /// Finalizes the run as succeeded.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `time_millis_spent` is negative.
    pub fn succeed(self, score: Sc, time_millis_spent: i64) -> Result<BenchmarkRunResult<Sc>> {
        let time = non_negative("timeMillisSpend", time_millis_spent)?;
        Ok(self.finish(RunOutcome::Succeeded { score }, time))
    }

    /// Finalizes the run as failed. The score stays absent.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `time_millis_spent` is negative.
    pub fn fail(self, failure: RunFailure, time_millis_spent: i64) -> Result<BenchmarkRunResult<Sc>> {
        let time = non_negative("timeMillisSpend", time_millis_spent)?;
        Ok(self.finish(RunOutcome::Failed { failure }, time))
    }

    pub(crate) fn finish(self, outcome: RunOutcome<Sc>, time_millis_spent: u64) -> BenchmarkRunResult<Sc> {
        BenchmarkRunResult {
            id: self.id,
            time_millis_spent,
            metrics: self.metrics,
            outcome,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Always [`RunState::Pending`].
    pub fn state(&self) -> RunState {
        RunState::Pending
    }

    pub fn calculate_count(&self) -> u64 {
        self.metrics.calculate_count
    }

    pub fn planning_entity_count(&self) -> Option<u64> {
        self.metrics.planning_entity_count
    }

    pub fn problem_scale(&self) -> u64 {
        self.metrics.problem_scale
    }

    pub fn used_memory_after_input_solution(&self) -> Option<u64> {
        self.metrics.used_memory_after_input_solution
    }
}

/// The finalized, read-only result of one benchmark run.
///
/// `succeeded() == false` exactly when a failure is present, and a succeeded
/// run always has a score; both follow from the stored [`RunOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRunResult<Sc: Score> {
    id: String,
    time_millis_spent: u64,
    metrics: RunMetrics,
    outcome: RunOutcome<Sc>,
}

impl<Sc: Score> BenchmarkRunResult<Sc> {
    pub(crate) fn from_parts(
        id: String,
        time_millis_spent: u64,
        metrics: RunMetrics,
        outcome: RunOutcome<Sc>,
    ) -> Self {
        Self {
            id,
            time_millis_spent,
            metrics,
            outcome,
        }
    }

    /// Returns the run id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wall-clock time the run spent solving, in milliseconds.
    pub fn time_millis_spent(&self) -> u64 {
        self.time_millis_spent
    }

    /// Same as [`time_millis_spent`](Self::time_millis_spent) as a `Duration`.
    pub fn time_spent(&self) -> Duration {
        Duration::from_millis(self.time_millis_spent)
    }

    /// Number of evaluation steps performed.
    pub fn calculate_count(&self) -> u64 {
        self.metrics.calculate_count
    }

    /// The final score; `None` for failed runs.
    pub fn score(&self) -> Option<&Sc> {
        match &self.outcome {
            RunOutcome::Succeeded { score } => Some(score),
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn planning_entity_count(&self) -> Option<u64> {
        self.metrics.planning_entity_count
    }

    /// Memory in use after the input problem was loaded, in bytes.
    pub fn used_memory_after_input_solution(&self) -> Option<u64> {
        self.metrics.used_memory_after_input_solution
    }

    pub fn problem_scale(&self) -> u64 {
        self.metrics.problem_scale
    }

    /// Either `Succeeded` or `Failed`.
    pub fn state(&self) -> RunState {
        match self.outcome {
            RunOutcome::Succeeded { .. } => RunState::Succeeded,
            RunOutcome::Failed { .. } => RunState::Failed,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, RunOutcome::Succeeded { .. })
    }

    pub fn failed(&self) -> bool {
        !self.succeeded()
    }

    /// The captured failure; `None` for succeeded runs.
    pub fn failure(&self) -> Option<&RunFailure> {
        match &self.outcome {
            RunOutcome::Succeeded { .. } => None,
            RunOutcome::Failed { failure } => Some(failure),
        }
    }

    pub fn outcome(&self) -> &RunOutcome<Sc> {
        &self.outcome
    }

    /// Evaluation steps per second, or `None` when no time was spent.
    pub fn calculate_speed(&self) -> Option<f64> {
        if self.time_millis_spent == 0 {
            None
        } else {
            Some(self.metrics.calculate_count as f64 * 1000.0 / self.time_millis_spent as f64)
        }
    }
}
