//! Runner-side handle over one run's lifecycle.

use planbench_core::{BenchmarkError, Result, Score};

use crate::failure::RunFailure;
use crate::run::{non_negative, BenchmarkRunResult, PendingRun, RunOutcome, RunState};

/// A `&mut`-style handle that owns one run from creation to finalization.
///
/// [`PendingRun`] enforces single finalization by moving itself into the
/// result. Harness code that has to keep a stable handle across several
/// code paths (a completion path and a timeout path, for example) uses a
/// `RunRecorder` instead: every mutator or finalizer called after the run
/// was finalized returns [`BenchmarkError::InvalidState`].
///
/// Not meant for concurrent writers; wrap it in a lock if several threads
/// may race to finalize.
///
/// # Example
///
/// ```
/// use planbench::{RunFailure, RunRecorder, RunState};
/// use planbench_core::SimpleScore;
///
/// let mut recorder = RunRecorder::<SimpleScore>::new("bench-2").unwrap();
/// recorder.mark_failed(RunFailure::new("OutOfMemory"), 500).unwrap();
///
/// let err = recorder.mark_succeeded(SimpleScore::of(0), 600).unwrap_err();
/// assert!(err.is_invalid_state());
///
/// let result = recorder.into_result().unwrap();
/// assert_eq!(result.state(), RunState::Failed);
/// ```
///
/// Recorders cannot be duplicated either:
///
/// ```compile_fail
/// use planbench::RunRecorder;
/// use planbench_core::SimpleScore;
///
/// let recorder = RunRecorder::<SimpleScore>::new("bench-1").unwrap();
/// let _twin = recorder.clone();
/// ```
#[derive(Debug)]
pub struct RunRecorder<Sc: Score> {
    // Exactly one of the two is populated.
    pending: Option<PendingRun<Sc>>,
    result: Option<BenchmarkRunResult<Sc>>,
}

impl<Sc: Score> RunRecorder<Sc> {
    /// Creates a recorder holding a new pending run.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Ok(Self::from_pending(PendingRun::new(id)?))
    }

    /// Wraps an existing pending run.
    pub fn from_pending(pending: PendingRun<Sc>) -> Self {
        Self {
            pending: Some(pending),
            result: None,
        }
    }

    pub fn id(&self) -> &str {
        match (&self.pending, &self.result) {
            (Some(pending), _) => pending.id(),
            (None, Some(result)) => result.id(),
            (None, None) => unreachable!("recorder holds neither a pending run nor a result"),
        }
    }

    pub fn state(&self) -> RunState {
        match &self.result {
            Some(result) => result.state(),
            None => RunState::Pending,
        }
    }

    /// The pending run, while not yet finalized.
    pub fn pending(&self) -> Option<&PendingRun<Sc>> {
        self.pending.as_ref()
    }

    /// The finalized result, once available.
    pub fn result(&self) -> Option<&BenchmarkRunResult<Sc>> {
        self.result.as_ref()
    }

    /// See [`PendingRun::record_calculate_count`].
    pub fn record_calculate_count(&mut self, count: i64) -> Result<()> {
        self.pending_mut()?.record_calculate_count(count)
    }

    /// See [`PendingRun::record_problem_metrics`].
    pub fn record_problem_metrics(
        &mut self,
        planning_entity_count: Option<i64>,
        problem_scale: Option<i64>,
        used_memory_bytes: Option<i64>,
    ) -> Result<()> {
        self.pending_mut()?
            .record_problem_metrics(planning_entity_count, problem_scale, used_memory_bytes)
    }

    /// Finalizes the run as succeeded.
    ///
    /// Argument errors leave the run pending.
    pub fn mark_succeeded(&mut self, score: Sc, time_millis_spent: i64) -> Result<&BenchmarkRunResult<Sc>> {
        self.pending_mut()?;
        let time = non_negative("timeMillisSpend", time_millis_spent)?;
        self.finalize(RunOutcome::Succeeded { score }, time)
    }

    /// Finalizes the run as failed.
    ///
    /// Argument errors leave the run pending.
    pub fn mark_failed(&mut self, failure: RunFailure, time_millis_spent: i64) -> Result<&BenchmarkRunResult<Sc>> {
        self.pending_mut()?;
        let time = non_negative("timeMillisSpend", time_millis_spent)?;
        self.finalize(RunOutcome::Failed { failure }, time)
    }

    /// Hands off the finalized result.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the run was never finalized.
    pub fn into_result(self) -> Result<BenchmarkRunResult<Sc>> {
        match (self.result, self.pending) {
            (Some(result), _) => Ok(result),
            (None, pending) => Err(BenchmarkError::InvalidState(format!(
                "run '{}' has not been finalized",
                pending.as_ref().map(PendingRun::id).unwrap_or_default()
            ))),
        }
    }

    fn finalize(&mut self, outcome: RunOutcome<Sc>, time_millis_spent: u64) -> Result<&BenchmarkRunResult<Sc>> {
        let pending = self.pending.take().ok_or_else(|| already_finalized(self.result.as_ref()))?;
        Ok(&*self.result.insert(pending.finish(outcome, time_millis_spent)))
    }

    fn pending_mut(&mut self) -> Result<&mut PendingRun<Sc>> {
        let Self { pending, result } = self;
        pending
            .as_mut()
            .ok_or_else(|| already_finalized(result.as_ref()))
    }
}

fn already_finalized<Sc: Score>(result: Option<&BenchmarkRunResult<Sc>>) -> BenchmarkError {
    match result {
        Some(result) => BenchmarkError::InvalidState(format!(
            "run '{}' is already finalized as {}",
            result.id(),
            result.state()
        )),
        None => BenchmarkError::InvalidState("run is already finalized".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planbench_core::SimpleScore;

    #[test]
    fn test_mutators_after_success_fail_with_state_error() {
        let mut recorder = RunRecorder::<SimpleScore>::new("r1").unwrap();
        recorder.mark_succeeded(SimpleScore::of(-1), 10).unwrap();

        assert!(recorder.record_calculate_count(5).unwrap_err().is_invalid_state());
        assert!(recorder
            .record_problem_metrics(Some(1), None, None)
            .unwrap_err()
            .is_invalid_state());
        assert!(recorder
            .mark_succeeded(SimpleScore::of(0), 10)
            .unwrap_err()
            .is_invalid_state());
        assert!(recorder
            .mark_failed(RunFailure::new("late"), 10)
            .unwrap_err()
            .is_invalid_state());

        let result = recorder.into_result().unwrap();
        assert_eq!(result.score(), Some(&SimpleScore::of(-1)));
        assert_eq!(result.calculate_count(), 0);
    }

    #[test]
    fn test_mutators_after_failure_fail_with_state_error() {
        let mut recorder = RunRecorder::<SimpleScore>::new("r1").unwrap();
        recorder.mark_failed(RunFailure::new("boom"), 3).unwrap();

        assert!(recorder.record_calculate_count(5).unwrap_err().is_invalid_state());
        assert!(recorder
            .mark_failed(RunFailure::new("again"), 4)
            .unwrap_err()
            .is_invalid_state());
        assert_eq!(recorder.state(), RunState::Failed);
        assert_eq!(recorder.result().unwrap().time_millis_spent(), 3);
    }

    #[test]
    fn test_state_error_takes_precedence_over_argument_error() {
        let mut recorder = RunRecorder::<SimpleScore>::new("r1").unwrap();
        recorder.mark_succeeded(SimpleScore::of(0), 1).unwrap();
        let err = recorder.mark_succeeded(SimpleScore::of(0), -1).unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn test_negative_time_keeps_run_pending() {
        let mut recorder = RunRecorder::<SimpleScore>::new("r1").unwrap();
        let err = recorder.mark_succeeded(SimpleScore::of(0), -5).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(recorder.state(), RunState::Pending);

        recorder.mark_succeeded(SimpleScore::of(0), 5).unwrap();
        assert_eq!(recorder.state(), RunState::Succeeded);
    }

    #[test]
    fn test_into_result_while_pending() {
        let mut recorder = RunRecorder::<SimpleScore>::new("r1").unwrap();
        recorder.record_calculate_count(3).unwrap();
        assert_eq!(recorder.pending().unwrap().calculate_count(), 3);

        let err = recorder.into_result().unwrap_err();
        assert!(err.is_invalid_state());
        assert!(err.to_string().contains("'r1'"));
    }

    #[test]
    fn test_id_stable_across_finalization() {
        let mut recorder = RunRecorder::<SimpleScore>::new("r1").unwrap();
        assert_eq!(recorder.id(), "r1");
        recorder.mark_succeeded(SimpleScore::of(0), 0).unwrap();
        assert_eq!(recorder.id(), "r1");
    }
}
