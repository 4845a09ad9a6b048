//! Flat serialized form of a finalized run.
//!
//! Scores are carried in their textual form so reports do not need to know
//! the concrete score type. Deserializing a [`BenchmarkRunResult`] checks the
//! same invariants the builder enforces.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use planbench_core::{BenchmarkError, ParseableScore, Result};

use crate::failure::RunFailure;
use crate::run::{validate_id, BenchmarkRunResult, RunMetrics, RunOutcome};

/// One run as a flat record.
///
/// # Example
///
/// ```
/// use planbench::{PendingRun, RunFailure, RunResultRecord};
/// use planbench_core::SimpleScore;
///
/// let failed = PendingRun::<SimpleScore>::new("bench-2")
///     .unwrap()
///     .fail(RunFailure::new("OutOfMemory"), 500)
///     .unwrap();
///
/// let record = RunResultRecord::from(&failed);
/// assert!(!record.succeeded);
/// assert_eq!(record.score, None);
/// assert_eq!(record.failure_throwable.unwrap().message(), "OutOfMemory");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResultRecord {
    pub id: String,
    pub time_millis_spend: u64,
    #[serde(default)]
    pub calculate_count: u64,
    pub score: Option<String>,
    pub planning_entity_count: Option<u64>,
    pub used_memory_after_input_solution: Option<u64>,
    pub succeeded: bool,
    #[serde(default)]
    pub problem_scale: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_throwable: Option<RunFailure>,
}

impl<Sc: ParseableScore> From<&BenchmarkRunResult<Sc>> for RunResultRecord {
    fn from(result: &BenchmarkRunResult<Sc>) -> Self {
        Self {
            id: result.id().to_string(),
            time_millis_spend: result.time_millis_spent(),
            calculate_count: result.calculate_count(),
            score: result.score().map(Sc::to_string_repr),
            planning_entity_count: result.planning_entity_count(),
            used_memory_after_input_solution: result.used_memory_after_input_solution(),
            succeeded: result.succeeded(),
            problem_scale: result.problem_scale(),
            failure_throwable: result.failure().cloned(),
        }
    }
}

impl<Sc: ParseableScore> TryFrom<RunResultRecord> for BenchmarkRunResult<Sc> {
    type Error = BenchmarkError;

    fn try_from(record: RunResultRecord) -> Result<Self> {
        validate_id(&record.id)?;

        let outcome = match (record.succeeded, record.score, record.failure_throwable) {
            (true, Some(score), None) => {
                let score = Sc::parse(&score).map_err(|e| {
                    BenchmarkError::InvalidArgument(format!("run '{}': {}", record.id, e))
                })?;
                RunOutcome::Succeeded { score }
            }
            (true, None, _) => {
                return Err(BenchmarkError::InvalidArgument(format!(
                    "run '{}' succeeded without a score",
                    record.id
                )))
            }
            (true, Some(_), Some(_)) => {
                return Err(BenchmarkError::InvalidArgument(format!(
                    "run '{}' succeeded but carries a failure",
                    record.id
                )))
            }
            (false, None, Some(failure)) => RunOutcome::Failed { failure },
            (false, _, None) => {
                return Err(BenchmarkError::InvalidArgument(format!(
                    "run '{}' failed without a failure",
                    record.id
                )))
            }
            (false, Some(_), Some(_)) => {
                return Err(BenchmarkError::InvalidArgument(format!(
                    "run '{}' failed but carries a score",
                    record.id
                )))
            }
        };

        let metrics = RunMetrics {
            calculate_count: record.calculate_count,
            planning_entity_count: record.planning_entity_count,
            problem_scale: record.problem_scale,
            used_memory_after_input_solution: record.used_memory_after_input_solution,
        };
        Ok(BenchmarkRunResult::from_parts(
            record.id,
            record.time_millis_spend,
            metrics,
            outcome,
        ))
    }
}

impl<Sc: ParseableScore> Serialize for BenchmarkRunResult<Sc> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RunResultRecord::from(self).serialize(serializer)
    }
}

impl<'de, Sc: ParseableScore> Deserialize<'de> for BenchmarkRunResult<Sc> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = RunResultRecord::deserialize(deserializer)?;
        BenchmarkRunResult::try_from(record).map_err(serde::de::Error::custom)
    }
}
