//! End-to-end lifecycle tests for benchmark run records.
//!
//! These tests drive records the way a runner and a reporter would: create,
//! record metrics, finalize, then serialize and aggregate.

use std::sync::Arc;
use std::thread;

use planbench::{
    BenchmarkResult, BenchmarkRunResult, JsonExporter, MarkdownReport, PendingRun, RunFailure,
    RunRecorder, RunState,
};
use planbench_core::SimpleScore;

#[test]
fn scenario_succeeded_run() {
    let mut run = PendingRun::<SimpleScore>::new("bench-1").unwrap();
    run.record_problem_metrics(Some(50), Some(1000), Some(2_000_000))
        .unwrap();
    let result = run.succeed(SimpleScore::of(-120), 3400).unwrap();

    assert_eq!(result.state(), RunState::Succeeded);
    assert_eq!(result.score(), Some(&SimpleScore::of(-120)));
    assert!(result.failure().is_none());
    assert_eq!(result.time_millis_spent(), 3400);
    assert_eq!(result.planning_entity_count(), Some(50));
    assert_eq!(result.problem_scale(), 1000);
    assert_eq!(result.used_memory_after_input_solution(), Some(2_000_000));
    assert_eq!(result.calculate_count(), 0);
}

#[test]
fn scenario_failed_run() {
    let result = PendingRun::<SimpleScore>::new("bench-2")
        .unwrap()
        .fail(RunFailure::new("OutOfMemory"), 500)
        .unwrap();

    assert_eq!(result.state(), RunState::Failed);
    assert!(result.score().is_none());
    assert_eq!(result.failure().unwrap().message(), "OutOfMemory");
    assert_eq!(result.time_millis_spent(), 500);
    assert_eq!(result.planning_entity_count(), None);
}

#[test]
fn recorder_rejects_writes_after_each_finalization() {
    let mut succeeded = RunRecorder::<SimpleScore>::new("bench-1").unwrap();
    succeeded.mark_succeeded(SimpleScore::of(-120), 3400).unwrap();
    assert!(succeeded
        .record_calculate_count(1)
        .unwrap_err()
        .is_invalid_state());
    assert!(succeeded
        .mark_failed(RunFailure::new("late"), 1)
        .unwrap_err()
        .is_invalid_state());

    let mut failed = RunRecorder::<SimpleScore>::new("bench-2").unwrap();
    failed.mark_failed(RunFailure::new("OutOfMemory"), 500).unwrap();
    assert!(failed
        .record_problem_metrics(None, Some(1), None)
        .unwrap_err()
        .is_invalid_state());
    assert!(failed
        .mark_succeeded(SimpleScore::of(0), 1)
        .unwrap_err()
        .is_invalid_state());
}

#[test]
fn argument_errors_never_clamp() {
    assert!(PendingRun::<SimpleScore>::new("")
        .unwrap_err()
        .is_invalid_argument());

    let mut run = PendingRun::<SimpleScore>::new("r1").unwrap();
    assert!(run.record_calculate_count(-1).unwrap_err().is_invalid_argument());
    assert!(run
        .succeed(SimpleScore::of(0), -5)
        .unwrap_err()
        .is_invalid_argument());
}

#[test]
fn serialized_records_round_trip_through_json() {
    let mut result = BenchmarkResult::new("Session", "HC", "p1");

    let mut run = PendingRun::new("bench-1").unwrap();
    run.record_problem_metrics(Some(50), Some(1000), Some(2_000_000))
        .unwrap();
    result.add_run(run.succeed(SimpleScore::of(-120), 3400).unwrap());
    result.add_run(
        PendingRun::new("bench-2")
            .unwrap()
            .fail(RunFailure::new("OutOfMemory"), 500)
            .unwrap(),
    );

    let json = JsonExporter::to_string(&result).unwrap();
    let back: Vec<BenchmarkRunResult<SimpleScore>> = JsonExporter::parse(&json).unwrap();
    assert_eq!(back, result.runs);
    assert_eq!(back[1].used_memory_after_input_solution(), None);
    assert_eq!(back[1].planning_entity_count(), None);

    let report = MarkdownReport::to_string(&result);
    assert!(report.contains("- **bench-2**: OutOfMemory"));
}

#[test]
fn finalized_records_are_shared_read_only() {
    let result = Arc::new(
        PendingRun::<SimpleScore>::new("bench-1")
            .unwrap()
            .succeed(SimpleScore::of(-120), 3400)
            .unwrap(),
    );

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let result = Arc::clone(&result);
            thread::spawn(move || result.score().copied())
        })
        .collect();

    for reader in readers {
        assert_eq!(reader.join().unwrap(), Some(SimpleScore::of(-120)));
    }
}
