//! Tests for report generation.

use super::*;
use crate::failure::RunFailure;
use crate::run::PendingRun;
use planbench_core::{HardSoftScore, SimpleScore};

fn mixed_result() -> BenchmarkResult<SimpleScore> {
    let mut result = BenchmarkResult::new("Session", "LateAcceptance", "nqueens-8");

    let mut run = PendingRun::new("la/nqueens-8/run-0").unwrap();
    run.record_problem_metrics(Some(8), Some(7), Some(4096)).unwrap();
    run.record_calculate_count(2000).unwrap();
    result.add_run(run.succeed(SimpleScore::of(-2), 200).unwrap());

    let run = PendingRun::new("la/nqueens-8/run-1").unwrap();
    result.add_run(
        run.fail(
            RunFailure::new("solver gave up, budget exceeded")
                .with_cause(RunFailure::new("step | limit")),
            50,
        )
        .unwrap(),
    );

    result
}

#[test]
fn test_csv_quotes_messages_and_leaves_absent_values_empty() {
    let csv = CsvExporter::to_string(&mixed_result());
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "la/nqueens-8/run-0,SUCCEEDED,200,2000,-2,8,7,4096,");
    assert_eq!(
        lines[2],
        "la/nqueens-8/run-1,FAILED,50,0,,,0,,\"solver gave up, budget exceeded\""
    );
}

#[test]
fn test_csv_write_to_writer() {
    let mut buffer = Vec::new();
    CsvExporter::write(&mixed_result(), &mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), CsvExporter::to_string(&mixed_result()));
}

#[test]
fn test_markdown_lists_failures() {
    let md = MarkdownReport::to_string(&mixed_result());

    assert!(md.contains("- **Runs**: 2 (1 succeeded, 1 failed)"));
    assert!(md.contains("| Best Score | -2 |"));
    assert!(md.contains("| Failure Rate | 50.00% |"));
    assert!(md.contains("| la/nqueens-8/run-1 | FAILED | 50 | N/A | 0 | N/A | 0 |"));
    assert!(md.contains("## Failures"));
    assert!(md.contains(
        "- **la/nqueens-8/run-1**: solver gave up, budget exceeded caused by: step \\| limit"
    ));
}

#[test]
fn test_markdown_without_failures_has_no_failure_section() {
    let mut result = BenchmarkResult::new("Session", "HC", "P");
    result.add_run(
        PendingRun::new("hc-0")
            .unwrap()
            .succeed(HardSoftScore::of(0, -4), 10)
            .unwrap(),
    );

    let md = MarkdownReport::to_string(&result);
    assert!(md.contains("| Average Score | 0hard/-4soft |"));
    assert!(!md.contains("## Failures"));
}

#[test]
fn test_comparison_is_ranked() {
    let broken = {
        let mut r = BenchmarkResult::<SimpleScore>::new("S", "Broken", "P");
        r.add_run(PendingRun::new("b").unwrap().fail(RunFailure::new("x"), 1).unwrap());
        r
    };
    let good = {
        let mut r = BenchmarkResult::new("S", "Good", "P");
        r.add_run(PendingRun::new("g").unwrap().succeed(SimpleScore::of(-1), 1).unwrap());
        r
    };

    let table = MarkdownReport::comparison(&[&broken, &good]);
    let good_pos = table.find("| 1 | Good |").unwrap();
    let broken_pos = table.find("| 2 | Broken | P | N/A | N/A | 1/1 |").unwrap();
    assert!(good_pos < broken_pos);
}

#[test]
fn test_markdown_escapes_pipes_in_names() {
    let mut result = BenchmarkResult::new("S", "Tabu|Late", "8|queens");
    result.add_run(
        PendingRun::new("tabu|8/run-0")
            .unwrap()
            .succeed(SimpleScore::of(-3), 10)
            .unwrap(),
    );

    let md = MarkdownReport::to_string(&result);
    assert!(md.contains("| tabu\\|8/run-0 | SUCCEEDED | 10 | -3 |"));

    let table = MarkdownReport::comparison(&[&result]);
    assert!(table.contains("| 1 | Tabu\\|Late | 8\\|queens | -3 | -3 | 0/1 |"));
}

#[test]
fn test_json_round_trip() {
    let result = mixed_result();
    let json = JsonExporter::to_string(&result).unwrap();
    let runs: Vec<BenchmarkRunResult<SimpleScore>> = JsonExporter::parse(&json).unwrap();

    assert_eq!(runs, result.runs);
    let records = JsonExporter::records(&result);
    assert_eq!(records[0].score.as_deref(), Some("-2"));
    assert!(records[1].failure_throwable.is_some());
}

#[test]
fn test_write_configured_outputs() {
    let dir = std::env::temp_dir().join(format!("planbench-report-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let csv = dir.join("runs.csv");
    let json = dir.join("runs.json");

    let config = BenchmarkConfig::new("Session")
        .with_csv_output(csv.to_string_lossy())
        .with_json_output(json.to_string_lossy());
    write_configured_outputs(&config, &mixed_result()).unwrap();

    assert!(fs::read_to_string(&csv).unwrap().contains("la/nqueens-8/run-0"));
    assert!(fs::read_to_string(&json).unwrap().contains("\"timeMillisSpend\": 200"));
    assert!(!dir.join("report.md").exists());

    fs::remove_dir_all(&dir).unwrap();
}
