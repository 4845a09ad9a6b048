//! Report generation for benchmark results.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use planbench_config::BenchmarkConfig;
use planbench_core::{ParseableScore, Score};
use tracing::info;

use crate::record::RunResultRecord;
use crate::result::{rank, BenchmarkResult};
use crate::run::BenchmarkRunResult;

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// CSV field quoting for free-form text such as failure messages.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

// Keeps a value inside one table cell.
fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// CSV exporter for benchmark results.
///
/// One row per run. Absent values (the score of a failed run, unmeasured
/// memory) are left empty rather than written as zero.
///
/// # Example
///
/// ```
/// use planbench::{BenchmarkResult, CsvExporter, PendingRun, RunFailure};
/// use planbench_core::SimpleScore;
///
/// let mut result = BenchmarkResult::<SimpleScore>::new("Test", "HC", "Problem");
/// result.add_run(PendingRun::new("hc-0").unwrap().succeed(SimpleScore::of(-3), 100).unwrap());
/// result.add_run(PendingRun::new("hc-1").unwrap().fail(RunFailure::new("OutOfMemory"), 40).unwrap());
///
/// let csv = CsvExporter::to_string(&result);
/// assert!(csv.starts_with("id,status,time_millis_spend"));
/// assert!(csv.contains("hc-0,SUCCEEDED,100,0,-3,"));
/// assert!(csv.contains("hc-1,FAILED,40,0,,"));
/// assert!(csv.trim_end().ends_with("OutOfMemory"));
/// ```
pub struct CsvExporter;

impl CsvExporter {
    /// Exports benchmark result to CSV string.
    pub fn to_string<Sc: Score>(result: &BenchmarkResult<Sc>) -> String {
        let mut output = String::new();

        writeln!(
            output,
            "id,status,time_millis_spend,calculate_count,score,planning_entity_count,problem_scale,used_memory_after_input_solution,failure"
        )
        .unwrap();

        for run in &result.runs {
            writeln!(
                output,
                "{},{},{},{},{},{},{},{},{}",
                csv_field(run.id()),
                run.state(),
                run.time_millis_spent(),
                run.calculate_count(),
                optional(run.score()),
                optional(run.planning_entity_count()),
                run.problem_scale(),
                optional(run.used_memory_after_input_solution()),
                run.failure()
                    .map(|f| csv_field(f.message()))
                    .unwrap_or_default(),
            )
            .unwrap();
        }

        output
    }

    /// Exports benchmark result to a CSV file.
    pub fn to_file<Sc: Score>(result: &BenchmarkResult<Sc>, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, Self::to_string(result))
    }

    /// Writes benchmark result as CSV to a writer.
    pub fn write<Sc: Score, W: Write>(result: &BenchmarkResult<Sc>, mut writer: W) -> io::Result<()> {
        writer.write_all(Self::to_string(result).as_bytes())
    }
}

/// Markdown report generator.
///
/// Produces a summary table, per-run details and a failures section so every
/// failed run reaches the reader with its message.
///
/// # Example
///
/// ```
/// use planbench::{BenchmarkResult, MarkdownReport};
/// use planbench_core::SimpleScore;
///
/// let result = BenchmarkResult::<SimpleScore>::new("Test", "HC", "Problem");
/// let md = MarkdownReport::to_string(&result);
/// assert!(md.contains("# Benchmark: Test"));
/// assert!(md.contains("*No runs succeeded.*"));
/// ```
pub struct MarkdownReport;

impl MarkdownReport {
    /// Generates a Markdown report string.
    pub fn to_string<Sc: Score>(result: &BenchmarkResult<Sc>) -> String {
        let mut output = String::new();

        writeln!(output, "# Benchmark: {}", result.name).unwrap();
        writeln!(output).unwrap();
        writeln!(output, "- **Solver**: {}", result.solver_name).unwrap();
        writeln!(output, "- **Problem**: {}", result.problem_name).unwrap();
        writeln!(
            output,
            "- **Runs**: {} ({} succeeded, {} failed)",
            result.run_count(),
            result.success_count(),
            result.failure_count()
        )
        .unwrap();
        writeln!(output).unwrap();

        writeln!(output, "## Summary").unwrap();
        writeln!(output).unwrap();

        if let (Some(best), Some(worst), Some(average)) = (
            result.best_score(),
            result.worst_score(),
            result.average_score(),
        ) {
            writeln!(output, "| Metric | Value |").unwrap();
            writeln!(output, "|--------|-------|").unwrap();
            writeln!(output, "| Best Score | {} |", best).unwrap();
            writeln!(output, "| Worst Score | {} |", worst).unwrap();
            writeln!(output, "| Average Score | {} |", average).unwrap();
            writeln!(output, "| Avg Time | {} ms |", result.avg_time_spent().as_millis()).unwrap();
            writeln!(output, "| Min Time | {} ms |", result.min_time_spent().as_millis()).unwrap();
            writeln!(output, "| Max Time | {} ms |", result.max_time_spent().as_millis()).unwrap();
            writeln!(output, "| Avg Calculate Speed | {:.0}/s |", result.avg_calculate_speed()).unwrap();
            writeln!(output, "| Failure Rate | {:.2}% |", result.failure_rate() * 100.0).unwrap();
        } else {
            writeln!(output, "*No runs succeeded.*").unwrap();
        }
        writeln!(output).unwrap();

        if !result.runs.is_empty() {
            writeln!(output, "## Run Details").unwrap();
            writeln!(output).unwrap();
            writeln!(output, "| Run | Status | Time (ms) | Score | Calculations | Entities | Scale |").unwrap();
            writeln!(output, "|-----|--------|-----------|-------|--------------|----------|-------|").unwrap();

            for run in &result.runs {
                writeln!(
                    output,
                    "| {} | {} | {} | {} | {} | {} | {} |",
                    markdown_cell(run.id()),
                    run.state(),
                    run.time_millis_spent(),
                    run.score()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    run.calculate_count(),
                    run.planning_entity_count()
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                    run.problem_scale(),
                )
                .unwrap();
            }
            writeln!(output).unwrap();
        }

        if result.failure_count() > 0 {
            writeln!(output, "## Failures").unwrap();
            writeln!(output).unwrap();
            for run in result.failed_runs() {
                if let Some(failure) = run.failure() {
                    writeln!(output, "- **{}**: {}", run.id(), markdown_cell(&failure.to_string())).unwrap();
                }
            }
        }

        output
    }

    /// Writes Markdown report to a file.
    pub fn to_file<Sc: Score>(result: &BenchmarkResult<Sc>, path: impl AsRef<Path>) -> io::Result<()> {
        fs::write(path, Self::to_string(result))
    }

    /// Writes Markdown report to a writer.
    pub fn write<Sc: Score, W: Write>(result: &BenchmarkResult<Sc>, mut writer: W) -> io::Result<()> {
        writer.write_all(Self::to_string(result).as_bytes())
    }

    /// Generates a ranked comparison table for multiple results.
    ///
    /// # Example
    ///
    /// ```
    /// use planbench::{BenchmarkResult, MarkdownReport};
    /// use planbench_core::SimpleScore;
    ///
    /// let result1 = BenchmarkResult::<SimpleScore>::new("Test", "HC", "Problem");
    /// let result2 = BenchmarkResult::<SimpleScore>::new("Test", "Tabu", "Problem");
    ///
    /// let comparison = MarkdownReport::comparison(&[&result1, &result2]);
    /// assert!(comparison.contains("## Comparison"));
    /// ```
    pub fn comparison<Sc: Score>(results: &[&BenchmarkResult<Sc>]) -> String {
        let mut output = String::new();

        writeln!(output, "## Comparison").unwrap();
        writeln!(output).unwrap();
        writeln!(output, "| Rank | Solver | Problem | Average Score | Best Score | Failed | Avg Time (ms) |").unwrap();
        writeln!(output, "|------|--------|---------|---------------|------------|--------|---------------|").unwrap();

        for (index, result) in rank(results).into_iter().enumerate() {
            writeln!(
                output,
                "| {} | {} | {} | {} | {} | {}/{} | {} |",
                index + 1,
                markdown_cell(&result.solver_name),
                markdown_cell(&result.problem_name),
                result
                    .average_score()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                result
                    .best_score()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                result.failure_count(),
                result.run_count(),
                result.avg_time_spent().as_millis(),
            )
            .unwrap();
        }

        output
    }
}

/// JSON exporter for run records.
///
/// Writes an array of records in their flat serialized form.
pub struct JsonExporter;

impl JsonExporter {
    /// Converts the runs of a result to flat records.
    pub fn records<Sc: ParseableScore>(result: &BenchmarkResult<Sc>) -> Vec<RunResultRecord> {
        result.runs.iter().map(RunResultRecord::from).collect()
    }

    /// Exports the runs as a pretty-printed JSON array.
    pub fn to_string<Sc: ParseableScore>(result: &BenchmarkResult<Sc>) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&result.runs)
    }

    /// Reads runs back from a JSON array.
    pub fn parse<Sc: ParseableScore>(json: &str) -> serde_json::Result<Vec<BenchmarkRunResult<Sc>>> {
        serde_json::from_str(json)
    }

    /// Exports the runs to a JSON file.
    pub fn to_file<Sc: ParseableScore>(result: &BenchmarkResult<Sc>, path: impl AsRef<Path>) -> io::Result<()> {
        let json = Self::to_string(result)?;
        fs::write(path, json)
    }
}

/// Writes every report whose output path is set in `config`.
pub fn write_configured_outputs<Sc: ParseableScore>(
    config: &BenchmarkConfig,
    result: &BenchmarkResult<Sc>,
) -> io::Result<()> {
    if let Some(path) = config.csv_output_path() {
        CsvExporter::to_file(result, path)?;
        info!(event = "report_written", format = "csv", path = path);
    }
    if let Some(path) = config.markdown_output_path() {
        MarkdownReport::to_file(result, path)?;
        info!(event = "report_written", format = "markdown", path = path);
    }
    if let Some(path) = config.json_output_path() {
        JsonExporter::to_file(result, path)?;
        info!(event = "report_written", format = "json", path = path);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
