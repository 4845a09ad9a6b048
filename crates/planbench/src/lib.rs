//! Benchmark run records for planning solvers.
//!
//! This crate provides the per-run result record produced when one solver
//! configuration solves one problem instance, plus the harness, statistics
//! and reports built on top of it.
//!
//! # Overview
//!
//! - [`PendingRun`] is created when a run is scheduled and owned by its runner
//! - Finalizing with [`PendingRun::succeed`] or [`PendingRun::fail`] consumes it
//!   and yields an immutable [`BenchmarkRunResult`]
//! - [`Benchmark`] executes warmups and measured runs, turning solver errors
//!   and panics into failed runs
//! - [`BenchmarkResult`] aggregates runs; [`rank`] orders configurations
//! - [`CsvExporter`], [`MarkdownReport`] and [`JsonExporter`] write reports
//!
//! # Example
//!
//! ```
//! use planbench::{PendingRun, RunFailure, RunState};
//! use planbench_core::SimpleScore;
//!
//! let mut run = PendingRun::<SimpleScore>::new("bench-1").unwrap();
//! run.record_problem_metrics(Some(50), Some(1000), Some(2_000_000)).unwrap();
//! let succeeded = run.succeed(SimpleScore::of(-120), 3400).unwrap();
//! assert_eq!(succeeded.state(), RunState::Succeeded);
//!
//! let failed = PendingRun::<SimpleScore>::new("bench-2")
//!     .unwrap()
//!     .fail(RunFailure::new("OutOfMemory"), 500)
//!     .unwrap();
//! assert!(failed.score().is_none());
//! ```

pub mod console;
mod failure;
mod record;
mod recorder;
mod report;
mod result;
mod run;
mod runner;

pub use failure::RunFailure;
pub use record::RunResultRecord;
pub use recorder::RunRecorder;
pub use report::{write_configured_outputs, CsvExporter, JsonExporter, MarkdownReport};
pub use result::{rank, BenchmarkResult};
pub use run::{BenchmarkRunResult, PendingRun, RunOutcome, RunState};
pub use runner::{Benchmark, BenchmarkBuilder, BenchmarkProblem, RunProgress};
