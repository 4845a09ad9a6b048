//! Benchmark runner.

use std::error::Error;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use planbench_config::BenchmarkConfig;
use planbench_core::{Result, Score};
use tracing::{debug, info, warn};

use crate::failure::RunFailure;
use crate::result::BenchmarkResult;
use crate::run::{BenchmarkRunResult, PendingRun, RunOutcome};

/// Size metrics a problem instance can report about itself.
///
/// All methods default to `None`, which leaves the metric absent on the
/// run record.
pub trait BenchmarkProblem {
    /// Number of planning entities.
    fn planning_entity_count(&self) -> Option<u64> {
        None
    }

    /// Magnitude of the search space.
    fn problem_scale(&self) -> Option<u64> {
        None
    }

    /// Bytes held by the loaded problem.
    fn memory_footprint_bytes(&self) -> Option<u64> {
        None
    }
}

/// Progress a solver reports while it runs.
#[derive(Debug, Default)]
pub struct RunProgress {
    calculate_count: u64,
}

impl RunProgress {
    /// Overwrites the number of evaluation steps performed.
    pub fn set_calculate_count(&mut self, count: u64) {
        self.calculate_count = count;
    }

    /// Adds to the number of evaluation steps performed.
    pub fn add_calculations(&mut self, count: u64) {
        self.calculate_count = self.calculate_count.saturating_add(count);
    }

    pub fn calculate_count(&self) -> u64 {
        self.calculate_count
    }
}

/// Runs one solver configuration against one problem instance.
///
/// Every measured run produces exactly one finalized record: solver errors
/// and panics become failed runs instead of aborting the session. Runs
/// execute sequentially on the calling thread.
///
/// # Type Parameters
///
/// * `Prob` - The problem instance type
/// * `Sc` - The score type the solver produces
/// * `P` - Problem factory: `Fn() -> Prob`
/// * `F` - Solver: `Fn(Prob, &mut RunProgress) -> Result<Sc, E>`
///
/// # Example
///
/// ```
/// use planbench::{Benchmark, BenchmarkProblem};
/// use planbench_config::BenchmarkConfig;
/// use planbench_core::SimpleScore;
///
/// struct Queens(u64);
///
/// impl BenchmarkProblem for Queens {
///     fn planning_entity_count(&self) -> Option<u64> {
///         Some(self.0)
///     }
/// }
///
/// let config = BenchmarkConfig::new("Queens").with_warmup_count(0).with_run_count(2);
/// let benchmark = Benchmark::new(config, "HillClimbing", "8-queens", || Queens(8), |q: Queens, progress| {
///     progress.set_calculate_count(q.0 * 100);
///     Ok::<_, std::io::Error>(SimpleScore::of(-1))
/// });
///
/// let result = benchmark.run().unwrap();
/// assert_eq!(result.run_count(), 2);
/// assert_eq!(result.runs[0].id(), "HillClimbing/8-queens/run-0");
/// assert_eq!(result.runs[0].planning_entity_count(), Some(8));
/// assert_eq!(result.runs[0].calculate_count(), 800);
/// ```
pub struct Benchmark<Prob, Sc, E, P, F>
where
    Prob: BenchmarkProblem,
    Sc: Score,
    E: Error + 'static,
    P: Fn() -> Prob,
    F: Fn(Prob, &mut RunProgress) -> std::result::Result<Sc, E>,
{
    config: BenchmarkConfig,
    solver_name: String,
    problem_name: String,
    problem_factory: P,
    solver: F,
    _phantom: PhantomData<fn() -> (Prob, Sc, E)>,
}

impl<Prob, Sc, E, P, F> Benchmark<Prob, Sc, E, P, F>
where
    Prob: BenchmarkProblem,
    Sc: Score,
    E: Error + 'static,
    P: Fn() -> Prob,
    F: Fn(Prob, &mut RunProgress) -> std::result::Result<Sc, E>,
{
    /// Creates a new benchmark.
    ///
    /// # Arguments
    ///
    /// * `config` - Benchmark configuration (warmup count, run count, outputs)
    /// * `solver_name` - Name identifying the solver configuration
    /// * `problem_name` - Name identifying the problem instance
    /// * `problem_factory` - Creates a fresh problem instance per run
    /// * `solver` - Solves one problem instance
    pub fn new(
        config: BenchmarkConfig,
        solver_name: impl Into<String>,
        problem_name: impl Into<String>,
        problem_factory: P,
        solver: F,
    ) -> Self {
        Self {
            config,
            solver_name: solver_name.into(),
            problem_name: problem_name.into(),
            problem_factory,
            solver,
            _phantom: PhantomData,
        }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Runs warmups, then the measured runs, and collects their records.
    ///
    /// Warmup runs produce no records.
    pub fn run(&self) -> Result<BenchmarkResult<Sc>> {
        info!(
            event = "benchmark_start",
            benchmark = self.config.name(),
            solver = %self.solver_name,
            problem = %self.problem_name,
            warmups = self.config.warmup_count(),
            runs = self.config.run_count(),
        );

        for warmup_index in 0..self.config.warmup_count() {
            let id = format!("{}/{}/warmup-{}", self.solver_name, self.problem_name, warmup_index);
            let warmup = self.run_once(id)?;
            debug!(event = "warmup_end", run = warmup.id(), state = %warmup.state());
        }

        let mut result =
            BenchmarkResult::new(self.config.name(), &self.solver_name, &self.problem_name);

        for run_index in 0..self.config.run_count() {
            let id = format!("{}/{}/run-{}", self.solver_name, self.problem_name, run_index);
            result.add_run(self.run_once(id)?);
        }

        info!(
            event = "benchmark_end",
            benchmark = self.config.name(),
            solver = %self.solver_name,
            succeeded = result.success_count(),
            failed = result.failure_count(),
        );
        Ok(result)
    }

    /// Executes a single run and finalizes its record.
    fn run_once(&self, id: String) -> Result<BenchmarkRunResult<Sc>> {
        let mut pending = PendingRun::new(id)?;
        let mut progress = RunProgress::default();
        let mut started: Option<Instant> = None;

        info!(event = "run_start", run = pending.id());

        // Problem loading is not timed; a panic there still fails the run.
        let solved = panic::catch_unwind(AssertUnwindSafe(|| {
            let problem = (self.problem_factory)();
            pending.set_problem_metrics(
                problem.planning_entity_count(),
                problem.problem_scale(),
                problem.memory_footprint_bytes(),
            );
            debug!(
                event = "problem_loaded",
                run = pending.id(),
                entity_count = ?pending.planning_entity_count(),
                problem_scale = pending.problem_scale(),
                memory_bytes = ?pending.used_memory_after_input_solution(),
            );

            started = Some(Instant::now());
            (self.solver)(problem, &mut progress)
        }));

        let time_millis_spent = started
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        pending.set_calculate_count(progress.calculate_count());

        let outcome = match solved {
            Ok(Ok(score)) => RunOutcome::Succeeded { score },
            Ok(Err(error)) => RunOutcome::Failed {
                failure: RunFailure::from_error(&error),
            },
            Err(payload) => RunOutcome::Failed {
                failure: RunFailure::from_panic(payload),
            },
        };
        let run = pending.finish(outcome, time_millis_spent);

        match (run.score(), run.failure()) {
            (Some(score), _) => info!(
                event = "run_end",
                run = run.id(),
                score = %score,
                time_ms = run.time_millis_spent(),
                calculate_count = run.calculate_count(),
            ),
            (None, Some(failure)) => warn!(
                event = "run_failed",
                run = run.id(),
                error = %failure.message(),
                time_ms = run.time_millis_spent(),
            ),
            (None, None) => {}
        }

        Ok(run)
    }
}

/// Builder for creating benchmarks with fluent API.
pub struct BenchmarkBuilder {
    config: BenchmarkConfig,
    solver_name: String,
    problem_name: String,
}

impl BenchmarkBuilder {
    /// Creates a new benchmark builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: BenchmarkConfig::new(name),
            solver_name: "default".to_string(),
            problem_name: "default".to_string(),
        }
    }

    /// Starts from a loaded configuration.
    pub fn from_config(config: BenchmarkConfig) -> Self {
        Self {
            config,
            solver_name: "default".to_string(),
            problem_name: "default".to_string(),
        }
    }

    /// Sets the solver name.
    pub fn with_solver_name(mut self, name: impl Into<String>) -> Self {
        self.solver_name = name.into();
        self
    }

    /// Sets the problem name.
    pub fn with_problem_name(mut self, name: impl Into<String>) -> Self {
        self.problem_name = name.into();
        self
    }

    /// Sets the warmup count.
    pub fn with_warmup_count(mut self, count: usize) -> Self {
        self.config = self.config.with_warmup_count(count);
        self
    }

    /// Sets the run count.
    pub fn with_run_count(mut self, count: usize) -> Self {
        self.config = self.config.with_run_count(count);
        self
    }

    /// Builds the benchmark with the given problem factory and solver.
    pub fn build<Prob, Sc, E, P, F>(self, problem_factory: P, solver: F) -> Benchmark<Prob, Sc, E, P, F>
    where
        Prob: BenchmarkProblem,
        Sc: Score,
        E: Error + 'static,
        P: Fn() -> Prob,
        F: Fn(Prob, &mut RunProgress) -> std::result::Result<Sc, E>,
    {
        Benchmark::new(
            self.config,
            self.solver_name,
            self.problem_name,
            problem_factory,
            solver,
        )
    }
}
