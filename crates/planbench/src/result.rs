//! Aggregated statistics over the finalized runs of one configuration.

use std::cmp::Ordering;
use std::time::Duration;

use planbench_core::Score;

use crate::run::BenchmarkRunResult;

/// All measured runs of one solver configuration against one problem.
///
/// Score statistics only look at succeeded runs; failed runs are still
/// counted in [`failure_count`](Self::failure_count) and
/// [`failure_rate`](Self::failure_rate).
#[derive(Debug, Clone)]
pub struct BenchmarkResult<Sc: Score> {
    /// Benchmark name.
    pub name: String,
    /// Solver configuration name.
    pub solver_name: String,
    /// Problem instance name.
    pub problem_name: String,
    /// Finalized runs, in execution order.
    pub runs: Vec<BenchmarkRunResult<Sc>>,
}

impl<Sc: Score> BenchmarkResult<Sc> {
    /// Creates an empty benchmark result.
    pub fn new(
        name: impl Into<String>,
        solver_name: impl Into<String>,
        problem_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            solver_name: solver_name.into(),
            problem_name: problem_name.into(),
            runs: Vec::new(),
        }
    }

    /// Adds a finalized run.
    pub fn add_run(&mut self, run: BenchmarkRunResult<Sc>) {
        self.runs.push(run);
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn succeeded_runs(&self) -> impl Iterator<Item = &BenchmarkRunResult<Sc>> {
        self.runs.iter().filter(|r| r.succeeded())
    }

    pub fn failed_runs(&self) -> impl Iterator<Item = &BenchmarkRunResult<Sc>> {
        self.runs.iter().filter(|r| r.failed())
    }

    pub fn success_count(&self) -> usize {
        self.succeeded_runs().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_runs().count()
    }

    /// Fraction of runs that failed; 0.0 without runs.
    pub fn failure_rate(&self) -> f64 {
        if self.runs.is_empty() {
            0.0
        } else {
            self.failure_count() as f64 / self.runs.len() as f64
        }
    }

    fn scores(&self) -> impl Iterator<Item = &Sc> {
        self.runs.iter().filter_map(BenchmarkRunResult::score)
    }

    /// Returns the best score across succeeded runs.
    ///
    /// # Example
    ///
    /// ```
    /// use planbench::{BenchmarkResult, PendingRun, RunFailure};
    /// use planbench_core::SimpleScore;
    ///
    /// let mut result = BenchmarkResult::<SimpleScore>::new("Test", "HC", "Problem1");
    /// result.add_run(PendingRun::new("r0").unwrap().succeed(SimpleScore::of(-5), 100).unwrap());
    /// result.add_run(PendingRun::new("r1").unwrap().succeed(SimpleScore::of(0), 100).unwrap());
    /// result.add_run(PendingRun::new("r2").unwrap().fail(RunFailure::new("boom"), 10).unwrap());
    ///
    /// assert_eq!(result.best_score(), Some(&SimpleScore::of(0)));
    /// assert_eq!(result.worst_score(), Some(&SimpleScore::of(-5)));
    /// assert_eq!(result.failure_count(), 1);
    /// ```
    pub fn best_score(&self) -> Option<&Sc> {
        self.scores().max()
    }

    /// Returns the worst score across succeeded runs.
    pub fn worst_score(&self) -> Option<&Sc> {
        self.scores().min()
    }

    /// Returns the mean score of succeeded runs, rounded per level.
    pub fn average_score(&self) -> Option<Sc> {
        let count = self.success_count();
        if count == 0 {
            return None;
        }
        // Summed in i128; i64 level sums overflow.
        let mut totals = vec![0i128; Sc::levels_count()];
        for score in self.scores() {
            for (total, level) in totals.iter_mut().zip(score.to_level_numbers()) {
                *total += i128::from(level);
            }
        }
        let levels: Vec<i64> = totals
            .into_iter()
            .map(|total| rounded_mean(total, count as i128))
            .collect();
        Some(Sc::from_level_numbers(&levels))
    }

    /// Returns the average solve time over all runs, failed ones included.
    pub fn avg_time_spent(&self) -> Duration {
        if self.runs.is_empty() {
            return Duration::ZERO;
        }
        let total: u64 = self.runs.iter().map(|r| r.time_millis_spent()).sum();
        Duration::from_millis(total) / self.runs.len() as u32
    }

    /// Returns the minimum solve time.
    pub fn min_time_spent(&self) -> Duration {
        self.runs
            .iter()
            .map(|r| r.time_spent())
            .min()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns the maximum solve time.
    pub fn max_time_spent(&self) -> Duration {
        self.runs
            .iter()
            .map(|r| r.time_spent())
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Average evaluation steps per second over succeeded runs that took time.
    pub fn avg_calculate_speed(&self) -> f64 {
        let speeds: Vec<f64> = self
            .succeeded_runs()
            .filter_map(BenchmarkRunResult::calculate_speed)
            .collect();
        if speeds.is_empty() {
            0.0
        } else {
            speeds.iter().sum::<f64>() / speeds.len() as f64
        }
    }
}

/// Ranks configurations, best first.
///
/// Ordered by average score (descending). Configurations without any
/// succeeded run come last. Ties go to fewer failures, then to the lower
/// average time.
///
/// # Example
///
/// ```
/// use planbench::{rank, BenchmarkResult, PendingRun};
/// use planbench_core::SimpleScore;
///
/// let mut hill = BenchmarkResult::<SimpleScore>::new("B", "HillClimbing", "P");
/// hill.add_run(PendingRun::new("hc-0").unwrap().succeed(SimpleScore::of(-10), 5).unwrap());
///
/// let mut tabu = BenchmarkResult::<SimpleScore>::new("B", "Tabu", "P");
/// tabu.add_run(PendingRun::new("tabu-0").unwrap().succeed(SimpleScore::of(-2), 5).unwrap());
///
/// let ranked = rank(&[&hill, &tabu]);
/// assert_eq!(ranked[0].solver_name, "Tabu");
/// ```
pub fn rank<'a, Sc: Score>(results: &[&'a BenchmarkResult<Sc>]) -> Vec<&'a BenchmarkResult<Sc>> {
    let mut ranked: Vec<&'a BenchmarkResult<Sc>> = results.to_vec();
    ranked.sort_by(|a, b| compare_for_ranking(a, b));
    ranked
}

fn compare_for_ranking<Sc: Score>(a: &BenchmarkResult<Sc>, b: &BenchmarkResult<Sc>) -> Ordering {
    let by_score = match (a.average_score(), b.average_score()) {
        (Some(sa), Some(sb)) => sb.cmp(&sa),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_score
        .then_with(|| a.failure_count().cmp(&b.failure_count()))
        .then_with(|| a.avg_time_spent().cmp(&b.avg_time_spent()))
}

/// Divides and rounds half away from zero.
///
/// The mean of `i64` values always fits back into an `i64`.
fn rounded_mean(total: i128, count: i128) -> i64 {
    let quotient = total / count;
    let remainder = total % count;
    let rounded = if 2 * remainder.abs() >= count {
        quotient + total.signum()
    } else {
        quotient
    };
    rounded as i64
}
