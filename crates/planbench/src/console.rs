//! Colorful console output for benchmark sessions.
//!
//! Provides a `tracing` layer that formats runner events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Session start/end, per-run results, written reports
//! - **WARN**: Failed runs
//! - **DEBUG**: Problem metrics, warmup runs

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output for benchmark sessions.
///
/// Safe to call multiple times - only the first call has effect. The
/// default filter is `planbench=info`; `RUST_LOG` replaces it.
pub fn init() {
    install_once(&INIT, || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("planbench=info"));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(BenchmarkConsoleLayer)
            .try_init();
    });
}

fn install_once(guard: &OnceLock<()>, install: impl FnOnce()) {
    guard.get_or_init(install);
}

/// A tracing layer that formats benchmark events with colors.
pub struct BenchmarkConsoleLayer;

impl<S: Subscriber> Layer<S> for BenchmarkConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("planbench") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    benchmark: Option<String>,
    solver: Option<String>,
    problem: Option<String>,
    run: Option<String>,
    score: Option<String>,
    error: Option<String>,
    format: Option<String>,
    path: Option<String>,
    time_ms: Option<u64>,
    calculate_count: Option<u64>,
    warmups: Option<u64>,
    runs: Option<u64>,
    succeeded: Option<u64>,
    failed: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, field: &Field, value: String) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "benchmark" => &mut self.benchmark,
            "solver" => &mut self.solver,
            "problem" => &mut self.problem,
            "run" => &mut self.run,
            "score" => &mut self.score,
            "error" => &mut self.error,
            "format" => &mut self.format,
            "path" => &mut self.path,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        let s = format!("{:?}", value);
        self.set_text(field, s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "time_ms" => self.time_ms = Some(value),
            "calculate_count" => self.calculate_count = Some(value),
            "warmups" => self.warmups = Some(value),
            "runs" => self.runs = Some(value),
            "succeeded" => self.succeeded = Some(value),
            "failed" => self.failed = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if let Ok(value) = u64::try_from(value) {
            self.record_u64(field, value);
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "benchmark_start" => format_benchmark_start(v),
        "benchmark_end" => format_benchmark_end(v),
        "run_end" => format_run_end(v),
        "run_failed" => format_run_failed(v),
        "report_written" => format_report_written(v),
        _ => String::new(),
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("?")
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_benchmark_start(v: &EventVisitor) -> String {
    format!(
        "{} {} │ {} on {} │ {} warmups │ {} runs",
        "▶".bright_green().bold(),
        text(&v.benchmark).white().bold(),
        text(&v.solver).bright_cyan(),
        text(&v.problem).bright_yellow(),
        count(v.warmups),
        count(v.runs),
    )
}

fn format_benchmark_end(v: &EventVisitor) -> String {
    let failed = v.failed.unwrap_or(0);
    let failed_text = if failed > 0 {
        format!("{} failed", count(v.failed)).bright_red().to_string()
    } else {
        "0 failed".white().to_string()
    };

    format!(
        "{} {} │ {} │ {} succeeded │ {}",
        "■".bright_cyan().bold(),
        text(&v.benchmark).white().bold(),
        text(&v.solver).bright_cyan(),
        count(v.succeeded).bright_green(),
        failed_text,
    )
}

fn format_run_end(v: &EventVisitor) -> String {
    format!(
        "  {} {} │ {} │ {} │ {} calcs",
        "✓".bright_green(),
        text(&v.run),
        text(&v.score).bright_magenta().bold(),
        format_duration_ms(v.time_ms.unwrap_or(0)).yellow(),
        count(v.calculate_count),
    )
}

fn format_run_failed(v: &EventVisitor) -> String {
    format!(
        "  {} {} │ {} │ {}",
        "✗".bright_red(),
        text(&v.run),
        "FAILED".bright_red().bold(),
        text(&v.error).red(),
    )
}

fn format_report_written(v: &EventVisitor) -> String {
    format!(
        "{} {} report → {}",
        "✎".bright_blue(),
        text(&v.format),
        text(&v.path).underline(),
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_run_end_line() {
        let v = EventVisitor {
            run: Some("HC/p1/run-0".to_string()),
            score: Some("-120".to_string()),
            time_ms: Some(3400),
            calculate_count: Some(12_000),
            ..visitor("run_end")
        };
        let line = format_event(&v);
        assert!(line.contains("HC/p1/run-0"));
        assert!(line.contains("-120"));
        assert!(line.contains("3.40s"));
        assert!(line.contains("12,000"));
    }

    #[test]
    fn test_run_failed_line() {
        let v = EventVisitor {
            run: Some("HC/p1/run-1".to_string()),
            error: Some("OutOfMemory".to_string()),
            ..visitor("run_failed")
        };
        let line = format_event(&v);
        assert!(line.contains("FAILED"));
        assert!(line.contains("OutOfMemory"));
    }

    #[test]
    fn test_unknown_events_are_silent() {
        assert!(format_event(&visitor("run_start")).is_empty());
        assert!(format_event(&EventVisitor::default()).is_empty());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(500), "500ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_repeated_init_installs_once() {
        let guard = OnceLock::new();
        let mut installs = 0;
        install_once(&guard, || installs += 1);
        install_once(&guard, || installs += 1);
        assert_eq!(installs, 1);
    }
}
