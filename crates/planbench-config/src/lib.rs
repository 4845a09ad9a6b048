//! Configuration system for planbench.
//!
//! Load benchmark session settings from TOML or YAML files so run counts and
//! report destinations can change without code changes.
//!
//! # Examples
//!
//! ```
//! use planbench_config::BenchmarkConfig;
//!
//! let config = BenchmarkConfig::from_toml_str(r#"
//!     name = "NQueens Benchmark"
//!     warmup_count = 2
//!     run_count = 5
//!
//!     [output]
//!     csv = "results.csv"
//!     markdown = "report.md"
//! "#).unwrap();
//!
//! assert_eq!(config.name(), "NQueens Benchmark");
//! assert_eq!(config.run_count(), 5);
//! assert_eq!(config.csv_output_path(), Some("results.csv"));
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use planbench_config::BenchmarkConfig;
//!
//! let config = BenchmarkConfig::load("benchmark.toml").unwrap_or_default();
//! assert_eq!(config.run_count(), 3);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a benchmark session.
///
/// Controls warmup iterations, measurement runs, and optional report paths.
///
/// # Example
///
/// ```
/// use planbench_config::BenchmarkConfig;
///
/// let config = BenchmarkConfig::new("My Benchmark")
///     .with_warmup_count(3)
///     .with_run_count(10);
///
/// assert_eq!(config.name(), "My Benchmark");
/// assert_eq!(config.warmup_count(), 3);
/// assert_eq!(config.run_count(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchmarkConfig {
    #[serde(default = "default_name")]
    name: String,

    /// Unmeasured runs executed before the measured ones.
    #[serde(default = "default_warmup_count")]
    warmup_count: usize,

    #[serde(default = "default_run_count")]
    run_count: usize,

    #[serde(default)]
    output: OutputConfig,
}

/// Report destinations. Each format is written only when its path is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,

    #[serde(default)]
    pub markdown: Option<String>,

    #[serde(default)]
    pub json: Option<String>,
}

fn default_name() -> String {
    "Benchmark".to_string()
}

fn default_warmup_count() -> usize {
    1
}

fn default_run_count() -> usize {
    3
}

impl BenchmarkConfig {
    /// Creates a new benchmark configuration with the given name.
    ///
    /// Defaults:
    /// - warmup_count: 1
    /// - run_count: 3
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            warmup_count: default_warmup_count(),
            run_count: default_run_count(),
            output: OutputConfig::default(),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()
    }

    /// Checks the settings a session cannot run without.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "benchmark name must not be empty".to_string(),
            ));
        }
        if self.run_count == 0 {
            return Err(ConfigError::Invalid(
                "run_count must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// Sets the number of warmup iterations (not measured).
    pub fn with_warmup_count(mut self, count: usize) -> Self {
        self.warmup_count = count;
        self
    }

    /// Sets the number of measurement runs.
    pub fn with_run_count(mut self, count: usize) -> Self {
        self.run_count = count;
        self
    }

    /// Sets the output path for CSV export.
    ///
    /// # Example
    ///
    /// ```
    /// use planbench_config::BenchmarkConfig;
    ///
    /// let config = BenchmarkConfig::new("Test").with_csv_output("results.csv");
    /// assert_eq!(config.csv_output_path(), Some("results.csv"));
    /// ```
    pub fn with_csv_output(mut self, path: impl Into<String>) -> Self {
        self.output.csv = Some(path.into());
        self
    }

    /// Sets the output path for the Markdown report.
    pub fn with_markdown_output(mut self, path: impl Into<String>) -> Self {
        self.output.markdown = Some(path.into());
        self
    }

    /// Sets the output path for the JSON run records.
    pub fn with_json_output(mut self, path: impl Into<String>) -> Self {
        self.output.json = Some(path.into());
        self
    }

    /// Returns the benchmark name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of warmup iterations.
    pub fn warmup_count(&self) -> usize {
        self.warmup_count
    }

    /// Returns the number of measurement runs.
    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Returns the CSV output path, if set.
    pub fn csv_output_path(&self) -> Option<&str> {
        self.output.csv.as_deref()
    }

    /// Returns the Markdown output path, if set.
    pub fn markdown_output_path(&self) -> Option<&str> {
        self.output.markdown.as_deref()
    }

    /// Returns the JSON output path, if set.
    pub fn json_output_path(&self) -> Option<&str> {
        self.output.json.as_deref()
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self::new(default_name())
    }
}

#[cfg(test)]
mod tests;
