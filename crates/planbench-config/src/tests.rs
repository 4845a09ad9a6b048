//! Tests for benchmark configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        name = "Scheduling"
        warmup_count = 0
        run_count = 10

        [output]
        markdown = "report.md"
        json = "runs.json"
    "#;

    let config = BenchmarkConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.name(), "Scheduling");
    assert_eq!(config.warmup_count(), 0);
    assert_eq!(config.run_count(), 10);
    assert_eq!(config.csv_output_path(), None);
    assert_eq!(config.markdown_output_path(), Some("report.md"));
    assert_eq!(config.json_output_path(), Some("runs.json"));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        name: Scheduling
        run_count: 4
        output:
          csv: results.csv
    "#;

    let config = BenchmarkConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.name(), "Scheduling");
    assert_eq!(config.warmup_count(), 1);
    assert_eq!(config.run_count(), 4);
    assert_eq!(config.csv_output_path(), Some("results.csv"));
}

#[test]
fn test_defaults_for_empty_document() {
    let config = BenchmarkConfig::from_toml_str("").unwrap();
    assert_eq!(config, BenchmarkConfig::default());
}

#[test]
fn test_zero_run_count_rejected() {
    let err = BenchmarkConfig::from_toml_str("run_count = 0").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_blank_name_rejected() {
    let err = BenchmarkConfig::from_yaml_str("name: '  '").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_malformed_toml() {
    let err = BenchmarkConfig::from_toml_str("run_count = \"many\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_missing_file() {
    let err = BenchmarkConfig::load("/nonexistent/benchmark.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder_methods() {
    let config = BenchmarkConfig::new("Test")
        .with_warmup_count(2)
        .with_run_count(7)
        .with_csv_output("a.csv")
        .with_markdown_output("a.md")
        .with_json_output("a.json");

    assert_eq!(config.warmup_count(), 2);
    assert_eq!(config.run_count(), 7);
    assert_eq!(config.csv_output_path(), Some("a.csv"));
    assert_eq!(config.markdown_output_path(), Some("a.md"));
    assert_eq!(config.json_output_path(), Some("a.json"));
}
