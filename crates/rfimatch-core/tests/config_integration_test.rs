//! Integration tests for layered configuration
//!
//! Precedence: CLI arguments > Environment variables > Config file > Defaults

use rfimatch_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use rfimatch_core::models::CandidateScope;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const ENV_KEYS: &[&str] = &[
    "RFIMATCH_PAGE_SIZE",
    "RFIMATCH_RECORD_LIMIT",
    "RFIMATCH_SAMPLE_COUNT",
    "RFIMATCH_CANDIDATE_SCOPE",
    "RFIMATCH_ARCHIVE_URL",
    "RFIMATCH_REGISTRY_PATH",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_partial_file_configuration() {
    let file = config_file("record_limit = 100\n# everything else stays default");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap();

    assert_eq!(config.record_limit.value, 100);
    assert_eq!(config.record_limit.source, ConfigSource::File);
    assert_eq!(config.page_size.value, 25);
    assert_eq!(config.page_size.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/rfimatch.toml");
    assert!(result.unwrap_err().is_configuration());
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("RFIMATCH_PAGE_SIZE", "50");
    env::set_var("RFIMATCH_CANDIDATE_SCOPE", "above_horizon");
    env::set_var("RFIMATCH_REGISTRY_PATH", "/etc/rfimatch/stations.csv");

    let file = config_file(
        r#"
page_size = 10
candidate_scope = "main_beam"
archive_url = "https://file.example.org"
"#,
    );

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.page_size.value, 50);
    assert_eq!(config.page_size.source, ConfigSource::Environment);
    assert_eq!(config.candidate_scope.value, CandidateScope::AboveHorizon);
    assert_eq!(
        config.registry_path.value,
        Some(PathBuf::from("/etc/rfimatch/stations.csv"))
    );
    // Not set in the environment, so the file value holds
    assert_eq!(config.archive_url.value, "https://file.example.org");
    assert_eq!(config.archive_url.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_value_is_ignored() {
    clear_env();
    env::set_var("RFIMATCH_SAMPLE_COUNT", "lots");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.sample_count.value, 20);
    assert_eq!(config.sample_count.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_all() {
    clear_env();
    env::set_var("RFIMATCH_RECORD_LIMIT", "75");

    let file = config_file("record_limit = 10");

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.record_limit.value, 75);
    assert_eq!(config.record_limit.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        record_limit: Some(5),
        ..Default::default()
    });

    assert_eq!(config.record_limit.value, 5);
    assert_eq!(config.record_limit.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_configuration_source_tracking() {
    let file = config_file("beamwidth_deg = 1.5");

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap();

    let map = config.to_inspection_map();

    let (beamwidth, source) = &map["beamwidth_deg"];
    assert_eq!(beamwidth, "1.5");
    assert_eq!(*source, ConfigSource::File);

    let (url, source) = &map["archive_url"];
    assert_eq!(url, "https://archive.sarao.ac.za");
    assert_eq!(*source, ConfigSource::Default);
}
