#![allow(clippy::expect_used)]

use std::time::Duration;

use hostpulse::application::config::AppConfig;
use hostpulse::domain::value_objects::thresholds::ThresholdSet;

fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}

#[test]
fn deployment_config_drives_thresholds_and_interval() {
    let (_dir, path) = write_config(
        r#"
cpu_usage_threshold = 80
memory_usage_threshold = 80
disk_usage_threshold = 90
interval_seconds = 5
log_directory = "logs"
google_sheet_id = "1AbCdEf"
"#,
    );

    let config = AppConfig::load_from(&path).expect("load config");
    assert_eq!(ThresholdSet::from(&config), ThresholdSet::default());
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert_eq!(config.log_directory, "logs");
    assert_eq!(config.google_sheet_id, "1AbCdEf");
}

#[test]
fn omitted_interval_falls_back_to_five_seconds() {
    let (_dir, path) = write_config("google_sheet_id = \"x\"\ncpu_usage_threshold = 50\n");
    let config = AppConfig::load_from(&path).expect("load config");
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert_eq!(ThresholdSet::from(&config).cpu_max, 50);
}

#[test]
fn config_without_sheet_id_is_rejected() {
    let (_dir, path) = write_config("cpu_usage_threshold = 80\n");
    let err = AppConfig::load_from(&path).expect_err("sheet id required");
    assert!(format!("{err:#}").contains("google_sheet_id"));
}

#[test]
fn yaml_style_config_is_rejected() {
    let (_dir, path) = write_config("cpu_usage_threshold: 80\ngoogle_sheet_id: x\n");
    assert!(AppConfig::load_from(&path).is_err());
}
