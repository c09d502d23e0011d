#![allow(clippy::expect_used)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use hostpulse::application::config::SpreadsheetConfig;
use hostpulse::application::services::scheduler::{Scheduler, SinkOutcome};
use hostpulse::domain::entities::host::HostIdentity;
use hostpulse::domain::ports::notifier::{NotificationError, Notifier};
use hostpulse::domain::value_objects::thresholds::ThresholdSet;
use hostpulse::infrastructure::collectors::FixedSampler;
use hostpulse::infrastructure::persistence::DailyLogFile;
use hostpulse::infrastructure::spreadsheet::GoogleSheetsClient;

// ---------------------------------------------------------------------------
// TrackingNotifier
// ---------------------------------------------------------------------------

struct TrackingNotifier {
    sent: Mutex<Vec<String>>,
    reject: bool,
}

impl TrackingNotifier {
    const fn new(reject: bool) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            reject,
        }
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for TrackingNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotificationError> {
        self.sent.lock().expect("lock").push(text.to_string());
        if self.reject {
            return Err(NotificationError::Rejected {
                status: 401,
                body: "invalid access token".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sheets client whose credentials file does not exist, so every append
/// fails locally before touching the network.
fn offline_sheets(dir: &std::path::Path) -> GoogleSheetsClient {
    let config = SpreadsheetConfig {
        credentials_path: dir.join("credentials.json").display().to_string(),
        api_base: "http://127.0.0.1:9/v4/spreadsheets".to_string(),
        timeout_secs: 1,
    };
    GoogleSheetsClient::new("sheet-123", &config).expect("build sheets client")
}

fn thresholds() -> ThresholdSet {
    ThresholdSet {
        cpu_max: 80,
        memory_max: 80,
        disk_max: 90,
    }
}

/// Lines of the log file for the day `at` falls on.
fn read_log(log: &DailyLogFile, at: DateTime<Utc>) -> Vec<String> {
    std::fs::read_to_string(log.path_for(at))
        .expect("read log file")
        .lines()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cpu_breach_on_web01_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let host = HostIdentity::new("web01").expect("host");
    let sampler = FixedSampler::new(95, 50, None);
    let log = DailyLogFile::new(dir.path().to_str().expect("utf8"), host.clone());
    let notifier = TrackingNotifier::new(false);
    let sheets = offline_sheets(dir.path());

    let scheduler = Scheduler::new(
        &sampler,
        &log,
        &notifier,
        &sheets,
        thresholds(),
        &host,
        Duration::from_secs(5),
    );
    let report = scheduler.run_once().await.expect("cycle");

    assert_eq!(report.alert_lines, vec!["web01: CPU usage too high: 95%"]);
    assert_eq!(notifier.sent(), vec!["web01: CPU usage too high: 95%"]);
    assert_eq!(report.notification, SinkOutcome::Delivered);
    assert!(report.spreadsheet.is_failed());

    let lines = read_log(&log, report.sample.timestamp);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("| CPU: 95% | Memory: 50% | Disk: -1%"));
    assert!(lines[1].contains("| ERROR: spreadsheet append failed: unable to load credentials"));

    let file_name = log
        .path_for(report.sample.timestamp)
        .file_name()
        .expect("file name")
        .to_string_lossy()
        .into_owned();
    assert!(file_name.starts_with("web01-"));
    assert!(file_name.ends_with(".log"));
}

#[tokio::test]
async fn quiet_host_is_logged_without_notification() {
    let dir = tempfile::tempdir().expect("tempdir");
    let host = HostIdentity::new("db01").expect("host");
    let sampler = FixedSampler::new(20, 30, Some(40));
    let log = DailyLogFile::new(dir.path().to_str().expect("utf8"), host.clone());
    let notifier = TrackingNotifier::new(false);
    let sheets = offline_sheets(dir.path());

    let scheduler = Scheduler::new(
        &sampler,
        &log,
        &notifier,
        &sheets,
        thresholds(),
        &host,
        Duration::from_secs(5),
    );
    let report = scheduler.run_once().await.expect("cycle");

    assert!(report.alert_lines.is_empty());
    assert_eq!(report.notification, SinkOutcome::Skipped);
    assert!(notifier.sent().is_empty());
    assert!(read_log(&log, report.sample.timestamp)[0].ends_with("| CPU: 20% | Memory: 30% | Disk: 40%"));
}

#[tokio::test]
async fn both_network_sinks_failing_are_both_recorded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let host = HostIdentity::new("web01").expect("host");
    let sampler = FixedSampler::new(95, 95, Some(95));
    let log = DailyLogFile::new(dir.path().to_str().expect("utf8"), host.clone());
    let notifier = TrackingNotifier::new(true);
    let sheets = offline_sheets(dir.path());

    let scheduler = Scheduler::new(
        &sampler,
        &log,
        &notifier,
        &sheets,
        thresholds(),
        &host,
        Duration::from_secs(5),
    );
    let report = scheduler.run_once().await.expect("cycle survives sink failures");

    assert_eq!(report.alert_lines.len(), 3);
    assert!(report.notification.is_failed());
    assert!(report.spreadsheet.is_failed());

    let lines = read_log(&log, report.sample.timestamp);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("| ERROR: notification failed: notification service returned HTTP 401"));
    assert!(lines[2].contains("| ERROR: spreadsheet append failed"));
}

#[tokio::test(start_paused = true)]
async fn loop_survives_repeated_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let host = HostIdentity::new("web01").expect("host");
    let sampler = FixedSampler::new(95, 50, None);
    let log = DailyLogFile::new(dir.path().to_str().expect("utf8"), host.clone());
    let notifier = TrackingNotifier::new(true);
    let sheets = offline_sheets(dir.path());

    let scheduler = Scheduler::new(
        &sampler,
        &log,
        &notifier,
        &sheets,
        thresholds(),
        &host,
        Duration::from_secs(5),
    );
    let outcome = tokio::time::timeout(Duration::from_secs(22), scheduler.run_forever()).await;

    assert!(outcome.is_err(), "loop should still be running");
    assert_eq!(sampler.samples_taken(), 5);
    assert_eq!(notifier.sent().len(), 5);
}

#[tokio::test]
async fn unwritable_log_directory_stops_the_cycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blocker = dir.path().join("logs");
    std::fs::write(&blocker, "not a directory").expect("write blocker");

    let host = HostIdentity::new("web01").expect("host");
    let sampler = FixedSampler::new(95, 50, None);
    let log = DailyLogFile::new(blocker.to_str().expect("utf8"), host.clone());
    let notifier = TrackingNotifier::new(false);
    let sheets = offline_sheets(dir.path());

    let scheduler = Scheduler::new(
        &sampler,
        &log,
        &notifier,
        &sheets,
        thresholds(),
        &host,
        Duration::from_secs(5),
    );

    assert!(scheduler.run_once().await.is_err());
    assert!(notifier.sent().is_empty());
}
