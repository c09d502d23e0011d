use std::convert::Infallible;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;

use crate::domain::entities::host::HostIdentity;
use crate::domain::entities::sample::Sample;
use crate::domain::ports::log_sink::LogSink;
use crate::domain::ports::notifier::Notifier;
use crate::domain::ports::sampler::ResourceSampler;
use crate::domain::ports::spreadsheet::SpreadsheetSink;
use crate::domain::rules::evaluate;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// What happened to one sink during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkOutcome {
    Delivered,
    /// The call failed; the message is what went to the log's error path.
    Failed(String),
    /// The sink was not invoked (nothing to notify).
    Skipped,
}

impl SinkOutcome {
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Result of a single polling cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub sample: Sample,
    pub alert_lines: Vec<String>,
    pub notification: SinkOutcome,
    pub spreadsheet: SinkOutcome,
}

/// Drives the polling loop: sample → log → evaluate → notify → spreadsheet.
///
/// One cycle completes before the next begins. Network sink failures are
/// recorded and the loop carries on; sampling and local log failures abort.
pub struct Scheduler<'a> {
    sampler: &'a dyn ResourceSampler,
    log: &'a dyn LogSink,
    notifier: &'a dyn Notifier,
    spreadsheet: &'a dyn SpreadsheetSink,
    thresholds: ThresholdSet,
    host: &'a HostIdentity,
    interval: Duration,
}

impl<'a> Scheduler<'a> {
    #[must_use]
    pub const fn new(
        sampler: &'a dyn ResourceSampler,
        log: &'a dyn LogSink,
        notifier: &'a dyn Notifier,
        spreadsheet: &'a dyn SpreadsheetSink,
        thresholds: ThresholdSet,
        host: &'a HostIdentity,
        interval: Duration,
    ) -> Self {
        Self {
            sampler,
            log,
            notifier,
            spreadsheet,
            thresholds,
            host,
            interval,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Run a single cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if CPU or memory sampling fails, or if the local log
    /// cannot be written. Notification and spreadsheet failures are reported
    /// in the returned `CycleReport` instead.
    pub async fn run_once(&self) -> anyhow::Result<CycleReport> {
        let sample = self.sampler.sample().context("sampling failed")?;
        self.log
            .record_sample(&sample)
            .context("unable to write metrics to log file")?;

        let alert = evaluate(&sample, &self.thresholds, self.host);

        let notification = if alert.is_empty() {
            tracing::info!("{}: all metrics within thresholds", self.host);
            SinkOutcome::Skipped
        } else {
            tracing::warn!("{} threshold(s) exceeded", alert.len());
            match self.notifier.notify(&alert.to_text()).await {
                Ok(()) => {
                    tracing::info!("alert notification sent");
                    SinkOutcome::Delivered
                }
                Err(e) => self.record_failure(format!("notification failed: {e}"))?,
            }
        };

        let spreadsheet = match self.spreadsheet.append_row(self.host, &sample).await {
            Ok(()) => {
                tracing::info!("row appended to spreadsheet");
                SinkOutcome::Delivered
            }
            Err(e) => self.record_failure(format!("spreadsheet append failed: {e}"))?,
        };

        Ok(CycleReport {
            sample,
            alert_lines: alert.lines().to_vec(),
            notification,
            spreadsheet,
        })
    }

    /// Run cycles forever, sleeping `interval` between them.
    ///
    /// # Errors
    ///
    /// Only returns when a cycle hits a fatal error.
    pub async fn run_forever(&self) -> anyhow::Result<Infallible> {
        loop {
            self.run_once().await?;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Writes `message` to the log's error path and the diagnostic stream.
    fn record_failure(&self, message: String) -> anyhow::Result<SinkOutcome> {
        tracing::warn!("{message}");
        self.log
            .record_error(Utc::now(), &message)
            .context("unable to write error to log file")?;
        Ok(SinkOutcome::Failed(message))
    }
}
