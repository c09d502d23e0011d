use crate::application::services::scheduler::{CycleReport, Scheduler, SinkOutcome};

fn outcome_word(outcome: &SinkOutcome) -> &'static str {
    match outcome {
        SinkOutcome::Delivered => "sent",
        SinkOutcome::Failed(_) => "failed",
        SinkOutcome::Skipped => "skipped",
    }
}

/// One-line summary of a finished cycle for the diagnostic stream.
#[must_use]
pub fn cycle_summary(report: &CycleReport) -> String {
    format!(
        "Cycle done: CPU {}% | Memory {}% | Disk {}% | {} alert(s), notification {}, spreadsheet {}",
        report.sample.cpu_percent,
        report.sample.memory_percent,
        report.sample.disk_value(),
        report.alert_lines.len(),
        outcome_word(&report.notification),
        outcome_word(&report.spreadsheet)
    )
}

/// Run the polling loop until Ctrl+C or a fatal error.
///
/// The shutdown signal is only observed while idle between cycles, so a
/// cycle that has started always runs to completion.
///
/// # Errors
///
/// Returns the first fatal cycle error (sampling or local log failure).
pub async fn run_daemon(scheduler: &Scheduler<'_>) -> anyhow::Result<()> {
    tracing::info!(
        "Daemon started (interval: {}s)",
        scheduler.interval().as_secs()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let report = scheduler.run_once().await?;
        tracing::debug!("{}", cycle_summary(&report));

        tokio::select! {
            () = tokio::time::sleep(scheduler.interval()) => {}
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping");
                println!("\nStopping hostpulse...");
                break;
            }
        }
    }
    Ok(())
}
