use colored::{ColoredString, Colorize};

use crate::application::services::scheduler::{CycleReport, SinkOutcome};
use crate::domain::value_objects::metric::Metric;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Readings this close to their limit are shown as a warning.
const WARN_MARGIN: u8 = 10;

#[must_use]
pub fn colorize_reading(value: Option<u8>, limit: u8) -> ColoredString {
    let Some(value) = value else {
        return "unavailable".dimmed();
    };
    let text = format!("{value}%");
    if value > limit {
        text.red().bold()
    } else if value >= limit.saturating_sub(WARN_MARGIN) {
        text.yellow()
    } else {
        text.green()
    }
}

#[must_use]
pub fn outcome_badge(outcome: &SinkOutcome) -> ColoredString {
    match outcome {
        SinkOutcome::Delivered => "delivered".green(),
        SinkOutcome::Skipped => "skipped".dimmed(),
        SinkOutcome::Failed(reason) => format!("failed ({reason})").red(),
    }
}

/// One line per metric, then the alert lines and sink outcomes.
#[must_use]
pub fn format_cycle(report: &CycleReport, thresholds: &ThresholdSet) -> Vec<String> {
    let mut lines: Vec<String> = Metric::ALL
        .iter()
        .map(|&metric| {
            format!(
                "{:<8} {} (limit {}%)",
                metric.to_string(),
                colorize_reading(metric.reading(&report.sample), thresholds.limit(metric)),
                thresholds.limit(metric)
            )
        })
        .collect();

    if report.alert_lines.is_empty() {
        lines.push(format!("{}", "All metrics within thresholds".green()));
    } else {
        lines.extend(report.alert_lines.iter().map(|l| format!("{}", l.yellow().bold())));
    }

    lines.push(format!("Notification: {}", outcome_badge(&report.notification)));
    lines.push(format!("Spreadsheet:  {}", outcome_badge(&report.spreadsheet)));
    lines
}

pub fn print_cycle(report: &CycleReport, thresholds: &ThresholdSet) {
    println!("{}", report.sample.local_timestamp().bold().cyan());
    for line in format_cycle(report, thresholds) {
        println!("  {line}");
    }
}
