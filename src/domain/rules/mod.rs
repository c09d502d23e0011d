use crate::domain::entities::alert::AlertMessage;
use crate::domain::entities::host::HostIdentity;
use crate::domain::entities::sample::Sample;
use crate::domain::value_objects::metric::Metric;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Compares `sample` against `thresholds` and builds this cycle's alert text.
///
/// Pure function: one line per metric strictly above its limit, in the order
/// CPU, memory, disk. An unavailable disk reading never alerts. There is no
/// memory between cycles, so a metric that stays high alerts every cycle.
#[must_use]
pub fn evaluate(sample: &Sample, thresholds: &ThresholdSet, host: &HostIdentity) -> AlertMessage {
    let mut message = AlertMessage::new();
    for metric in Metric::ALL {
        if let Some(value) = breach(metric, sample, thresholds) {
            message.push(format!("{host}: {metric} usage too high: {value}%"));
        }
    }
    message
}

fn breach(metric: Metric, sample: &Sample, thresholds: &ThresholdSet) -> Option<u8> {
    metric
        .reading(sample)
        .filter(|&value| value > thresholds.limit(metric))
}
