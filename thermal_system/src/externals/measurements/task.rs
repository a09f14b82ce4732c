use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::system::EventProducer;

/// How often the alert line is sampled for an edge.
const ALERT_POLL_PERIOD: Duration = Duration::from_millis(100);

/// Task: Runs periodically to request a fresh temperature measurement for
/// telemetry. A full queue only drops this request; the next period
/// re-attempts. Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_periodic_measure_requests(
    token: CancellationToken,
    producer: EventProducer,
    period: Duration,
) {
    info!("Started.");
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = tokio::time::sleep(period) => {
                trace!("Requesting a measurement.");
                if let Err(e) = producer.post_measure_request() {
                    warn!("Dropped a measurement request. Error: {}", e);
                }
            }
        };
    }
}

/// Task: Polls the alert line and posts an over-temperature event on each
/// rising edge. Stands in for the alert pin's interrupt handler, so the
/// posting path does not log or block; a full queue drops the event.
/// Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_watch_alert_line(
    token: CancellationToken,
    alert_line: Arc<AtomicBool>,
    producer: EventProducer,
) {
    info!("Started.");
    let mut was_asserted = false;
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            _ = tokio::time::sleep(ALERT_POLL_PERIOD) => {
                let asserted = alert_line.load(Ordering::SeqCst);
                if asserted && !was_asserted {
                    let _ = producer.post_over_temperature_interrupt();
                }
                was_asserted = asserted;
            }
        };
    }
}
