use tokio::sync::broadcast::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::models::notification::ThermalNotification;

/// Task: Writes each thermal notification to the console log.
/// Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_notification_logging(
    token: CancellationToken,
    mut rx_notification: Receiver<ThermalNotification>,
) {
    info!("Started.");
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            Ok(notification) = rx_notification.recv() => {
                match notification {
                    ThermalNotification::Telemetry(temperature) => {
                        info!("Temperature telemetry: {}", temperature);
                    }
                    ThermalNotification::OverTemperature => {
                        warn!("Over temperature detected!");
                    }
                    ThermalNotification::SafeOperating => {
                        info!("Returned to safe operating conditions!");
                    }
                }
            }
        };
    }
}
