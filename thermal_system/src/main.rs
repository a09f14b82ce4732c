pub mod controls;
pub mod externals;
pub mod models;
pub mod system;

use std::time::Duration;

use anyhow::Result;
use common::registers::SensorConfig;
use externals::{
    event_logging::task::task_notification_logging,
    hardware::adapters::HostSimulatedLm75bd,
    measurements::task::{task_periodic_measure_requests, task_watch_alert_line},
};
use system::ThermalSystem;
use tokio::signal;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::level_filters::LevelFilter;

/// How often the measurement schedule asks for a fresh telemetry sample.
const MEASUREMENT_PERIOD: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_max_level(LevelFilter::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    let tracker = TaskTracker::new();

    let token = CancellationToken::new();

    let config = SensorConfig {
        fault_queue_size: 2,
        ..SensorConfig::default()
    };
    let bus = HostSimulatedLm75bd::new();
    let alert_line = bus.alert_line();

    let system = ThermalSystem::initialize(&tracker, token.clone(), bus, config)?;

    let token_clone = token.clone();
    let rx_notification = system.subscribe();
    tracker.spawn(async { task_notification_logging(token_clone, rx_notification).await });

    let token_clone = token.clone();
    let producer = system.producer();
    tracker.spawn(async {
        task_periodic_measure_requests(token_clone, producer, MEASUREMENT_PERIOD).await
    });

    let token_clone = token.clone();
    let producer = system.producer();
    tracker.spawn(async { task_watch_alert_line(token_clone, alert_line, producer).await });

    let token_clone = token.clone();

    tokio::select! {
        _ = token_clone.cancelled() => {}
        res = signal::ctrl_c() => {
            match res {
                Ok(_) => {
                    token.cancel();
                },
                Err(e)=>{
                    tracing::error!("Failed to listen for ctrl_c. Error: {}", e);
                    token.cancel();
                }
            };
        },
    }

    tracker.close();
    tracker.wait().await;

    Ok(())
}
