use common::registers::SensorConfig;
use thiserror::Error;
use tokio::sync::{
    broadcast,
    mpsc::{self, error::TrySendError},
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, trace, warn};

use crate::{
    controls::classify_alert_reading,
    externals::hardware::{
        lm75bd::{Lm75bd, SensorError},
        services::BusTransport,
    },
    models::{notification::ThermalNotification, thermal_event::ThermalEvent},
};

/// Number of events the dispatch queue holds before producers see
/// backpressure. Events are best effort telemetry; a burst beyond this
/// depth drops at the producer.
pub const EVENT_QUEUE_DEPTH: usize = 10;

/// Capacity of the notification fan-out channel.
const NOTIFICATION_CHANNEL_DEPTH: usize = 32;

/// Handle for posting thermal events. Cheap to clone; every producer
/// context gets its own. Posting never blocks.
#[derive(Clone)]
pub struct EventProducer {
    tx_event: mpsc::Sender<ThermalEvent>,
}

/// Represents errors in posting an event to the dispatch queue.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PostError {
    /// The queue is at capacity. The event was dropped; the queue's prior
    /// contents are unchanged.
    #[error("Thermal event queue is full.")]
    QueueFull,

    /// The dispatcher is no longer running, so the event has nowhere to
    /// go.
    #[error("Thermal dispatcher is not running.")]
    NotRunning,
}

impl EventProducer {
    /// Post a periodic measurement request.
    pub fn post_measure_request(&self) -> Result<(), PostError> {
        self.post(ThermalEvent::MeasureRequested)
    }

    /// Post the over-temperature alert. This is the interrupt handler's
    /// path: a single non-blocking push, no logging, no allocation.
    pub fn post_over_temperature_interrupt(&self) -> Result<(), PostError> {
        self.post(ThermalEvent::OverTemperatureSignaled)
    }

    fn post(&self, event: ThermalEvent) -> Result<(), PostError> {
        self.tx_event.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => PostError::QueueFull,
            TrySendError::Closed(_) => PostError::NotRunning,
        })
    }
}

/// The initialized thermal system: owns the producer side of the event
/// queue and the notification fan-out. Construct exactly one per process
/// via `initialize`.
pub struct ThermalSystem {
    producer: EventProducer,
    tx_notification: broadcast::Sender<ThermalNotification>,
}

impl ThermalSystem {
    /// Provision the event queue, apply the device configuration, and
    /// start the dispatcher task on `tracker`. Must complete before any
    /// event is posted; configuration failures surface here and nothing is
    /// spawned.
    pub fn initialize<B>(
        tracker: &TaskTracker,
        token: CancellationToken,
        bus: B,
        config: SensorConfig,
    ) -> Result<Self, SensorError>
    where
        B: BusTransport + Send + 'static,
    {
        let mut sensor = Lm75bd::new(bus, config);
        sensor.apply_config()?;

        let (tx_event, rx_event) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (tx_notification, _) = broadcast::channel(NOTIFICATION_CHANNEL_DEPTH);

        let tx_notification_clone = tx_notification.clone();
        tracker.spawn(async move {
            task_thermal_dispatcher(token, rx_event, tx_notification_clone, sensor).await
        });

        Ok(Self {
            producer: EventProducer { tx_event },
            tx_notification,
        })
    }

    /// A posting handle for a producer context.
    pub fn producer(&self) -> EventProducer {
        self.producer.clone()
    }

    /// Subscribe to the dispatcher's notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ThermalNotification> {
        self.tx_notification.subscribe()
    }
}

/// Task: The single consumer of the thermal event queue. Blocks until an
/// event arrives, reads the sensor fresh, and broadcasts the outcome. A
/// failed read never stops the loop; only cancellation, or every producer
/// handle dropping, does. Can be cancelled.
#[tracing::instrument(skip_all)]
pub async fn task_thermal_dispatcher<B: BusTransport>(
    token: CancellationToken,
    mut rx_event: mpsc::Receiver<ThermalEvent>,
    tx_notification: broadcast::Sender<ThermalNotification>,
    mut sensor: Lm75bd<B>,
) {
    info!("Started.");
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                warn!("Cancelled.");
                break;
            },
            event = rx_event.recv() => {
                match event {
                    Some(event) => business_logic(event, &mut sensor, &tx_notification),
                    None => {
                        warn!("Every producer handle dropped.");
                        break;
                    }
                }
            }
        };
    }
}

/// Handle one popped event: read the sensor, map the event to its
/// outcome, and try to emit it. A bus failure drops the event; the next
/// periodic request or alert re-attempts naturally.
#[tracing::instrument(skip_all)]
fn business_logic<B: BusTransport>(
    event: ThermalEvent,
    sensor: &mut Lm75bd<B>,
    tx_notification: &broadcast::Sender<ThermalNotification>,
) {
    trace!("Executing business logic.");
    let temperature = match sensor.read_temperature() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to read temperature. Error: {}", e);
            return;
        }
    };

    debug!("Read temperature: {}", temperature);
    let notification = match event {
        ThermalEvent::MeasureRequested => ThermalNotification::Telemetry(temperature),
        ThermalEvent::OverTemperatureSignaled => classify_alert_reading(temperature),
    };

    if let Err(e) = tx_notification.send(notification) {
        warn!("Failed to broadcast notification. Error: {}", e);
    } else {
        debug!("Sent a notification.");
    }
}
