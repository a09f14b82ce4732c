use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A discrete stimulus for the thermal dispatcher. Events carry no sensor
/// data; the dispatcher reads the sensor when it handles the event so the
/// reported value is never stale.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalEvent {
    /// Periodic demand to sample the sensor and report telemetry.
    MeasureRequested,

    /// The sensor's alert line tripped. Signals only that the hardware
    /// comparator threshold was crossed, not what the current value is.
    OverTemperatureSignaled,
}

impl Display for ThermalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MeasureRequested => write!(f, "<Thermal Event | measure requested>"),
            Self::OverTemperatureSignaled => {
                write!(f, "<Thermal Event | over temperature signaled>")
            }
        }
    }
}
