use std::fmt::Display;

use common::physical::Temperature;
use serde::{Deserialize, Serialize};

/// The downstream outcome the dispatcher emits after handling one event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ThermalNotification {
    /// Routine telemetry sample.
    Telemetry(Temperature),

    /// A confirmed reading above the over-temperature threshold.
    OverTemperature,

    /// An alert reading that came back at or below the threshold.
    SafeOperating,
}

impl Display for ThermalNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Telemetry(temperature) => {
                write!(f, "<Thermal Notification | telemetry: {}>", temperature)
            }
            Self::OverTemperature => write!(f, "<Thermal Notification | over temperature>"),
            Self::SafeOperating => write!(f, "<Thermal Notification | safe operating>"),
        }
    }
}
