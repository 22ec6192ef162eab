// src/link/temperature.rs
use serde::{Deserialize, Serialize};

use crate::error::MixerError;

/// Value reported for a reading that could not be parsed
pub const SENTINEL_DEGREES: f64 = 0.0;

/// Result of a `T` query. `Unknown` is never a genuine reading, even
/// though it reports the 0.0 sentinel through [`TemperatureReading::degrees`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TemperatureReading {
    Valid(f64),
    Unknown,
}

impl TemperatureReading {
    pub fn parse(reply: &str) -> Result<Self, MixerError> {
        match reply.trim().parse::<f64>() {
            Ok(degrees) if degrees.is_finite() => Ok(TemperatureReading::Valid(degrees)),
            _ => Err(MixerError::Parse(reply.to_string())),
        }
    }

    pub fn degrees(&self) -> f64 {
        match self {
            TemperatureReading::Valid(degrees) => *degrees,
            TemperatureReading::Unknown => SENTINEL_DEGREES,
        }
    }

    pub fn valid(&self) -> Option<f64> {
        match self {
            TemperatureReading::Valid(degrees) => Some(*degrees),
            TemperatureReading::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TemperatureReading::Valid(_))
    }
}

impl Default for TemperatureReading {
    fn default() -> Self {
        TemperatureReading::Unknown
    }
}
