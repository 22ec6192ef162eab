// src/link/mod.rs
//! DeviceLink - single-byte command protocol to the mixing controller

pub mod command;
pub mod temperature;
pub mod transport;
pub mod valve_state;

mod new;
mod open;
mod close;
mod reset;
mod read_response;
mod send;
mod control_valve;
mod queries;
mod drain_debug_messages;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub use command::Command;
pub use temperature::TemperatureReading;
pub use transport::{connector_from_config, Connector, Transport};
pub use valve_state::ValveState;

/// Owns the connection to the controller and re-establishes it on failure.
///
/// Exactly one caller may drive a link at a time; every operation takes
/// `&mut self`, which keeps command/reply pairs from interleaving.
pub struct DeviceLink {
    connector: Box<dyn Connector>,
    stream: Option<Box<dyn Transport>>,
    read_timeout: Duration,
    drain_timeout: Duration,
    reset_backoff: Duration,
    max_silent_responses: u32,
    silent_responses: u32,
    reset_count: u64,
}

impl DeviceLink {
    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Number of resets since the link was created
    pub fn reset_count(&self) -> u64 {
        self.reset_count
    }

    pub fn describe(&self) -> String {
        match &self.stream {
            Some(stream) => stream.describe(),
            None => format!("{} (disconnected)", self.connector.describe()),
        }
    }
}

impl std::fmt::Debug for DeviceLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceLink")
            .field("connection", &self.describe())
            .field("reset_count", &self.reset_count)
            .field("silent_responses", &self.silent_responses)
            .finish()
    }
}
