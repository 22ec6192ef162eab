// src/link/transport/mod.rs
//! Transport seam between DeviceLink and the wire (real serial or simulated)

use async_trait::async_trait;
use std::time::Duration;

use crate::config::LinkConfig;
use crate::error::Result;

pub mod locator;
pub mod serial;
pub mod simulated;

#[cfg(test)]
pub mod scripted;

pub use locator::{DeviceLocator, FixedLocator, PrefixLocator};
pub use serial::{SerialConnector, SerialTransport};
pub use simulated::{SimulatedConnector, SimulatedDevice, SimulatedTransport};

/// One open connection to the controller.
#[async_trait]
pub trait Transport: Send {
    async fn write(&mut self, bytes: &[u8]) -> std::io::Result<()>;

    /// Next line with terminators stripped, or `""` when nothing arrives
    /// within `timeout`. A dead link is an `Err`, never an empty line.
    async fn read_line(&mut self, timeout: Duration) -> std::io::Result<String>;

    async fn close(&mut self) -> std::io::Result<()>;

    fn describe(&self) -> String;
}

/// Produces fresh transports; called on startup and on every reset.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Transport>>;

    fn describe(&self) -> String;
}

/// Pick the real or simulated connector from configuration.
pub fn connector_from_config(config: &LinkConfig) -> Box<dyn Connector> {
    if config.production {
        let locator = PrefixLocator::new(&config.device_dir, &config.device_prefix);
        Box::new(SerialConnector::new(Box::new(locator), config.baud_rate))
    } else {
        Box::new(SimulatedConnector::new())
    }
}
