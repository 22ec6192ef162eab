// src/link/transport/simulated.rs
//! In-memory stand-in for the mixing controller firmware

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{Connector, Transport};
use crate::error::Result;
use crate::link::command::Command;
use crate::link::valve_state::{ValveState, PERCENT_PER_LETTER};

pub const HOT_SUPPLY_DEGREES: f64 = 120.0;
pub const COLD_SUPPLY_DEGREES: f64 = 50.0;
pub const AMBIENT_DEGREES: f64 = 65.0;

/// Physical state of the simulated rig. Shared by every connection the
/// [`SimulatedConnector`] hands out, so it survives resets like hardware does.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    pub hot_pulses: u32,
    pub cold_pulses: u32,
    pub output_open: bool,
    pub recycle_open: bool,
    pub pump_on: bool,
    pub temperature: f64,
    /// Fraction of the gap to the mixed temperature closed per `T` query
    pub lag: f64,
    /// Emit a `D` line ahead of every reply
    pub chatty: bool,
    pub commands_seen: u64,
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self {
            hot_pulses: 0,
            cold_pulses: 0,
            output_open: false,
            recycle_open: false,
            pump_on: false,
            temperature: AMBIENT_DEGREES,
            lag: 0.5,
            chatty: false,
            commands_seen: 0,
        }
    }
}

impl SimulatedDevice {
    pub fn valve_state(&self) -> ValveState {
        ValveState {
            hot_open_percent: self.hot_pulses * PERCENT_PER_LETTER,
            cold_open_percent: self.cold_pulses * PERCENT_PER_LETTER,
            output_open: self.output_open,
            recycle_open: self.recycle_open,
        }
    }

    /// Temperature the line settles at for the current valve openings.
    pub fn mixed_temperature(&self) -> f64 {
        let total = self.hot_pulses + self.cold_pulses;
        if total == 0 {
            return AMBIENT_DEGREES;
        }
        let hot = self.hot_pulses as f64 * HOT_SUPPLY_DEGREES;
        let cold = self.cold_pulses as f64 * COLD_SUPPLY_DEGREES;
        (hot + cold) / total as f64
    }

    /// Apply one command byte and return the lines the firmware would print.
    pub fn handle(&mut self, byte: u8) -> Vec<String> {
        self.commands_seen += 1;
        let mut lines = Vec::new();
        if self.chatty {
            lines.push(format!("D rx={} n={}", byte as char, self.commands_seen));
        }

        let reply = match Command::from_byte(byte) {
            Some(Command::Identify) => "I".to_string(),
            Some(Command::QueryValves) => self.valve_state().encode(),
            Some(Command::QueryTemperature) => {
                let mixed = self.mixed_temperature();
                self.temperature += (mixed - self.temperature) * self.lag;
                format!("{:.1}", self.temperature)
            }
            Some(command) => {
                if self.actuate(command) {
                    command.as_char().to_string()
                } else {
                    "E".to_string()
                }
            }
            None => "E".to_string(),
        };

        lines.push(reply);
        lines
    }

    fn actuate(&mut self, command: Command) -> bool {
        match command {
            Command::PulseOpenHot => self.hot_pulses += 1,
            Command::PulseOpenCold => self.cold_pulses += 1,
            Command::PulseCloseHot => {
                if self.hot_pulses == 0 {
                    return false;
                }
                self.hot_pulses -= 1;
            }
            Command::PulseCloseCold => {
                if self.cold_pulses == 0 {
                    return false;
                }
                self.cold_pulses -= 1;
            }
            Command::OpenOutput => self.output_open = true,
            Command::CloseOutput => self.output_open = false,
            Command::OpenRecycle => self.recycle_open = true,
            Command::CloseRecycle => self.recycle_open = false,
            Command::StartPump => self.pump_on = true,
            Command::StopPump => self.pump_on = false,
            Command::Identify | Command::QueryValves | Command::QueryTemperature => return false,
        }
        true
    }
}

pub struct SimulatedTransport {
    device: Arc<Mutex<SimulatedDevice>>,
    outbox: VecDeque<String>,
    closed: bool,
}

impl SimulatedTransport {
    pub fn new(device: Arc<Mutex<SimulatedDevice>>) -> Self {
        Self {
            device,
            outbox: VecDeque::new(),
            closed: false,
        }
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "simulated link closed")
}

#[async_trait]
impl Transport for SimulatedTransport {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(not_connected());
        }

        let mut device = self
            .device
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "simulated device poisoned"))?;
        for byte in bytes {
            self.outbox.extend(device.handle(*byte));
        }
        Ok(())
    }

    async fn read_line(&mut self, _timeout: Duration) -> io::Result<String> {
        if self.closed {
            return Err(not_connected());
        }
        // Nothing queued is an immediate timeout
        Ok(self.outbox.pop_front().unwrap_or_default())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.outbox.clear();
        Ok(())
    }

    fn describe(&self) -> String {
        "simulated".to_string()
    }
}

#[derive(Clone, Default)]
pub struct SimulatedConnector {
    device: Arc<Mutex<SimulatedDevice>>,
}

impl SimulatedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(device: SimulatedDevice) -> Self {
        Self {
            device: Arc::new(Mutex::new(device)),
        }
    }

    /// Handle for inspecting the rig from tests or a status display.
    pub fn device(&self) -> Arc<Mutex<SimulatedDevice>> {
        self.device.clone()
    }
}

#[async_trait]
impl Connector for SimulatedConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>> {
        Ok(Box::new(SimulatedTransport::new(self.device.clone())))
    }

    fn describe(&self) -> String {
        "simulated".to_string()
    }
}
