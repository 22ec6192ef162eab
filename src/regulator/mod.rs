// src/regulator/mod.rs
//! Bang-bang temperature regulation over the mixing valves

mod new;
mod start;
mod stop;
mod handle_tick;
mod sample;
mod control_step;
mod correct_mix;
mod transitions;
mod pulse;
mod target;
mod status;


use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::RegulatorConfig;
use crate::link::{Command, DeviceLink, TemperatureReading, ValveState};

pub use status::RegulatorStatus;

/// Where the regulator is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegulatorPhase {
    Stopped,
    /// Output closed, water recirculating while the mix converges
    Mixing,
    /// In band with output still closed, counting toward delivery
    Holding,
    /// Output open, recycle closed, pump off
    Delivering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixingValve {
    Hot,
    Cold,
}

impl MixingValve {
    pub fn label(&self) -> &'static str {
        match self {
            MixingValve::Hot => "hot",
            MixingValve::Cold => "cold",
        }
    }

    fn command(&self, open: bool) -> Command {
        match (self, open) {
            (MixingValve::Hot, true) => Command::PulseOpenHot,
            (MixingValve::Hot, false) => Command::PulseCloseHot,
            (MixingValve::Cold, true) => Command::PulseOpenCold,
            (MixingValve::Cold, false) => Command::PulseCloseCold,
        }
    }
}

/// Outcome of the best-effort valve unwind performed by `stop()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwindReport {
    pub hot_pulses: u32,
    pub cold_pulses: u32,
    /// Commands the device did not acknowledge, in the order sent
    pub failed: Vec<Command>,
}

impl UnwindReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives one [`DeviceLink`] toward a target temperature band.
///
/// Host code calls [`TemperatureRegulator::handle_tick`] as often as it
/// likes; sampling and control each run on their own wall-clock cadence.
#[derive(Debug)]
pub struct TemperatureRegulator {
    link: DeviceLink,
    config: RegulatorConfig,
    target: f64,
    valves: ValveState,
    // Not queryable from the device
    pump_on: bool,
    temperature: TemperatureReading,
    running: bool,
    at_temp_ticks: u32,
    last_sample: Option<Instant>,
    last_control: Option<Instant>,
    started_at: Option<Instant>,
}

impl TemperatureRegulator {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> RegulatorPhase {
        if !self.running {
            RegulatorPhase::Stopped
        } else if self.valves.output_open {
            RegulatorPhase::Delivering
        } else if self.at_temp_ticks > 0 {
            RegulatorPhase::Holding
        } else {
            RegulatorPhase::Mixing
        }
    }

    pub fn temperature(&self) -> TemperatureReading {
        self.temperature
    }

    pub fn valves(&self) -> ValveState {
        self.valves
    }

    pub fn hot_open_percent(&self) -> u32 {
        self.valves.hot_open_percent
    }

    pub fn cold_open_percent(&self) -> u32 {
        self.valves.cold_open_percent
    }

    pub fn output_open(&self) -> bool {
        self.valves.output_open
    }

    pub fn recycle_open(&self) -> bool {
        self.valves.recycle_open
    }

    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn threshold(&self) -> f64 {
        self.config.threshold
    }

    pub fn at_temp_ticks(&self) -> u32 {
        self.at_temp_ticks
    }

    /// Time since `start()`, `None` while stopped.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|started| started.elapsed())
    }

    pub fn link(&self) -> &DeviceLink {
        &self.link
    }

    /// Direct access for manual valve operation. Only use while stopped,
    /// or the regulator's view of the valves goes stale until the next sample.
    pub fn link_mut(&mut self) -> &mut DeviceLink {
        &mut self.link
    }
}
