use crate::config::RegulatorConfig;
use crate::link::{DeviceLink, TemperatureReading, ValveState};

use super::TemperatureRegulator;

impl TemperatureRegulator {
    pub fn new(link: DeviceLink, config: RegulatorConfig) -> Self {
        Self {
            link,
            target: config.target,
            config,
            valves: ValveState::default(),
            pump_on: false,
            temperature: TemperatureReading::Unknown,
            running: false,
            at_temp_ticks: 0,
            last_sample: None,
            last_control: None,
            started_at: None,
        }
    }
}
