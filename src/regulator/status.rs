use serde::Serialize;

use super::{RegulatorPhase, TemperatureRegulator};

/// Everything a status display needs, in one serialisable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulatorStatus {
    pub phase: RegulatorPhase,
    pub temperature: Option<f64>,
    pub target: f64,
    pub threshold: f64,
    pub hot_open_percent: u32,
    pub cold_open_percent: u32,
    pub output_open: bool,
    pub recycle_open: bool,
    pub pump_on: bool,
    pub at_temp_ticks: u32,
    pub elapsed_secs: Option<u64>,
    pub link_resets: u64,
}

impl TemperatureRegulator {
    pub fn status(&self) -> RegulatorStatus {
        RegulatorStatus {
            phase: self.phase(),
            temperature: self.temperature.valid(),
            target: self.target,
            threshold: self.config.threshold,
            hot_open_percent: self.valves.hot_open_percent,
            cold_open_percent: self.valves.cold_open_percent,
            output_open: self.valves.output_open,
            recycle_open: self.valves.recycle_open,
            pump_on: self.pump_on,
            at_temp_ticks: self.at_temp_ticks,
            elapsed_secs: self.elapsed().map(|elapsed| elapsed.as_secs()),
            link_resets: self.link.reset_count(),
        }
    }
}
