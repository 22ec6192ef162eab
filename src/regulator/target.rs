use crate::log_info;

use super::TemperatureRegulator;

impl TemperatureRegulator {
    /// Move the set point. Any in-band count toward delivery restarts.
    pub fn set_target(&mut self, target: f64) {
        log_info!("Target temperature {:.1} -> {:.1}", self.target, target);
        self.target = target;
        self.at_temp_ticks = 0;
    }

    pub fn raise_target(&mut self) {
        self.set_target(self.target + self.config.target_step);
    }

    pub fn lower_target(&mut self) {
        self.set_target(self.target - self.config.target_step);
    }
}
