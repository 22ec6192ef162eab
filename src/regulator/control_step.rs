use crate::error::Result;
use crate::{log_error, log_warn};

use super::TemperatureRegulator;

impl TemperatureRegulator {
    /// Band decision followed by at most one mixing correction.
    pub(super) async fn control_step(&mut self) -> Result<()> {
        let Some(temperature) = self.temperature.valid() else {
            log_warn!("No valid temperature reading, holding valves");
            return Ok(());
        };

        let low = self.target - self.config.threshold;
        let high = self.target + self.config.threshold;

        if temperature < low || temperature > high {
            if self.valves.output_open {
                log_error!(
                    "Temperature {:.1} left band {:.1}..{:.1} while delivering, resuming recycle",
                    temperature,
                    low,
                    high
                );
                self.resume_recycling().await?;
            }
            self.at_temp_ticks = 0;
        } else if !self.valves.output_open {
            self.at_temp_ticks += 1;
            if self.at_temp_ticks >= self.config.hold_ticks() {
                self.begin_delivering().await?;
                self.at_temp_ticks = 0;
            }
        }

        self.correct_mix(temperature).await
    }
}
