use crate::error::{MixerError, Result};
use crate::{log_error, log_warn};

use super::{MixingValve, TemperatureRegulator};

const FULL_OPEN_PERCENT: u32 = 100;

impl TemperatureRegulator {
    /// Issue a single pulse nudging the mix toward the target. One pulse
    /// per control tick; the sensor needs the interval to catch up.
    pub(super) async fn correct_mix(&mut self, temperature: f64) -> Result<()> {
        let (more, less) = if temperature < self.target {
            (MixingValve::Hot, MixingValve::Cold)
        } else if temperature > self.target {
            (MixingValve::Cold, MixingValve::Hot)
        } else {
            return Ok(());
        };

        let more_percent = self.percent(more);
        let less_percent = self.percent(less);

        let pulse = if more_percent < FULL_OPEN_PERCENT {
            Some((more, true))
        } else if more_percent > FULL_OPEN_PERCENT {
            log_error!(
                "{}",
                MixerError::SaturationAnomaly {
                    valve: more.label(),
                    percent: more_percent,
                }
            );
            None
        } else if less_percent > 0 {
            Some((less, false))
        } else {
            log_warn!(
                "Cannot correct {:.1}: {} valve full open, {} valve closed",
                temperature,
                more.label(),
                less.label()
            );
            None
        };

        if let Some((valve, open)) = pulse {
            if !self.pulse(valve, open).await? {
                log_warn!(
                    "Correction pulse ({} {}) not applied",
                    valve.label(),
                    if open { "open" } else { "close" }
                );
            }
        }
        Ok(())
    }

    fn percent(&self, valve: MixingValve) -> u32 {
        match valve {
            MixingValve::Hot => self.valves.hot_open_percent,
            MixingValve::Cold => self.valves.cold_open_percent,
        }
    }
}
