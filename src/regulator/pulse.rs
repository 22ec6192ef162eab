use crate::error::Result;
use crate::link::valve_state::PERCENT_PER_LETTER;

use super::{MixingValve, TemperatureRegulator};

impl TemperatureRegulator {
    /// One 10% step on a mixing valve. The local position is only moved
    /// when the device acknowledges the pulse.
    pub(super) async fn pulse(&mut self, valve: MixingValve, open: bool) -> Result<bool> {
        let applied = self.link.control_valve(valve.command(open)).await?;
        if !applied {
            return Ok(false);
        }

        let percent = match valve {
            MixingValve::Hot => &mut self.valves.hot_open_percent,
            MixingValve::Cold => &mut self.valves.cold_open_percent,
        };
        if open {
            *percent += PERCENT_PER_LETTER;
        } else {
            *percent = percent.saturating_sub(PERCENT_PER_LETTER);
        }
        Ok(true)
    }
}
