use tokio::time::Instant;

use crate::error::Result;
use crate::{log_debug, log_warn};

use super::TemperatureRegulator;

impl TemperatureRegulator {
    /// Refresh temperature and valve positions from the device.
    pub(super) async fn sample(&mut self, now: Instant) -> Result<()> {
        self.last_sample = Some(now);

        self.temperature = self.link.temperature().await?;

        if let Some(valves) = self.link.valve_states().await? {
            self.valves = valves;
        }

        // Never run the pump against a closed recycle path
        if self.pump_on && !self.valves.recycle_open {
            log_warn!("Recycle reported closed with pump running, stopping pump");
            if self.link.stop_pump().await? {
                self.pump_on = false;
            }
        }

        log_debug!(
            "Sample: {:?} hot={}% cold={}% output={} recycle={} pump={}",
            self.temperature,
            self.valves.hot_open_percent,
            self.valves.cold_open_percent,
            self.valves.output_open,
            self.valves.recycle_open,
            self.pump_on
        );
        Ok(())
    }
}
