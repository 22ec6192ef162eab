use tokio::time::Instant;

use crate::error::Result;
use crate::{log_info, log_warn};

use super::{MixingValve, TemperatureRegulator};

impl TemperatureRegulator {
    pub async fn start(&mut self) -> Result<()> {
        self.start_at(Instant::now()).await
    }

    /// Begin mixing: recirculate, and step both mixing valves open by the
    /// configured number of bootstrap pulses.
    pub async fn start_at(&mut self, now: Instant) -> Result<()> {
        if self.running {
            log_warn!("Temperature regulator already running");
            return Ok(());
        }
        log_info!(
            "Starting temperature regulator (target {:.1} +/- {:.1})",
            self.target,
            self.config.threshold
        );

        self.begin_recycling().await?;

        for _ in 0..self.config.bootstrap_pulses {
            for valve in [MixingValve::Hot, MixingValve::Cold] {
                if !self.pulse(valve, true).await? {
                    log_warn!("Bootstrap pulse on {} valve not acknowledged", valve.label());
                }
            }
        }

        self.at_temp_ticks = 0;
        self.running = true;
        self.last_control = Some(now);
        self.last_sample = None;
        self.started_at = Some(now);
        Ok(())
    }
}
