use tokio::time::Instant;

use crate::error::Result;

use super::TemperatureRegulator;

impl TemperatureRegulator {
    pub async fn handle_tick(&mut self) -> Result<()> {
        self.handle_tick_at(Instant::now()).await
    }

    /// One pass of the host loop. Safe to call at any rate: sampling and
    /// control only fire once their intervals have elapsed.
    pub async fn handle_tick_at(&mut self, now: Instant) -> Result<()> {
        let sample_due = self
            .last_sample
            .map_or(true, |last| now.duration_since(last) >= self.config.sample_interval());

        if !self.running {
            if sample_due {
                self.last_sample = Some(now);
                self.link.drain_debug_messages().await?;
            }
            return Ok(());
        }

        if sample_due {
            self.sample(now).await?;
        }

        let control_due = self
            .last_control
            .map_or(true, |last| now.duration_since(last) >= self.config.update_delay());
        if control_due {
            self.last_control = Some(now);
            self.control_step().await?;
        }
        Ok(())
    }
}
