use crate::error::Result;
use crate::{log_error, log_info};

use super::TemperatureRegulator;

impl TemperatureRegulator {
    /// Open the recycle path, then run the pump. The pump is only started
    /// once the recycle valve has acknowledged.
    pub(super) async fn begin_recycling(&mut self) -> Result<()> {
        if self.link.open_recycle().await? {
            self.valves.recycle_open = true;
        } else {
            log_error!("Recycle valve did not open, leaving pump off");
            return Ok(());
        }

        if self.link.start_pump().await? {
            self.pump_on = true;
        } else {
            log_error!("Recirculation pump did not start");
        }
        Ok(())
    }

    /// Excursion while delivering: route water back through the loop.
    pub(super) async fn resume_recycling(&mut self) -> Result<()> {
        self.begin_recycling().await?;

        if self.link.close_output().await? {
            self.valves.output_open = false;
        } else {
            log_error!("Output valve did not close during excursion");
        }
        Ok(())
    }

    /// Temperature has held in band: stop recirculating and deliver.
    pub(super) async fn begin_delivering(&mut self) -> Result<()> {
        log_info!("Temperature held at {:.1}, opening output", self.temperature.degrees());

        if self.link.stop_pump().await? {
            self.pump_on = false;
        } else {
            log_error!("Recirculation pump did not stop");
        }

        if self.link.close_recycle().await? {
            self.valves.recycle_open = false;
        } else {
            log_error!("Recycle valve did not close");
        }

        if self.link.open_output().await? {
            self.valves.output_open = true;
        } else {
            log_error!("Output valve did not open, returning to recycle");
            self.begin_recycling().await?;
        }
        Ok(())
    }
}
