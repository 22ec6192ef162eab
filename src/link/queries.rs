use crate::error::Result;
use crate::{log_error, log_warn};

use super::{Command, DeviceLink, TemperatureReading, ValveState};

impl DeviceLink {
    /// Current valve positions, or `None` if the device did not answer.
    pub async fn valve_states(&mut self) -> Result<Option<ValveState>> {
        let response = self.send(Command::QueryValves).await?;
        if response.is_empty() {
            log_warn!("No valve state reply");
            return Ok(None);
        }
        Ok(Some(ValveState::decode(&response)))
    }

    /// Current line temperature. Unparseable replies are logged and
    /// reported as [`TemperatureReading::Unknown`].
    pub async fn temperature(&mut self) -> Result<TemperatureReading> {
        let response = self.send(Command::QueryTemperature).await?;

        match TemperatureReading::parse(&response) {
            Ok(reading) => Ok(reading),
            Err(e) => {
                log_error!("Temperature conversion failed: {}", e);
                Ok(TemperatureReading::Unknown)
            }
        }
    }
}
