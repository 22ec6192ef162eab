use crate::error::{MixerError, Result};
use crate::log_error;

use super::{Command, DeviceLink};

impl DeviceLink {
    /// Send an actuator command; `Ok(true)` only if the device echoed it.
    ///
    /// A missing or wrong echo is a logical failure: logged, reported as
    /// `Ok(false)`, and the link is left alone.
    pub async fn control_valve(&mut self, command: Command) -> Result<bool> {
        let response = self.send(command).await?;
        let expected = command.as_char().to_string();

        if response == expected {
            return Ok(true);
        }

        log_error!(
            "{}",
            MixerError::ProtocolMismatch {
                sent: command.as_char(),
                received: response,
            }
        );
        Ok(false)
    }

    pub async fn pulse_open_cold(&mut self) -> Result<bool> {
        self.control_valve(Command::PulseOpenCold).await
    }

    pub async fn pulse_close_cold(&mut self) -> Result<bool> {
        self.control_valve(Command::PulseCloseCold).await
    }

    pub async fn pulse_open_hot(&mut self) -> Result<bool> {
        self.control_valve(Command::PulseOpenHot).await
    }

    pub async fn pulse_close_hot(&mut self) -> Result<bool> {
        self.control_valve(Command::PulseCloseHot).await
    }

    pub async fn open_output(&mut self) -> Result<bool> {
        self.control_valve(Command::OpenOutput).await
    }

    pub async fn close_output(&mut self) -> Result<bool> {
        self.control_valve(Command::CloseOutput).await
    }

    pub async fn open_recycle(&mut self) -> Result<bool> {
        self.control_valve(Command::OpenRecycle).await
    }

    pub async fn close_recycle(&mut self) -> Result<bool> {
        self.control_valve(Command::CloseRecycle).await
    }

    pub async fn start_pump(&mut self) -> Result<bool> {
        self.control_valve(Command::StartPump).await
    }

    pub async fn stop_pump(&mut self) -> Result<bool> {
        self.control_valve(Command::StopPump).await
    }
}
