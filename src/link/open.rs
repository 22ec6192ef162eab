use crate::error::Result;
use crate::{log_error, log_info};

use super::{Command, DeviceLink};

impl DeviceLink {
    /// Connect and identify. Only a missing device is an error. A port that
    /// exists but cannot be opened yet (busy, permissions settling after a
    /// replug) is logged and leaves the link closed, so the next `send`
    /// retries it. A bad identify reply is logged and the link stays usable.
    pub async fn open(&mut self) -> Result<()> {
        self.close().await;

        let stream = match self.connector.connect().await {
            Ok(stream) => stream,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log_error!("Serial exception opening {}: {}", self.connector.describe(), e);
                return Ok(());
            }
        };
        log_info!("Connected to {}", stream.describe());
        self.stream = Some(stream);
        self.silent_responses = 0;

        match self.identify().await {
            Ok(reply) if reply == "I" => {
                log_info!("Controller identified on {}", self.describe());
            }
            Ok(reply) => {
                log_error!("Failed to reset serial link, identify reply was '{}'", reply);
            }
            Err(e) => {
                log_error!("Serial exception during identify: {}", e);
                self.close().await;
            }
        }
        Ok(())
    }

    /// Raw identify exchange; no reset on failure since we are already
    /// inside open().
    async fn identify(&mut self) -> std::io::Result<String> {
        self.read_filtered(self.drain_timeout).await?;
        self.write_command(Command::Identify).await?;
        self.read_filtered(self.read_timeout).await
    }
}
