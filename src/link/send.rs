use crate::error::{MixerError, Result};
use crate::{log_error, log_warn};

use super::{Command, DeviceLink};

impl DeviceLink {
    /// Drain anything pending, send one command byte and return the reply.
    ///
    /// An empty reply means the device stayed silent for the read timeout
    /// (or the link had to be reset mid-exchange). Only a fatal connector
    /// failure during a reset is returned as `Err`.
    pub async fn send(&mut self, command: Command) -> Result<String> {
        if self.stream.is_none() {
            log_warn!("Serial link down, reconnecting before '{}'", command);
            self.reset().await?;
            if self.stream.is_none() {
                return Ok(String::new());
            }
        }

        let stale = self.read_response(self.drain_timeout).await?;
        if !stale.is_empty() {
            log_warn!("Discarding unexpected line before '{}': '{}'", command, stale);
        }

        if let Err(e) = self.write_command(command).await {
            log_error!(
                "Serial exception while writing '{}': {}",
                command,
                MixerError::TransportIo(e)
            );
            self.reset().await?;
            return Ok(String::new());
        }

        let response = self.read_response(self.read_timeout).await?;
        self.track_silence(command, &response).await?;
        Ok(response)
    }

    async fn track_silence(&mut self, command: Command, response: &str) -> Result<()> {
        if !response.is_empty() {
            self.silent_responses = 0;
            return Ok(());
        }

        self.silent_responses += 1;
        log_warn!(
            "No response to '{}' ({} of {} allowed)",
            command,
            self.silent_responses,
            self.max_silent_responses
        );

        if self.silent_responses >= self.max_silent_responses {
            self.reset().await?;
        }
        Ok(())
    }
}
