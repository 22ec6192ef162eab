use std::io;
use std::time::Duration;

use crate::error::{MixerError, Result};
use crate::{log_debug, log_error};

use super::{Command, DeviceLink};

impl DeviceLink {
    /// Next non-debug line. Lines starting with `D` are asynchronous
    /// telemetry from the firmware and are logged, never returned.
    pub(super) async fn read_filtered(&mut self, timeout: Duration) -> io::Result<String> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "serial link is not open")
        })?;

        let mut response = stream.read_line(timeout).await?;
        while response.starts_with('D') {
            log_debug!("{}", response);
            response = stream.read_line(timeout).await?;
        }
        Ok(response)
    }

    pub(super) async fn write_command(&mut self, command: Command) -> io::Result<()> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "serial link is not open")
        })?;

        log_debug!("SERIAL - Sending: {}", command);
        stream.write(&[command.as_byte()]).await
    }

    /// Read one response, resetting the link if the read fails. After a
    /// reset the fresh connection is read once; whatever it yields (often
    /// nothing) is the response.
    pub(super) async fn read_response(&mut self, timeout: Duration) -> Result<String> {
        let response = match self.read_filtered(timeout).await {
            Ok(response) => response,
            Err(e) => {
                log_error!("Serial exception: {}", MixerError::TransportIo(e));
                self.reset().await?;

                match self.read_filtered(timeout).await {
                    Ok(response) => response,
                    Err(e) => {
                        log_error!("Serial exception after reset: {}", MixerError::TransportIo(e));
                        String::new()
                    }
                }
            }
        };

        log_debug!("SERIAL - Response: '{}'", response);
        Ok(response)
    }
}
