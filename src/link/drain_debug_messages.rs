use crate::error::Result;
use crate::log_warn;

use super::DeviceLink;

impl DeviceLink {
    /// Consume telemetry the firmware printed since the last command.
    /// Does nothing while disconnected.
    pub async fn drain_debug_messages(&mut self) -> Result<()> {
        if self.stream.is_none() {
            return Ok(());
        }

        let line = self.read_response(self.drain_timeout).await?;
        if !line.is_empty() {
            log_warn!("Discarding unsolicited line: '{}'", line);
        }
        Ok(())
    }
}
