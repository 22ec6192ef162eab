use crate::log_debug;

use super::DeviceLink;

impl DeviceLink {
    /// Release the transport. Safe to call repeatedly.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.close().await {
                log_debug!("Ignoring close error on {}: {}", stream.describe(), e);
            }
        }
    }
}
