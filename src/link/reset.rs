use crate::error::Result;
use crate::log_warn;

use super::DeviceLink;

impl DeviceLink {
    /// Close, back off, and open a fresh connection.
    pub async fn reset(&mut self) -> Result<()> {
        self.reset_count += 1;
        log_warn!("Resetting serial link (reset #{})", self.reset_count);

        self.close().await;
        tokio::time::sleep(self.reset_backoff).await;
        self.open().await
    }
}
