use crate::config::LinkConfig;
use crate::error::Result;

use super::{connector_from_config, Connector, DeviceLink};

impl DeviceLink {
    /// Build an unopened link; call [`DeviceLink::open`] before use.
    pub fn new(connector: Box<dyn Connector>, config: &LinkConfig) -> Self {
        Self {
            connector,
            stream: None,
            read_timeout: config.read_timeout(),
            drain_timeout: config.drain_timeout(),
            reset_backoff: config.reset_backoff(),
            max_silent_responses: config.max_silent_responses.max(1),
            silent_responses: 0,
            reset_count: 0,
        }
    }

    /// Select the transport from configuration and open it.
    pub async fn connect(config: &LinkConfig) -> Result<Self> {
        let mut link = Self::new(connector_from_config(config), config);
        link.open().await?;
        Ok(link)
    }
}
