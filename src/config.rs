// src/config.rs
//! Controller configuration, loaded from YAML with environment overrides

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{MixerError, Result};
use crate::log_info;

pub const DEFAULT_CONFIG_PATH: &str = "mixer.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Real serial hardware when true, the in-memory simulator otherwise
    pub production: bool,
    pub device_dir: String,
    pub device_prefix: String,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    pub drain_timeout_ms: u64,
    pub reset_backoff_ms: u64,
    /// Consecutive empty replies tolerated before the link resets itself
    pub max_silent_responses: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            production: false,
            device_dir: "/dev".to_string(),
            device_prefix: "ttyUSB".to_string(),
            baud_rate: 57600,
            read_timeout_ms: 1000,
            drain_timeout_ms: 50,
            reset_backoff_ms: 2000,
            max_silent_responses: 3,
        }
    }
}

impl LinkConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    pub fn reset_backoff(&self) -> Duration {
        Duration::from_millis(self.reset_backoff_ms)
    }

    /// Human-readable glob of the device paths searched, e.g. `/dev/ttyUSB*`
    pub fn device_pattern(&self) -> String {
        format!("{}/{}*", self.device_dir.trim_end_matches('/'), self.device_prefix)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatorConfig {
    pub target: f64,
    pub threshold: f64,
    pub update_delay_secs: u64,
    pub sample_interval_ms: u64,
    /// Seconds of in-band readings required before output opens
    pub hold_secs: u64,
    /// Open pulses sent to each mixing valve on start
    pub bootstrap_pulses: u32,
    pub target_step: f64,
}

impl Default for RegulatorConfig {
    fn default() -> Self {
        Self {
            target: 72.0,
            threshold: 2.0,
            update_delay_secs: 5,
            sample_interval_ms: 1000,
            hold_secs: 15,
            bootstrap_pulses: 5,
            target_step: 1.0,
        }
    }
}

impl RegulatorConfig {
    pub fn update_delay(&self) -> Duration {
        Duration::from_secs(self.update_delay_secs)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Consecutive in-band control ticks before output opens
    pub fn hold_ticks(&self) -> u32 {
        let ticks = self.hold_secs / self.update_delay_secs.max(1);
        ticks.max(1) as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub link: LinkConfig,
    pub regulator: RegulatorConfig,
    pub tick_interval_ms: u64,
    pub startup_retries: u32,
    pub startup_backoff_ms: u64,
    /// Start regulating as soon as the binary has a link
    pub autostart: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            link: LinkConfig::default(),
            regulator: RegulatorConfig::default(),
            tick_interval_ms: 33,
            startup_retries: 5,
            startup_backoff_ms: 2000,
            autostart: true,
        }
    }
}

impl AppConfig {
    /// Load from `path` if it exists, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            log_info!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path).map_err(|source| MixerError::ConfigRead {
                path: path.display().to_string(),
                source,
            })?;
            serde_yaml::from_str::<AppConfig>(&content)?
        } else {
            log_info!("No config at {}, using defaults", path.display());
            AppConfig::default()
        };

        config.apply_env(std::env::var("PRODUCTION").ok().as_deref());
        Ok(config)
    }

    pub fn apply_env(&mut self, production: Option<&str>) {
        if let Some(flag) = production {
            let flag = flag.trim().to_lowercase();
            if !flag.is_empty() && flag != "0" && flag != "false" {
                self.link.production = true;
            }
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn startup_backoff(&self) -> Duration {
        Duration::from_millis(self.startup_backoff_ms)
    }
}
