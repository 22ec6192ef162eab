// src/link/transport/locator.rs
use std::path::PathBuf;

use crate::error::{MixerError, Result};
use crate::log_debug;

/// Resolves which serial device to open. Evaluated on every (re)connect,
/// so a replugged controller that comes back under a new name is found.
pub trait DeviceLocator: Send + Sync {
    fn locate(&self) -> Result<PathBuf>;

    fn pattern(&self) -> String;
}

/// Most recently enumerated device: the lexicographically last entry in
/// `dir` whose name starts with `prefix` (e.g. `/dev/ttyUSB1` over `/dev/ttyUSB0`).
#[derive(Debug, Clone)]
pub struct PrefixLocator {
    dir: PathBuf,
    prefix: String,
}

impl PrefixLocator {
    pub fn new(dir: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.to_string(),
        }
    }

    fn candidates(&self) -> Vec<PathBuf> {
        let mut ports = Vec::new();

        if let Ok(entries) = std::fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    if name.starts_with(&self.prefix) {
                        ports.push(self.dir.join(name));
                    }
                }
            }
        }

        ports.sort();
        ports.dedup();
        ports
    }
}

impl DeviceLocator for PrefixLocator {
    fn locate(&self) -> Result<PathBuf> {
        let ports = self.candidates();
        log_debug!("Serial candidates for {}: {:?}", self.pattern(), ports);

        ports.into_iter().last().ok_or_else(|| MixerError::NoDeviceFound {
            pattern: self.pattern(),
        })
    }

    fn pattern(&self) -> String {
        format!("{}*", self.dir.join(&self.prefix).display())
    }
}

/// Always the same path.
#[derive(Debug, Clone)]
pub struct FixedLocator(pub PathBuf);

impl DeviceLocator for FixedLocator {
    fn locate(&self) -> Result<PathBuf> {
        Ok(self.0.clone())
    }

    fn pattern(&self) -> String {
        self.0.display().to_string()
    }
}
