pub mod config;
pub mod error;
pub mod link;
pub mod regulator;
pub mod util;

pub use config::{AppConfig, LinkConfig, RegulatorConfig};
pub use error::{MixerError, Result};
pub use link::DeviceLink;
pub use regulator::{RegulatorPhase, RegulatorStatus, TemperatureRegulator, UnwindReport};
