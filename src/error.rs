use thiserror::Error;

#[derive(Error, Debug)]
pub enum MixerError {
    #[error("No serial device matching {pattern}")]
    NoDeviceFound { pattern: String },

    #[error("Transport IO error: {0}")]
    TransportIo(#[from] std::io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("Protocol mismatch: sent '{sent}', received '{received}'")]
    ProtocolMismatch { sent: char, received: String },

    #[error("Temperature parse error: '{0}'")]
    Parse(String),

    #[error("Saturation anomaly: {valve} valve already at {percent}%")]
    SaturationAnomaly { valve: &'static str, percent: u32 },

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Cannot read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl MixerError {
    /// Fatal errors end the process (or its current supervised attempt).
    /// A port that exists but refuses to open is retried by the link.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MixerError::NoDeviceFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, MixerError>;
