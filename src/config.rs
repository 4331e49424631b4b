//! Configuration for the DishaIO daemon
//!
//! Loads configuration from a TOML file with the minimal parameters needed
//! for acquisition and relay. All endpoints live here; there are no
//! process-wide defaults baked into the components.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub network: NetworkConfig,
    pub archive: ArchiveConfig,
    pub logging: LoggingConfig,
}

/// Serial device configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SerialConfig {
    /// IMU serial port (e.g. "/dev/ttyUSB0")
    pub port: String,
    /// Baud rate (e.g. 115200)
    pub baud_rate: u32,
    /// Per-frame timeout budget in milliseconds, measured from scan start
    pub frame_timeout_ms: u64,
}

/// UDP relay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Destination for outbound telemetry datagrams
    ///
    /// Examples:
    /// - `127.0.0.1:12333` - loopback relay
    /// - `172.20.150.22:12333` - remote consumer
    pub publish_address: String,
    /// UDP port the subscriber binds for inbound telemetry
    pub receive_port: u16,
}

/// On-disk archival configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveConfig {
    /// Text log path, or `None` to disable archival
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| Error::Other(format!("config parse: {e}")))?;
        Ok(config)
    }

    /// Default configuration for the Xsens MTi-G
    ///
    /// Suitable for testing and development. Production deployments should
    /// use a proper TOML configuration file.
    pub fn mti_defaults() -> Self {
        Self {
            serial: SerialConfig {
                port: "/dev/ttyUSB0".to_string(),
                baud_rate: 115200,
                // The MTi-G emits at tens of Hz; 7s of silence means the
                // device is gone or misconfigured.
                frame_timeout_ms: 7000,
            },
            network: NetworkConfig {
                publish_address: "127.0.0.1:12333".to_string(),
                receive_port: 12333,
            },
            archive: ArchiveConfig {
                path: Some("IMU_data.txt".to_string()),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("config serialize: {e}")))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::mti_defaults()
    }
}
