//! DishaIO - Acquisition daemon and UDP relay for Xsens MTi-G telemetry
//!
//! This library turns the raw, potentially noisy MTi-G serial stream into
//! validated orientation/position samples and relays them over UDP with
//! latest-value-wins delivery:
//!
//! serial bytes → [`frame::FrameSynchronizer`] → [`frame::decode`] →
//! [`types::TelemetrySample`] → archive + [`streaming::UdpPublisher`] → ... →
//! [`streaming::UdpSubscriber`] → mailbox → consumer

pub mod acquisition;
pub mod archive;
pub mod config;
pub mod error;
pub mod frame;
pub mod streaming;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::TelemetrySample;
