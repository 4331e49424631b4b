//! Wire format serialization for the UDP relay
//!
//! # UDP Protocol Specification
//!
//! One serialized `TelemetrySample` per datagram, no framing beyond the
//! datagram boundary itself:
//!
//! ```text
//! {"roll":1.5,"pitch":-2.25,"yaw":180.0,"lat":36.59494,"lon":-121.87532,"alt":-7.003217}
//! ```
//!
//! ## Why JSON
//!
//! - **Independence**: subscriber needs no knowledge of the serial frame
//!   schema, only the six field keys
//! - **Inspectable**: a relay capture is human-diffable with `tcpdump`/`nc`
//! - **Cross-language**: any consumer with a JSON parser can join the feed
//!
//! All six fields are mandatory; a datagram missing a field or carrying a
//! non-numeric value fails to decode and is discarded by the subscriber.
//! Non-finite values have no JSON encoding, so samples containing them are
//! rejected on the publishing side rather than relayed as `null`.
//!
//! ## Size
//!
//! Worst-case encoding of six f32 fields is well under [`MAX_DATAGRAM_SIZE`],
//! so a sample always fits a single datagram on any sane MTU.

use crate::error::{Error, Result};
use crate::types::TelemetrySample;

/// Maximum datagram payload the relay will send or receive
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Serializer for the telemetry wire format
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

impl Serializer {
    /// Create a new serializer
    pub fn new() -> Self {
        Self
    }

    /// Serialize a sample to wire bytes
    ///
    /// Non-finite fields are rejected here: serde_json would render them as
    /// `null`, producing a datagram every subscriber discards. Failing the
    /// send locally keeps the error visible on the publishing side.
    pub fn serialize(&self, sample: &TelemetrySample) -> Result<Vec<u8>> {
        if !sample.is_finite() {
            return Err(Error::Format("non-finite field value".to_string()));
        }
        serde_json::to_vec(sample).map_err(|e| Error::Format(e.to_string()))
    }

    /// Deserialize wire bytes to a sample
    pub fn deserialize(&self, bytes: &[u8]) -> Result<TelemetrySample> {
        serde_json::from_slice(bytes).map_err(|e| Error::Format(e.to_string()))
    }
}
