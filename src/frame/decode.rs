//! Frame payload decoding
//!
//! The orientation/position message payload is six big-endian IEEE-754
//! singles in fixed order: roll, pitch, yaw, lat, lon, alt. Values pass
//! through as received; no unit conversion.

use super::{RawFrame, TELEMETRY_PAYLOAD_SIZE};
use crate::error::{Error, Result};
use crate::types::TelemetrySample;

/// Decode a raw frame into a telemetry sample
///
/// Pure and side-effect free. Any payload length other than 24 bytes is a
/// schema error; a partially-populated sample is never produced.
pub fn decode(frame: &RawFrame) -> Result<TelemetrySample> {
    let payload = frame.payload();
    if payload.len() != TELEMETRY_PAYLOAD_SIZE {
        return Err(Error::Schema {
            expected: TELEMETRY_PAYLOAD_SIZE,
            actual: payload.len(),
        });
    }

    let mut fields = [0f32; 6];
    for (i, chunk) in payload.chunks_exact(4).enumerate() {
        fields[i] = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    let [roll, pitch, yaw, lat, lon, alt] = fields;
    Ok(TelemetrySample::new(roll, pitch, yaw, lat, lon, alt))
}
