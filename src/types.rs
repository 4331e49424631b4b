//! Telemetry data types

use serde::{Deserialize, Serialize};

/// One decoded orientation/position reading from the MTi-G.
///
/// Immutable value snapshot; all fields are mandatory on the wire. Field names
/// match the JSON relay format, so `serde` derives double as the network
/// schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Roll angle (degrees, signed)
    pub roll: f32,
    /// Pitch angle (degrees, signed)
    pub pitch: f32,
    /// Yaw angle (degrees, signed)
    pub yaw: f32,
    /// Latitude (degrees, WGS84)
    pub lat: f32,
    /// Longitude (degrees, WGS84)
    pub lon: f32,
    /// Altitude (meters, signed)
    pub alt: f32,
}

impl TelemetrySample {
    /// Create a new sample
    pub fn new(roll: f32, pitch: f32, yaw: f32, lat: f32, lon: f32, alt: f32) -> Self {
        Self {
            roll,
            pitch,
            yaw,
            lat,
            lon,
            alt,
        }
    }

    /// Zero sample (origin, level attitude)
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Whether all six fields are finite
    ///
    /// The device can emit NaN/infinity during GPS dropout; JSON has no
    /// encoding for either, so such samples cannot cross the relay.
    pub fn is_finite(&self) -> bool {
        [self.roll, self.pitch, self.yaw, self.lat, self.lon, self.alt]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Default for TelemetrySample {
    fn default() -> Self {
        Self::zero()
    }
}
