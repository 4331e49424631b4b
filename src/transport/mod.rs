//! Transport layer for I/O abstraction

use crate::error::Result;

mod mock;
mod serial;
pub use mock::MockTransport;
pub use serial::SerialTransport;

/// Byte-stream source for frame acquisition
///
/// The IMU link is read-only: the device streams unsolicited frames and we
/// never write to it. Implementations must return `Ok(0)` (not an error) when
/// no bytes are available yet, so the synchronizer owns the timeout policy.
pub trait Transport: Send {
    /// Read data into buffer, returns number of bytes read
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;
}
