//! Frame synchronizer for the raw serial stream
//!
//! The stream may start mid-frame or carry noise between frames, so the
//! synchronizer discards bytes until one equals the preamble, then assembles
//! header, payload and checksum under a single deadline measured from scan
//! start. Single-byte preamble scanning trades throughput for robustness,
//! which is fine at IMU sample rates.
//!
//! Reads happen in chunks into an internal buffer rather than one syscall per
//! byte; the resynchronization semantics are byte-at-a-time regardless.

use super::{RawFrame, FRAME_PREAMBLE};
use crate::error::{Error, Result};
use crate::transport::Transport;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Chunk size for transport reads
const READ_CHUNK_SIZE: usize = 64;

/// Idle wait between empty reads
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Deadline-bounded frame scanner/assembler
///
/// Holds read-ahead bytes between successful calls so a chunk read that
/// straddles two frames loses nothing. After a timeout the buffer is cleared:
/// partial frames are never carried across calls and the next scan starts
/// from a clean slate.
pub struct FrameSynchronizer {
    pending: VecDeque<u8>,
    /// Reusable frame buffer - avoids allocation on every frame
    frame: RawFrame,
}

impl FrameSynchronizer {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(READ_CHUNK_SIZE * 2),
            frame: RawFrame::new(),
        }
    }

    /// Scan for the next complete frame, bounded by `timeout` overall.
    ///
    /// Returns a reference to the internal frame buffer; the data is valid
    /// until the next call.
    ///
    /// # Errors
    /// - `Error::Timeout` if a full frame is not assembled before the
    ///   deadline; the caller retries from scratch
    /// - transport errors propagate unchanged and are fatal to the session
    pub fn next_frame<T: Transport>(
        &mut self,
        transport: &mut T,
        timeout: Duration,
    ) -> Result<&RawFrame> {
        // The deadline is fixed at scan start; partial-frame progress does
        // not extend it, bounding worst-case blocking at exactly `timeout`.
        let deadline = Instant::now() + timeout;

        let result = self.assemble(transport, deadline);
        if result.is_err() {
            self.pending.clear();
        }
        result?;
        Ok(&self.frame)
    }

    fn assemble<T: Transport>(&mut self, transport: &mut T, deadline: Instant) -> Result<()> {
        // Discard until the preamble byte
        loop {
            if self.next_byte(transport, deadline)? == FRAME_PREAMBLE {
                break;
            }
        }

        let bus_id = self.next_byte(transport, deadline)?;
        let message_id = self.next_byte(transport, deadline)?;
        let length = self.next_byte(transport, deadline)? as usize;

        let mut payload = [0u8; super::MAX_PAYLOAD_SIZE];
        for slot in payload.iter_mut().take(length) {
            *slot = self.next_byte(transport, deadline)?;
        }

        // The checksum byte is always consumed to keep framing, whether or
        // not anyone verifies it.
        let checksum = self.next_byte(transport, deadline)?;

        self.frame
            .set(bus_id, message_id, &payload[..length], checksum);
        Ok(())
    }

    /// Pop the next buffered byte, refilling from the transport under the
    /// deadline when the buffer runs dry.
    fn next_byte<T: Transport>(&mut self, transport: &mut T, deadline: Instant) -> Result<u8> {
        loop {
            if let Some(b) = self.pending.pop_front() {
                return Ok(b);
            }

            if Instant::now() >= deadline {
                return Err(Error::Timeout);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let n = transport.read(&mut chunk)?;
            if n == 0 {
                std::thread::sleep(POLL_INTERVAL);
                continue;
            }
            self.pending.extend(&chunk[..n]);
        }
    }
}

impl Default for FrameSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::checksum;
    use crate::transport::MockTransport;

    /// Build a well-formed frame byte sequence
    fn frame_bytes(bus_id: u8, message_id: u8, payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![FRAME_PREAMBLE, bus_id, message_id, payload.len() as u8];
        bytes.extend_from_slice(payload);
        bytes.push(checksum(bus_id, message_id, payload));
        bytes
    }

    #[test]
    fn test_clean_stream() {
        let mut transport = MockTransport::new();
        transport.inject_read(&frame_bytes(0xFF, 0x32, &[1, 2, 3, 4]));

        let mut sync = FrameSynchronizer::new();
        let frame = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap();

        assert_eq!(frame.bus_id, 0xFF);
        assert_eq!(frame.message_id, 0x32);
        assert_eq!(frame.payload(), &[1, 2, 3, 4]);
        assert!(frame.checksum_ok());
    }

    #[test]
    fn test_garbage_before_frame() {
        // Leading noise (none of it the preamble) then a valid frame
        let mut transport = MockTransport::new();
        transport.inject_read(&[0x00, 0x13, 0x37, 0xBE, 0xEF]);
        transport.inject_read(&frame_bytes(0xFF, 0x32, &[9, 8, 7]));

        let mut sync = FrameSynchronizer::new();
        let frame = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap();

        assert_eq!(frame.payload(), &[9, 8, 7]);
    }

    #[test]
    fn test_zero_garbage_bytes() {
        // N = 0: the frame starts immediately
        let mut transport = MockTransport::new();
        transport.inject_read(&frame_bytes(0xFF, 0x32, &[]));

        let mut sync = FrameSynchronizer::new();
        let frame = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap();
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn test_stalled_stream_times_out() {
        let mut transport = MockTransport::new();

        let mut sync = FrameSynchronizer::new();
        let start = Instant::now();
        let err = sync
            .next_frame(&mut transport, Duration::from_millis(20))
            .unwrap_err();

        assert!(matches!(err, Error::Timeout));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_partial_frame_discarded_after_timeout() {
        let mut transport = MockTransport::new();
        // Preamble and header arrive, payload never does
        transport.inject_read(&[FRAME_PREAMBLE, 0xFF, 0x32, 24, 0x01, 0x02]);

        let mut sync = FrameSynchronizer::new();
        let err = sync
            .next_frame(&mut transport, Duration::from_millis(20))
            .unwrap_err();
        assert!(matches!(err, Error::Timeout));

        // A fresh, complete frame must parse cleanly on the next call; no
        // residue from the aborted scan may leak into it.
        transport.inject_read(&frame_bytes(0xFF, 0x32, &[5, 6]));
        let frame = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap();
        assert_eq!(frame.payload(), &[5, 6]);
    }

    #[test]
    fn test_back_to_back_frames() {
        // Two frames injected as one chunk; read-ahead from the first call
        // must not lose the second frame.
        let mut transport = MockTransport::new();
        let mut bytes = frame_bytes(0xFF, 0x32, &[1]);
        bytes.extend_from_slice(&frame_bytes(0xFF, 0x32, &[2]));
        transport.inject_read(&bytes);

        let mut sync = FrameSynchronizer::new();
        let first = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap()
            .payload()
            .to_vec();
        let second = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap()
            .payload()
            .to_vec();

        assert_eq!(first, vec![1]);
        assert_eq!(second, vec![2]);
    }

    #[test]
    fn test_transport_error_propagates() {
        let mut transport = MockTransport::new();
        transport.fail_when_empty(true);

        let mut sync = FrameSynchronizer::new();
        let err = sync
            .next_frame(&mut transport, Duration::from_millis(100))
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
