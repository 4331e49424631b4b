//! Mock transport for testing

use super::Transport;
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock transport for unit testing
///
/// Reads come from an injected byte script. With `fail_when_empty` set, an
/// exhausted script turns into a broken-pipe error, simulating the IMU being
/// unplugged mid-session.
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

struct MockTransportInner {
    read_buffer: VecDeque<u8>,
    fail_when_empty: bool,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        MockTransport {
            inner: Arc::new(Mutex::new(MockTransportInner {
                read_buffer: VecDeque::new(),
                fail_when_empty: false,
            })),
        }
    }

    /// Inject data to be read
    pub fn inject_read(&self, data: &[u8]) {
        let mut inner = self.inner.lock().unwrap();
        inner.read_buffer.extend(data);
    }

    /// After the injected script is exhausted, fail reads with a broken-pipe
    /// I/O error instead of returning `Ok(0)`
    pub fn fail_when_empty(&self, fail: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_when_empty = fail;
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();

        if inner.read_buffer.is_empty() && inner.fail_when_empty {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock device disconnected",
            )));
        }

        let available = inner.read_buffer.len().min(buffer.len());
        for item in buffer.iter_mut().take(available) {
            *item = inner.read_buffer.pop_front().unwrap();
        }

        Ok(available)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}
