//! UDP subscriber for inbound telemetry
//!
//! Runs a receive loop on its own thread, decoding each datagram and
//! overwriting the [`Mailbox`] on success. The consumer polls
//! `SubscriptionHandle::latest()` at its own cadence (e.g. a redraw timer)
//! and never touches the socket.
//!
//! # Resilience
//!
//! The feed arrives over an unreliable transport, so a malformed or truncated
//! datagram must never kill the loop: decode failures are logged at `warn`
//! and the next receive proceeds. Only socket-level failures end the loop.
//!
//! # Shutdown
//!
//! A 500ms read timeout lets the loop poll its running flag; `stop()` clears
//! the flag and joins. The in-progress receive completes or times out
//! naturally, it is never cancelled mid-flight.

use crate::error::Result;
use crate::streaming::mailbox::Mailbox;
use crate::streaming::wire::{Serializer, MAX_DATAGRAM_SIZE};
use crate::types::TelemetrySample;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Read timeout so the receive loop can poll the running flag
const RECV_POLL_TIMEOUT: Duration = Duration::from_millis(500);

/// Telemetry subscriber; use [`UdpSubscriber::start`] to obtain a handle
pub struct UdpSubscriber;

/// Handle to a running subscriber
///
/// Dropping the handle stops the receive loop.
pub struct SubscriptionHandle {
    mailbox: Mailbox,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl UdpSubscriber {
    /// Bind `addr` and start the receive loop on a named thread
    pub fn start<A: ToSocketAddrs>(addr: A) -> Result<SubscriptionHandle> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(RECV_POLL_TIMEOUT))?;
        let local_addr = socket.local_addr()?;

        let mailbox = Mailbox::new();
        let running = Arc::new(AtomicBool::new(true));

        let thread_mailbox = mailbox.clone();
        let thread_running = Arc::clone(&running);
        let thread = std::thread::Builder::new()
            .name("udp-subscriber".to_string())
            .spawn(move || {
                receive_loop(socket, thread_mailbox, thread_running);
            })
            .map_err(|e| crate::Error::Other(format!("Failed to spawn subscriber: {e}")))?;

        log::info!("UDP subscriber listening on {}", local_addr);

        Ok(SubscriptionHandle {
            mailbox,
            running,
            thread: Some(thread),
            local_addr,
        })
    }
}

impl SubscriptionHandle {
    /// Non-blocking read of the most recent sample
    ///
    /// `None` before the first datagram arrives.
    pub fn latest(&self) -> Option<TelemetrySample> {
        self.mailbox.latest()
    }

    /// Address the subscriber is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the receive loop and release the socket
    ///
    /// In-flight receives are abandoned, not drained.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Subscriber thread panicked");
            }
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn receive_loop(socket: UdpSocket, mailbox: Mailbox, running: Arc<AtomicBool>) {
    let serializer = Serializer::new();
    let mut buf = [0u8; MAX_DATAGRAM_SIZE];

    while running.load(Ordering::Relaxed) {
        let (n, addr) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                // Poll window elapsed with no datagram; re-check the flag
                continue;
            }
            Err(e) => {
                log::error!("Subscriber socket error: {}", e);
                break;
            }
        };

        match serializer.deserialize(&buf[..n]) {
            Ok(sample) => {
                log::trace!("Received sample from {}: {:?}", addr, sample);
                mailbox.store(sample);
            }
            Err(e) => {
                // Bad datagrams are discarded; one corrupt packet must not
                // disrupt an otherwise-live feed.
                log::warn!("Discarding malformed datagram from {}: {}", addr, e);
            }
        }
    }

    log::info!("UDP subscriber stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::udp_publisher::UdpPublisher;
    use std::time::Instant;

    /// Poll `latest()` until `pred` holds or the deadline passes
    fn wait_for<F: Fn(Option<TelemetrySample>) -> bool>(
        handle: &SubscriptionHandle,
        pred: F,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_secs(3);
        while Instant::now() < deadline {
            if pred(handle.latest()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_latest_empty_before_first_arrival() {
        let handle = UdpSubscriber::start("127.0.0.1:0").unwrap();
        assert!(handle.latest().is_none());
    }

    #[test]
    fn test_end_to_end_publish_receive() {
        let handle = UdpSubscriber::start("127.0.0.1:0").unwrap();
        let publisher = UdpPublisher::new(handle.local_addr()).unwrap();

        let sample = TelemetrySample::new(1.5, -2.25, 180.0, 36.594_94, -121.875_32, -7.003_217);
        publisher.publish(&sample).unwrap();

        assert!(wait_for(&handle, |s| s == Some(sample)));
    }

    #[test]
    fn test_latest_wins_over_unread_sample() {
        let handle = UdpSubscriber::start("127.0.0.1:0").unwrap();
        let publisher = UdpPublisher::new(handle.local_addr()).unwrap();

        let first = TelemetrySample::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let second = TelemetrySample::new(2.0, 0.0, 0.0, 0.0, 0.0, 0.0);

        publisher.publish(&first).unwrap();
        assert!(wait_for(&handle, |s| s == Some(first)));

        // The consumer has not "read" in any consuming sense; a newer sample
        // simply replaces the slot.
        publisher.publish(&second).unwrap();
        assert!(wait_for(&handle, |s| s == Some(second)));
        assert_eq!(handle.latest(), Some(second));
    }

    #[test]
    fn test_malformed_datagram_does_not_kill_loop() {
        let handle = UdpSubscriber::start("127.0.0.1:0").unwrap();
        let target = handle.local_addr();

        // Raw junk straight at the socket
        let raw = UdpSocket::bind("127.0.0.1:0").unwrap();
        raw.send_to(b"definitely not telemetry", target).unwrap();
        raw.send_to(&[0xFF, 0x00, 0xFA], target).unwrap();

        // A good sample afterwards must still land
        let publisher = UdpPublisher::new(target).unwrap();
        let sample = TelemetrySample::new(0.0, 0.0, 45.0, 0.0, 0.0, 0.0);
        publisher.publish(&sample).unwrap();

        assert!(wait_for(&handle, |s| s == Some(sample)));
    }

    #[test]
    fn test_stop_terminates_promptly() {
        let mut handle = UdpSubscriber::start("127.0.0.1:0").unwrap();

        let start = Instant::now();
        handle.stop();
        // One poll window plus margin
        assert!(start.elapsed() < Duration::from_secs(2));

        // Idempotent
        handle.stop();
    }
}
