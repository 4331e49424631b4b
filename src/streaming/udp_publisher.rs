//! UDP publisher for real-time telemetry relay
//!
//! Streams decoded samples to a fixed destination as one datagram per sample.
//! Fire-and-forget by design: no acknowledgment, no retry, no ordering
//! guarantee. A lost datagram costs nothing because the next sample
//! supersedes it anyway.
//!
//! The socket is bound once at construction (ephemeral local port) and held
//! for the publisher's lifetime, so the acquisition hot loop never pays for
//! socket setup. UDP sends complete locally without waiting on the peer, so
//! an unreachable or slow destination cannot stall frame processing.

use crate::error::Result;
use crate::streaming::wire::Serializer;
use crate::types::TelemetrySample;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// UDP publisher bound to a fixed destination endpoint
pub struct UdpPublisher {
    socket: UdpSocket,
    serializer: Serializer,
    target: SocketAddr,
}

impl UdpPublisher {
    /// Create a publisher sending to `target` (e.g. "127.0.0.1:12333")
    ///
    /// The destination is immutable once constructed.
    pub fn new<A: ToSocketAddrs>(target: A) -> Result<Self> {
        let target = target
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| crate::Error::Other("publish address resolved to nothing".into()))?;

        // We only send, never receive; any local port will do.
        let socket = UdpSocket::bind("0.0.0.0:0")?;

        log::info!("UDP publisher created (target {})", target);
        Ok(Self {
            socket,
            serializer: Serializer::new(),
            target,
        })
    }

    /// Destination endpoint this publisher sends to
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Publish one sample as exactly one outbound datagram
    ///
    /// # Errors
    /// Only immediate local failures surface (e.g. destination unreachable at
    /// send time); in-transit loss is invisible by design. Callers in the
    /// acquisition path log and continue.
    pub fn publish(&self, sample: &TelemetrySample) -> Result<()> {
        let payload = self.serializer.serialize(sample)?;
        self.socket.send_to(&payload, self.target)?;
        Ok(())
    }
}
