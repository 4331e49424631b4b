//! Acquisition loop driving the serial-to-network pipeline
//!
//! Owns the retry and shutdown policy around the frame synchronizer and
//! decoder: recoverable errors (timeout, schema mismatch) are logged and the
//! loop continues; transport failures end the session.
//!
//! Each decoded sample fans out to the archival sink and the UDP publisher
//! independently and best-effort; a failure in one never blocks the other.

use crate::error::Result;
use crate::frame::{self, FrameSynchronizer};
use crate::streaming::UdpPublisher;
use crate::transport::Transport;
use crate::types::TelemetrySample;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Consumer of decoded samples (archival, analysis, ...)
///
/// Sink failures are non-fatal to acquisition; the loop logs and moves on.
pub trait SampleSink: Send {
    /// Record one sample
    fn record(&mut self, sample: &TelemetrySample) -> Result<()>;
}

/// Lifecycle state of the acquisition loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Constructed, not yet running
    Idle,
    /// Actively reading frames
    Running,
    /// Winding down; no further I/O
    Stopping,
    /// Terminal; construct a new loop to restart
    Stopped,
}

/// Serial-to-network acquisition pipeline
pub struct AcquisitionLoop<T: Transport> {
    /// `Some` until `Stopping` releases the device
    transport: Option<T>,
    synchronizer: FrameSynchronizer,
    publisher: Option<UdpPublisher>,
    sink: Option<Box<dyn SampleSink>>,
    shutdown: Arc<AtomicBool>,
    frame_timeout: Duration,
    state: AcquisitionState,
}

impl<T: Transport> AcquisitionLoop<T> {
    /// Create a new loop in `Idle` state
    ///
    /// `shutdown` is the cooperative stop signal (typically shared with a
    /// SIGINT handler). Publisher and sink are each optional so acquisition
    /// can run archive-only or relay-only.
    pub fn new(
        transport: T,
        publisher: Option<UdpPublisher>,
        sink: Option<Box<dyn SampleSink>>,
        shutdown: Arc<AtomicBool>,
        frame_timeout: Duration,
    ) -> Self {
        Self {
            transport: Some(transport),
            synchronizer: FrameSynchronizer::new(),
            publisher,
            sink,
            shutdown,
            frame_timeout,
            state: AcquisitionState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// Run until shutdown is requested or the transport fails
    ///
    /// Returns `Ok(())` on a requested shutdown and the transport error on a
    /// device failure; the state is `Stopped` either way. `Stopped` is
    /// terminal: a loop runs at most once, construct a new one to restart.
    pub fn run(&mut self) -> Result<()> {
        if self.state != AcquisitionState::Idle {
            return Err(crate::Error::Other(format!(
                "acquisition loop already ran (state {:?})",
                self.state
            )));
        }
        self.state = AcquisitionState::Running;
        log::info!("Acquisition started");

        let mut session_result = Ok(());
        let mut frames = 0u64;

        while !self.shutdown.load(Ordering::Relaxed) {
            // Invariant: the transport is only taken during Stopping, after
            // this loop exits
            let Some(transport) = self.transport.as_mut() else {
                break;
            };

            match self.synchronizer.next_frame(transport, self.frame_timeout) {
                Ok(raw) => {
                    // Copy out of the synchronizer's reusable buffer so the
                    // borrow does not outlive this arm
                    let raw = *raw;
                    if !raw.checksum_ok() {
                        // Accepted anyway: the device has been observed to
                        // ship frames failing the MT sum rule, and the
                        // decoder guards the schema.
                        log::warn!(
                            "Checksum mismatch on MID=0x{:02X} (accepting frame)",
                            raw.message_id
                        );
                    }

                    match frame::decode(&raw) {
                        Ok(sample) => {
                            frames += 1;
                            log::debug!("Frame {}: {:?}", frames, sample);
                            self.dispatch(&sample);
                        }
                        Err(e) => {
                            // Sample discarded, loop continues
                            log::warn!("Discarding frame: {}", e);
                        }
                    }
                }
                Err(e) if e.is_fatal() => {
                    log::error!("Transport failed, ending session: {}", e);
                    session_result = Err(e);
                    break;
                }
                Err(e) => {
                    log::debug!("No frame: {}", e);
                }
            }
        }

        self.state = AcquisitionState::Stopping;
        log::info!("Acquisition stopping after {} frames", frames);

        // Release the transport and archival resources before reporting
        // Stopped; their Drop impls close the underlying handles.
        self.transport = None;
        self.publisher = None;
        self.sink = None;

        self.state = AcquisitionState::Stopped;
        log::info!("Acquisition stopped");
        session_result
    }

    /// Hand a sample to the sink and publisher, each best-effort
    fn dispatch(&mut self, sample: &TelemetrySample) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.record(sample) {
                log::warn!("Archive write failed: {}", e);
            }
        }

        if let Some(publisher) = self.publisher.as_ref() {
            if let Err(e) = publisher.publish(sample) {
                log::warn!("Publish failed: {}", e);
            }
        }
    }
}
