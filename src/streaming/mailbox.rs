//! Single-slot mailbox for the freshest telemetry sample
//!
//! This is message passing with overwrite semantics, not a queue: the network
//! receive path writes at its own rate, the consumer reads at its own rate,
//! and whatever sits unread when a newer sample lands is silently discarded.
//! The consumer therefore always sees the freshest value and never stalls the
//! receiver, at the cost of dropped intermediates when it lags.

use crate::types::TelemetrySample;
use parking_lot::Mutex;
use std::sync::Arc;

/// Single-slot, overwrite-on-write, consumer-pull shared state
///
/// Clones share the slot. A read concurrent with a write observes either the
/// old or the new sample, never a torn value; the mutex is held only for the
/// 24-byte copy.
#[derive(Clone, Default)]
pub struct Mailbox {
    slot: Arc<Mutex<Option<TelemetrySample>>>,
}

impl Mailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Overwrite the slot unconditionally
    pub fn store(&self, sample: TelemetrySample) {
        *self.slot.lock() = Some(sample);
    }

    /// Non-blocking read of the most recent sample
    ///
    /// `None` until the first sample arrives.
    pub fn latest(&self) -> Option<TelemetrySample> {
        *self.slot.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_before_first_store() {
        let mailbox = Mailbox::new();
        assert!(mailbox.latest().is_none());
    }

    #[test]
    fn test_overwrite_is_unconditional() {
        let mailbox = Mailbox::new();
        mailbox.store(TelemetrySample::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0));
        mailbox.store(TelemetrySample::new(2.0, 0.0, 0.0, 0.0, 0.0, 0.0));

        // Only the latest survives; the unread first sample is gone.
        assert_eq!(mailbox.latest().unwrap().roll, 2.0);
    }

    #[test]
    fn test_read_does_not_consume() {
        let mailbox = Mailbox::new();
        mailbox.store(TelemetrySample::zero());
        assert!(mailbox.latest().is_some());
        assert!(mailbox.latest().is_some());
    }

    #[test]
    fn test_clones_share_slot() {
        let writer = Mailbox::new();
        let reader = writer.clone();

        writer.store(TelemetrySample::new(0.0, 0.0, 90.0, 0.0, 0.0, 0.0));
        assert_eq!(reader.latest().unwrap().yaw, 90.0);
    }

    #[test]
    fn test_concurrent_writes_leave_valid_value() {
        let mailbox = Mailbox::new();
        let mut handles = Vec::new();

        for i in 0..8 {
            let mb = mailbox.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    mb.store(TelemetrySample::new(i as f32, 0.0, 0.0, 0.0, 0.0, 0.0));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        // Whichever write landed last, the value is one of the written
        // samples, never a torn mix.
        let last = mailbox.latest().unwrap();
        assert!(last.roll >= 0.0 && last.roll < 8.0);
        assert_eq!(last.pitch, 0.0);
    }
}
