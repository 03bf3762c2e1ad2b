//! Single-slot frame mailbox shared by the perception tasks

use drishti_core::Frame;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Last-writer-wins mailbox for the most recent camera frame.
///
/// The writer replaces the whole slot on every publish; readers clone the
/// `Arc` out from under a read lock, so a snapshot is always a complete
/// frame. There is no backpressure and no queue: stale frames are worthless
/// for navigation feedback, so only the latest observation survives.
pub struct FrameBus {
    slot: RwLock<Option<Arc<Frame>>>,
    seq: AtomicU64,
}

impl FrameBus {
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
            seq: AtomicU64::new(0),
        }
    }

    /// Replace the current frame and stamp it with the next sequence number.
    ///
    /// Returns the sequence assigned to this frame.
    pub fn publish(&self, mut frame: Frame) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::AcqRel) + 1;
        frame.seq = seq;
        *self.slot.write() = Some(Arc::new(frame));
        trace!(seq, "frame published");
        seq
    }

    /// The latest published frame, or `None` before the first publish.
    pub fn snapshot(&self) -> Option<Arc<Frame>> {
        self.slot.read().clone()
    }

    /// Sequence number of the most recently published frame (0 if none).
    pub fn latest_seq(&self) -> u64 {
        self.seq.load(Ordering::Acquire)
    }
}

impl Default for FrameBus {
    fn default() -> Self {
        Self::new()
    }
}
