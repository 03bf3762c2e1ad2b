//! Cooldown-gated speech dispatch

use crate::engines::SpeechDevice;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// One accepted announcement.
#[derive(Debug, Clone)]
pub struct SpeechRequest {
    pub text: String,
    pub enqueued_at: Instant,
}

/// Serializes announcements with a minimum inter-utterance interval.
///
/// `request` is non-blocking: an accepted announcement is handed to the
/// blocking thread pool, a rejected one is a silent no-op. Acceptance is
/// gated purely by the cooldown clock; the busy flag is observational
/// only, mirroring the behavior of the device this replaces. Requests
/// arriving during the cooldown are dropped, never queued.
pub struct SpeechThrottler {
    label: String,
    device: Arc<dyn SpeechDevice>,
    cooldown: Duration,
    last_accepted: Mutex<Option<Instant>>,
    busy: Arc<AtomicBool>,
}

impl SpeechThrottler {
    pub fn new(label: impl Into<String>, device: Arc<dyn SpeechDevice>, cooldown: Duration) -> Self {
        Self {
            label: label.into(),
            device,
            cooldown,
            last_accepted: Mutex::new(None),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request an announcement. Returns whether it was accepted.
    ///
    /// Must be called from within a tokio runtime; synthesis is dispatched
    /// with `spawn_blocking` so it never blocks the scheduler. The cooldown
    /// clock is advanced at acceptance time, before synthesis completes.
    pub fn request(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        let now = Instant::now();
        {
            let mut last = self.last_accepted.lock();
            if let Some(prev) = *last {
                let elapsed = now.duration_since(prev);
                if elapsed < self.cooldown {
                    debug!(
                        throttler = %self.label,
                        elapsed_ms = elapsed.as_millis() as u64,
                        cooldown_ms = self.cooldown.as_millis() as u64,
                        "announcement suppressed by cooldown"
                    );
                    return false;
                }
            }
            *last = Some(now);
        }

        let request = SpeechRequest {
            text: text.to_string(),
            enqueued_at: now,
        };
        let device = self.device.clone();
        let busy = self.busy.clone();
        let label = self.label.clone();

        busy.store(true, Ordering::SeqCst);
        tokio::task::spawn_blocking(move || {
            match device.synthesize(&request.text) {
                Ok(()) => debug!(
                    throttler = %label,
                    text = %request.text,
                    latency_ms = request.enqueued_at.elapsed().as_millis() as u64,
                    "announcement finished"
                ),
                Err(e) => error!(throttler = %label, "synthesis failed: {e}"),
            }
            busy.store(false, Ordering::SeqCst);
        });

        true
    }

    /// Whether a synthesis job is currently in flight. Observational only;
    /// it never gates acceptance.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpeechError;
    use std::sync::atomic::AtomicUsize;

    /// Records every synthesized text, optionally holding each call open.
    struct RecordingDevice {
        calls: AtomicUsize,
        hold: Duration,
    }

    impl RecordingDevice {
        fn new(hold: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                hold,
            }
        }
    }

    impl SpeechDevice for RecordingDevice {
        fn synthesize(&self, _text: &str) -> Result<(), SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.hold);
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cooldown_suppresses_second_request() {
        let device = Arc::new(RecordingDevice::new(Duration::ZERO));
        let throttler =
            SpeechThrottler::new("depth", device.clone(), Duration::from_millis(200));

        assert!(throttler.request("Avoid to Left"));
        assert!(!throttler.request("Avoid to Left"));

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(throttler.request("Avoid to Right"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(device.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_text_never_accepted() {
        let device = Arc::new(RecordingDevice::new(Duration::ZERO));
        let throttler = SpeechThrottler::new("depth", device.clone(), Duration::from_millis(50));

        assert!(!throttler.request(""));

        // An empty request must not touch the cooldown clock.
        assert!(throttler.request("Avoid to Left"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(device.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_busy_state_does_not_gate_acceptance() {
        // Device holds each call for 300 ms; cooldown is only 50 ms. The
        // second request lands while the first is still audibly playing and
        // is accepted anyway: busy is observational, the clock decides.
        let device = Arc::new(RecordingDevice::new(Duration::from_millis(300)));
        let throttler = SpeechThrottler::new("depth", device.clone(), Duration::from_millis(50));

        assert!(throttler.request("Avoid to Left"));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(throttler.is_busy());
        assert!(throttler.request("Avoid to Right"));

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(device.calls.load(Ordering::SeqCst), 2);
        assert!(!throttler.is_busy());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_first_request_always_eligible() {
        let device = Arc::new(RecordingDevice::new(Duration::ZERO));
        let throttler = SpeechThrottler::new("gesture", device, Duration::from_secs(7));

        assert!(throttler.request("Object grasped"));
    }
}
