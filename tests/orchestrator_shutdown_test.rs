//! Orchestrator lifecycle and cancellation tests

use async_trait::async_trait;
use bytes::Bytes;
use drishti_core::{DepthMap, Detection, Frame, HandObservation};
use drishti_eye::{
    DepthModelProvider, FrameSource, HandSignalProvider, NullDisplay, ObjectDetectorProvider,
    VisionError,
};
use drishti_pilot::{Peripherals, Pilot, PilotConfig, PilotError, PilotState};
use drishti_spk::NullDevice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Frame source that counts how many times it is released.
struct CountingSource {
    releases: AtomicUsize,
}

impl CountingSource {
    fn new() -> Self {
        Self {
            releases: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FrameSource for CountingSource {
    async fn next_frame(&self) -> Result<Option<Frame>, VisionError> {
        Ok(Some(Frame::new(10, 10, 1, Bytes::from(vec![0u8; 100]))?))
    }

    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

struct QuietHand;

#[async_trait]
impl HandSignalProvider for QuietHand {
    async fn detect(&self, _frame: &Frame) -> Result<HandObservation, VisionError> {
        Ok(HandObservation::absent())
    }
}

struct FlatDepth;

#[async_trait]
impl DepthModelProvider for FlatDepth {
    async fn infer(&self, _frame: &Frame) -> Result<DepthMap, VisionError> {
        Ok(DepthMap::new(10, 10, vec![0.0; 100])?)
    }
}

/// Depth provider that fails after a fixed number of inferences.
struct FailingDepth {
    calls: AtomicUsize,
    fail_after: usize,
}

#[async_trait]
impl DepthModelProvider for FailingDepth {
    async fn infer(&self, _frame: &Frame) -> Result<DepthMap, VisionError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) >= self.fail_after {
            return Err(VisionError::Provider("inference backend lost".to_string()));
        }
        Ok(DepthMap::new(10, 10, vec![0.0; 100])?)
    }
}

struct NoDetections;

#[async_trait]
impl ObjectDetectorProvider for NoDetections {
    async fn detect(&self, _frame: &Frame) -> Result<Detection, VisionError> {
        Ok(Detection::none())
    }
}

fn fast_config() -> PilotConfig {
    let mut config = PilotConfig::default();
    config.vision.resolution = (10, 10);
    config.vision.frame_rate = 60;
    config.flag_poll_ms = 20;
    config.watcher_poll_ms = 20;
    config.idle_poll_ms = 2;
    config
}

fn pilot_with(source: Arc<CountingSource>, depth: Arc<dyn DepthModelProvider>) -> Pilot {
    Pilot::new(
        fast_config(),
        Peripherals {
            source,
            hand: Arc::new(QuietHand),
            depth,
            detector: Arc::new(NoDetections),
            display: Arc::new(NullDisplay),
            speech: Arc::new(NullDevice),
        },
    )
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_releases_resources_exactly_once() {
    let source = Arc::new(CountingSource::new());
    let pilot = pilot_with(source.clone(), Arc::new(FlatDepth));

    assert_eq!(pilot.state(), PilotState::Initializing);
    pilot.start().unwrap();
    assert_eq!(pilot.state(), PilotState::Running);

    tokio::time::sleep(Duration::from_millis(150)).await;

    pilot.shutdown().await.unwrap();
    assert_eq!(pilot.state(), PilotState::Stopped);
    assert!(!pilot.latch().is_running());
    assert_eq!(source.releases.load(Ordering::SeqCst), 1);

    // Double shutdown is a no-op, not an error, and never re-releases.
    pilot.shutdown().await.unwrap();
    assert_eq!(source.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_double_start_is_rejected() {
    let pilot = pilot_with(Arc::new(CountingSource::new()), Arc::new(FlatDepth));

    pilot.start().unwrap();
    match pilot.start() {
        Err(PilotError::State(_)) => {}
        other => panic!("Expected State error, got {other:?}"),
    }

    pilot.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_provider_failure_trips_latch_and_stops_pipeline() {
    let source = Arc::new(CountingSource::new());
    let pilot = pilot_with(
        source.clone(),
        Arc::new(FailingDepth {
            calls: AtomicUsize::new(0),
            fail_after: 3,
        }),
    );

    pilot.start().unwrap();

    // The watcher notices the tripped latch and completes shutdown without
    // any external quit signal.
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        pilot.run_until_stopped(std::future::pending()),
    )
    .await
    .expect("pipeline did not stop after provider failure");

    result.unwrap();
    assert_eq!(pilot.state(), PilotState::Stopped);
    assert!(!pilot.latch().is_running());
    assert_eq!(source.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quit_signal_stops_pipeline() {
    let source = Arc::new(CountingSource::new());
    let pilot = pilot_with(source.clone(), Arc::new(FlatDepth));

    pilot.start().unwrap();

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        pilot.run_until_stopped(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }),
    )
    .await
    .expect("pipeline did not stop after quit signal");

    result.unwrap();
    assert_eq!(pilot.state(), PilotState::Stopped);
    assert_eq!(source.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_before_start() {
    let source = Arc::new(CountingSource::new());
    let pilot = pilot_with(source.clone(), Arc::new(FlatDepth));

    // Nothing was spawned; shutdown still runs the release path once.
    pilot.shutdown().await.unwrap();
    assert_eq!(pilot.state(), PilotState::Stopped);
    assert_eq!(source.releases.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tasks_stop_within_poll_interval() {
    let source = Arc::new(CountingSource::new());
    let pilot = pilot_with(source.clone(), Arc::new(FlatDepth));

    pilot.start().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Every loop checks the latch each iteration, so a full shutdown is
    // far faster than the 2 s grace ceiling.
    let started = std::time::Instant::now();
    pilot.shutdown().await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(1_000));
}
