//! Pipeline orchestrator and shutdown state machine

use crate::config::PilotConfig;
use crate::error::PilotError;
use crate::flags::FlagCombinator;
use crate::latch::RunLatch;
use crate::tasks;
use drishti_eye::{
    DepthModelProvider, DepthSectioner, DisplaySink, FrameBus, FrameSource, HandSignalProvider,
    ObjectDetectorProvider,
};
use drishti_spk::{NullDevice, SpeechDevice, SpeechThrottler};
use parking_lot::{Mutex, RwLock};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PilotState {
    Initializing,
    Running,
    Cancelling,
    Stopped,
}

/// The external collaborators the pipeline drives.
pub struct Peripherals {
    pub source: Arc<dyn FrameSource>,
    pub hand: Arc<dyn HandSignalProvider>,
    pub depth: Arc<dyn DepthModelProvider>,
    pub detector: Arc<dyn ObjectDetectorProvider>,
    pub display: Arc<dyn DisplaySink>,
    pub speech: Arc<dyn SpeechDevice>,
}

/// Runs the whole pipeline: one task per perception source over the shared
/// frame bus, the flag evaluator, and the announcement consumers.
///
/// Lifecycle is `Initializing → Running → Cancelling → Stopped`. The run
/// latch is the sole cancellation signal; `shutdown` trips it, waits a
/// bounded grace period for every task, and releases external resources
/// exactly once. A task that misses the grace period is aborted and
/// surfaced as [`PilotError::Straggler`].
pub struct Pilot {
    config: Arc<PilotConfig>,
    bus: Arc<FrameBus>,
    flags: Arc<FlagCombinator>,
    gesture_throttler: Arc<SpeechThrottler>,
    depth_throttler: Arc<SpeechThrottler>,
    latch: Arc<RunLatch>,
    sectioner: DepthSectioner,

    source: Arc<dyn FrameSource>,
    hand: Arc<dyn HandSignalProvider>,
    depth: Arc<dyn DepthModelProvider>,
    detector: Arc<dyn ObjectDetectorProvider>,
    display: Arc<dyn DisplaySink>,
    speech: Arc<dyn SpeechDevice>,

    state: RwLock<PilotState>,
    handles: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
    released: AtomicBool,
}

impl Pilot {
    pub fn new(config: PilotConfig, peripherals: Peripherals) -> Result<Self, PilotError> {
        config.validate().map_err(PilotError::Config)?;

        let sectioner = DepthSectioner::from_config(&config.vision.depth)
            .map_err(|e| PilotError::Config(e.to_string()))?;

        let speech: Arc<dyn SpeechDevice> = if config.speech.enabled {
            peripherals.speech
        } else {
            info!("speech output disabled, announcements will be dropped");
            Arc::new(NullDevice)
        };

        let gesture_throttler = Arc::new(SpeechThrottler::new(
            "gesture",
            speech.clone(),
            Duration::from_secs(config.speech.gesture_cooldown_secs),
        ));
        let depth_throttler = Arc::new(SpeechThrottler::new(
            "depth",
            speech.clone(),
            Duration::from_secs(config.speech.depth_cooldown_secs),
        ));

        Ok(Self {
            config: Arc::new(config),
            bus: Arc::new(FrameBus::new()),
            flags: Arc::new(FlagCombinator::new()),
            gesture_throttler,
            depth_throttler,
            latch: Arc::new(RunLatch::new()),
            sectioner,
            source: peripherals.source,
            hand: peripherals.hand,
            depth: peripherals.depth,
            detector: peripherals.detector,
            display: peripherals.display,
            speech,
            state: RwLock::new(PilotState::Initializing),
            handles: Mutex::new(Vec::new()),
            released: AtomicBool::new(false),
        })
    }

    pub fn state(&self) -> PilotState {
        *self.state.read()
    }

    pub fn latch(&self) -> Arc<RunLatch> {
        self.latch.clone()
    }

    pub fn frame_bus(&self) -> Arc<FrameBus> {
        self.bus.clone()
    }

    pub fn flags(&self) -> Arc<FlagCombinator> {
        self.flags.clone()
    }

    /// Spawn every pipeline task and move to `Running`.
    pub fn start(&self) -> Result<(), PilotError> {
        {
            let mut state = self.state.write();
            if *state != PilotState::Initializing {
                return Err(PilotError::State(format!(
                    "cannot start from {:?}",
                    *state
                )));
            }
            *state = PilotState::Running;
        }

        info!("starting perception pipeline");

        let idle = Duration::from_millis(self.config.idle_poll_ms);
        let frame_interval =
            Duration::from_secs_f64(1.0 / f64::from(self.config.vision.frame_rate));

        let mut handles = self.handles.lock();

        handles.push((
            "frame",
            tokio::spawn(tasks::frame_loop(
                self.source.clone(),
                self.bus.clone(),
                self.latch.clone(),
                frame_interval,
                idle,
            )),
        ));

        handles.push((
            "hand",
            tokio::spawn(tasks::hand_loop(
                self.hand.clone(),
                self.bus.clone(),
                self.flags.clone(),
                self.latch.clone(),
                self.config.vision.catch_threshold,
                self.config.vision.min_hand_span,
                idle,
            )),
        ));

        handles.push((
            "depth",
            tokio::spawn(tasks::depth_loop(
                self.depth.clone(),
                self.bus.clone(),
                self.flags.clone(),
                self.sectioner,
                self.depth_throttler.clone(),
                self.display.clone(),
                self.latch.clone(),
                tasks::decision_rng(self.config.decision_seed),
                idle,
            )),
        ));

        handles.push((
            "detector",
            tokio::spawn(tasks::detector_loop(
                self.detector.clone(),
                self.bus.clone(),
                self.flags.clone(),
                self.latch.clone(),
                idle,
            )),
        ));

        handles.push((
            "flags",
            tokio::spawn(tasks::flag_evaluator_loop(
                self.flags.clone(),
                self.latch.clone(),
                Duration::from_millis(self.config.flag_poll_ms),
            )),
        ));

        handles.push((
            "alert",
            tokio::spawn(tasks::alert_loop(
                self.flags.subscribe(),
                self.gesture_throttler.clone(),
                self.latch.clone(),
                self.config.grasp_alert_text.clone(),
                Duration::from_millis(self.config.flag_poll_ms),
            )),
        ));

        info!(tasks = handles.len(), "perception pipeline running");
        Ok(())
    }

    /// Watch for the quit signal or the latch, then shut down.
    pub async fn run_until_stopped<F>(&self, quit: F) -> Result<(), PilotError>
    where
        F: Future<Output = ()> + Send,
    {
        let poll = Duration::from_millis(self.config.watcher_poll_ms);
        tokio::pin!(quit);

        loop {
            if !self.latch.is_running() {
                info!("running flag cleared, shutting down");
                break;
            }

            tokio::select! {
                _ = &mut quit => {
                    info!("quit signal received");
                    break;
                }
                _ = sleep(poll) => {}
            }
        }

        self.shutdown().await
    }

    /// Trip the latch, await every task under the grace period, release
    /// resources. Idempotent: repeat calls after `Stopped` are no-ops.
    pub async fn shutdown(&self) -> Result<(), PilotError> {
        {
            let mut state = self.state.write();
            match *state {
                PilotState::Stopped => return Ok(()),
                PilotState::Cancelling => {
                    return Err(PilotError::State("shutdown already in progress".to_string()))
                }
                _ => *state = PilotState::Cancelling,
            }
        }

        info!("cancelling pipeline tasks");
        self.latch.trip();

        let handles = std::mem::take(&mut *self.handles.lock());
        let grace = Duration::from_millis(self.config.shutdown_grace_ms);
        let mut stragglers = Vec::new();

        for (name, mut handle) in handles {
            match timeout(grace, &mut handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(task = name, "task terminated abnormally: {e}");
                }
                Err(_) => {
                    warn!(task = name, grace_ms = grace.as_millis() as u64,
                        "task did not acknowledge cancellation, aborting");
                    handle.abort();
                    stragglers.push(name);
                }
            }
        }

        self.release_resources();
        *self.state.write() = PilotState::Stopped;
        info!("pipeline stopped");

        if stragglers.is_empty() {
            Ok(())
        } else {
            Err(PilotError::Straggler(stragglers.join(", ")))
        }
    }

    /// Release the frame source, display, and audio handles exactly once.
    fn release_resources(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        self.source.release();
        self.display.release();
        self.speech.release();
        info!("external resources released");
    }
}
