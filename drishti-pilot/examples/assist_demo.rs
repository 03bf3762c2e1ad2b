//! Headless demo of the assist pipeline.
//!
//! Wires synthetic providers into the orchestrator: the frame source emits
//! a drifting obstacle pattern, the depth provider reads it back as a depth
//! map, and the hand/detector providers simulate a grasp every few seconds.
//! Announcements go to espeak-ng when it is installed, otherwise they are
//! dropped. Ctrl-C quits.
//!
//! Run with: cargo run --example assist_demo

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use drishti_core::{DepthMap, Detection, Frame, HandObservation};
use drishti_eye::{
    DepthModelProvider, FrameSource, HandSignalProvider, NullDisplay, ObjectDetectorProvider,
    VisionError,
};
use drishti_pilot::{Peripherals, Pilot, PilotConfig};
use drishti_spk::{device_from_config, NullDevice, SpeechDevice};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

/// Emits frames whose left or right half darkens as a fake obstacle
/// sweeps through the scene.
struct SweepSource {
    tick: AtomicU64,
}

impl SweepSource {
    fn obstacle_side(tick: u64) -> Option<bool> {
        // Ten-second cycle: left wall, open corridor, right wall, open.
        match (tick / 75) % 4 {
            0 => Some(true),
            2 => Some(false),
            _ => None,
        }
    }
}

#[async_trait]
impl FrameSource for SweepSource {
    async fn next_frame(&self) -> Result<Option<Frame>, VisionError> {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        let mut data = vec![40u8; (WIDTH * HEIGHT) as usize];

        if let Some(left) = Self::obstacle_side(tick) {
            for y in 0..HEIGHT as usize {
                for x in 0..WIDTH as usize {
                    let on_left = x < (WIDTH as usize) / 2;
                    if on_left == left {
                        data[y * WIDTH as usize + x] = 230;
                    }
                }
            }
        }

        Ok(Some(Frame::new(WIDTH, HEIGHT, 1, Bytes::from(data))?))
    }
}

/// Reads the luminance channel back as a normalized depth map.
struct LuminanceDepth;

#[async_trait]
impl DepthModelProvider for LuminanceDepth {
    async fn infer(&self, frame: &Frame) -> Result<DepthMap, VisionError> {
        let raw: Vec<f32> = frame.data.iter().map(|b| f32::from(*b)).collect();
        Ok(DepthMap::from_raw(
            frame.width as usize,
            frame.height as usize,
            raw,
        )?)
    }
}

/// Pinches for a couple of seconds out of every ten.
struct ScriptedHand {
    tick: AtomicU64,
}

#[async_trait]
impl HandSignalProvider for ScriptedHand {
    async fn detect(&self, _frame: &Frame) -> Result<HandObservation, VisionError> {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        let pinching = (tick / 60) % 5 == 1;
        Ok(HandObservation {
            present: true,
            pinch_distance: if pinching { 0.02 } else { 0.3 },
            hand_span: 0.4,
        })
    }
}

/// Sees an object whenever the hand script is pinching.
struct ScriptedDetector {
    tick: AtomicU64,
}

#[async_trait]
impl ObjectDetectorProvider for ScriptedDetector {
    async fn detect(&self, _frame: &Frame) -> Result<Detection, VisionError> {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        Ok(Detection {
            present: (tick / 60) % 5 == 1,
            label: Some("bottle".to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config = PilotConfig::default();
    config.vision.resolution = (WIDTH, HEIGHT);
    config.vision.frame_rate = 15;

    let configured = device_from_config(&config.speech)?;
    let speech: Arc<dyn SpeechDevice> = if configured.is_available() {
        configured
    } else {
        tracing::warn!("espeak-ng not found, announcements will be dropped");
        Arc::new(NullDevice)
    };

    let pilot = Pilot::new(
        config,
        Peripherals {
            source: Arc::new(SweepSource {
                tick: AtomicU64::new(0),
            }),
            hand: Arc::new(ScriptedHand {
                tick: AtomicU64::new(0),
            }),
            depth: Arc::new(LuminanceDepth),
            detector: Arc::new(ScriptedDetector {
                tick: AtomicU64::new(0),
            }),
            display: Arc::new(NullDisplay),
            speech,
        },
    )?;

    pilot.start()?;
    tracing::info!("pipeline running, press Ctrl-C to quit");

    pilot
        .run_until_stopped(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
