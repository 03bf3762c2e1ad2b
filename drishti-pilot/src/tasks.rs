//! Perception task loops
//!
//! One loop per source, all sharing the frame bus and the run latch. Every
//! loop checks the latch each iteration, yields after a processing cycle,
//! and sleeps briefly when no new frame is available, so no loop can
//! starve another. A provider failure is fatal to the whole pipeline: the
//! failing loop logs and trips the latch; there is no retry policy and no
//! partial degradation.

use crate::flags::{FlagCombinator, FlagEvent};
use crate::latch::RunLatch;
use drishti_eye::{
    DepthModelProvider, DepthSectioner, DisplaySink, FrameBus, FrameSource, HandSignalProvider,
    ObjectDetectorProvider, Overlay,
};
use drishti_spk::SpeechThrottler;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Pulls frames from the source into the bus at the configured rate.
pub(crate) async fn frame_loop(
    source: Arc<dyn FrameSource>,
    bus: Arc<FrameBus>,
    latch: Arc<RunLatch>,
    frame_interval: Duration,
    idle: Duration,
) {
    while latch.is_running() {
        let start = Instant::now();

        match source.next_frame().await {
            Ok(Some(frame)) => {
                bus.publish(frame);
            }
            Ok(None) => {
                sleep(idle).await;
                continue;
            }
            Err(e) => {
                error!("frame source failed: {e}");
                latch.trip();
                break;
            }
        }

        let elapsed = start.elapsed();
        if elapsed < frame_interval {
            sleep(frame_interval - elapsed).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
    debug!("frame loop stopped");
}

/// Derives the gesture-catch flag from hand observations.
pub(crate) async fn hand_loop(
    provider: Arc<dyn HandSignalProvider>,
    bus: Arc<FrameBus>,
    flags: Arc<FlagCombinator>,
    latch: Arc<RunLatch>,
    catch_threshold: f32,
    min_hand_span: f32,
    idle: Duration,
) {
    let mut last_seq = 0u64;
    let mut prev_catch = false;

    while latch.is_running() {
        let Some(frame) = bus.snapshot() else {
            sleep(idle).await;
            continue;
        };
        if frame.seq == last_seq {
            sleep(idle).await;
            continue;
        }
        last_seq = frame.seq;

        match provider.detect(&frame).await {
            Ok(obs) => {
                // Small background hands are ignored entirely.
                let catch = obs.hand_span >= min_hand_span && obs.is_catch(catch_threshold);
                if catch && !prev_catch {
                    info!("catch gesture started");
                } else if !catch && prev_catch {
                    info!("catch gesture ended");
                }
                prev_catch = catch;
                flags.set_gesture(catch);
            }
            Err(e) => {
                error!("hand provider failed: {e}");
                latch.trip();
                break;
            }
        }

        tokio::task::yield_now().await;
    }
    debug!("hand loop stopped");
}

/// Runs depth inference, sectioning, the advisory announcement, and the
/// overlay render for every fresh frame.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn depth_loop(
    provider: Arc<dyn DepthModelProvider>,
    bus: Arc<FrameBus>,
    flags: Arc<FlagCombinator>,
    sectioner: DepthSectioner,
    throttler: Arc<SpeechThrottler>,
    display: Arc<dyn DisplaySink>,
    latch: Arc<RunLatch>,
    mut rng: StdRng,
    idle: Duration,
) {
    let mut last_seq = 0u64;

    while latch.is_running() {
        let Some(frame) = bus.snapshot() else {
            sleep(idle).await;
            continue;
        };
        if frame.seq == last_seq {
            sleep(idle).await;
            continue;
        }
        last_seq = frame.seq;

        match provider.infer(&frame).await {
            Ok(map) => {
                let advisory = sectioner.evaluate(&map, &mut rng);
                if let Some(advisory) = advisory {
                    throttler.request(&advisory.to_string());
                }

                let overlay = Overlay {
                    cell_means: sectioner.cell_means(&map),
                    grid: (sectioner.rows(), sectioner.cols()),
                    advisory,
                    catch_active: flags.gesture(),
                };
                // The display is an optional debug surface; a failed render
                // is not a reason to stop navigating.
                if let Err(e) = display.render(&frame, &overlay) {
                    warn!("overlay render failed: {e}");
                }
            }
            Err(e) => {
                error!("depth provider failed: {e}");
                latch.trip();
                break;
            }
        }

        tokio::task::yield_now().await;
    }
    debug!("depth loop stopped");
}

/// Feeds the object-detected flag from the detector provider.
pub(crate) async fn detector_loop(
    provider: Arc<dyn ObjectDetectorProvider>,
    bus: Arc<FrameBus>,
    flags: Arc<FlagCombinator>,
    latch: Arc<RunLatch>,
    idle: Duration,
) {
    let mut last_seq = 0u64;

    while latch.is_running() {
        let Some(frame) = bus.snapshot() else {
            sleep(idle).await;
            continue;
        };
        if frame.seq == last_seq {
            sleep(idle).await;
            continue;
        }
        last_seq = frame.seq;

        match provider.detect(&frame).await {
            Ok(detection) => {
                if detection.present {
                    if let Some(ref label) = detection.label {
                        debug!(label = %label, "object detected");
                    }
                }
                flags.set_object(detection.present);
            }
            Err(e) => {
                error!("object detector failed: {e}");
                latch.trip();
                break;
            }
        }

        tokio::task::yield_now().await;
    }
    debug!("detector loop stopped");
}

/// Drives the flag combinator at a fixed interval.
pub(crate) async fn flag_evaluator_loop(
    flags: Arc<FlagCombinator>,
    latch: Arc<RunLatch>,
    poll: Duration,
) {
    let mut interval = tokio::time::interval(poll);
    while latch.is_running() {
        interval.tick().await;
        flags.evaluate();
    }
    debug!("flag evaluator stopped");
}

/// Announces the combined gesture-plus-detection event.
pub(crate) async fn alert_loop(
    mut events: broadcast::Receiver<FlagEvent>,
    throttler: Arc<SpeechThrottler>,
    latch: Arc<RunLatch>,
    alert_text: String,
    poll: Duration,
) {
    while latch.is_running() {
        match tokio::time::timeout(poll, events.recv()).await {
            Ok(Ok(FlagEvent::BothActive)) => {
                throttler.request(&alert_text);
            }
            Ok(Err(broadcast::error::RecvError::Closed)) => break,
            Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                warn!(skipped, "alert consumer lagged behind flag events");
            }
            Err(_) => {
                // Timeout: re-check the latch.
            }
        }
    }
    debug!("alert loop stopped");
}

/// Seed helper for the depth tie-break.
pub(crate) fn decision_rng(seed: Option<u64>) -> StdRng {
    use rand::SeedableRng;
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::thread_rng().gen()),
    }
}
