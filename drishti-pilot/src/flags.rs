//! Two-signal flag combination with edge-triggered emission

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Event emitted when both flags become true together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagEvent {
    BothActive,
}

#[derive(Debug, Default, Clone, Copy)]
struct FlagState {
    gesture: bool,
    object: bool,
    /// Previous combined value, kept only for edge detection.
    combined_prev: bool,
}

/// Combines the gesture-catch and object-detected flags into a single
/// rising-edge event.
///
/// The two producers update their flags independently; a periodic
/// evaluator drives `evaluate`, which emits exactly once per false→true
/// transition of `gesture && object`. Falling edges update state silently.
/// Emissions go over a broadcast channel so downstream consumers receive
/// transitions directly rather than inferring them from log output.
pub struct FlagCombinator {
    state: RwLock<FlagState>,
    event_tx: broadcast::Sender<FlagEvent>,
}

impl FlagCombinator {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(16);
        Self {
            state: RwLock::new(FlagState::default()),
            event_tx,
        }
    }

    pub fn set_gesture(&self, value: bool) {
        self.state.write().gesture = value;
    }

    pub fn set_object(&self, value: bool) {
        self.state.write().object = value;
    }

    pub fn gesture(&self) -> bool {
        self.state.read().gesture
    }

    pub fn object(&self) -> bool {
        self.state.read().object
    }

    /// Evaluate the combined flag, emitting on a rising edge.
    pub fn evaluate(&self) -> Option<FlagEvent> {
        let mut state = self.state.write();
        let combined = state.gesture && state.object;

        if combined && !state.combined_prev {
            state.combined_prev = true;
            drop(state);

            debug!("gesture and detection flags both active");
            // No receivers is fine; the event is still reported to the caller.
            let _ = self.event_tx.send(FlagEvent::BothActive);
            return Some(FlagEvent::BothActive);
        }

        if !combined {
            state.combined_prev = false;
        }
        None
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlagEvent> {
        self.event_tx.subscribe()
    }
}

impl Default for FlagCombinator {
    fn default() -> Self {
        Self::new()
    }
}
