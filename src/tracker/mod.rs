mod observer;

pub use observer::ScrollObserver;

use crate::config::TrackerConfig;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Payload handed to the consumer callback.
///
/// In milestone mode `scroll_y` is the depth just reached; in continuous mode
/// it is the raw percentage and `remaining_depths` is empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrollDepthEvent {
    pub scroll_y: f64,
    pub scroll_percent: f64,
    pub remaining_depths: Vec<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TrackerPhase {
    #[default]
    Active,
    /// Listener removed; no further signal changes any state.
    Terminal,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollState {
    pub current_percent: f64,
    pub remaining_thresholds: Vec<f64>,
    pub scroll_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
enum Mode {
    Milestones,
    Continuous {
        min_interval_ms: Option<f64>,
        last_accepted_ms: Option<f64>,
    },
}

/// Result of feeding one scroll signal into the tracker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollUpdate {
    /// New `scroll_y`, or `None` when the signal changed nothing.
    pub scroll_y: Option<f64>,
    /// Callback payloads, in the order they must be delivered.
    pub events: Vec<ScrollDepthEvent>,
    /// The last milestone was reached; the listener must be removed.
    pub finished: bool,
}

/// Scroll-depth state machine, free of any DOM access.
#[derive(Clone, Debug)]
pub struct ScrollTracker {
    mode: Mode,
    state: ScrollState,
    phase: TrackerPhase,
}

impl ScrollTracker {
    pub fn new(config: &TrackerConfig) -> Self {
        let (mode, remaining, phase) = match config.normalized_depths() {
            Some(depths) => {
                // Nothing to wait for: never becomes active.
                let phase = if depths.is_empty() {
                    TrackerPhase::Terminal
                } else {
                    TrackerPhase::Active
                };
                (Mode::Milestones, depths, phase)
            }
            None => (
                Mode::Continuous {
                    min_interval_ms: config.throttle_ms.map(|ms| ms as f64),
                    last_accepted_ms: None,
                },
                Vec::new(),
                TrackerPhase::Active,
            ),
        };

        Self {
            mode,
            state: ScrollState {
                remaining_thresholds: remaining,
                ..ScrollState::default()
            },
            phase,
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn scroll_y(&self) -> f64 {
        self.state.scroll_y
    }

    pub fn remaining(&self) -> &[f64] {
        &self.state.remaining_thresholds
    }

    pub fn phase(&self) -> TrackerPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == TrackerPhase::Active
    }

    pub fn tracks_milestones(&self) -> bool {
        self.mode == Mode::Milestones
    }

    /// Overwrite `scroll_y` before any signal arrived (page loaded mid-scroll).
    pub fn seed_scroll_y(&mut self, scroll_y: f64) {
        if self.is_active() {
            self.state.scroll_y = scroll_y;
        }
    }

    /// Returns `true` only on the Active -> Terminal transition.
    pub fn deactivate(&mut self) -> bool {
        let was_active = self.is_active();
        self.phase = TrackerPhase::Terminal;
        was_active
    }

    /// Feed one scroll signal. `now_ms` must come from a monotonic clock.
    pub fn handle_scroll(&mut self, percent: f64, now_ms: f64) -> ScrollUpdate {
        if !self.is_active() {
            return ScrollUpdate::default();
        }

        match &mut self.mode {
            Mode::Continuous {
                min_interval_ms,
                last_accepted_ms,
            } => {
                if let (Some(min), Some(last)) = (*min_interval_ms, *last_accepted_ms) {
                    if now_ms - last < min {
                        return ScrollUpdate::default();
                    }
                }
                *last_accepted_ms = Some(now_ms);

                self.state.current_percent = percent;
                self.state.scroll_y = percent;
                ScrollUpdate {
                    scroll_y: Some(percent),
                    events: vec![ScrollDepthEvent {
                        scroll_y: percent,
                        scroll_percent: percent,
                        remaining_depths: Vec::new(),
                    }],
                    finished: false,
                }
            }
            Mode::Milestones => self.handle_milestones(percent),
        }
    }

    fn handle_milestones(&mut self, percent: f64) -> ScrollUpdate {
        // NaN depths (or a NaN percent) land in neither bucket.
        let reached: Vec<f64> = self
            .state
            .remaining_thresholds
            .iter()
            .copied()
            .filter(|depth| percent >= *depth)
            .collect();
        let Some(&highest) = reached.last() else {
            return ScrollUpdate::default();
        };
        let remaining: Vec<f64> = self
            .state
            .remaining_thresholds
            .iter()
            .copied()
            .filter(|depth| percent < *depth)
            .collect();

        let events = reached
            .iter()
            .enumerate()
            .map(|(i, &depth)| ScrollDepthEvent {
                scroll_y: depth,
                scroll_percent: percent,
                remaining_depths: reached[i + 1..]
                    .iter()
                    .chain(remaining.iter())
                    .copied()
                    .collect(),
            })
            .collect();

        let finished = remaining.is_empty();
        self.state = ScrollState {
            current_percent: percent,
            remaining_thresholds: remaining,
            scroll_y: highest,
        };
        if finished {
            self.phase = TrackerPhase::Terminal;
        }

        ScrollUpdate {
            scroll_y: Some(highest),
            events,
            finished,
        }
    }
}

type DepthCallback = Rc<dyn Fn(&ScrollDepthEvent)>;

/// Shared slot holding the callback to invoke at signal time.
///
/// The scroll listener keeps a clone of the slot, so swapping the callback
/// never touches the listener.
#[derive(Clone, Default)]
pub struct LatestCallback(Rc<RefCell<Option<DepthCallback>>>);

impl LatestCallback {
    pub fn new(callback: impl Fn(&ScrollDepthEvent) + 'static) -> Self {
        let slot = Self::default();
        slot.replace(Some(callback));
        slot
    }

    pub fn replace<F>(&self, callback: Option<F>)
    where
        F: Fn(&ScrollDepthEvent) + 'static,
    {
        *self.0.borrow_mut() = callback.map(|f| Rc::new(f) as DepthCallback);
    }

    pub fn clear(&self) {
        *self.0.borrow_mut() = None;
    }

    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Invoke the current callback, if any.
    ///
    /// The slot is not borrowed while the callback runs, so the callback may
    /// replace itself.
    pub fn notify(&self, event: &ScrollDepthEvent) {
        let current = self.0.borrow().clone();
        if let Some(callback) = current {
            callback(event);
        }
    }
}

impl std::fmt::Debug for LatestCallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LatestCallback").field(&self.is_set()).finish()
    }
}

/// Handle to an event-source subscription.
///
/// Teardown runs at most once: on the first `cancel()` or on drop.
#[derive(Default)]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Subscription with nothing to tear down.
    pub fn inert() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }

    /// Returns `true` if this call performed the teardown.
    pub fn cancel(&mut self) -> bool {
        match self.teardown.take() {
            Some(teardown) => {
                teardown();
                true
            }
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
