use crate::config::TrackerConfig;
use crate::dom::{attach_window_scroll, page_y_offset, DocumentGeometry, DomErrorKind};
use crate::tracker::{LatestCallback, ScrollDepthEvent, ScrollObserver, TrackerPhase};
use crate::util::monotonic_now_ms;
use leptos::prelude::*;
use std::rc::Rc;

type Observer = Option<Rc<ScrollObserver<DocumentGeometry>>>;

#[derive(Clone, Default)]
pub struct UseScrollTrackerOptions {
    pub config: TrackerConfig,
    pub on_depth: Option<Callback<ScrollDepthEvent>>,
}

impl UseScrollTrackerOptions {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            on_depth: None,
        }
    }

    pub fn depths(mut self, depths: impl Into<Vec<f64>>) -> Self {
        self.config = self.config.with_depths(depths);
        self
    }

    pub fn throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.config = self.config.with_throttle_ms(throttle_ms);
        self
    }

    pub fn on_depth(mut self, callback: impl Fn(ScrollDepthEvent) + Send + Sync + 'static) -> Self {
        self.on_depth = Some(Callback::new(callback));
        self
    }
}

#[derive(Clone, Copy)]
pub struct UseScrollTrackerReturn {
    /// Last depth reached, or the raw scroll percentage without depths.
    pub scroll_y: ReadSignal<f64>,
    pub phase: ReadSignal<TrackerPhase>,
    /// Depths not reached yet, ascending. Always empty without depths.
    pub remaining_depths: ReadSignal<Vec<f64>>,
    set_phase: WriteSignal<TrackerPhase>,
    observer: StoredValue<Observer, LocalStorage>,
}

impl UseScrollTrackerReturn {
    /// Swap the callback without touching the scroll listener.
    pub fn set_callback(&self, callback: Option<Callback<ScrollDepthEvent>>) {
        self.observer.try_with_value(|observer| {
            if let Some(observer) = observer {
                observer.callback().replace(callback.map(depth_fn));
            }
        });
    }

    /// Remove the scroll listener. Later calls do nothing.
    pub fn stop(&self) {
        self.observer.try_with_value(|observer| {
            if let Some(observer) = observer {
                observer.detach();
            }
        });
        if self.phase.get_untracked() != TrackerPhase::Terminal {
            self.set_phase.set(TrackerPhase::Terminal);
        }
    }
}

fn depth_fn(callback: Callback<ScrollDepthEvent>) -> impl Fn(&ScrollDepthEvent) {
    move |event: &ScrollDepthEvent| callback.run(event.clone())
}

/// Hook tracking how far the window has been scrolled.
///
/// With `depths` configured, `on_depth` fires once per depth (ascending, also
/// when a single scroll jumps past several) and the listener is removed after
/// the last one. Without depths, `scroll_y` follows the raw percentage and
/// `on_depth` fires on every accepted update, at most once per `throttle_ms`.
///
/// The listener is removed when the owning component is cleaned up.
pub fn use_scroll_tracker(options: UseScrollTrackerOptions) -> UseScrollTrackerReturn {
    let UseScrollTrackerOptions { config, on_depth } = options;

    let latest = LatestCallback::default();
    latest.replace(on_depth.map(depth_fn));

    let observer: Observer = match DocumentGeometry::from_window() {
        Ok(geometry) => Some(Rc::new(ScrollObserver::new(geometry, &config, latest))),
        // No window is expected outside a browser; a window without a
        // document or body is not.
        Err(e) if e.kind == DomErrorKind::NoWindow => {
            log::debug!("scroll tracker left inactive: {e}");
            None
        }
        Err(e) => {
            log::warn!("scroll tracker left inactive: {e}");
            None
        }
    };

    let initial_phase = observer
        .as_ref()
        .map(|o| o.phase())
        .unwrap_or(TrackerPhase::Active);
    let initial_remaining = observer
        .as_ref()
        .map(|o| o.remaining())
        .unwrap_or_default();

    let (scroll_y, set_scroll_y) = signal(0.0);
    let (phase, set_phase) = signal(initial_phase);
    let (remaining_depths, set_remaining_depths) = signal(initial_remaining);

    let observer = StoredValue::new_local(observer);

    observer.with_value(|o| {
        let Some(o) = o else {
            return;
        };

        if let Some(offset) = page_y_offset().filter(|y| *y != 0.0) {
            o.seed_scroll_y(offset);
            set_scroll_y.set(offset);
        }

        o.attach(attach_window_scroll(move || {
            let result = observer.try_with_value(|o| {
                o.as_ref()
                    .map(|o| (o.on_signal(monotonic_now_ms()), o.phase(), o.remaining()))
            });
            let Some(Some((changed, next_phase, remaining))) = result else {
                return;
            };

            if let Some(y) = changed {
                set_scroll_y.set(y);
                if remaining.len() != remaining_depths.with_untracked(|r| r.len()) {
                    set_remaining_depths.set(remaining);
                }
            }
            if next_phase != phase.get_untracked() {
                set_phase.set(next_phase);
            }
        }));

        log::debug!("scroll tracker attached (phase: {})", o.phase());
    });

    on_cleanup(move || {
        observer.try_with_value(|o| {
            if let Some(o) = o {
                o.detach();
            }
        });
    });

    UseScrollTrackerReturn {
        scroll_y,
        phase,
        remaining_depths,
        set_phase,
        observer,
    }
}
