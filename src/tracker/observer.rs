use super::{LatestCallback, ScrollTracker, Subscription, TrackerPhase};
use crate::config::TrackerConfig;
use crate::geometry::GeometryProvider;
use std::cell::{Cell, RefCell};

/// Binds a [`ScrollTracker`] to a geometry source, a callback slot and the
/// subscription that feeds it scroll signals.
pub struct ScrollObserver<G> {
    geometry: G,
    tracker: RefCell<ScrollTracker>,
    callback: LatestCallback,
    subscription: RefCell<Subscription>,
    detached: Cell<bool>,
}

impl<G: GeometryProvider> ScrollObserver<G> {
    pub fn new(geometry: G, config: &TrackerConfig, callback: LatestCallback) -> Self {
        Self {
            geometry,
            tracker: RefCell::new(ScrollTracker::new(config)),
            callback,
            subscription: RefCell::new(Subscription::inert()),
            detached: Cell::new(false),
        }
    }

    /// Take ownership of the listener subscription.
    ///
    /// An observer that is already terminal tears it down right away.
    pub fn attach(&self, subscription: Subscription) {
        let mut current = self.subscription.borrow_mut();
        current.cancel();
        *current = subscription;
        if !self.tracker.borrow().is_active() {
            current.cancel();
        }
    }

    /// Handle one scroll signal. Returns the new `scroll_y` if it changed.
    pub fn on_signal(&self, now_ms: f64) -> Option<f64> {
        if !self.tracker.borrow().is_active() {
            return None;
        }

        let percent = self.geometry.snapshot().scroll_percent();
        let update = self.tracker.borrow_mut().handle_scroll(percent, now_ms);

        for event in &update.events {
            // A callback may detach mid-batch; the rest of the batch is dropped.
            if self.detached.get() {
                break;
            }
            self.callback.notify(event);
        }

        if update.finished {
            log::info!("all scroll depths reached at {percent:.1}%, removing listener");
            self.subscription.borrow_mut().cancel();
        }

        update.scroll_y
    }

    /// Stop listening. Safe to call any number of times.
    pub fn detach(&self) {
        self.detached.set(true);
        if self.tracker.borrow_mut().deactivate() {
            log::debug!("scroll tracker detached");
        }
        self.subscription.borrow_mut().cancel();
    }

    pub fn seed_scroll_y(&self, scroll_y: f64) {
        self.tracker.borrow_mut().seed_scroll_y(scroll_y);
    }

    pub fn callback(&self) -> &LatestCallback {
        &self.callback
    }

    pub fn scroll_y(&self) -> f64 {
        self.tracker.borrow().scroll_y()
    }

    pub fn remaining(&self) -> Vec<f64> {
        self.tracker.borrow().remaining().to_vec()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.tracker.borrow().phase()
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.borrow().is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LayoutSnapshot, RootMetrics};
    use crate::tracker::ScrollDepthEvent;
    use std::cell::Cell;
    use std::rc::Rc;

    const SCROLL_HEIGHT: f64 = 1000.0;
    const CLIENT_HEIGHT: f64 = 500.0;

    /// Fake document: 1000px of content in a 500px viewport.
    #[derive(Clone, Default)]
    struct FakeDocument {
        scroll_top: Rc<Cell<f64>>,
    }

    impl FakeDocument {
        fn scroll_to_percent(&self, percent: f64) {
            self.scroll_top
                .set(percent / 100.0 * (SCROLL_HEIGHT - CLIENT_HEIGHT));
        }
    }

    impl GeometryProvider for FakeDocument {
        fn snapshot(&self) -> LayoutSnapshot {
            let top = self.scroll_top.get();
            LayoutSnapshot {
                document_element: RootMetrics::new(top, SCROLL_HEIGHT, CLIENT_HEIGHT),
                body: RootMetrics::new(top, SCROLL_HEIGHT, 0.0),
            }
        }
    }

    /// Records every callback invocation.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<ScrollDepthEvent>>>);

    impl Recorder {
        fn callback(&self) -> LatestCallback {
            let events = self.0.clone();
            LatestCallback::new(move |e: &ScrollDepthEvent| events.borrow_mut().push(e.clone()))
        }

        fn scroll_ys(&self) -> Vec<f64> {
            self.0.borrow().iter().map(|e| e.scroll_y).collect()
        }

        fn len(&self) -> usize {
            self.0.borrow().len()
        }
    }

    struct Harness {
        doc: FakeDocument,
        observer: ScrollObserver<FakeDocument>,
        subscribes: Rc<Cell<u32>>,
        unsubscribes: Rc<Cell<u32>>,
    }

    impl Harness {
        fn new(config: TrackerConfig, callback: LatestCallback) -> Self {
            let doc = FakeDocument::default();
            let observer = ScrollObserver::new(doc.clone(), &config, callback);
            let subscribes = Rc::new(Cell::new(0));
            let unsubscribes = Rc::new(Cell::new(0));

            subscribes.set(subscribes.get() + 1);
            let u = unsubscribes.clone();
            observer.attach(Subscription::new(move || u.set(u.get() + 1)));

            Self {
                doc,
                observer,
                subscribes,
                unsubscribes,
            }
        }

        fn scroll(&self, percent: f64) -> Option<f64> {
            self.doc.scroll_to_percent(percent);
            self.observer.on_signal(0.0)
        }
    }

    fn depths(d: &[f64]) -> TrackerConfig {
        TrackerConfig::default().with_depths(d.to_vec())
    }

    #[test]
    fn test_reaching_a_depth_updates_scroll_y_and_notifies() {
        let rec = Recorder::default();
        let h = Harness::new(depths(&[25.0, 50.0, 75.0, 100.0]), rec.callback());
        assert_eq!(h.observer.scroll_y(), 0.0);

        assert_eq!(h.scroll(25.0), Some(25.0));
        assert_eq!(h.observer.scroll_y(), 25.0);
        assert_eq!(
            rec.0.borrow()[0],
            ScrollDepthEvent {
                scroll_y: 25.0,
                scroll_percent: 25.0,
                remaining_depths: vec![50.0, 75.0, 100.0],
            }
        );
    }

    #[test]
    fn test_jump_fires_in_one_signal() {
        let rec = Recorder::default();
        let h = Harness::new(depths(&[25.0, 50.0, 75.0, 100.0]), rec.callback());

        h.scroll(75.0);
        assert_eq!(rec.scroll_ys(), vec![25.0, 50.0, 75.0]);
        let remaining: Vec<Vec<f64>> = rec
            .0
            .borrow()
            .iter()
            .map(|e| e.remaining_depths.clone())
            .collect();
        assert_eq!(
            remaining,
            vec![vec![50.0, 75.0, 100.0], vec![75.0, 100.0], vec![100.0]]
        );
        assert!(h.observer.is_listening());
    }

    #[test]
    fn test_exhaustion_removes_listener_once() {
        let rec = Recorder::default();
        let h = Harness::new(depths(&[25.0, 50.0, 75.0]), rec.callback());

        h.scroll(25.0);
        h.scroll(80.0);
        assert_eq!(rec.len(), 3);
        assert_eq!(h.observer.phase(), TrackerPhase::Terminal);
        assert!(!h.observer.is_listening());
        assert_eq!(h.unsubscribes.get(), 1);

        // Late signals (already queued) are ignored.
        assert_eq!(h.scroll(100.0), None);
        assert_eq!(rec.len(), 3);
        assert_eq!(h.observer.scroll_y(), 75.0);

        h.observer.detach();
        assert_eq!(h.unsubscribes.get(), 1);
    }

    #[test]
    fn test_detach_inside_callback_drops_rest_of_batch() {
        let doc = FakeDocument::default();
        let observer = Rc::new(ScrollObserver::new(
            doc.clone(),
            &depths(&[25.0, 50.0, 75.0, 100.0]),
            LatestCallback::default(),
        ));
        let calls = Rc::new(Cell::new(0));

        let weak = Rc::downgrade(&observer);
        let c = calls.clone();
        observer.callback().replace(Some(move |_: &ScrollDepthEvent| {
            c.set(c.get() + 1);
            if let Some(o) = weak.upgrade() {
                o.detach();
            }
        }));

        doc.scroll_to_percent(75.0);
        observer.on_signal(0.0);
        assert_eq!(calls.get(), 1);
        assert_eq!(observer.phase(), TrackerPhase::Terminal);

        doc.scroll_to_percent(100.0);
        assert_eq!(observer.on_signal(1.0), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_explicit_detach_is_idempotent() {
        let rec = Recorder::default();
        let h = Harness::new(TrackerConfig::default(), rec.callback());
        h.scroll(10.0);

        h.observer.detach();
        h.observer.detach();
        assert_eq!(h.unsubscribes.get(), 1);

        assert_eq!(h.scroll(90.0), None);
        assert_eq!(h.observer.scroll_y(), 10.0);
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_replacing_callback_keeps_subscription() {
        let first = Recorder::default();
        let second = Recorder::default();
        let h = Harness::new(depths(&[25.0, 50.0, 75.0]), first.callback());

        h.scroll(25.0);

        let events = second.0.clone();
        h.observer.callback().replace(Some(move |e: &ScrollDepthEvent| {
            events.borrow_mut().push(e.clone())
        }));
        h.scroll(50.0);

        assert_eq!(first.scroll_ys(), vec![25.0]);
        assert_eq!(second.scroll_ys(), vec![50.0]);
        assert_eq!(h.subscribes.get(), 1);
        assert_eq!(h.unsubscribes.get(), 0);
    }

    #[test]
    fn test_continuous_mode_follows_raw_percent() {
        let h = Harness::new(TrackerConfig::default(), LatestCallback::default());
        assert_eq!(h.scroll(30.0), Some(30.0));
        assert_eq!(h.observer.scroll_y(), 30.0);
        assert_eq!(h.scroll(60.0), Some(60.0));
        assert_eq!(h.observer.scroll_y(), 60.0);
        assert_eq!(h.observer.phase(), TrackerPhase::Active);
    }

    #[test]
    fn test_continuous_mode_throttles_by_clock() {
        let rec = Recorder::default();
        let h = Harness::new(TrackerConfig::default().with_throttle_ms(50), rec.callback());

        h.doc.scroll_to_percent(10.0);
        assert_eq!(h.observer.on_signal(0.0), Some(10.0));
        h.doc.scroll_to_percent(20.0);
        assert_eq!(h.observer.on_signal(49.0), None);
        assert_eq!(h.observer.scroll_y(), 10.0);
        assert_eq!(h.observer.on_signal(50.0), Some(20.0));
        assert_eq!(rec.scroll_ys(), vec![10.0, 20.0]);
    }

    #[test]
    fn test_empty_depths_never_listen() {
        let h = Harness::new(depths(&[]), LatestCallback::default());
        assert!(!h.observer.is_listening());
        assert_eq!(h.unsubscribes.get(), 1);
        assert_eq!(h.scroll(50.0), None);
    }

    #[test]
    fn test_non_scrollable_document_reports_nan() {
        let observer = ScrollObserver::new(
            || LayoutSnapshot {
                document_element: RootMetrics::new(0.0, 500.0, 500.0),
                body: RootMetrics::default(),
            },
            &TrackerConfig::default(),
            LatestCallback::default(),
        );
        let scroll_y = observer.on_signal(0.0).expect("continuous mode always updates");
        assert!(scroll_y.is_nan());
    }

    #[test]
    fn test_dropping_observer_removes_listener() {
        let h = Harness::new(TrackerConfig::default(), LatestCallback::default());
        let unsubscribes = h.unsubscribes.clone();
        drop(h);
        assert_eq!(unsubscribes.get(), 1);
    }
}
