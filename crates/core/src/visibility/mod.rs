//! One-shot "has become visible" latches driven by viewport intersection.
//!
//! A [`VisibilityTrigger`] subscribes one element to an
//! [`IntersectionObserver`], flips its latch the first time the element is
//! visible enough, and then stops watching. Sections read the latch to pick
//! their enter-animation state.

pub mod viewport;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_protocol::Reveal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use viewport::{ViewportObservation, ViewportObserver};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("threshold {0} is outside 0.0..=1.0")]
pub struct InvalidThreshold(pub f64);

/// Fraction of an element that must be visible before it counts as seen.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    /// Whole sections.
    pub const SECTION: Threshold = Threshold(0.1);
    /// Contact section body.
    pub const CONTACT: Threshold = Threshold(0.15);
    /// Individual cards and the certifications carousel.
    pub const CARD: Threshold = Threshold(0.2);
    /// Section headers.
    pub const HEADER: Threshold = Threshold(0.3);

    pub fn new(fraction: f64) -> Result<Self, InvalidThreshold> {
        if (0.0..=1.0).contains(&fraction) {
            Ok(Self(fraction))
        } else {
            Err(InvalidThreshold(fraction))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = InvalidThreshold;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> f64 {
        threshold.0
    }
}

/// One intersection update for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Visible fraction of the element, `0.0..=1.0`.
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(ratio: f64, is_intersecting: bool) -> Self {
        Self {
            ratio,
            is_intersecting,
        }
    }

    /// Whether this update satisfies `threshold`.
    pub fn meets(&self, threshold: Threshold) -> bool {
        self.is_intersecting && self.ratio >= threshold.get()
    }
}

pub type IntersectionCallback = Box<dyn FnMut(IntersectionEntry)>;

/// A live subscription; disconnecting stops further callbacks.
///
/// `disconnect` must be idempotent, and implementations disconnect on drop.
pub trait ObservationHandle {
    fn disconnect(&mut self);
}

/// Host capability that reports how much of an element is on screen.
pub trait IntersectionObserver {
    type Element;
    type Handle: ObservationHandle + 'static;

    /// Start delivering updates for `element` to `callback`.
    ///
    /// Returns `None` when the host has no way to observe intersection.
    /// Callers must then assume the element is visible.
    fn subscribe(
        &mut self,
        element: &Self::Element,
        threshold: Threshold,
        callback: IntersectionCallback,
    ) -> Option<Self::Handle>;
}

/// A one-way visibility latch bound to one observed element.
///
/// The latch starts `false`, becomes `true` on the first qualifying update
/// and never reverts. Dropping the trigger releases the subscription.
pub struct VisibilityTrigger<H: ObservationHandle> {
    latch: Rc<Cell<bool>>,
    handle: Rc<RefCell<Option<H>>>,
    threshold: Threshold,
}

impl<H: ObservationHandle + 'static> VisibilityTrigger<H> {
    /// Subscribe `element` and return its latch.
    pub fn observe<O>(observer: &mut O, element: &O::Element, threshold: Threshold) -> Self
    where
        O: IntersectionObserver<Handle = H>,
    {
        let latch = Rc::new(Cell::new(false));
        let handle: Rc<RefCell<Option<H>>> = Rc::new(RefCell::new(None));

        let callback = {
            let latch = Rc::clone(&latch);
            let handle = Rc::clone(&handle);
            Box::new(move |entry: IntersectionEntry| {
                if latch.get() || !entry.meets(threshold) {
                    return;
                }
                latch.set(true);
                tracing::debug!(ratio = entry.ratio, "element became visible");
                // The slot is empty when the host fires during `subscribe`;
                // the caller disconnects in that case.
                if let Ok(mut slot) = handle.try_borrow_mut()
                    && let Some(mut active) = slot.take()
                {
                    active.disconnect();
                }
            })
        };

        match observer.subscribe(element, threshold, callback) {
            Some(mut active) => {
                if latch.get() {
                    active.disconnect();
                } else {
                    *handle.borrow_mut() = Some(active);
                }
            }
            None => {
                tracing::debug!("intersection observation unavailable, revealing immediately");
                latch.set(true);
            }
        }

        Self {
            latch,
            handle,
            threshold,
        }
    }

    /// A trigger for an element that never got attached. It stays hidden.
    pub fn detached(threshold: Threshold) -> Self {
        Self {
            latch: Rc::new(Cell::new(false)),
            handle: Rc::new(RefCell::new(None)),
            threshold,
        }
    }

    /// A trigger that is visible from the start (content shown on mount).
    pub fn revealed(threshold: Threshold) -> Self {
        let trigger = Self::detached(threshold);
        trigger.latch.set(true);
        trigger
    }

    pub fn is_visible(&self) -> bool {
        self.latch.get()
    }

    pub fn reveal(&self) -> Reveal {
        Reveal::from_visible(self.is_visible())
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Whether a subscription is still live.
    pub fn is_watching(&self) -> bool {
        self.handle.borrow().is_some()
    }

    /// Stop watching. Safe to call any number of times.
    pub fn dispose(&mut self) {
        let taken = self.handle.borrow_mut().take();
        if let Some(mut active) = taken {
            active.disconnect();
        }
    }
}

impl<H: ObservationHandle> Drop for VisibilityTrigger<H> {
    fn drop(&mut self) {
        let taken = self.handle.borrow_mut().take();
        if let Some(mut active) = taken {
            active.disconnect();
        }
    }
}

impl<H: ObservationHandle> std::fmt::Debug for VisibilityTrigger<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTrigger")
            .field("visible", &self.latch.get())
            .field("watching", &self.handle.borrow().is_some())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Shared = Rc<RefCell<Vec<(bool, IntersectionCallback)>>>;

    /// Records subscriptions and lets tests push arbitrary updates,
    /// including to subscriptions that were already disconnected.
    #[derive(Default)]
    struct ManualObserver {
        subs: Shared,
        unsupported: bool,
        fire_on_subscribe: Option<IntersectionEntry>,
    }

    struct ManualHandle {
        subs: Shared,
        index: usize,
        disconnects: Rc<Cell<u32>>,
    }

    impl ObservationHandle for ManualHandle {
        fn disconnect(&mut self) {
            if let Some(sub) = self.subs.borrow_mut().get_mut(self.index) {
                sub.0 = false;
            }
            self.disconnects.set(self.disconnects.get() + 1);
        }
    }

    impl ManualObserver {
        fn push(&self, index: usize, entry: IntersectionEntry) {
            let mut callback: IntersectionCallback = Box::new(|_| {});
            std::mem::swap(&mut callback, &mut self.subs.borrow_mut()[index].1);
            callback(entry);
            std::mem::swap(&mut callback, &mut self.subs.borrow_mut()[index].1);
        }

        fn is_live(&self, index: usize) -> bool {
            self.subs.borrow()[index].0
        }
    }

    thread_local! {
        static DISCONNECTS: Rc<Cell<u32>> = Rc::new(Cell::new(0));
    }

    impl IntersectionObserver for ManualObserver {
        type Element = ();
        type Handle = ManualHandle;

        fn subscribe(
            &mut self,
            _element: &(),
            _threshold: Threshold,
            mut callback: IntersectionCallback,
        ) -> Option<ManualHandle> {
            if self.unsupported {
                return None;
            }
            if let Some(entry) = self.fire_on_subscribe {
                callback(entry);
            }
            let mut subs = self.subs.borrow_mut();
            subs.push((true, callback));
            Some(ManualHandle {
                subs: Rc::clone(&self.subs),
                index: subs.len() - 1,
                disconnects: DISCONNECTS.with(Rc::clone),
            })
        }
    }

    fn visible(ratio: f64) -> IntersectionEntry {
        IntersectionEntry::new(ratio, true)
    }

    #[test]
    fn starts_hidden() {
        let mut observer = ManualObserver::default();
        let trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::SECTION);
        assert!(!trigger.is_visible());
        assert!(trigger.is_watching());
        assert_eq!(trigger.reveal(), Reveal::Hidden);
    }

    #[test]
    fn latches_once_ratio_reaches_threshold() {
        let mut observer = ManualObserver::default();
        let trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::CARD);

        observer.push(0, visible(0.1));
        assert!(!trigger.is_visible());

        observer.push(0, visible(0.2));
        assert!(trigger.is_visible());
        assert!(!trigger.is_watching());
        assert!(!observer.is_live(0));
    }

    #[test]
    fn never_reverts_after_latching() {
        let mut observer = ManualObserver::default();
        let trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::SECTION);

        observer.push(0, visible(0.5));
        observer.push(0, IntersectionEntry::new(0.0, false));
        observer.push(0, visible(0.9));
        assert!(trigger.is_visible());
    }

    #[test]
    fn non_intersecting_entry_does_not_latch_at_zero_threshold() {
        let mut observer = ManualObserver::default();
        let threshold = Threshold::new(0.0).unwrap_or(Threshold::SECTION);
        let trigger = VisibilityTrigger::observe(&mut observer, &(), threshold);

        observer.push(0, IntersectionEntry::new(0.0, false));
        assert!(!trigger.is_visible());
        observer.push(0, IntersectionEntry::new(0.0, true));
        assert!(trigger.is_visible());
    }

    #[test]
    fn fails_open_without_observer_support() {
        let mut observer = ManualObserver {
            unsupported: true,
            ..Default::default()
        };
        let trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::HEADER);
        assert!(trigger.is_visible());
        assert!(!trigger.is_watching());
    }

    #[test]
    fn visible_during_subscribe_disconnects_immediately() {
        let mut observer = ManualObserver {
            fire_on_subscribe: Some(visible(1.0)),
            ..Default::default()
        };
        let trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::SECTION);
        assert!(trigger.is_visible());
        assert!(!trigger.is_watching());
        assert!(!observer.is_live(0));
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut observer = ManualObserver::default();
        let mut trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::SECTION);
        let before = DISCONNECTS.with(|d| d.get());

        trigger.dispose();
        trigger.dispose();
        drop(trigger);

        assert_eq!(DISCONNECTS.with(|d| d.get()), before + 1);
        assert!(!observer.is_live(0));
    }

    #[test]
    fn drop_releases_subscription() {
        let mut observer = ManualObserver::default();
        let trigger = VisibilityTrigger::observe(&mut observer, &(), Threshold::SECTION);
        drop(trigger);
        assert!(!observer.is_live(0));
    }

    #[test]
    fn detached_trigger_stays_hidden() {
        let trigger = VisibilityTrigger::<ManualHandle>::detached(Threshold::SECTION);
        assert!(!trigger.is_visible());
        assert!(!trigger.is_watching());
    }

    #[test]
    fn threshold_rejects_out_of_range() {
        assert_eq!(Threshold::new(1.5), Err(InvalidThreshold(1.5)));
        assert!(Threshold::new(-0.1).is_err());
        assert_eq!(Threshold::new(1.0).map(Threshold::get), Ok(1.0));
    }

    #[test]
    fn threshold_deserializes_with_validation() {
        let ok: Result<Threshold, _> = serde_json::from_str("0.25");
        assert_eq!(ok.ok().map(Threshold::get), Some(0.25));
        let bad: Result<Threshold, _> = serde_json::from_str("2.0");
        assert!(bad.is_err());
    }
}
