use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use folio_protocol::Rect;

use super::{
    IntersectionCallback, IntersectionEntry, IntersectionObserver, ObservationHandle, Threshold,
};

/// Compute the intersection of an element (page coordinates) with the
/// vertical viewport `[scroll_y, scroll_y + height]`.
pub fn intersect(element: &Rect, scroll_y: f64, height: f64) -> IntersectionEntry {
    let view_top = scroll_y;
    let view_bottom = scroll_y + height;

    if element.h <= 0.0 {
        let inside = element.y >= view_top && element.y <= view_bottom;
        return IntersectionEntry::new(if inside { 1.0 } else { 0.0 }, inside);
    }

    let overlap = element.bottom().min(view_bottom) - element.y.max(view_top);
    if overlap <= 0.0 {
        return IntersectionEntry::new(0.0, false);
    }
    IntersectionEntry::new((overlap / element.h).clamp(0.0, 1.0), true)
}

struct Subscription {
    element: Rect,
    callback: Rc<RefCell<IntersectionCallback>>,
    last: IntersectionEntry,
}

#[derive(Default)]
struct ViewportState {
    scroll_y: f64,
    height: f64,
    next_id: u64,
    subs: BTreeMap<u64, Subscription>,
}

/// Synchronous intersection source over a single scrolling viewport.
///
/// Elements are page-space rectangles. Updates are delivered when an element
/// is subscribed and again whenever scrolling or resizing changes what is on
/// screen, mirroring how a browser reports initial and changed entries.
#[derive(Clone, Default)]
pub struct ViewportObserver {
    state: Rc<RefCell<ViewportState>>,
}

impl ViewportObserver {
    pub fn new(viewport_height: f64) -> Self {
        let observer = Self::default();
        observer.state.borrow_mut().height = viewport_height.max(0.0);
        observer
    }

    pub fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    pub fn viewport_height(&self) -> f64 {
        self.state.borrow().height
    }

    /// Number of live subscriptions.
    pub fn watching(&self) -> usize {
        self.state.borrow().subs.len()
    }

    pub fn scroll_to(&mut self, scroll_y: f64) {
        self.state.borrow_mut().scroll_y = scroll_y.max(0.0);
        self.deliver();
    }

    pub fn resize(&mut self, viewport_height: f64) {
        self.state.borrow_mut().height = viewport_height.max(0.0);
        self.deliver();
    }

    fn deliver(&self) {
        // Callbacks may disconnect (and so mutate the map), so collect first
        // and release the borrow before calling out.
        let changed: Vec<_> = {
            let mut state = self.state.borrow_mut();
            let (scroll_y, height) = (state.scroll_y, state.height);
            state
                .subs
                .iter_mut()
                .filter_map(|(id, sub)| {
                    let entry = intersect(&sub.element, scroll_y, height);
                    if entry == sub.last {
                        return None;
                    }
                    sub.last = entry;
                    Some((*id, entry, Rc::clone(&sub.callback)))
                })
                .collect()
        };

        for (id, entry, callback) in changed {
            if !self.state.borrow().subs.contains_key(&id) {
                continue;
            }
            (callback.borrow_mut())(entry);
        }
    }
}

impl IntersectionObserver for ViewportObserver {
    type Element = Rect;
    type Handle = ViewportObservation;

    fn subscribe(
        &mut self,
        element: &Rect,
        _threshold: Threshold,
        callback: IntersectionCallback,
    ) -> Option<ViewportObservation> {
        let callback = Rc::new(RefCell::new(callback));
        let (id, entry) = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let entry = intersect(element, state.scroll_y, state.height);
            state.subs.insert(
                id,
                Subscription {
                    element: *element,
                    callback: Rc::clone(&callback),
                    last: entry,
                },
            );
            (id, entry)
        };

        (callback.borrow_mut())(entry);

        Some(ViewportObservation {
            id,
            state: Rc::downgrade(&self.state),
        })
    }
}

/// Subscription handle returned by [`ViewportObserver`].
pub struct ViewportObservation {
    id: u64,
    state: Weak<RefCell<ViewportState>>,
}

impl ObservationHandle for ViewportObservation {
    fn disconnect(&mut self) {
        if let Some(state) = self.state.upgrade() {
            state.borrow_mut().subs.remove(&self.id);
        }
        self.state = Weak::new();
    }
}

impl Drop for ViewportObservation {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::VisibilityTrigger;

    #[test]
    fn ratio_is_visible_fraction_of_element() {
        let element = Rect::new(0.0, 900.0, 100.0, 400.0);
        assert_eq!(intersect(&element, 0.0, 800.0), IntersectionEntry::new(0.0, false));
        assert_eq!(intersect(&element, 200.0, 800.0).ratio, 0.25);
        assert_eq!(intersect(&element, 900.0, 800.0).ratio, 1.0);
    }

    #[test]
    fn zero_height_element_counts_when_inside() {
        let marker = Rect::new(0.0, 100.0, 10.0, 0.0);
        assert!(intersect(&marker, 0.0, 800.0).is_intersecting);
        assert!(!intersect(&marker, 200.0, 800.0).is_intersecting);
    }

    #[test]
    fn trigger_latches_when_scrolled_into_view() {
        let mut observer = ViewportObserver::new(800.0);
        let below = Rect::new(0.0, 1000.0, 100.0, 500.0);
        let trigger = VisibilityTrigger::observe(&mut observer, &below, Threshold::CARD);
        assert!(!trigger.is_visible());

        observer.scroll_to(250.0); // 50px of 500 on screen
        assert!(!trigger.is_visible());

        observer.scroll_to(400.0); // 200px of 500
        assert!(trigger.is_visible());
        assert_eq!(observer.watching(), 0);

        observer.scroll_to(0.0);
        assert!(trigger.is_visible());
    }

    #[test]
    fn element_on_screen_at_mount_latches_immediately() {
        let mut observer = ViewportObserver::new(800.0);
        let hero = Rect::new(0.0, 0.0, 100.0, 800.0);
        let trigger = VisibilityTrigger::observe(&mut observer, &hero, Threshold::SECTION);
        assert!(trigger.is_visible());
        assert!(!trigger.is_watching());
        assert_eq!(observer.watching(), 0);
    }

    #[test]
    fn disposed_trigger_stops_receiving() {
        let mut observer = ViewportObserver::new(800.0);
        let below = Rect::new(0.0, 2000.0, 100.0, 500.0);
        let mut trigger = VisibilityTrigger::observe(&mut observer, &below, Threshold::SECTION);
        trigger.dispose();
        assert_eq!(observer.watching(), 0);

        observer.scroll_to(2000.0);
        assert!(!trigger.is_visible());
    }

    #[test]
    fn growing_viewport_reveals() {
        let mut observer = ViewportObserver::new(400.0);
        let below = Rect::new(0.0, 500.0, 100.0, 100.0);
        let trigger = VisibilityTrigger::observe(&mut observer, &below, Threshold::SECTION);
        observer.resize(1000.0);
        assert!(trigger.is_visible());
    }
}
