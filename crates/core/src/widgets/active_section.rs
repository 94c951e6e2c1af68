use folio_protocol::{SectionAnchor, SectionKey};

/// Tracks which section the navigation bar highlights.
///
/// A section is a candidate once its top has scrolled to within
/// `activation_offset` px of the viewport top. The bottom-most candidate
/// wins; with no candidate the previous section stays active.
#[derive(Debug, Clone)]
pub struct ActiveSectionTracker {
    active: SectionKey,
    activation_offset: f64,
}

impl ActiveSectionTracker {
    pub const DEFAULT_ACTIVATION_OFFSET: f64 = 100.0;

    pub fn new(initial: SectionKey, activation_offset: f64) -> Self {
        Self {
            active: initial,
            activation_offset,
        }
    }

    pub fn active(&self) -> &SectionKey {
        &self.active
    }

    /// Re-evaluate against the current scroll position. `anchors` must be
    /// in layout order (top to bottom).
    pub fn recompute<'a, I>(&mut self, scroll_y: f64, anchors: I) -> &SectionKey
    where
        I: IntoIterator<Item = &'a SectionAnchor>,
    {
        let crossed = anchors
            .into_iter()
            .filter(|anchor| anchor.top - scroll_y <= self.activation_offset)
            .last();

        if let Some(anchor) = crossed
            && anchor.key != self.active
        {
            tracing::debug!(from = %self.active, to = %anchor.key, scroll_y, "active section changed");
            self.active = anchor.key.clone();
        }
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> Vec<SectionAnchor> {
        vec![
            SectionAnchor::new("a", 0.0),
            SectionAnchor::new("b", 500.0),
            SectionAnchor::new("c", 1000.0),
        ]
    }

    fn tracker() -> ActiveSectionTracker {
        ActiveSectionTracker::new(
            SectionKey::from("a"),
            ActiveSectionTracker::DEFAULT_ACTIVATION_OFFSET,
        )
    }

    #[test]
    fn picks_last_crossed_section() {
        let anchors = anchors();
        let mut t = tracker();
        assert_eq!(t.recompute(0.0, &anchors), "a");
        assert_eq!(t.recompute(450.0, &anchors), "b");
        assert_eq!(t.recompute(1050.0, &anchors), "c");
        assert_eq!(t.recompute(2000.0, &anchors), "c");
    }

    #[test]
    fn activation_line_is_inclusive() {
        let anchors = anchors();
        let mut t = tracker();
        assert_eq!(t.recompute(399.0, &anchors), "a");
        assert_eq!(t.recompute(400.0, &anchors), "b");
    }

    #[test]
    fn scrolling_back_up_reactivates_earlier_section() {
        let anchors = anchors();
        let mut t = tracker();
        t.recompute(1200.0, &anchors);
        assert_eq!(t.recompute(100.0, &anchors), "a");
    }

    #[test]
    fn keeps_previous_when_nothing_crossed() {
        let anchors = vec![SectionAnchor::new("x", 800.0), SectionAnchor::new("y", 1600.0)];
        let mut t = tracker();
        assert_eq!(t.recompute(0.0, &anchors), "a");

        t.recompute(1600.0, &anchors);
        assert_eq!(t.active(), "y");
        assert_eq!(t.recompute(1600.0, &anchors), "y");
    }

    #[test]
    fn empty_anchor_list_is_sticky() {
        let mut t = tracker();
        assert_eq!(t.recompute(5000.0, &[]), "a");
    }
}
