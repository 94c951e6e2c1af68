use folio_protocol::{ScrollRequest, SectionAnchor, SectionKey, Stagger};

use super::active_section::ActiveSectionTracker;

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLink {
    pub key: SectionKey,
    pub label: String,
}

// Mobile menu items slide in one after another while the menu opens.
const MENU_STAGGER: Stagger = Stagger::new(0, 50);

/// Fixed navigation bar: active-section highlight, the solid background
/// once the page is scrolled, and the mobile menu.
#[derive(Debug, Clone)]
pub struct NavigationBar {
    links: Vec<NavLink>,
    tracker: ActiveSectionTracker,
    scrolled_after: f64,
    scrolled: bool,
    menu_open: bool,
}

impl NavigationBar {
    /// Returns `None` when there are no links to show.
    pub fn new(links: Vec<NavLink>, activation_offset: f64, scrolled_after: f64) -> Option<Self> {
        let first = links.first()?.key.clone();
        Some(Self {
            links,
            tracker: ActiveSectionTracker::new(first, activation_offset),
            scrolled_after,
            scrolled: false,
            menu_open: false,
        })
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active(&self) -> &SectionKey {
        self.tracker.active()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.tracker.active() == key
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// React to a scroll event. Only sections listed in the bar take part
    /// in the active-section scan.
    pub fn on_scroll(&mut self, scroll_y: f64, anchors: &[SectionAnchor]) -> &SectionKey {
        self.scrolled = scroll_y > self.scrolled_after;
        let links = &self.links;
        self.tracker.recompute(
            scroll_y,
            anchors
                .iter()
                .filter(|anchor| links.iter().any(|link| link.key == anchor.key)),
        )
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// A link was clicked: close the menu and ask the host to scroll to the
    /// section. Unknown keys are ignored.
    pub fn navigate(&mut self, key: &str) -> Option<ScrollRequest> {
        let link = self.links.iter().find(|link| link.key == key)?;
        self.menu_open = false;
        Some(ScrollRequest::Section {
            key: link.key.clone(),
        })
    }

    /// Transition delay of the `index`th mobile menu item.
    pub fn menu_item_delay_ms(&self, index: usize) -> u32 {
        if self.menu_open {
            MENU_STAGGER.delay_ms(index)
        } else {
            0
        }
    }
}

/// Footer button that returns to the top once the page is scrolled far
/// enough.
#[derive(Debug, Clone)]
pub struct ScrollToTop {
    show_after: f64,
    visible: bool,
}

impl ScrollToTop {
    pub fn new(show_after: f64) -> Self {
        Self {
            show_after,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.visible = scroll_y > self.show_after;
    }

    pub fn click(&self) -> ScrollRequest {
        ScrollRequest::Offset { top: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(key: &str) -> NavLink {
        NavLink {
            key: SectionKey::from(key),
            label: key.to_uppercase(),
        }
    }

    fn nav() -> NavigationBar {
        NavigationBar::new(vec![link("home"), link("skills"), link("contact")], 100.0, 50.0)
            .unwrap()
    }

    #[test]
    fn needs_at_least_one_link() {
        assert!(NavigationBar::new(Vec::new(), 100.0, 50.0).is_none());
    }

    #[test]
    fn first_link_is_active_initially() {
        let nav = nav();
        assert_eq!(nav.active(), "home");
        assert!(nav.is_active("home"));
        assert!(!nav.is_scrolled());
    }

    #[test]
    fn scrolled_flag_follows_threshold() {
        let mut nav = nav();
        nav.on_scroll(50.0, &[]);
        assert!(!nav.is_scrolled());
        nav.on_scroll(51.0, &[]);
        assert!(nav.is_scrolled());
        nav.on_scroll(0.0, &[]);
        assert!(!nav.is_scrolled());
    }

    #[test]
    fn sections_outside_the_bar_are_not_highlighted() {
        let mut nav = nav();
        let anchors = [
            SectionAnchor::new("home", 0.0),
            SectionAnchor::new("skills", 800.0),
            SectionAnchor::new("testimonials", 1600.0),
            SectionAnchor::new("contact", 2400.0),
        ];
        assert_eq!(nav.on_scroll(1700.0, &anchors), "skills");
        assert_eq!(nav.on_scroll(2400.0, &anchors), "contact");
    }

    #[test]
    fn navigate_closes_menu_and_requests_scroll() {
        let mut nav = nav();
        nav.toggle_menu();
        assert!(nav.is_menu_open());

        let request = nav.navigate("contact");
        assert_eq!(
            request,
            Some(ScrollRequest::Section {
                key: SectionKey::from("contact")
            })
        );
        assert!(!nav.is_menu_open());
        assert_eq!(nav.navigate("nowhere"), None);
    }

    #[test]
    fn menu_items_stagger_only_while_open() {
        let mut nav = nav();
        assert_eq!(nav.menu_item_delay_ms(3), 0);
        nav.toggle_menu();
        assert_eq!(nav.menu_item_delay_ms(0), 0);
        assert_eq!(nav.menu_item_delay_ms(3), 150);
    }

    #[test]
    fn scroll_to_top_appears_past_threshold() {
        let mut button = ScrollToTop::new(400.0);
        button.on_scroll(400.0);
        assert!(!button.is_visible());
        button.on_scroll(401.0);
        assert!(button.is_visible());
        assert_eq!(button.click(), ScrollRequest::Offset { top: 0.0 });
    }
}
