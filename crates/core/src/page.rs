use folio_protocol::{CardPlacement, Point, Reveal, SectionAnchor, SectionKey, Stagger, Theme};
use serde::Serialize;
use thiserror::Error;

use crate::config::{Certification, ConfigError, ContactChannel, Experience, FolioConfig};
use crate::pointer::hero_scroll_shift;
use crate::schedule::{Scheduler, TimerHandle, TimerToken};
use crate::visibility::{IntersectionObserver, ObservationHandle, VisibilityTrigger};
use crate::widgets::{
    Carousel, CarouselError, ContactFields, ContactForm, Field, NavLink, NavigationBar,
    ScrollToTop,
};

/// Hidden sections sit this far below their resting place.
const REVEAL_ENTER_PX: f64 = 32.0;
const CHANNEL_STAGGER: Stagger = Stagger::new(300, 100);
const TIMELINE_STAGGER: Stagger = Stagger::new(0, 200);

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Carousel(#[from] CarouselError),
    #[error("no section is listed in the navigation bar")]
    NoNavLinks,
}

struct SectionReveal<V: ObservationHandle> {
    key: SectionKey,
    trigger: VisibilityTrigger<V>,
}

/// One mounted portfolio page.
///
/// Owns a reveal trigger per section plus every interactive widget. Hosts
/// forward scroll, timer and input events; all reads are snapshots of the
/// current state. Dropping the page releases observers and timers.
pub struct Page<V: ObservationHandle, T: TimerHandle> {
    sections: Vec<SectionReveal<V>>,
    nav: NavigationBar,
    scroll_top: ScrollToTop,
    certifications: Vec<Certification>,
    experiences: Vec<Experience>,
    contact_channels: Vec<ContactChannel>,
    carousel: Carousel<T>,
    contact: ContactForm<T>,
    theme: Theme,
    scroll_y: f64,
}

impl<V, T> Page<V, T>
where
    V: ObservationHandle + 'static,
    T: TimerHandle,
{
    /// Mount the page described by `config`.
    ///
    /// `locate` resolves a section key to the element the host rendered for
    /// it. Sections without an element stay hidden.
    pub fn mount<O, S, F>(
        config: &FolioConfig,
        observer: &mut O,
        scheduler: &mut S,
        mut locate: F,
    ) -> Result<Self, PageError>
    where
        O: IntersectionObserver<Handle = V>,
        S: Scheduler<Handle = T>,
        F: FnMut(&SectionKey) -> Option<O::Element>,
    {
        config.validate()?;

        let sections = config
            .sections
            .iter()
            .map(|spec| {
                let trigger = if spec.reveal_on_mount {
                    VisibilityTrigger::revealed(spec.threshold)
                } else {
                    match locate(&spec.key) {
                        Some(element) => {
                            VisibilityTrigger::observe(observer, &element, spec.threshold)
                        }
                        None => {
                            tracing::warn!(section = %spec.key, "section has no element, it stays hidden");
                            VisibilityTrigger::detached(spec.threshold)
                        }
                    }
                };
                SectionReveal {
                    key: spec.key.clone(),
                    trigger,
                }
            })
            .collect();

        let links = config
            .nav_sections()
            .map(|spec| NavLink {
                key: spec.key.clone(),
                label: spec.label.clone(),
            })
            .collect();
        let nav = NavigationBar::new(links, config.activation_offset_px, config.nav_scrolled_px)
            .ok_or(PageError::NoNavLinks)?;

        let mut carousel = Carousel::new(config.certifications.len(), config.autoplay_interval())?;
        carousel.start(scheduler);

        tracing::info!(
            sections = config.sections.len(),
            certifications = config.certifications.len(),
            "page mounted"
        );

        Ok(Self {
            sections,
            nav,
            scroll_top: ScrollToTop::new(config.scroll_top_px),
            certifications: config.certifications.clone(),
            experiences: config.experiences.clone(),
            contact_channels: config.contact_channels.clone(),
            carousel,
            contact: ContactForm::new(config.message_limit, config.submit_delay()),
            theme: Theme::default(),
            scroll_y: 0.0,
        })
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// React to a scroll event with freshly measured section anchors.
    pub fn on_scroll(&mut self, scroll_y: f64, anchors: &[SectionAnchor]) -> &SectionKey {
        self.scroll_y = scroll_y;
        self.scroll_top.on_scroll(scroll_y);
        self.nav.on_scroll(scroll_y, anchors)
    }

    /// Route a fired timer to its widget. Returns whether anything used it.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        self.carousel.on_timer(token) || self.contact.on_timer(token)
    }

    pub fn section_keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.sections.iter().map(|s| &s.key)
    }

    /// Reveal state of a section; unknown sections are hidden.
    pub fn reveal(&self, key: &str) -> Reveal {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .map_or(Reveal::Hidden, |s| s.trigger.reveal())
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.reveal(key) == Reveal::Shown
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        tracing::debug!(theme = self.theme.as_str(), "theme toggled");
        self.theme
    }

    pub fn nav(&self) -> &NavigationBar {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut NavigationBar {
        &mut self.nav
    }

    pub fn scroll_to_top(&self) -> &ScrollToTop {
        &self.scroll_top
    }

    pub fn certifications(&self) -> &[Certification] {
        &self.certifications
    }

    pub fn current_certification(&self) -> &Certification {
        &self.certifications[self.carousel.current()]
    }

    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    pub fn contact_channels(&self) -> &[ContactChannel] {
        &self.contact_channels
    }

    pub fn carousel(&self) -> &Carousel<T> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<T> {
        &mut self.carousel
    }

    /// Pointer entered the carousel: hold the current card.
    pub fn carousel_pointer_enter(&mut self) {
        self.carousel.pause();
    }

    /// Pointer left the carousel: resume auto-advance.
    pub fn carousel_pointer_leave<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = T>,
    {
        self.carousel.resume(scheduler);
    }

    pub fn contact(&self) -> &ContactForm<T> {
        &self.contact
    }

    pub fn contact_mut(&mut self) -> &mut ContactForm<T> {
        &mut self.contact
    }

    /// Everything a presentation layer needs to draw the page.
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            theme: self.theme,
            theme_toggle_label: self.theme.toggle_label(),
            scroll_y: self.scroll_y,
            hero_shift_y: hero_scroll_shift(self.scroll_y),
            active_section: self.nav.active().clone(),
            nav_scrolled: self.nav.is_scrolled(),
            menu_open: self.nav.is_menu_open(),
            menu_delays_ms: (0..self.nav.links().len())
                .map(|i| self.nav.menu_item_delay_ms(i))
                .collect(),
            show_scroll_top: self.scroll_top.is_visible(),
            reveals: self
                .sections
                .iter()
                .map(|s| {
                    let reveal = s.trigger.reveal();
                    SectionState {
                        key: s.key.clone(),
                        reveal,
                        opacity: reveal.opacity(),
                        translate_y: reveal.translate_y(REVEAL_ENTER_PX),
                    }
                })
                .collect(),
            timeline_delays_ms: (0..self.experiences.len())
                .map(|i| TIMELINE_STAGGER.delay_ms(i))
                .collect(),
            carousel: CarouselSnapshot {
                current: self.carousel.current(),
                auto_playing: self.carousel.is_auto_playing(),
                placements: self.carousel.placements(),
                dot_labels: self
                    .certifications
                    .iter()
                    .map(Certification::short_title)
                    .collect(),
            },
            contact: ContactSnapshot {
                fields: self.contact.fields().clone(),
                focused: self.contact.focused(),
                submitting: self.contact.is_submitting(),
                counter: self.contact.message_counter(),
                spotlight: self.contact.spotlight(),
                message_limit: self.contact.message_limit(),
                channel_delays_ms: (0..self.contact_channels.len())
                    .map(|i| CHANNEL_STAGGER.delay_ms(i))
                    .collect(),
            },
        }
    }
}

impl<V: ObservationHandle, T: TimerHandle> std::fmt::Debug for Page<V, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("sections", &self.sections.len())
            .field("active", self.nav.active())
            .field("carousel", &self.carousel)
            .field("theme", &self.theme)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionState {
    pub key: SectionKey,
    pub reveal: Reveal,
    pub opacity: f64,
    /// Enter offset in px; `0` once shown.
    pub translate_y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CarouselSnapshot {
    pub current: usize,
    pub auto_playing: bool,
    pub placements: Vec<CardPlacement>,
    /// Tooltip for each navigation dot.
    pub dot_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactSnapshot {
    pub fields: ContactFields,
    pub focused: Option<Field>,
    pub submitting: bool,
    pub counter: String,
    pub spotlight: Point,
    pub message_limit: usize,
    /// Enter delay of each contact channel card.
    pub channel_delays_ms: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub theme: Theme,
    pub theme_toggle_label: String,
    pub scroll_y: f64,
    /// Vertical drift of the hero text.
    pub hero_shift_y: f64,
    pub active_section: SectionKey,
    pub nav_scrolled: bool,
    pub menu_open: bool,
    /// Enter delay of each mobile menu item; all zero while closed.
    pub menu_delays_ms: Vec<u32>,
    pub show_scroll_top: bool,
    pub reveals: Vec<SectionState>,
    /// Enter delay of each experience timeline card.
    pub timeline_delays_ms: Vec<u32>,
    pub carousel: CarouselSnapshot,
    pub contact: ContactSnapshot,
}
