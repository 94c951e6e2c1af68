use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEventKind};
use folio_core::FolioConfig;
use folio_core::page::Page;
use folio_core::schedule::{QueuedTimer, TimerQueue};
use folio_core::visibility::{ViewportObservation, ViewportObserver};
use folio_core::widgets::Field;
use folio_protocol::{Rect, ScrollRequest, SectionAnchor, SectionKey};

pub type TuiPage = Page<ViewportObservation, QueuedTimer>;

/// Page pixels per terminal row.
pub const ROW_PX: f64 = 20.0;
/// Every section is laid out this many rows tall.
pub const SECTION_ROWS: u16 = 16;
const SECTION_PX: f64 = SECTION_ROWS as f64 * ROW_PX;
const SCROLL_STEP: u16 = 3;

fn section_rect(index: usize) -> Rect {
    Rect::new(0.0, index as f64 * SECTION_PX, 1200.0, SECTION_PX)
}

pub struct Section {
    pub key: SectionKey,
    pub label: String,
}

/// Terminal host state: the mounted page plus the fake browser it runs in.
pub struct App {
    pub page: TuiPage,
    observer: ViewportObserver,
    queue: TimerQueue,
    pub sections: Vec<Section>,
    viewport_rows: u16,
    scroll_row: u16,
    hovering_carousel: bool,
    menu_opened_at: Option<Duration>,
    pub status: Option<String>,
}

impl App {
    pub fn new(config: &FolioConfig, viewport_rows: u16) -> Result<Self> {
        let mut observer = ViewportObserver::new(f64::from(viewport_rows) * ROW_PX);
        let mut queue = TimerQueue::new();
        let sections: Vec<Section> = config
            .sections
            .iter()
            .map(|spec| Section {
                key: spec.key.clone(),
                label: spec.label.clone(),
            })
            .collect();

        let page = Page::mount(config, &mut observer, &mut queue, |key| {
            sections.iter().position(|s| &s.key == key).map(section_rect)
        })?;

        let mut app = Self {
            page,
            observer,
            queue,
            sections,
            viewport_rows,
            scroll_row: 0,
            hovering_carousel: false,
            menu_opened_at: None,
            status: None,
        };
        app.scroll_to_row(0);
        Ok(app)
    }

    pub fn scroll_row(&self) -> u16 {
        self.scroll_row
    }

    pub fn total_rows(&self) -> u16 {
        u16::try_from(self.sections.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(SECTION_ROWS)
    }

    fn anchors(&self) -> Vec<SectionAnchor> {
        self.sections
            .iter()
            .enumerate()
            .map(|(i, s)| SectionAnchor::new(s.key.clone(), i as f64 * SECTION_PX))
            .collect()
    }

    pub fn scroll_to_row(&mut self, row: u16) {
        let max = self.total_rows().saturating_sub(self.viewport_rows);
        self.scroll_row = row.min(max);
        let scroll_y = f64::from(self.scroll_row) * ROW_PX;
        self.observer.scroll_to(scroll_y);
        let anchors = self.anchors();
        self.page.on_scroll(scroll_y, &anchors);
    }

    pub fn resize(&mut self, viewport_rows: u16) {
        self.viewport_rows = viewport_rows;
        self.observer.resize(f64::from(viewport_rows) * ROW_PX);
        self.scroll_to_row(self.scroll_row);
    }

    /// Advance the virtual clock and route every timer that fired.
    pub fn tick(&mut self, elapsed: Duration) {
        for token in self.queue.advance(elapsed) {
            self.page.on_timer(token);
        }
    }

    /// Time since the mobile menu opened, `None` while it is closed.
    pub fn menu_open_for(&self) -> Option<Duration> {
        self.menu_opened_at
            .map(|opened| self.queue.now().saturating_sub(opened))
    }

    fn toggle_menu(&mut self) {
        self.page.nav_mut().toggle_menu();
        self.sync_menu_clock();
    }

    fn sync_menu_clock(&mut self) {
        self.menu_opened_at = match (self.page.nav().is_menu_open(), self.menu_opened_at) {
            (true, None) => Some(self.queue.now()),
            (true, opened) => opened,
            (false, _) => None,
        };
    }

    fn perform(&mut self, request: ScrollRequest) {
        let row = match request {
            ScrollRequest::Section { key } => {
                let Some(index) = self.sections.iter().position(|s| s.key == key) else {
                    return;
                };
                u16::try_from(index)
                    .unwrap_or(u16::MAX)
                    .saturating_mul(SECTION_ROWS)
            }
            ScrollRequest::Offset { top } => (top / ROW_PX) as u16,
        };
        self.scroll_to_row(row);
    }

    fn section_at(&self, page_row: u16) -> Option<&Section> {
        self.sections.get(usize::from(page_row / SECTION_ROWS))
    }

    /// Handle a key press. Returns `false` when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if let Some(field) = self.page.contact().focused() {
            self.edit_field(field, key.code);
            return true;
        }

        match key.code {
            KeyCode::Esc if self.page.nav().is_menu_open() => self.toggle_menu(),
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Up => self.scroll_to_row(self.scroll_row.saturating_sub(SCROLL_STEP)),
            KeyCode::Down => self.scroll_to_row(self.scroll_row.saturating_add(SCROLL_STEP)),
            KeyCode::PageUp => {
                self.scroll_to_row(self.scroll_row.saturating_sub(self.viewport_rows))
            }
            KeyCode::PageDown => {
                self.scroll_to_row(self.scroll_row.saturating_add(self.viewport_rows))
            }
            KeyCode::Left | KeyCode::Char('h') => self.page.carousel_mut().prev(),
            KeyCode::Right | KeyCode::Char('l') => self.page.carousel_mut().next(),
            KeyCode::Char('p') => {
                if self.page.carousel().is_auto_playing() {
                    self.page.carousel_pointer_enter();
                } else {
                    self.page.carousel_pointer_leave(&mut self.queue);
                }
            }
            KeyCode::Char('t') => {
                self.page.toggle_theme();
            }
            KeyCode::Char('m') => self.toggle_menu(),
            KeyCode::Char('g') => {
                if self.page.scroll_to_top().is_visible() {
                    let request = self.page.scroll_to_top().click();
                    self.perform(request);
                }
            }
            KeyCode::Tab => {
                self.page.contact_mut().focus(Field::Name);
                self.perform(ScrollRequest::Section {
                    key: SectionKey::from("contact"),
                });
            }
            KeyCode::Char(c @ '1'..='9') => self.pick(c),
            _ => {}
        }
        true
    }

    /// Digits follow the open menu's links, otherwise jump the carousel.
    fn pick(&mut self, digit: char) {
        let index = digit as usize - '1' as usize;
        if self.page.nav().is_menu_open() {
            let Some(key) = self.page.nav().links().get(index).map(|l| l.key.clone()) else {
                return;
            };
            if let Some(request) = self.page.nav_mut().navigate(&key) {
                self.sync_menu_clock();
                self.perform(request);
            }
        } else if let Err(err) = self.page.carousel_mut().go_to(index) {
            tracing::debug!(%err, "ignored carousel jump");
        }
    }

    fn edit_field(&mut self, field: Field, code: KeyCode) {
        let contact = self.page.contact_mut();
        match code {
            KeyCode::Esc => contact.blur(),
            KeyCode::Tab => {
                let at = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
                contact.focus(Field::ALL[(at + 1) % Field::ALL.len()]);
            }
            KeyCode::Backspace => contact.backspace(field),
            KeyCode::Enter => {
                self.status = Some(match contact.submit(&mut self.queue) {
                    Ok(()) => "Sending message...".to_string(),
                    Err(err) => err.to_string(),
                });
            }
            KeyCode::Char(c) => {
                if let Err(err) = contact.type_char(field, c) {
                    self.status = Some(err.to_string());
                }
            }
            _ => {}
        }
    }

    /// `row` is relative to the page viewport.
    pub fn on_mouse(&mut self, kind: MouseEventKind, row: u16) {
        match kind {
            MouseEventKind::ScrollDown => {
                self.scroll_to_row(self.scroll_row.saturating_add(SCROLL_STEP))
            }
            MouseEventKind::ScrollUp => {
                self.scroll_to_row(self.scroll_row.saturating_sub(SCROLL_STEP))
            }
            MouseEventKind::Moved => {
                let over = self
                    .section_at(self.scroll_row.saturating_add(row))
                    .is_some_and(|s| s.key == "certifications");
                if over != self.hovering_carousel {
                    self.hovering_carousel = over;
                    if over {
                        self.page.carousel_pointer_enter();
                    } else {
                        self.page.carousel_pointer_leave(&mut self.queue);
                    }
                }
            }
            _ => {}
        }
    }
}
