mod dom;
mod timers;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_core::FolioConfig;
use folio_core::page::Page;
use folio_core::pointer::parallax_offset;
use folio_core::schedule::TimerToken;
use folio_core::widgets::Field;
use folio_protocol::{Point, Rect, ScrollRequest, SectionAnchor, Theme};
use wasm_bindgen::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions};

use dom::{DomObservation, DomObserver};
use timers::{WindowScheduler, WindowTimer};

type DomPage = Page<DomObservation, WindowTimer>;
type Listener = Rc<RefCell<Option<js_sys::Function>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Drop a JS closure once the current call stack has unwound. Observers and
/// timers are often released from inside their own callback.
pub(crate) fn retire<C: 'static>(closure: C) {
    wasm_bindgen_futures::spawn_local(async move {
        drop(closure);
    });
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn notify(listener: &Listener) {
    let callback = listener.borrow().clone();
    if let Some(callback) = callback
        && let Err(err) = callback.call0(&JsValue::NULL)
    {
        web_sys::console::error_2(&"folio: change listener failed".into(), &err);
    }
}

fn parse_field(name: &str) -> Result<Field, JsError> {
    match name {
        "name" => Ok(Field::Name),
        "email" => Ok(Field::Email),
        "message" => Ok(Field::Message),
        _ => Err(JsError::new(&format!("unknown contact field: {name}"))),
    }
}

fn parse_theme(name: &str) -> Result<Theme, JsError> {
    match name {
        "dark" => Ok(Theme::Dark),
        "light" => Ok(Theme::Light),
        _ => Err(JsError::new(&format!("unknown theme: {name}"))),
    }
}

/// A mounted portfolio page driven by the browser.
///
/// Sections are looked up by element id. Observers and timers report back
/// on their own; call `on_scroll` from a scroll listener and read
/// `snapshot` whenever the change listener fires.
#[wasm_bindgen]
pub struct FolioPage {
    page: Rc<RefCell<DomPage>>,
    scheduler: WindowScheduler,
    listener: Listener,
}

#[wasm_bindgen]
impl FolioPage {
    /// Mount a page. `config_json` overrides the built-in defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<FolioPage, JsError> {
        let config = match config_json {
            Some(json) => FolioConfig::from_json(json.as_bytes()).map_err(js_err)?,
            None => FolioConfig::default(),
        };
        let document = dom::document().ok_or_else(|| JsError::new("no document"))?;

        let listener: Listener = Rc::default();
        let slot: Rc<RefCell<Weak<RefCell<DomPage>>>> = Rc::default();

        let dispatch = {
            let slot = Rc::clone(&slot);
            let listener = Rc::clone(&listener);
            move |token: TimerToken| {
                let Some(page) = slot.borrow().upgrade() else {
                    return;
                };
                let used = match page.try_borrow_mut() {
                    Ok(mut page) => page.on_timer(token),
                    Err(_) => false,
                };
                if used {
                    notify(&listener);
                }
            }
        };
        let mut scheduler = WindowScheduler::new(Rc::new(dispatch));

        let mut observer = DomObserver::new({
            let listener = Rc::clone(&listener);
            Rc::new(move || notify(&listener))
        });

        let page = Page::mount(&config, &mut observer, &mut scheduler, |key| {
            document.get_element_by_id(key.as_str())
        })
        .map_err(js_err)?;
        let page = Rc::new(RefCell::new(page));
        *slot.borrow_mut() = Rc::downgrade(&page);

        Ok(Self {
            page,
            scheduler,
            listener,
        })
    }

    /// Register a callback invoked after timer- or observer-driven changes.
    pub fn set_on_change(&mut self, callback: js_sys::Function) {
        *self.listener.borrow_mut() = Some(callback);
    }

    /// Current page state as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.page.borrow().snapshot()).map_err(js_err)
    }

    /// Measure sections and update the navigation state. Returns the active
    /// section key.
    pub fn on_scroll(&mut self) -> Result<String, JsError> {
        let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("no document"))?;
        let scroll_y = window
            .scroll_y()
            .map_err(|_| JsError::new("scroll position unavailable"))?;

        let mut page = self.page.borrow_mut();
        let anchors: Vec<SectionAnchor> = page
            .section_keys()
            .filter_map(|key| {
                let element = document.get_element_by_id(key.as_str())?;
                let top = element.get_bounding_client_rect().top() + scroll_y;
                Some(SectionAnchor::new(key.clone(), top))
            })
            .collect();
        Ok(page.on_scroll(scroll_y, &anchors).to_string())
    }

    pub fn next(&mut self) {
        self.page.borrow_mut().carousel_mut().next();
    }

    pub fn prev(&mut self) {
        self.page.borrow_mut().carousel_mut().prev();
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), JsError> {
        self.page
            .borrow_mut()
            .carousel_mut()
            .go_to(index)
            .map_err(js_err)
    }

    pub fn pointer_enter(&mut self) {
        self.page.borrow_mut().carousel_pointer_enter();
    }

    pub fn pointer_leave(&mut self) {
        self.page
            .borrow_mut()
            .carousel_pointer_leave(&mut self.scheduler);
    }

    /// Returns the new theme name.
    pub fn toggle_theme(&mut self) -> String {
        self.page.borrow_mut().toggle_theme().as_str().to_string()
    }

    /// Apply a theme the host restored, e.g. from local storage.
    pub fn set_theme(&mut self, theme: &str) -> Result<(), JsError> {
        let theme = parse_theme(theme)?;
        self.page.borrow_mut().set_theme(theme);
        Ok(())
    }

    pub fn toggle_menu(&mut self) {
        self.page.borrow_mut().nav_mut().toggle_menu();
    }

    /// Handle a nav link click: close the menu and smooth-scroll.
    pub fn navigate(&mut self, key: &str) -> Result<(), JsError> {
        let request = self.page.borrow_mut().nav_mut().navigate(key);
        match request {
            Some(request) => perform_scroll(&request),
            None => Err(JsError::new(&format!("unknown section: {key}"))),
        }
    }

    pub fn scroll_to_top(&self) -> Result<(), JsError> {
        let request = self.page.borrow().scroll_to_top().click();
        perform_scroll(&request)
    }

    pub fn set_field(&mut self, field: &str, value: String) -> Result<(), JsError> {
        let field = parse_field(field)?;
        self.page
            .borrow_mut()
            .contact_mut()
            .set_field(field, value)
            .map_err(js_err)
    }

    pub fn focus(&mut self, field: &str) -> Result<(), JsError> {
        let field = parse_field(field)?;
        self.page.borrow_mut().contact_mut().focus(field);
        Ok(())
    }

    pub fn blur(&mut self) {
        self.page.borrow_mut().contact_mut().blur();
    }

    pub fn submit(&mut self) -> Result<(), JsError> {
        self.page
            .borrow_mut()
            .contact_mut()
            .submit(&mut self.scheduler)
            .map_err(js_err)
    }

    /// Pointer moved over the contact form whose client rect is given.
    pub fn form_pointer_moved(&mut self, x: f64, y: f64, left: f64, top: f64, width: f64, height: f64) {
        self.page
            .borrow_mut()
            .contact_mut()
            .pointer_moved(Point::new(x, y), Rect::new(left, top, width, height));
    }

    /// Parallax shift `[dx, dy]` of the hero backdrop.
    pub fn hero_parallax(x: f64, y: f64, left: f64, top: f64, width: f64, height: f64) -> Vec<f64> {
        let offset = parallax_offset(Point::new(x, y), Rect::new(left, top, width, height));
        vec![offset.x, offset.y]
    }
}

fn perform_scroll(request: &ScrollRequest) -> Result<(), JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    match request {
        ScrollRequest::Section { key } => {
            let element = window
                .document()
                .and_then(|d| d.get_element_by_id(key.as_str()))
                .ok_or_else(|| JsError::new(&format!("no element for section {key}")))?;
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
        ScrollRequest::Offset { top } => {
            let options = ScrollToOptions::new();
            options.set_top(*top);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    }
    Ok(())
}
