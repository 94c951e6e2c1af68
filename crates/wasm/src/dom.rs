use std::rc::Rc;

use folio_core::visibility::{
    IntersectionCallback, IntersectionEntry, IntersectionObserver, ObservationHandle, Threshold,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, IntersectionObserverEntry, IntersectionObserverInit};

use crate::retire;

pub fn document() -> Option<web_sys::Document> {
    web_sys::window()?.document()
}

/// Intersection source backed by the browser's `IntersectionObserver`.
///
/// Each subscription gets its own observer so it can be disconnected on
/// its own. `notify` runs after every delivered batch so the page can
/// re-render.
pub struct DomObserver {
    supported: bool,
    notify: Rc<dyn Fn()>,
}

impl DomObserver {
    pub fn new(notify: Rc<dyn Fn()>) -> Self {
        let supported = web_sys::window().is_some_and(|window| {
            js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
                .unwrap_or(false)
        });
        if !supported {
            web_sys::console::warn_1(
                &"folio: IntersectionObserver missing, sections are shown immediately".into(),
            );
        }
        Self { supported, notify }
    }
}

impl IntersectionObserver for DomObserver {
    type Element = Element;
    type Handle = DomObservation;

    fn subscribe(
        &mut self,
        element: &Element,
        threshold: Threshold,
        mut callback: IntersectionCallback,
    ) -> Option<DomObservation> {
        if !self.supported {
            return None;
        }

        let notify = Rc::clone(&self.notify);
        let closure = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                callback(IntersectionEntry::new(
                    entry.intersection_ratio(),
                    entry.is_intersecting(),
                ));
            }
            notify();
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold.get()));
        let observer = match web_sys::IntersectionObserver::new_with_options(
            closure.as_ref().unchecked_ref(),
            &options,
        ) {
            Ok(observer) => observer,
            Err(err) => {
                web_sys::console::warn_2(&"folio: could not observe section".into(), &err);
                return None;
            }
        };
        observer.observe(element);

        Some(DomObservation {
            observer: Some(observer),
            closure: Some(closure),
        })
    }
}

/// A live browser observation of one element.
pub struct DomObservation {
    observer: Option<web_sys::IntersectionObserver>,
    closure: Option<Closure<dyn FnMut(js_sys::Array)>>,
}

impl ObservationHandle for DomObservation {
    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        // Disconnecting usually happens inside this very callback.
        if let Some(closure) = self.closure.take() {
            retire(closure);
        }
    }
}

impl Drop for DomObservation {
    fn drop(&mut self) {
        self.disconnect();
    }
}
