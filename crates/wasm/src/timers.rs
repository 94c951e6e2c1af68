use std::rc::Rc;
use std::time::Duration;

use folio_core::schedule::{Scheduler, TimerHandle, TimerToken};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::retire;

/// Scheduler over `window.setInterval` / `window.setTimeout`.
///
/// Fired timers call `dispatch` with their token; the owner routes it into
/// the page.
pub struct WindowScheduler {
    dispatch: Rc<dyn Fn(TimerToken)>,
    next_token: u64,
}

impl WindowScheduler {
    pub fn new(dispatch: Rc<dyn Fn(TimerToken)>) -> Self {
        Self {
            dispatch,
            next_token: 0,
        }
    }

    fn arm(&mut self, delay: Duration, repeat: bool) -> WindowTimer {
        let token = TimerToken::new(self.next_token);
        self.next_token += 1;

        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::<dyn FnMut()>::new(move || dispatch(token));
        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let id = web_sys::window().and_then(|window| {
            let callback = closure.as_ref().unchecked_ref();
            let armed = if repeat {
                window.set_interval_with_callback_and_timeout_and_arguments_0(callback, ms)
            } else {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms)
            };
            armed
                .map_err(|err| web_sys::console::error_2(&"folio: timer failed".into(), &err))
                .ok()
        });

        WindowTimer {
            token,
            id,
            repeat,
            closure: Some(closure),
        }
    }
}

impl Scheduler for WindowScheduler {
    type Handle = WindowTimer;

    fn every(&mut self, interval: Duration) -> WindowTimer {
        self.arm(interval, true)
    }

    fn after(&mut self, delay: Duration) -> WindowTimer {
        self.arm(delay, false)
    }
}

pub struct WindowTimer {
    token: TimerToken,
    id: Option<i32>,
    repeat: bool,
    closure: Option<Closure<dyn FnMut()>>,
}

impl TimerHandle for WindowTimer {
    fn token(&self) -> TimerToken {
        self.token
    }

    fn cancel(&mut self) {
        if let (Some(id), Some(window)) = (self.id.take(), web_sys::window()) {
            if self.repeat {
                window.clear_interval_with_handle(id);
            } else {
                window.clear_timeout_with_handle(id);
            }
        }
        // A one-shot is cancelled from inside its own callback when it
        // completes.
        if let Some(closure) = self.closure.take() {
            retire(closure);
        }
    }
}

impl Drop for WindowTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
