use std::time::Duration;

use folio_protocol::CardPlacement;
use thiserror::Error;

use crate::schedule::{Scheduler, TimerHandle, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("carousel needs at least one item")]
    Empty,
    #[error("index {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}

/// A ring of `len` items with one current item and optional auto-advance.
///
/// The item list itself lives with the caller; the carousel only tracks the
/// index. While auto-playing it holds a repeating timer and advances on each
/// of its ticks. Pausing drops the timer, resuming arms a fresh one for a
/// full interval.
pub struct Carousel<H: TimerHandle> {
    len: usize,
    current: usize,
    auto_playing: bool,
    interval: Duration,
    timer: Option<H>,
}

impl<H: TimerHandle> Carousel<H> {
    /// Create a carousel positioned on the first item. Auto-play is on but
    /// no timer runs until [`Carousel::start`].
    pub fn new(len: usize, interval: Duration) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        Ok(Self {
            len,
            current: 0,
            auto_playing: true,
            interval,
            timer: None,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_playing
    }

    /// Token of the armed auto-advance timer, if any.
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.as_ref().map(TimerHandle::token)
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.len;
        tracing::debug!(current = self.current, "carousel advanced");
    }

    pub fn prev(&mut self) {
        self.current = (self.current + self.len - 1) % self.len;
        tracing::debug!(current = self.current, "carousel moved back");
    }

    /// Jump to `index`. Out-of-range indices are rejected and leave the
    /// current item unchanged.
    pub fn go_to(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.len {
            return Err(CarouselError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.current = index;
        tracing::debug!(current = self.current, "carousel jumped");
        Ok(())
    }

    /// Signed shortest distance around the ring from the current item to
    /// `index`, in `(-len/2, len/2]`. An item exactly half way round is
    /// placed on the positive side.
    pub fn relative_offset(&self, index: usize) -> isize {
        let len = self.len as isize;
        let mut raw = (index % self.len) as isize - self.current as isize;
        if 2 * raw > len {
            raw -= len;
        } else if 2 * raw <= -len {
            raw += len;
        }
        raw
    }

    /// Placement of every item, in item order.
    pub fn placements(&self) -> Vec<CardPlacement> {
        (0..self.len)
            .map(|i| CardPlacement::from_offset(i, self.relative_offset(i)))
            .collect()
    }

    /// Arm the auto-advance timer if auto-play is on and none is running.
    pub fn start<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        if self.auto_playing && self.timer.is_none() {
            self.timer = Some(scheduler.every(self.interval));
        }
    }

    /// Stop auto-advancing (pointer entered). No-op when already paused.
    pub fn pause(&mut self) {
        if !self.auto_playing {
            return;
        }
        self.auto_playing = false;
        self.stop_timer();
        tracing::debug!("carousel paused");
    }

    /// Resume auto-advancing (pointer left), restarting the full interval.
    /// No-op when already playing.
    pub fn resume<S>(&mut self, scheduler: &mut S)
    where
        S: Scheduler<Handle = H>,
    {
        if self.auto_playing {
            return;
        }
        self.auto_playing = true;
        self.start(scheduler);
        tracing::debug!("carousel resumed");
    }

    /// Handle a fired timer. Advances only for the live auto-play timer and
    /// reports whether `token` belonged to this carousel.
    pub fn on_timer(&mut self, token: TimerToken) -> bool {
        if self.auto_playing && self.timer_token() == Some(token) {
            self.next();
            true
        } else {
            false
        }
    }

    fn stop_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}

impl<H: TimerHandle> Drop for Carousel<H> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

impl<H: TimerHandle> std::fmt::Debug for Carousel<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("len", &self.len)
            .field("current", &self.current)
            .field("auto_playing", &self.auto_playing)
            .field("timer", &self.timer_token())
            .finish()
    }
}
