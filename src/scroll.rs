//! Keeps a growing log pinned to its newest line

use crate::hook::Hook;
use crate::platform::Scroller;

pub struct ScrollPin<E: Scroller> {
    el: E,
}

impl<E: Scroller> ScrollPin<E> {
    pub fn new(el: E) -> Self {
        Self { el }
    }

    pub fn element(&self) -> &E {
        &self.el
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.el
    }

    fn pin(&mut self) {
        let bottom = self.el.scroll_height();
        self.el.set_scroll_top(bottom);
    }
}

impl<E: Scroller> Hook for ScrollPin<E> {
    fn attach(&mut self, _now_ms: f64) {
        self.pin();
    }

    /// The server appended content
    fn update(&mut self) {
        self.pin();
    }

    /// Holds no timers or listeners
    fn detach(&mut self) {}
}
