//! Lifecycle contract shared by the page hooks
//!
//! The page calls `attach` once when the element mounts, `update` whenever
//! the server re-renders it and `detach` when it is removed. `detach` must
//! release everything `attach` acquired: timers, created elements and
//! listeners.

pub trait Hook {
    /// Acquire resources and start timers. `now_ms` seeds the virtual clock.
    fn attach(&mut self, now_ms: f64);

    /// The element was patched by the server
    fn update(&mut self) {}

    /// Release everything acquired since `attach`
    fn detach(&mut self);
}
