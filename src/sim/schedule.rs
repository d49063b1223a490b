//! Virtual timer table
//!
//! Every interval and timeout the arena owns lives here instead of in
//! browser timers, so teardown is a single `clear` and tests can drive time
//! by hand. Timers fire in `(due, id)` order; ids grow monotonically, so two
//! timers due at the same instant fire in creation order.

use std::collections::BTreeMap;

use super::projectile::ProjectileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Identifies a transient feedback element (spurt or drip)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectId(pub u32);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Target animation tick
    TargetStep,
    /// Spawn cadence while armed
    Fire,
    /// Move one projectile
    ProjectileStep(ProjectileId),
    /// Hard lifetime of one projectile
    ProjectileExpiry(ProjectileId),
    /// Remove a projectile element that struck something
    BulletFade(ProjectileId),
    /// Remove a transient feedback element
    EffectExpiry(EffectId),
    /// Drop the flash class from the target
    FlashOff,
    /// Drop the shake class from the surface
    ShakeOff,
}

#[derive(Debug, Clone)]
struct Timer {
    kind: TimerKind,
    due_ms: f64,
    /// `Some` for intervals
    period_ms: Option<f64>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: f64,
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new(now_ms: f64) -> Self {
        Self {
            now_ms,
            next_id: 1,
            timers: BTreeMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    fn insert(&mut self, kind: TimerKind, delay_ms: f64, period_ms: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                kind,
                due_ms: self.now_ms + delay_ms,
                period_ms,
            },
        );
        id
    }

    /// Repeat every `period_ms`, first firing one period from now
    pub fn interval(&mut self, kind: TimerKind, period_ms: f64) -> TimerId {
        // Zero periods would spin forever inside one advance
        let period_ms = period_ms.max(1.0);
        self.insert(kind, period_ms, Some(period_ms))
    }

    /// Fire once after `delay_ms`
    pub fn timeout(&mut self, kind: TimerKind, delay_ms: f64) -> TimerId {
        self.insert(kind, delay_ms.max(0.0), None)
    }

    /// Cancel a timer; unknown or already fired ids are ignored
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Count live timers matching a predicate
    pub fn count(&self, pred: impl Fn(&TimerKind) -> bool) -> usize {
        self.timers.values().filter(|t| pred(&t.kind)).count()
    }

    /// Drop every timer
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Skip wall-clock gaps longer than `max_lag_ms`
    ///
    /// Pending deadlines shift forward by the excess, as if the clock had
    /// been paused, so at most `max_lag_ms` worth of ticks are replayed.
    pub fn rebase(&mut self, wall_ms: f64, max_lag_ms: f64) {
        let excess = wall_ms - self.now_ms - max_lag_ms;
        if excess > 0.0 {
            log::debug!("Skipping {excess:.0}ms of stalled time");
            self.now_ms += excess;
            for timer in self.timers.values_mut() {
                timer.due_ms += excess;
            }
        }
    }

    /// Pop the earliest timer due at or before `until_ms`
    ///
    /// The clock moves to the timer's due time. Intervals are re-armed before
    /// returning, so the handler may cancel them.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(TimerId, TimerKind)> {
        let (&id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(ia, a), (ib, b)| a.due_ms.total_cmp(&b.due_ms).then(ia.cmp(ib)))?;

        let timer = self.timers.get_mut(&id)?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        let kind = timer.kind;
        match timer.period_ms {
            Some(period) => timer.due_ms += period,
            None => {
                self.timers.remove(&id);
            }
        }
        Some((id, kind))
    }

    /// Move the clock forward once every due timer has been handled
    pub fn settle(&mut self, until_ms: f64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
