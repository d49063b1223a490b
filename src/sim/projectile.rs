//! Projectile kinematics and per-step classification
//!
//! Projectiles move in surface-local pixels (origin at the surface's top-left
//! corner). Hit zones come from live layout in client pixels, so each step
//! shifts the local segment by the surface origin before testing.

use glam::Vec2;

use super::schedule::TimerId;
use super::zone::HitZones;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectileId(pub u32);

/// What happened to a projectile on its latest step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Still flying
    InFlight,
    /// Left the surface; silent cleanup
    Exited,
    /// Touched the core. Position normalized to `[0,1]` of the surface size.
    CoreHit { normalized: Vec2 },
    /// Touched only the cosmetic cheek region
    CheekHit,
}

/// An in-flight projectile
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec2,
    /// Position before the latest step, for swept tests
    pub prev: Vec2,
    pub vel: Vec2,
    /// Step interval that moves this projectile
    pub step_timer: TimerId,
    /// Hard lifetime timeout
    pub expiry_timer: TimerId,
}

/// Constant velocity from `muzzle` toward `aim` at `speed` pixels per step
///
/// Aiming exactly at the muzzle fires straight up.
pub fn launch_velocity(muzzle: Vec2, aim: Vec2, speed: f32) -> Vec2 {
    let dir = (aim - muzzle).try_normalize().unwrap_or(Vec2::NEG_Y);
    dir * speed
}

impl Projectile {
    /// Record the previous position, then integrate one step
    pub fn advance(&mut self) {
        self.prev = self.pos;
        self.pos += self.vel;
    }

    /// Classify the current step
    ///
    /// Order is fixed: surface exit, then core, then cheek. A step satisfying
    /// both zones always counts as a core hit. `zones` is only consulted once
    /// the projectile is known to be on the surface; without zones (target
    /// not mounted) the projectile keeps flying.
    pub fn classify(
        &self,
        surface_size: Vec2,
        origin: Vec2,
        zones: impl FnOnce() -> Option<HitZones>,
    ) -> StepOutcome {
        let p = self.pos;
        if p.x < 0.0 || p.x > surface_size.x || p.y < 0.0 || p.y > surface_size.y {
            return StepOutcome::Exited;
        }
        let Some(zones) = zones() else {
            return StepOutcome::InFlight;
        };

        let cur = origin + self.pos;
        let prev = origin + self.prev;
        if zones.core.is_hit(prev, cur) {
            return StepOutcome::CoreHit {
                normalized: self.pos / surface_size,
            };
        }
        if zones.cheek.contains(cur) {
            return StepOutcome::CheekHit;
        }
        StepOutcome::InFlight
    }
}
