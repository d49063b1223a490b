//! Projectile lifecycle
//!
//! Spawns projectiles at the muzzle while armed, steps each one on its own
//! interval and retires it on exit, strike or expiry. Every projectile owns
//! exactly two timers (step and expiry) and both are cancelled together the
//! moment it retires, so a projectile can report at most once.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use crate::aim::bottom_center;
use crate::platform::{Paint, Stage};
use crate::sim::{
    HitZones, Projectile, ProjectileId, Scheduler, StepOutcome, TimerId, TimerKind,
    launch_velocity,
};
use crate::tuning::Tuning;

/// A projectile struck the target this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strike {
    /// Core hit, position normalized to the surface
    Core { normalized: Vec2 },
    /// Cosmetic cheek graze
    Cheek,
}

#[derive(Default)]
pub struct ProjectileSimulator {
    fire_timer: Option<TimerId>,
    in_flight: BTreeMap<ProjectileId, Projectile>,
    /// Struck projectiles still shown in their impact look
    fading: BTreeSet<ProjectileId>,
    next_id: u32,
}

impl ProjectileSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.fire_timer.is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.in_flight.get(&id)
    }

    /// Start the spawn cadence. Returns false if already armed.
    pub fn arm(&mut self, sched: &mut Scheduler, tuning: &Tuning) -> bool {
        if self.fire_timer.is_some() {
            return false;
        }
        self.fire_timer = Some(sched.interval(TimerKind::Fire, tuning.fire_interval_ms));
        true
    }

    /// Stop spawning. Projectiles already in flight keep going.
    /// Returns false if already disarmed.
    pub fn disarm(&mut self, sched: &mut Scheduler) -> bool {
        match self.fire_timer.take() {
            Some(id) => {
                sched.cancel(id);
                true
            }
            None => false,
        }
    }

    /// Launch one projectile from the muzzle toward `aim`
    pub fn spawn<S: Stage>(
        &mut self,
        aim: Vec2,
        sched: &mut Scheduler,
        stage: &mut S,
        tuning: &Tuning,
    ) -> ProjectileId {
        self.next_id += 1;
        let id = ProjectileId(self.next_id);

        let surface = stage.surface_rect();
        let muzzle = bottom_center(surface.size(), tuning.muzzle_offset);
        let projectile = Projectile {
            id,
            pos: muzzle,
            prev: muzzle,
            vel: launch_velocity(muzzle, aim, tuning.projectile_speed),
            step_timer: sched.interval(TimerKind::ProjectileStep(id), tuning.projectile_tick_ms),
            expiry_timer: sched.timeout(TimerKind::ProjectileExpiry(id), tuning.projectile_ttl_ms),
        };
        stage.paint(Paint::SpawnBullet { id, at: muzzle });
        self.in_flight.insert(id, projectile);
        id
    }

    /// Move one projectile and resolve what it touched
    ///
    /// Stale ids (already retired) are ignored.
    pub fn step<S: Stage>(
        &mut self,
        id: ProjectileId,
        sched: &mut Scheduler,
        stage: &mut S,
        tuning: &Tuning,
    ) -> Option<Strike> {
        let projectile = self.in_flight.get_mut(&id)?;
        projectile.advance();
        stage.paint(Paint::MoveBullet {
            id,
            at: projectile.pos,
        });

        let surface = stage.surface_rect();
        let outcome = projectile.classify(surface.size(), surface.origin(), || {
            stage
                .target_geometry()
                .map(|g| HitZones::from_geometry(&g, tuning))
        });

        match outcome {
            StepOutcome::InFlight => None,
            StepOutcome::Exited => {
                self.retire(id, sched);
                stage.paint(Paint::RemoveBullet { id });
                None
            }
            StepOutcome::CoreHit { normalized } => {
                self.strike(id, sched, stage, tuning);
                Some(Strike::Core { normalized })
            }
            StepOutcome::CheekHit => {
                self.strike(id, sched, stage, tuning);
                Some(Strike::Cheek)
            }
        }
    }

    /// Lifetime ran out
    pub fn expire<S: Stage>(&mut self, id: ProjectileId, sched: &mut Scheduler, stage: &mut S) {
        if self.retire(id, sched).is_some() {
            log::trace!("Projectile {} expired", id.0);
            stage.paint(Paint::RemoveBullet { id });
        }
    }

    /// Impact look has been shown long enough
    pub fn fade<S: Stage>(&mut self, id: ProjectileId, stage: &mut S) {
        if self.fading.remove(&id) {
            stage.paint(Paint::RemoveBullet { id });
        }
    }

    /// Disarm and remove every projectile element
    pub fn clear<S: Stage>(&mut self, sched: &mut Scheduler, stage: &mut S) {
        self.disarm(sched);
        let ids: Vec<ProjectileId> = self.in_flight.keys().copied().collect();
        for id in ids {
            self.retire(id, sched);
            stage.paint(Paint::RemoveBullet { id });
        }
        for id in std::mem::take(&mut self.fading) {
            stage.paint(Paint::RemoveBullet { id });
        }
    }

    fn strike<S: Stage>(
        &mut self,
        id: ProjectileId,
        sched: &mut Scheduler,
        stage: &mut S,
        tuning: &Tuning,
    ) {
        self.retire(id, sched);
        stage.paint(Paint::BulletStruck { id });
        self.fading.insert(id);
        sched.timeout(TimerKind::BulletFade(id), tuning.hit_fade_ms);
    }

    /// Forget a projectile and cancel both of its timers
    fn retire(&mut self, id: ProjectileId, sched: &mut Scheduler) -> Option<Projectile> {
        let projectile = self.in_flight.remove(&id)?;
        sched.cancel(projectile.step_timer);
        sched.cancel(projectile.expiry_timer);
        Some(projectile)
    }
}
