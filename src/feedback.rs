//! Hit/miss visual feedback
//!
//! Reacts to authoritative server events (and the local cheek graze) by
//! painting transient effects. Never spawns projectiles and never predicts
//! outcomes.

use std::collections::BTreeSet;

use rand::Rng;
use rand_pcg::Pcg32;

use crate::platform::{Paint, Stage};
use crate::sim::{EffectId, Scheduler, TimerKind};
use crate::tuning::Tuning;

pub struct FeedbackPresenter {
    hits: u32,
    rng: Pcg32,
    next_effect: u32,
    /// Spurts and drips still on the page
    live: BTreeSet<EffectId>,
}

impl FeedbackPresenter {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            hits: 0,
            rng,
            next_effect: 1,
            live: BTreeSet::new(),
        }
    }

    /// Confirmed hits so far
    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn live_effects(&self) -> usize {
        self.live.len()
    }

    fn effect_id(&mut self) -> EffectId {
        let id = EffectId(self.next_effect);
        self.next_effect += 1;
        id
    }

    /// Server confirmed a hit
    pub fn on_hit<S: Stage>(&mut self, sched: &mut Scheduler, stage: &mut S, tuning: &Tuning) {
        self.hits += 1;
        self.spurt(sched, stage, tuning);
        self.handprint(stage);

        stage.paint(Paint::TargetDamage(tuning.damage_level(self.hits)));
        self.flash(sched, stage, tuning);
        stage.paint(Paint::PoolWidth(tuning.pool_width(self.hits)));
        log::debug!("Hit confirmed ({} total)", self.hits);
    }

    /// Server confirmed a miss
    pub fn on_miss<S: Stage>(&mut self, sched: &mut Scheduler, stage: &mut S, tuning: &Tuning) {
        stage.paint(Paint::SurfaceShake(true));
        sched.timeout(TimerKind::ShakeOff, tuning.shake_ms);
    }

    /// A projectile grazed the body but not the core. Local only.
    pub fn on_cheek<S: Stage>(&mut self, sched: &mut Scheduler, stage: &mut S, tuning: &Tuning) {
        self.flash(sched, stage, tuning);
        self.handprint(stage);
    }

    /// A spurt or drip ran its course
    pub fn expire<S: Stage>(&mut self, id: EffectId, stage: &mut S) {
        if self.live.remove(&id) {
            stage.paint(Paint::RemoveEffect { id });
        }
    }

    /// Remove every transient element still on the page and start the
    /// hit count over
    pub fn clear<S: Stage>(&mut self, stage: &mut S) {
        for id in std::mem::take(&mut self.live) {
            stage.paint(Paint::RemoveEffect { id });
        }
        self.hits = 0;
        self.next_effect = 1;
    }

    fn spurt<S: Stage>(&mut self, sched: &mut Scheduler, stage: &mut S, tuning: &Tuning) {
        for i in 0..tuning.spurt_count {
            let id = self.effect_id();
            stage.paint(Paint::Spurt {
                id,
                delay_s: i as f32 * tuning.spurt_stagger_s,
                rotation_deg: self.rng.random_range(-25.0..25.0_f32),
            });
            self.live.insert(id);
            sched.timeout(TimerKind::EffectExpiry(id), tuning.spurt_ms);
        }

        let id = self.effect_id();
        stage.paint(Paint::Drip {
            id,
            left_pct: 45.0 + self.rng.random_range(0.0..10.0_f32),
        });
        self.live.insert(id);
        sched.timeout(TimerKind::EffectExpiry(id), tuning.drip_ms);
    }

    fn handprint<S: Stage>(&mut self, stage: &mut S) {
        let left_side = self.rng.random_bool(0.5);
        let top_pct = 15.0 + self.rng.random_range(0.0..50.0_f32);
        let side: f32 = if left_side { 5.0 } else { 55.0 };
        let left_pct = side + self.rng.random_range(0.0..25.0_f32);
        let rotation_deg = -35.0 + self.rng.random_range(0.0..70.0_f32);
        stage.paint(Paint::Handprint {
            left_pct,
            top_pct,
            rotation_deg,
        });
    }

    fn flash<S: Stage>(&mut self, sched: &mut Scheduler, stage: &mut S, tuning: &Tuning) {
        stage.paint(Paint::TargetFlash(true));
        sched.timeout(TimerKind::FlashOff, tuning.flash_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessStage;
    use crate::sim::Rect;
    use rand::SeedableRng;

    fn setup() -> (FeedbackPresenter, Scheduler, HeadlessStage, Tuning) {
        (
            FeedbackPresenter::new(Pcg32::seed_from_u64(7)),
            Scheduler::new(0.0),
            HeadlessStage::new(Rect::new(0.0, 0.0, 400.0, 400.0), None),
            Tuning::default(),
        )
    }

    #[test]
    fn test_hit_paints_full_burst() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        fx.on_hit(&mut sched, &mut stage, &tuning);

        assert_eq!(fx.hits(), 1);
        assert_eq!(stage.painted(|p| matches!(p, Paint::Spurt { .. })), 3);
        assert_eq!(stage.painted(|p| matches!(p, Paint::Drip { .. })), 1);
        assert_eq!(stage.handprints, 1);
        assert!(stage.flashing);
        assert!(stage.log.contains(&Paint::PoolWidth(28.0)));
        assert!(stage.log.contains(&Paint::TargetDamage(0)));

        // Staggered delays, bounded rotations
        let delays: Vec<f32> = stage
            .log
            .iter()
            .filter_map(|p| match p {
                Paint::Spurt {
                    delay_s,
                    rotation_deg,
                    ..
                } => {
                    assert!((-25.0..25.0).contains(rotation_deg));
                    Some(*delay_s)
                }
                _ => None,
            })
            .collect();
        assert_eq!(delays.len(), 3);
        assert!((delays[2] - 0.16).abs() < 1e-6);
    }

    #[test]
    fn test_effects_expire_on_schedule() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        fx.on_hit(&mut sched, &mut stage, &tuning);
        assert_eq!(stage.effects.len(), 4);

        let mut fire = |until: f64, fx: &mut FeedbackPresenter, stage: &mut HeadlessStage| {
            while let Some((_, kind)) = sched.pop_due(until) {
                match kind {
                    TimerKind::EffectExpiry(id) => fx.expire(id, stage),
                    TimerKind::FlashOff => stage.paint(Paint::TargetFlash(false)),
                    _ => {}
                }
            }
        };
        fire(600.0, &mut fx, &mut stage);
        // Spurts gone, drip remains
        assert_eq!(stage.effects.len(), 1);
        assert!(!stage.flashing);
        fire(1200.0, &mut fx, &mut stage);
        assert!(stage.effects.is_empty());
        assert_eq!(fx.live_effects(), 0);
    }

    #[test]
    fn test_damage_level_every_third_hit() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        for _ in 0..7 {
            fx.on_hit(&mut sched, &mut stage, &tuning);
        }
        assert_eq!(stage.damage, 2);
        assert!(stage.log.contains(&Paint::PoolWidth(76.0)));
    }

    #[test]
    fn test_handprint_placement_ranges() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        for _ in 0..200 {
            fx.on_cheek(&mut sched, &mut stage, &tuning);
        }
        for op in &stage.log {
            if let Paint::Handprint {
                left_pct,
                top_pct,
                rotation_deg,
            } = op
            {
                assert!((15.0..65.0).contains(top_pct));
                assert!((5.0..30.0).contains(left_pct) || (55.0..80.0).contains(left_pct));
                assert!((-35.0..35.0).contains(rotation_deg));
            }
        }
        // Cheek grazes never count as hits
        assert_eq!(fx.hits(), 0);
    }

    #[test]
    fn test_miss_shakes_then_settles() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        fx.on_miss(&mut sched, &mut stage, &tuning);
        assert!(stage.shaking);
        assert_eq!(sched.pop_due(300.0).map(|(_, k)| k), Some(TimerKind::ShakeOff));
    }

    #[test]
    fn test_clear_removes_live_effects() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        fx.on_hit(&mut sched, &mut stage, &tuning);
        fx.clear(&mut stage);
        assert!(stage.effects.is_empty());
        assert_eq!(fx.live_effects(), 0);
    }

    #[test]
    fn test_clear_restarts_damage_progression() {
        let (mut fx, mut sched, mut stage, tuning) = setup();
        for _ in 0..4 {
            fx.on_hit(&mut sched, &mut stage, &tuning);
        }
        fx.clear(&mut stage);
        assert_eq!(fx.hits(), 0);

        stage.log.clear();
        fx.on_hit(&mut sched, &mut stage, &tuning);
        assert_eq!(fx.hits(), 1);
        assert!(stage.log.contains(&Paint::TargetDamage(0)));
        assert!(stage.log.contains(&Paint::PoolWidth(28.0)));
        // Effect ids start over too
        assert!(matches!(stage.log[0], Paint::Spurt { id: EffectId(1), .. }));
    }
}
