//! Target animation driver
//!
//! Owns the target's motion state and its tick timer. Intensity is read
//! from the page on every tick, so the server can change it mid-session.

use rand_pcg::Pcg32;

use crate::platform::{Paint, Stage};
use crate::sim::{Scheduler, Target, TimerId, TimerKind};
use crate::tuning::Tuning;

pub struct TargetAnimator {
    target: Target,
    rng: Pcg32,
    timer: Option<TimerId>,
}

impl TargetAnimator {
    pub fn new(rng: Pcg32) -> Self {
        Self {
            target: Target::default(),
            rng,
            timer: None,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Start ticking; a no-op when already running
    pub fn start(&mut self, sched: &mut Scheduler, tuning: &Tuning) {
        if self.timer.is_none() {
            self.timer = Some(sched.interval(TimerKind::TargetStep, tuning.target_tick_ms));
        }
    }

    pub fn stop(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.timer.take() {
            sched.cancel(id);
        }
    }

    /// One animation tick
    pub fn step<S: Stage>(&mut self, stage: &mut S, tuning: &Tuning) {
        let intensity = stage.intensity_level();
        self.target.step(intensity, tuning.phase_step, &mut self.rng);
        self.repaint(stage);
    }

    /// Re-apply the current position, e.g. after the server patched the element
    pub fn repaint<S: Stage>(&self, stage: &mut S) {
        stage.paint(Paint::MoveTarget {
            left_pct: self.target.pos.x,
            top_pct: self.target.pos.y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessStage;
    use crate::sim::{Rect, TARGET_BOUNDS};
    use rand::SeedableRng;

    #[test]
    fn test_ticks_follow_interval() {
        let tuning = Tuning::default();
        let mut sched = Scheduler::new(0.0);
        let mut stage = HeadlessStage::new(Rect::new(0.0, 0.0, 100.0, 100.0), None);
        let mut anim = TargetAnimator::new(Pcg32::seed_from_u64(1));

        anim.start(&mut sched, &tuning);
        anim.start(&mut sched, &tuning);
        assert_eq!(sched.count(|k| *k == TimerKind::TargetStep), 1);

        let mut ticks = 0;
        while let Some((_, kind)) = sched.pop_due(500.0) {
            assert_eq!(kind, TimerKind::TargetStep);
            anim.step(&mut stage, &tuning);
            ticks += 1;
        }
        assert_eq!(ticks, 10);
        let pos = stage.target_pct.unwrap();
        assert!(TARGET_BOUNDS.contains(pos));

        anim.stop(&mut sched);
        assert!(!anim.is_running());
        assert!(sched.is_empty());
    }

    #[test]
    fn test_intensity_read_each_tick() {
        let tuning = Tuning::default();
        let mut stage = HeadlessStage::new(Rect::new(0.0, 0.0, 100.0, 100.0), None);
        let mut calm = TargetAnimator::new(Pcg32::seed_from_u64(9));
        let mut wild = TargetAnimator::new(Pcg32::seed_from_u64(9));

        let mut calm_travel = 0.0;
        let mut wild_travel = 0.0;
        for _ in 0..200 {
            let before = calm.target().pos;
            stage.intensity = 0;
            calm.step(&mut stage, &tuning);
            calm_travel += (calm.target().pos - before).length();

            let before = wild.target().pos;
            stage.intensity = 5;
            wild.step(&mut stage, &tuning);
            wild_travel += (wild.target().pos - before).length();
        }
        assert!(wild_travel > calm_travel);
    }
}
