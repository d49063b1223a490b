//! The interaction arena
//!
//! Wires the aim tracker, projectile simulator, target animator and feedback
//! presenter to one virtual clock. The page forwards input and server
//! events, then calls [`Arena::advance`] once per animation frame with the
//! wall-clock time; every timer due by then fires in order.
//!
//! Lifecycle follows [`Hook`]: nothing runs before `attach` and `detach`
//! releases every timer and every element the arena created.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::aim::{AimTracker, bottom_center, launcher_angle};
use crate::animator::TargetAnimator;
use crate::feedback::FeedbackPresenter;
use crate::firing::{ProjectileSimulator, Strike};
use crate::hook::Hook;
use crate::platform::{Channel, Paint, Sound, Stage};
use crate::protocol::{HitAttempt, Inbound, Outbound};
use crate::sim::{Scheduler, Target, TimerKind};
use crate::tuning::Tuning;

/// PCG stream selectors, so motion and feedback draw independent sequences
const TARGET_STREAM: u64 = 0xa02b_db0f;
const FEEDBACK_STREAM: u64 = 0x5e1f_c0de;

pub struct Arena<S: Stage, C: Channel, A: Sound> {
    tuning: Tuning,
    sched: Scheduler,
    aim: AimTracker,
    gun: ProjectileSimulator,
    animator: TargetAnimator,
    feedback: FeedbackPresenter,
    stage: S,
    channel: C,
    sound: A,
    attached: bool,
}

impl<S: Stage, C: Channel, A: Sound> Arena<S, C, A> {
    pub fn new(stage: S, channel: C, sound: A, tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            sched: Scheduler::default(),
            aim: AimTracker::default(),
            gun: ProjectileSimulator::new(),
            animator: TargetAnimator::new(Pcg32::new(seed, TARGET_STREAM)),
            feedback: FeedbackPresenter::new(Pcg32::new(seed, FEEDBACK_STREAM)),
            stage,
            channel,
            sound,
            attached: false,
        }
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn sound(&self) -> &A {
        &self.sound
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.sched
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn target(&self) -> &Target {
        self.animator.target()
    }

    /// Surface-local aim point
    pub fn aim(&self) -> Vec2 {
        self.aim.point
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_armed(&self) -> bool {
        self.gun.is_armed()
    }

    pub fn in_flight(&self) -> usize {
        self.gun.in_flight()
    }

    /// Server-confirmed hits since attach
    pub fn hits(&self) -> u32 {
        self.feedback.hits()
    }

    // === Input ===

    /// Pointer entered the surface: start firing
    pub fn pointer_enter(&mut self) {
        if !self.attached {
            return;
        }
        if self.gun.arm(&mut self.sched, &self.tuning) {
            log::debug!("Armed");
            self.stage.paint(Paint::CrosshairActive(true));
            // Entering the surface counts as the gesture that allows audio
            self.sound.unlock();
        }
    }

    /// Pointer moved, in client pixels
    pub fn pointer_move(&mut self, client: Vec2) {
        if !self.attached {
            return;
        }
        let surface = self.stage.surface_rect();
        let aim = self.aim.track(client, &surface);
        let pivot = bottom_center(surface.size(), self.tuning.pivot_offset);
        self.stage.paint(Paint::Crosshair { at: aim });
        self.stage.paint(Paint::Launcher {
            angle_deg: launcher_angle(pivot, aim),
        });
    }

    /// Pointer left the surface: stop firing
    pub fn pointer_leave(&mut self) {
        if !self.attached {
            return;
        }
        if self.gun.disarm(&mut self.sched) {
            log::debug!("Disarmed");
            self.stage.paint(Paint::CrosshairActive(false));
        }
    }

    /// First touch arms, then aims at the touch point
    pub fn touch_start(&mut self, client: Option<Vec2>) {
        self.pointer_enter();
        if let Some(client) = client {
            self.pointer_move(client);
        }
    }

    pub fn touch_move(&mut self, client: Option<Vec2>) {
        if let Some(client) = client {
            self.pointer_move(client);
        }
    }

    pub fn touch_end(&mut self) {
        self.pointer_leave();
    }

    // === Server ===

    /// Authoritative outcome from the server
    pub fn on_event(&mut self, event: Inbound) {
        if !self.attached {
            return;
        }
        match event {
            Inbound::Hit => self
                .feedback
                .on_hit(&mut self.sched, &mut self.stage, &self.tuning),
            Inbound::Miss => self
                .feedback
                .on_miss(&mut self.sched, &mut self.stage, &self.tuning),
            Inbound::PersistSession(_) | Inbound::PersistPassword => {
                log::trace!("Ignoring session event in arena");
            }
        }
    }

    // === Time ===

    /// Run every timer due by `now_ms`
    pub fn advance(&mut self, now_ms: f64) {
        if !self.attached {
            return;
        }
        self.sched.rebase(now_ms, self.tuning.max_catch_up_ms);
        while let Some((_, kind)) = self.sched.pop_due(now_ms) {
            self.dispatch(kind);
        }
        self.sched.settle(now_ms);
    }

    fn dispatch(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::TargetStep => self.animator.step(&mut self.stage, &self.tuning),
            TimerKind::Fire => {
                self.gun
                    .spawn(self.aim.point, &mut self.sched, &mut self.stage, &self.tuning);
            }
            TimerKind::ProjectileStep(id) => {
                match self
                    .gun
                    .step(id, &mut self.sched, &mut self.stage, &self.tuning)
                {
                    Some(Strike::Core { normalized }) => self.report_hit(normalized),
                    Some(Strike::Cheek) => {
                        self.feedback
                            .on_cheek(&mut self.sched, &mut self.stage, &self.tuning)
                    }
                    None => {}
                }
            }
            TimerKind::ProjectileExpiry(id) => {
                self.gun.expire(id, &mut self.sched, &mut self.stage)
            }
            TimerKind::BulletFade(id) => self.gun.fade(id, &mut self.stage),
            TimerKind::EffectExpiry(id) => self.feedback.expire(id, &mut self.stage),
            TimerKind::FlashOff => self.stage.paint(Paint::TargetFlash(false)),
            TimerKind::ShakeOff => self.stage.paint(Paint::SurfaceShake(false)),
        }
    }

    /// Local core hit: play the sound now, let the server decide the rest
    fn report_hit(&mut self, normalized: Vec2) {
        self.sound.play_hit();
        let attempt = HitAttempt {
            x: normalized.x,
            y: normalized.y,
            forced_hit: true,
        };
        log::debug!("Reporting hit at ({:.3}, {:.3})", attempt.x, attempt.y);
        self.channel.push(Outbound::HitAttempt(attempt));
    }
}

impl<S: Stage, C: Channel, A: Sound> Hook for Arena<S, C, A> {
    fn attach(&mut self, now_ms: f64) {
        if self.attached {
            log::warn!("Arena attached twice; ignoring");
            return;
        }
        self.sched = Scheduler::new(now_ms);
        self.stage.paint(Paint::MountChrome);
        self.animator.start(&mut self.sched, &self.tuning);
        self.attached = true;
        log::info!("Arena attached");
    }

    fn update(&mut self) {
        if self.attached {
            // A server patch may have reset the inline position
            self.animator.repaint(&mut self.stage);
        }
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.gun.clear(&mut self.sched, &mut self.stage);
        self.animator.stop(&mut self.sched);
        self.feedback.clear(&mut self.stage);
        self.sched.clear();
        self.stage.paint(Paint::CrosshairActive(false));
        self.stage.paint(Paint::UnmountChrome);
        self.attached = false;
        log::info!("Arena detached");
    }
}
