//! In-memory platform implementations
//!
//! Used by the native binary and the test suite. The stage keeps enough
//! state to answer "what would be on the page right now".

use std::collections::{BTreeSet, HashMap};

use glam::Vec2;

use super::{Channel, KeyValueStore, Paint, Scroller, Sound, Stage};
use crate::error::StorageError;
use crate::protocol::Outbound;
use crate::sim::{EffectId, ProjectileId, Rect, TargetGeometry};

/// Stage with a fixed layout that records every paint
#[derive(Debug, Clone)]
pub struct HeadlessStage {
    pub surface: Rect,
    pub geometry: Option<TargetGeometry>,
    pub intensity: u8,
    /// Every paint, in order
    pub log: Vec<Paint>,
    pub bullets: BTreeSet<ProjectileId>,
    pub effects: BTreeSet<EffectId>,
    pub chrome_mounted: bool,
    pub flashing: bool,
    pub shaking: bool,
    pub target_pct: Option<Vec2>,
    pub damage: u8,
    pub handprints: usize,
    /// Target layout lookups, including failed ones
    pub geometry_queries: usize,
}

impl HeadlessStage {
    pub fn new(surface: Rect, geometry: Option<TargetGeometry>) -> Self {
        Self {
            surface,
            geometry,
            intensity: 0,
            log: Vec::new(),
            bullets: BTreeSet::new(),
            effects: BTreeSet::new(),
            chrome_mounted: false,
            flashing: false,
            shaking: false,
            target_pct: None,
            damage: 0,
            handprints: 0,
            geometry_queries: 0,
        }
    }

    /// Count recorded paints matching a predicate
    pub fn painted(&self, pred: impl Fn(&Paint) -> bool) -> usize {
        self.log.iter().filter(|op| pred(op)).count()
    }
}

impl Stage for HeadlessStage {
    fn surface_rect(&self) -> Rect {
        self.surface
    }

    fn target_geometry(&mut self) -> Option<TargetGeometry> {
        self.geometry_queries += 1;
        self.geometry
    }

    fn intensity_level(&self) -> u8 {
        self.intensity
    }

    fn paint(&mut self, op: Paint) {
        match &op {
            Paint::MoveTarget { left_pct, top_pct } => {
                self.target_pct = Some(Vec2::new(*left_pct, *top_pct));
            }
            Paint::MountChrome => self.chrome_mounted = true,
            Paint::UnmountChrome => self.chrome_mounted = false,
            Paint::SpawnBullet { id, .. } => {
                self.bullets.insert(*id);
            }
            Paint::RemoveBullet { id } => {
                self.bullets.remove(id);
            }
            Paint::Spurt { id, .. } | Paint::Drip { id, .. } => {
                self.effects.insert(*id);
            }
            Paint::RemoveEffect { id } => {
                self.effects.remove(id);
            }
            Paint::Handprint { .. } => self.handprints += 1,
            Paint::TargetFlash(on) => self.flashing = *on,
            Paint::SurfaceShake(on) => self.shaking = *on,
            Paint::TargetDamage(level) => self.damage = *level,
            Paint::Crosshair { .. }
            | Paint::CrosshairActive(_)
            | Paint::Launcher { .. }
            | Paint::MoveBullet { .. }
            | Paint::BulletStruck { .. }
            | Paint::PoolWidth(_) => {}
        }
        self.log.push(op);
    }
}

/// Channel that keeps what was sent
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    pub sent: Vec<Outbound>,
}

impl Channel for RecordingChannel {
    fn push(&mut self, event: Outbound) {
        log::debug!("push {} {}", event.name(), event.payload());
        self.sent.push(event);
    }
}

/// HashMap-backed store with switchable failures
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "simulated read failure".to_string(),
            });
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "simulated quota exceeded".to_string(),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Sound that only counts calls
#[derive(Debug, Clone, Default)]
pub struct CountingSound {
    pub unlocks: usize,
    pub plays: usize,
}

impl Sound for CountingSound {
    fn unlock(&mut self) {
        self.unlocks += 1;
    }

    fn play_hit(&mut self) {
        self.plays += 1;
    }
}

/// Scroll box with a settable content height
#[derive(Debug, Clone, Default)]
pub struct HeadlessScroller {
    pub content_height: f64,
    pub scroll_top: f64,
}

impl Scroller for HeadlessScroller {
    fn scroll_height(&self) -> f64 {
        self.content_height
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top = top;
    }
}
