//! Platform abstraction layer
//!
//! The engine talks to the outside world only through these traits:
//! - [`Stage`]: layout queries and paint operations on the page
//! - [`Channel`]: events pushed to the server collaborator
//! - [`KeyValueStore`]: durable client storage (LocalStorage on web)
//! - [`Sound`]: the hit sound
//!
//! `headless` implementations run anywhere (native binary, tests). The DOM,
//! LocalStorage and JS channel implementations exist only on wasm32.

pub mod headless;

#[cfg(target_arch = "wasm32")]
pub mod channel;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod storage;

use glam::Vec2;

use crate::error::StorageError;
use crate::protocol::Outbound;
use crate::sim::{EffectId, ProjectileId, Rect, TargetGeometry};

/// A visual change requested by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Position the target, in percent of the container
    MoveTarget { left_pct: f32, top_pct: f32 },
    /// Create the crosshair and launcher elements
    MountChrome,
    /// Remove the crosshair and launcher elements
    UnmountChrome,
    /// Crosshair position in surface pixels
    Crosshair { at: Vec2 },
    CrosshairActive(bool),
    /// Launcher rotation in degrees (asset offset already applied)
    Launcher { angle_deg: f32 },
    SpawnBullet { id: ProjectileId, at: Vec2 },
    MoveBullet { id: ProjectileId, at: Vec2 },
    /// Switch a bullet to its impact look
    BulletStruck { id: ProjectileId },
    RemoveBullet { id: ProjectileId },
    Spurt {
        id: EffectId,
        delay_s: f32,
        rotation_deg: f32,
    },
    Drip { id: EffectId, left_pct: f32 },
    RemoveEffect { id: EffectId },
    /// Permanent mark on the target
    Handprint {
        left_pct: f32,
        top_pct: f32,
        rotation_deg: f32,
    },
    TargetFlash(bool),
    TargetDamage(u8),
    SurfaceShake(bool),
    PoolWidth(f32),
}

/// The page the engine draws on
pub trait Stage {
    /// Interaction surface bounds in client pixels
    fn surface_rect(&self) -> Rect;

    /// Fresh layout of the target; `None` while it is not mounted
    ///
    /// Implementations re-query missing elements on every call.
    fn target_geometry(&mut self) -> Option<TargetGeometry>;

    /// Externally supplied intensity level, 0..=5
    fn intensity_level(&self) -> u8;

    fn paint(&mut self, op: Paint);
}

/// Push channel to the server collaborator
pub trait Channel {
    fn push(&mut self, event: Outbound);
}

/// String key-value storage that may fail
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for &mut K {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Hit sound playback; failures are swallowed by implementations
pub trait Sound {
    /// Prime playback during a user gesture
    fn unlock(&mut self);
    /// Rewind and play
    fn play_hit(&mut self);
}

/// An element whose content grows at the bottom (chat, event log)
pub trait Scroller {
    fn scroll_height(&self) -> f64;
    fn set_scroll_top(&mut self, top: f64);
}
