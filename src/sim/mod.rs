//! Deterministic simulation module
//!
//! Hit-testing geometry, target motion, projectile stepping and the virtual
//! timer table. This module must stay pure:
//! - Caller-supplied clock only
//! - Caller-supplied RNG only
//! - No DOM or platform dependencies

pub mod geometry;
pub mod projectile;
pub mod schedule;
pub mod target;
pub mod zone;

pub use geometry::{
    Rect, closest_point_on_segment_distance, distance, point_in_ellipse, point_in_padded_rect,
    segment_intersects_rect, segments_intersect,
};
pub use projectile::{Projectile, ProjectileId, StepOutcome, launch_velocity};
pub use schedule::{EffectId, Scheduler, TimerId, TimerKind};
pub use target::{MAX_INTENSITY, MotionProfile, TARGET_BOUNDS, Target, parse_intensity};
pub use zone::{CheekZone, CoreZone, HitZones, TargetGeometry};
