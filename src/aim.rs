//! Pointer/touch aim tracking
//!
//! Converts client coordinates into surface pixels. Points outside the
//! surface are kept as-is: the pointer can leave the surface mid-gesture.

use glam::Vec2;

use crate::sim::Rect;

/// Asset orientation: the launcher sprite points up at 0°
const LAUNCHER_ASSET_OFFSET_DEG: f32 = 90.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AimTracker {
    /// Surface-local aim point
    pub point: Vec2,
}

impl AimTracker {
    /// Store the aim for a client-space pointer position
    pub fn track(&mut self, client: Vec2, surface: &Rect) -> Vec2 {
        self.point = client - surface.origin();
        self.point
    }
}

/// Bottom-center point `offset` pixels above the bottom edge
pub fn bottom_center(surface_size: Vec2, offset: f32) -> Vec2 {
    Vec2::new(surface_size.x / 2.0, surface_size.y - offset)
}

/// Launcher rotation toward `aim`, in degrees, asset offset applied
pub fn launcher_angle(pivot: Vec2, aim: Vec2) -> f32 {
    let d = aim - pivot;
    d.y.atan2(d.x).to_degrees() + LAUNCHER_ASSET_OFFSET_DEG
}
