//! Target hit zones
//!
//! A [`TargetGeometry`] is a layout snapshot of the target body and its inner
//! core, taken fresh every projectile tick because layout shifts while the
//! target moves. [`HitZones`] turns that snapshot into the two regions the
//! projectile step tests against.

use glam::Vec2;

use super::geometry::{
    Rect, closest_point_on_segment_distance, distance, point_in_ellipse, segment_intersects_rect,
};
use crate::tuning::Tuning;

/// Layout snapshot in client pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGeometry {
    /// Outer bounding box of the target body
    pub body: Rect,
    /// Inner core box (absent until the core element is mounted)
    pub core: Option<Rect>,
}

/// The precise region whose collision reports damage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreZone {
    pub center: Vec2,
    /// Radius for the swept segment-distance test
    pub radius: f32,
    /// Ellipse radii, only with a core box
    pub radii: Option<Vec2>,
    /// Core box before padding
    pub rect: Option<Rect>,
    pub padding: f32,
}

impl CoreZone {
    /// True if the step `prev → cur` touched the core
    ///
    /// Three tests are OR-ed: padded rectangle (endpoints and edge crossings),
    /// ellipse containment of the new position, and swept distance to the
    /// center. Fast steps can skip past one test but rarely all three.
    pub fn is_hit(&self, prev: Vec2, cur: Vec2) -> bool {
        let rect_hit = self
            .rect
            .is_some_and(|r| segment_intersects_rect(prev, cur, &r, self.padding));
        let ellipse_hit = self
            .radii
            .is_some_and(|r| point_in_ellipse(cur, self.center, r.x, r.y));
        let swept_hit = closest_point_on_segment_distance(prev, cur, self.center) < self.radius;
        rect_hit || ellipse_hit || swept_hit
    }
}

/// The cosmetic region around the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheekZone {
    pub center: Vec2,
    pub radius: f32,
}

impl CheekZone {
    pub fn contains(&self, p: Vec2) -> bool {
        distance(p, self.center) < self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitZones {
    pub core: CoreZone,
    pub cheek: CheekZone,
}

impl HitZones {
    pub fn from_geometry(geometry: &TargetGeometry, tuning: &Tuning) -> Self {
        let body = geometry.body;
        let padding = tuning.core_padding;

        let core = match geometry.core {
            Some(rect) => CoreZone {
                center: rect.center(),
                radius: rect.min_side() / 2.0 + padding,
                radii: Some(Vec2::new(
                    rect.width() / 2.0 + padding,
                    rect.height() / 2.0 + padding,
                )),
                rect: Some(rect),
                padding,
            },
            None => CoreZone {
                center: Vec2::new(
                    body.center().x,
                    body.top + body.height() * tuning.fallback_core_height,
                ),
                radius: body.min_side() * tuning.fallback_core_fraction,
                radii: None,
                rect: None,
                padding,
            },
        };

        let cheek = CheekZone {
            center: body.center(),
            radius: tuning
                .cheek_min_radius
                .max(body.min_side() * tuning.cheek_fraction),
        };

        Self { core, cheek }
    }
}
