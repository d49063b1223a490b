//! Hit-testing geometry in a shared 2D pixel space
//!
//! Everything here is a pure function of its arguments. Positions use screen
//! conventions: x grows to the right, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box from its top-left corner and size (the shape of a DOMRect)
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    /// Box of the given half extents around a center
    pub fn centered(center: Vec2, half: Vec2) -> Self {
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    /// Length of the shorter side
    #[inline]
    pub fn min_side(&self) -> f32 {
        self.width().min(self.height())
    }

    /// Grow the box by `padding` on every side
    pub fn padded(&self, padding: f32) -> Self {
        Self::new(
            self.left - padding,
            self.top - padding,
            self.right + padding,
            self.bottom + padding,
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// The four edges, clockwise from the top edge
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.left, self.top);
        let tr = Vec2::new(self.right, self.top);
        let br = Vec2::new(self.right, self.bottom);
        let bl = Vec2::new(self.left, self.bottom);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Normalized-distance ellipse test, boundary inclusive
pub fn point_in_ellipse(point: Vec2, center: Vec2, radius_x: f32, radius_y: f32) -> bool {
    let d = point - center;
    (d.x * d.x) / (radius_x * radius_x) + (d.y * d.y) / (radius_y * radius_y) <= 1.0
}

pub fn point_in_padded_rect(point: Vec2, rect: &Rect, padding: f32) -> bool {
    rect.padded(padding).contains(point)
}

/// Parametric test for two segments `a0→a1` and `b0→b1`
///
/// Parallel segments (zero denominator) never intersect, even when collinear
/// and overlapping.
pub fn segments_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let denom = (a0.x - a1.x) * (b0.y - b1.y) - (a0.y - a1.y) * (b0.x - b1.x);
    if denom == 0.0 {
        return false;
    }
    let t = ((a0.x - b0.x) * (b0.y - b1.y) - (a0.y - b0.y) * (b0.x - b1.x)) / denom;
    let u = ((a0.x - b0.x) * (a0.y - a1.y) - (a0.y - b0.y) * (a0.x - a1.x)) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// True if either endpoint is inside the padded box or the segment crosses
/// one of its edges
pub fn segment_intersects_rect(start: Vec2, end: Vec2, rect: &Rect, padding: f32) -> bool {
    let padded = rect.padded(padding);
    if padded.contains(start) || padded.contains(end) {
        return true;
    }
    padded
        .edges()
        .iter()
        .any(|&(e0, e1)| segments_intersect(start, end, e0, e1))
}

/// Distance from `point` to the closest point of the segment `start→end`
pub fn closest_point_on_segment_distance(start: Vec2, end: Vec2, point: Vec2) -> f32 {
    let seg = end - start;
    let len_sq = seg.length_squared();
    let t = if len_sq > 0.0 {
        ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    distance(start + seg * t, point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_basics() {
        let r = Rect::from_origin_size(Vec2::new(10.0, 20.0), Vec2::new(100.0, 50.0));
        assert_eq!(r.right, 110.0);
        assert_eq!(r.bottom, 70.0);
        assert_eq!(r.center(), Vec2::new(60.0, 45.0));
        assert_eq!(r.min_side(), 50.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(!r.contains(Vec2::new(9.9, 20.0)));
    }

    #[test]
    fn test_ellipse_boundary_inclusive() {
        let c = Vec2::new(0.0, 0.0);
        assert!(point_in_ellipse(Vec2::new(4.0, 0.0), c, 4.0, 2.0));
        assert!(point_in_ellipse(Vec2::new(0.0, 2.0), c, 4.0, 2.0));
        assert!(!point_in_ellipse(Vec2::new(0.0, 2.1), c, 4.0, 2.0));
        assert!(!point_in_ellipse(Vec2::new(3.0, 1.5), c, 4.0, 2.0));
    }

    #[test]
    fn test_padded_rect() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!point_in_padded_rect(Vec2::new(-3.0, 5.0), &r, 0.0));
        assert!(point_in_padded_rect(Vec2::new(-3.0, 5.0), &r, 3.0));
        assert!(point_in_padded_rect(Vec2::new(13.0, 13.0), &r, 3.0));
        assert!(!point_in_padded_rect(Vec2::new(13.1, 5.0), &r, 3.0));
    }

    #[test]
    fn test_segment_crossing_rect_without_endpoint_inside() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Tunnels straight through in a single step
        assert!(segment_intersects_rect(
            Vec2::new(5.0, -20.0),
            Vec2::new(5.0, 30.0),
            &r,
            0.0
        ));
        // Passes beside it
        assert!(!segment_intersects_rect(
            Vec2::new(15.0, -20.0),
            Vec2::new(15.0, 30.0),
            &r,
            0.0
        ));
        // Padding pulls it in
        assert!(segment_intersects_rect(
            Vec2::new(15.0, -20.0),
            Vec2::new(15.0, 30.0),
            &r,
            5.0
        ));
    }

    #[test]
    fn test_parallel_segments_do_not_intersect() {
        // Collinear and overlapping, but the denominator is zero
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(15.0, 0.0)
        ));
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0)
        ));
    }

    #[test]
    fn test_closest_point_clamps_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment_distance(a, b, Vec2::new(5.0, 3.0)), 3.0);
        // Beyond the end: distance to the endpoint
        assert_eq!(closest_point_on_segment_distance(a, b, Vec2::new(13.0, 4.0)), 5.0);
        // Before the start
        assert_eq!(closest_point_on_segment_distance(a, b, Vec2::new(-3.0, -4.0)), 5.0);
    }

    proptest! {
        #[test]
        fn prop_ellipse_contains_its_center(
            cx in -1000.0f32..1000.0,
            cy in -1000.0f32..1000.0,
            rx in 0.001f32..500.0,
            ry in 0.001f32..500.0,
        ) {
            let c = Vec2::new(cx, cy);
            prop_assert!(point_in_ellipse(c, c, rx, ry));
        }

        #[test]
        fn prop_zero_length_segment_is_point_distance(
            px in -1000.0f32..1000.0,
            py in -1000.0f32..1000.0,
            qx in -1000.0f32..1000.0,
            qy in -1000.0f32..1000.0,
        ) {
            let p = Vec2::new(px, py);
            let q = Vec2::new(qx, qy);
            prop_assert_eq!(closest_point_on_segment_distance(p, p, q), distance(p, q));
        }

        #[test]
        fn prop_segment_never_farther_than_its_endpoints(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            qx in -500.0f32..500.0, qy in -500.0f32..500.0,
        ) {
            let (a, b, q) = (Vec2::new(ax, ay), Vec2::new(bx, by), Vec2::new(qx, qy));
            let d = closest_point_on_segment_distance(a, b, q);
            prop_assert!(d <= distance(a, q) + 1e-3);
            prop_assert!(d <= distance(b, q) + 1e-3);
        }
    }
}
