// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Freehand strokes.
//!
//! A [`Polyline`] is the centerline a pen leaves behind: an ordered list of
//! sampled points. It is hit when the query point lies within
//! `half_width + stroke_tolerance` of one of its segments, measured
//! perpendicular to the segment, with the foot of the perpendicular falling
//! on the segment itself. Points past either end of a segment only count if
//! a neighboring segment covers them, so a stroke has square, not round,
//! ends.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

use crate::{HitKind, HitParams, HitScore, PreciseHitTest};

/// Minimum spacing between samples appended by [`Polyline::push_spaced`]
/// in the pen tool.
pub const PEN_SAMPLE_SPACING: f64 = 5.0;

/// A freehand stroke in local coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
    /// Half of the drawn stroke width. Freehand figures pick with the
    /// tolerance alone and leave this at zero.
    pub half_width: f64,
}

impl Polyline {
    /// Create an empty stroke.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stroke from existing samples.
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
            half_width: 0.0,
        }
    }

    /// The samples, in drawing order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Append a sample unconditionally.
    pub fn push(&mut self, pt: Point) {
        self.points.push(pt);
    }

    /// Append `pt` only if it lies farther than `min_spacing` from the last
    /// sample. An empty stroke accepts nothing; start it with
    /// [`Polyline::push`] on pointer press.
    ///
    /// Returns whether the sample was kept.
    pub fn push_spaced(&mut self, pt: Point, min_spacing: f64) -> bool {
        match self.points.last() {
            Some(last) if last.distance(pt) > min_spacing => {
                self.points.push(pt);
                true
            }
            _ => false,
        }
    }

    /// Shift every sample by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Tight axis-aligned bounds of the samples, or `None` when empty.
    pub fn bounding_box(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        Some(
            rest.iter()
                .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
        )
    }

    /// Perpendicular distance from `pt` to the nearest segment whose span
    /// covers the projection of `pt`.
    fn nearest_covering_distance(&self, pt: Point) -> Option<f64> {
        self.points
            .windows(2)
            .filter_map(|seg| {
                let (a, b) = (seg[0], seg[1]);
                let ab = b - a;
                let len = ab.hypot();
                if len == 0.0 {
                    return None;
                }
                let ap = pt - a;
                let along = ap.dot(ab) / len;
                if !(0.0..len).contains(&along) {
                    return None;
                }
                Some((ap.cross(ab) / len).abs())
            })
            .min_by(|x, y| x.total_cmp(y))
    }
}

impl PreciseHitTest for Polyline {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let limit = self.half_width + params.stroke_tolerance;
        let dist = self.nearest_covering_distance(pt)?;
        (dist < limit).then_some(HitScore {
            distance: dist,
            kind: HitKind::Stroke,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Polyline {
        Polyline::from_points([
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ])
    }

    #[test]
    fn near_segment_is_hit() {
        let params = HitParams::default();
        let stroke = zigzag();
        let score = stroke
            .hit_test_local(Point::new(50.0, 3.0), &params)
            .expect("3 units off the first segment");
        assert_eq!(score.kind, HitKind::Stroke);
        assert_eq!(score.distance, 3.0);
        assert!(stroke.contains_local(Point::new(97.0, 50.0), &params));
    }

    #[test]
    fn tolerance_is_strict() {
        let params = HitParams::default();
        assert!(!zigzag().contains_local(Point::new(50.0, 5.0), &params));
    }

    #[test]
    fn beyond_segment_ends_is_miss() {
        let params = HitParams::default();
        let stroke = zigzag();
        // Behind the start point, within tolerance of the infinite line.
        assert!(!stroke.contains_local(Point::new(-2.0, 0.0), &params));
        // Past the final endpoint.
        assert!(!stroke.contains_local(Point::new(100.0, 102.0), &params));
    }

    #[test]
    fn half_width_widens_pick_area() {
        let params = HitParams::default();
        let mut stroke = zigzag();
        assert!(!stroke.contains_local(Point::new(50.0, 8.0), &params));
        stroke.half_width = 4.0;
        assert!(stroke.contains_local(Point::new(50.0, 8.0), &params));
    }

    #[test]
    fn single_point_and_repeated_points_contain_nothing() {
        let params = HitParams::default();
        let dot = Polyline::from_points([Point::new(1.0, 1.0)]);
        assert!(!dot.contains_local(Point::new(1.0, 1.0), &params));
        let stuck = Polyline::from_points([Point::new(1.0, 1.0), Point::new(1.0, 1.0)]);
        assert!(!stuck.contains_local(Point::new(1.0, 1.0), &params));
    }

    #[test]
    fn spaced_sampling_skips_close_points() {
        let mut stroke = Polyline::new();
        assert!(!stroke.push_spaced(Point::new(0.0, 0.0), PEN_SAMPLE_SPACING));
        stroke.push(Point::new(0.0, 0.0));
        assert!(!stroke.push_spaced(Point::new(3.0, 4.0), PEN_SAMPLE_SPACING));
        assert!(stroke.push_spaced(Point::new(6.0, 0.0), PEN_SAMPLE_SPACING));
        assert_eq!(stroke.points().len(), 2);
    }

    #[test]
    fn bounds_and_translate() {
        let mut stroke = zigzag();
        assert_eq!(stroke.bounding_box(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        stroke.translate(Vec2::new(10.0, -10.0));
        assert_eq!(stroke.points()[0], Point::new(10.0, -10.0));
        assert_eq!(Polyline::new().bounding_box(), None);
    }
}
