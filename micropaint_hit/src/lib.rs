// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Micropaint Hit: local-space containment predicates.
//!
//! Every node in a micropaint scene answers one geometric question during
//! event dispatch: "is this point, already expressed in my local coordinate
//! space, inside me?". This crate holds the predicates that answer it. It is
//! decoupled from the scene tree and from event routing; callers transform
//! the query point into the shape's space first.
//!
//! # Key types
//!
//! - [`HitParams`]: per-query tolerances. The stroke tolerance defaults to
//!   [`FREEHAND_TOLERANCE`], the pick radius used for freehand pen strokes.
//! - [`HitScore`]: `{ distance, kind }`, useful when several shapes compete
//!   for the same point. Lower distance is better.
//! - [`PreciseHitTest`]: implemented by anything that can answer the
//!   containment question. [`PreciseHitTest::contains_local`] is the boolean
//!   form used by the dispatcher.
//!
//! ## Shapes
//!
//! - [`Rect`]: the default node containment (`0,0 → size`), with optional
//!   fill tolerance.
//! - [`Circle`]: filled disk.
//! - [`BezPath`]: fill-only, using [`kurbo::Shape::contains`].
//! - [`stroke::Polyline`]: a freehand stroke, hit when the point lies within
//!   the stroke tolerance of one of its segments.
//!
//! Any other [`kurbo::Shape`] can go through [`hit_test_shape`].
//!
//! ```
//! use kurbo::{Point, Rect};
//! use micropaint_hit::{HitParams, PreciseHitTest};
//!
//! let button = Rect::new(0.0, 0.0, 80.0, 24.0);
//! let params = HitParams::default();
//! assert!(button.contains_local(Point::new(10.0, 10.0), &params));
//! assert!(!button.contains_local(Point::new(90.0, 10.0), &params));
//! ```

#![no_std]

extern crate alloc;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{BezPath, Circle, Point, Rect, Shape};

/// Freehand stroke predicate and pen sampling.
pub mod stroke;

/// Pick radius, in device units, around freehand strokes.
pub const FREEHAND_TOLERANCE: f64 = 5.0;

/// Kind of hit produced by a precise test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HitKind {
    /// Hit the interior of a filled shape.
    Fill,
    /// Hit near a stroked outline or freehand path.
    Stroke,
}

/// Parameters controlling precise hit tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitParams {
    /// Inflation, in local units, applied to filled regions.
    pub fill_tolerance: f64,
    /// Distance, in local units, within which a stroke counts as hit.
    pub stroke_tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            fill_tolerance: 0.0,
            stroke_tolerance: FREEHAND_TOLERANCE,
        }
    }
}

/// Score returned from a precise hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Geometric distance in local coordinate space.
    pub distance: f64,
    /// Classification of what was hit.
    pub kind: HitKind,
}

impl HitScore {
    /// A filled hit at distance 0.
    pub const fn filled() -> Self {
        Self {
            distance: 0.0,
            kind: HitKind::Fill,
        }
    }
}

/// Containment in a shape's own local coordinate space.
///
/// Implementations are called once per visited node per traversal, so they
/// must be cheap and free of side effects.
pub trait PreciseHitTest {
    /// Test `pt`, given in the shape's local space.
    ///
    /// Returns `Some(HitScore)` when the point counts as a hit.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;

    /// Boolean form of [`PreciseHitTest::hit_test_local`].
    fn contains_local(&self, pt: Point, params: &HitParams) -> bool {
        self.hit_test_local(pt, params).is_some()
    }
}

impl PreciseHitTest for Rect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let inflated = if params.fill_tolerance > 0.0 {
            self.inflate(params.fill_tolerance, params.fill_tolerance)
        } else {
            *self
        };
        if !inflated.contains(pt) {
            return None;
        }
        let dx = (self.x0 - pt.x).max(pt.x - self.x1).max(0.0);
        let dy = (self.y0 - pt.y).max(pt.y - self.y1).max(0.0);
        Some(HitScore {
            distance: (dx * dx + dy * dy).sqrt(),
            kind: HitKind::Fill,
        })
    }
}

impl PreciseHitTest for Circle {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let dist = (pt - self.center).hypot();
        if dist > self.radius + params.fill_tolerance {
            return None;
        }
        Some(HitScore {
            distance: (dist - self.radius).max(0.0),
            kind: HitKind::Fill,
        })
    }
}

impl PreciseHitTest for BezPath {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        hit_test_shape(self, pt, params)
    }
}

/// Fill-only hit test for any [`kurbo::Shape`].
///
/// Points outside the shape but inside its bounding box inflated by the fill
/// tolerance report a tolerant hit at exactly that tolerance.
pub fn hit_test_shape<S: Shape>(shape: &S, pt: Point, params: &HitParams) -> Option<HitScore> {
    if shape.contains(pt) {
        return Some(HitScore::filled());
    }
    if params.fill_tolerance <= 0.0 {
        return None;
    }
    let bounds = shape
        .bounding_box()
        .inflate(params.fill_tolerance, params.fill_tolerance);
    bounds.contains(pt).then_some(HitScore {
        distance: params.fill_tolerance,
        kind: HitKind::Fill,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::RoundedRect;

    #[test]
    fn rect_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let params = HitParams::default();
        assert!(r.contains_local(Point::new(0.0, 0.0), &params));
        assert!(r.contains_local(Point::new(9.9, 9.9), &params));
        assert!(!r.contains_local(Point::new(10.0, 5.0), &params));
    }

    #[test]
    fn rect_tolerance_reports_edge_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let params = HitParams {
            fill_tolerance: 2.0,
            ..HitParams::default()
        };
        let score = r
            .hit_test_local(Point::new(11.0, 5.0), &params)
            .expect("tolerant hit just outside the right edge");
        assert_eq!(score.distance, 1.0);
        assert_eq!(score.kind, HitKind::Fill);
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let r = Rect::ZERO;
        assert!(!r.contains_local(Point::ZERO, &HitParams::default()));
    }

    #[test]
    fn circle_hit_and_miss() {
        let c = Circle::new((0.0, 0.0), 5.0);
        let params = HitParams::default();
        assert_eq!(
            c.hit_test_local(Point::new(1.0, 1.0), &params),
            Some(HitScore::filled())
        );
        assert!(!c.contains_local(Point::new(10.0, 0.0), &params));
    }

    #[test]
    fn generic_shape_fallback() {
        let rr = RoundedRect::new(0.0, 0.0, 20.0, 20.0, 5.0);
        let params = HitParams::default();
        assert!(hit_test_shape(&rr, Point::new(10.0, 10.0), &params).is_some());
        // The rounded corner is outside the fill.
        assert!(hit_test_shape(&rr, Point::new(0.5, 0.5), &params).is_none());
    }

    #[test]
    fn bezpath_fill() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((0.0, 10.0));
        path.close_path();
        let params = HitParams::default();
        assert!(path.contains_local(Point::new(2.0, 2.0), &params));
        assert!(!path.contains_local(Point::new(9.0, 9.0), &params));
    }

    #[test]
    fn default_params_are_exact_fill_and_freehand_radius() {
        assert_eq!(
            HitParams::default(),
            HitParams {
                fill_tolerance: 0.0,
                stroke_tolerance: FREEHAND_TOLERANCE,
            }
        );
    }
}
