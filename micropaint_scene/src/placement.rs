// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Local placement of a node relative to its parent.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Where a node sits inside its parent, and how big it is.
///
/// Mapping a local point into parent space scales it first, then rotates it
/// about the node's center (`size / 2`), then translates it:
///
/// ```text
/// parent = T(translation) · R(rotation, center) · S(scale) · local
/// ```
///
/// [`Placement::to_local_space`] applies the exact inverse in reverse order.
/// A zero or non-finite scale component has no inverse; such a placement is
/// [degenerate](Placement::is_degenerate) and contains no point.
///
/// ```
/// use kurbo::{Point, Size, Vec2};
/// use micropaint_scene::Placement;
///
/// let p = Placement {
///     translation: Vec2::new(100.0, 50.0),
///     scale: Vec2::new(2.0, 2.0),
///     ..Placement::sized(Size::new(10.0, 10.0))
/// };
/// assert_eq!(p.to_parent_space(Point::new(1.0, 1.0)), Point::new(102.0, 52.0));
/// assert_eq!(p.to_local_space(Point::new(102.0, 52.0)), Some(Point::new(1.0, 1.0)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Offset of the node's origin in parent space.
    pub translation: Vec2,
    /// Rotation about the node's center, in radians.
    pub rotation: f64,
    /// Per-axis scale applied before rotation.
    pub scale: Vec2,
    /// Local size; the default containment is the rect `0,0 → size`.
    pub size: Size,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            size: Size::ZERO,
        }
    }
}

impl Placement {
    /// Identity placement of the given size.
    pub fn sized(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Placement with the given origin and size, no rotation or scale.
    pub fn at(origin: Point, size: Size) -> Self {
        Self {
            translation: origin.to_vec2(),
            size,
            ..Self::default()
        }
    }

    /// Rotation pivot in local space.
    pub fn center(&self) -> Point {
        (self.size.to_vec2() * 0.5).to_point()
    }

    /// Local bounds used by default containment.
    pub fn local_bounds(&self) -> Rect {
        self.size.to_rect()
    }

    /// True when the scale cannot be inverted.
    pub fn is_degenerate(&self) -> bool {
        let Vec2 { x, y } = self.scale;
        !(x.is_finite() && y.is_finite()) || x == 0.0 || y == 0.0
    }

    /// Local → parent mapping.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translation)
            * Affine::rotate_about(self.rotation, self.center())
            * Affine::scale_non_uniform(self.scale.x, self.scale.y)
    }

    /// Parent → local mapping, or `None` for a degenerate placement.
    pub fn inverse_affine(&self) -> Option<Affine> {
        if self.is_degenerate() {
            return None;
        }
        Some(
            Affine::scale_non_uniform(1.0 / self.scale.x, 1.0 / self.scale.y)
                * Affine::rotate_about(-self.rotation, self.center())
                * Affine::translate(-self.translation),
        )
    }

    /// Map a local point into parent space.
    pub fn to_parent_space(&self, local: Point) -> Point {
        self.affine() * local
    }

    /// Map a parent-space point into local space.
    pub fn to_local_space(&self, parent: Point) -> Option<Point> {
        self.inverse_affine().map(|inv| inv * parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPS: f64 = 1e-9;

    fn assert_near(a: Point, b: Point) {
        assert!(
            (a - b).hypot() < EPS,
            "expected {b:?}, got {a:?} (distance {})",
            (a - b).hypot()
        );
    }

    #[test]
    fn round_trip_through_parent_space() {
        let p = Placement {
            translation: Vec2::new(-13.5, 240.0),
            rotation: FRAC_PI_3,
            scale: Vec2::new(0.5, 3.0),
            size: Size::new(40.0, 18.0),
        };
        for pt in [
            Point::ZERO,
            Point::new(20.0, 9.0),
            Point::new(-700.0, 12.25),
            Point::new(1e4, -3e3),
        ] {
            let back = p
                .to_local_space(p.to_parent_space(pt))
                .expect("non-degenerate placement");
            assert_near(back, pt);
        }
    }

    #[test]
    fn rotation_pivots_on_center() {
        let p = Placement {
            rotation: FRAC_PI_2,
            ..Placement::sized(Size::new(10.0, 10.0))
        };
        // The center is a fixed point of the rotation.
        assert_near(p.to_parent_space(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
        // The origin swings around to the opposite side along x.
        assert_near(p.to_parent_space(Point::ZERO), Point::new(10.0, 0.0));
    }

    #[test]
    fn scale_applies_before_translation() {
        let p = Placement {
            translation: Vec2::new(10.0, 0.0),
            scale: Vec2::new(3.0, 1.0),
            ..Placement::default()
        };
        assert_near(p.to_parent_space(Point::new(2.0, 0.0)), Point::new(16.0, 0.0));
    }

    #[test]
    fn zero_scale_is_degenerate() {
        let p = Placement {
            scale: Vec2::new(0.0, 1.0),
            ..Placement::sized(Size::new(10.0, 10.0))
        };
        assert!(p.is_degenerate());
        assert_eq!(p.inverse_affine(), None);
        assert_eq!(p.to_local_space(Point::new(1.0, 1.0)), None);

        let nan = Placement {
            scale: Vec2::new(f64::NAN, 1.0),
            ..Placement::default()
        };
        assert!(nan.is_degenerate());
    }

    #[test]
    fn at_places_origin() {
        let p = Placement::at(Point::new(4.0, 6.0), Size::new(1.0, 1.0));
        assert_eq!(p.to_local_space(Point::new(4.5, 6.5)), Some(Point::new(0.5, 0.5)));
        assert_eq!(p.local_bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
    }
}
