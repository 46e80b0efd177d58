//! Bounding sphere.

use crate::bounding_volume::{Aabb, BoundingVolume, CONTAINMENT_TOLERANCE};
use crate::math::{Isometry, Point, Real};
use core::f64::consts::PI;
use na;
use num::Zero;

/// A Bounding Sphere.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BoundingSphere {
    /// The center of the sphere.
    pub center: Point<Real>,
    /// The radius of the sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    pub fn new(center: Point<Real>, radius: Real) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// The bounding sphere center.
    #[inline]
    pub fn center(&self) -> &Point<Real> {
        &self.center
    }

    /// The bounding sphere radius.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }
}

impl BoundingVolume for BoundingSphere {
    #[inline]
    fn center(&self) -> Point<Real> {
        *self.center()
    }

    #[inline]
    fn intersects(&self, other: &BoundingSphere) -> bool {
        let delta_pos = other.center - self.center;
        let distance_squared = delta_pos.norm_squared();
        let sum_radius = self.radius + other.radius;

        distance_squared <= sum_radius * sum_radius
    }

    #[inline]
    fn contains(&self, other: &BoundingSphere) -> bool {
        let delta_pos = other.center - self.center;
        let reach = delta_pos.norm() + other.radius;

        reach <= self.radius
            || relative_eq!(reach, self.radius, max_relative = CONTAINMENT_TOLERANCE)
    }

    #[inline]
    fn contains_local_point(&self, point: &Point<Real>) -> bool {
        let dist = na::distance(point, &self.center);
        dist <= self.radius || relative_eq!(dist, self.radius, max_relative = CONTAINMENT_TOLERANCE)
    }

    fn merge(&mut self, other: &BoundingSphere) {
        let mut dir = *other.center() - *self.center();
        let norm = dir.normalize_mut();

        if norm.is_zero() {
            if other.radius > self.radius {
                self.radius = other.radius
            }
        } else {
            let s_center_dir = self.center.coords.dot(&dir);
            let o_center_dir = other.center.coords.dot(&dir);

            let right = if s_center_dir + self.radius > o_center_dir + other.radius {
                self.center + dir * self.radius
            } else {
                other.center + dir * other.radius
            };

            let left = if -s_center_dir + self.radius > -o_center_dir + other.radius {
                self.center - dir * self.radius
            } else {
                other.center - dir * other.radius
            };

            self.center = na::center(&left, &right);
            self.radius = na::distance(&right, &self.center);
        }
    }

    #[inline]
    fn merged(&self, other: &BoundingSphere) -> BoundingSphere {
        let mut res = *self;
        res.merge(other);
        res
    }

    #[inline]
    fn loosen(&mut self, amount: Real) {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        self.radius += amount
    }

    #[inline]
    fn loosened(&self, amount: Real) -> BoundingSphere {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        BoundingSphere::new(self.center, self.radius + amount)
    }

    #[inline]
    fn volume(&self) -> Real {
        let four_thirds_pi = na::convert::<f64, Real>(4.0 / 3.0 * PI);
        four_thirds_pi * self.radius * self.radius * self.radius
    }

    #[inline]
    fn transform_by(&self, m: &Isometry<Real>) -> BoundingSphere {
        BoundingSphere::new(m * self.center, self.radius)
    }

    /// The sphere centered on the AABB of `points`, with the smallest radius enclosing them.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    fn from_points(points: &[Point<Real>]) -> Self {
        assert!(
            !points.is_empty(),
            "Cannot fit a bounding sphere to an empty point set."
        );

        let center = Aabb::from_points(points).center();
        let radius = points
            .iter()
            .map(|pt| na::distance_squared(pt, &center))
            .fold(0.0, Real::max)
            .sqrt();

        BoundingSphere::new(center, radius)
    }
}

#[cfg(test)]
mod test {
    use super::BoundingSphere;
    use crate::bounding_volume::BoundingVolume;
    use crate::math::Point;

    #[test]
    fn merged_sphere_contains_both() {
        let a = BoundingSphere::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Point::new(3.0, 1.0, -2.0), 0.5);
        let ab = a.merged(&b);
        assert!(ab.contains(&a));
        assert!(ab.contains(&b));

        // Merging a contained sphere is a no-op.
        let inner = BoundingSphere::new(Point::new(0.1, 0.0, 0.0), 0.2);
        assert_eq!(a.merged(&inner), a);
    }

    #[test]
    fn fitted_sphere_contains_points() {
        let pts = [
            Point::new(1.0, 0.0, 0.0),
            Point::new(-1.0, 0.0, 0.0),
            Point::new(0.0, 2.0, 0.5),
        ];
        let sphere = BoundingSphere::from_points(&pts);
        assert!(pts.iter().all(|pt| sphere.contains_local_point(pt)));
    }
}
