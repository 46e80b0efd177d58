//! Oriented Bounding Box.

use crate::bounding_volume::{Aabb, BoundingVolume, CONTAINMENT_TOLERANCE};
use crate::math::{Isometry, Matrix, Point, Real, Rotation, Vector, DIM};
use arrayvec::ArrayVec;
use na::Rotation3;

/// An Oriented Bounding Box (OBB).
///
/// The box is centered at `center`, its local axes are the columns of the rotation matrix of
/// `rotation`, and it extends by `half_extents[i]` on both sides of its `i`-th local axis.
///
/// OBBs fitted with [`BoundingVolume::from_points`] align with the principal directions of
/// the point cloud (eigenvectors of its covariance matrix), which is usually much tighter
/// than an AABB for elongated, rotated geometry.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Obb {
    /// The center of the box.
    pub center: Point<Real>,
    /// Half the box's size along each of its local axes.
    pub half_extents: Vector<Real>,
    /// The orientation of the box's local axes.
    pub rotation: Rotation<Real>,
}

impl Obb {
    /// Creates a new OBB.
    #[inline]
    pub fn new(center: Point<Real>, half_extents: Vector<Real>, rotation: Rotation<Real>) -> Self {
        Self {
            center,
            half_extents,
            rotation,
        }
    }

    /// The OBB with identity orientation matching `aabb` exactly.
    #[inline]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.half_extents(), Rotation::identity())
    }

    /// The local axes of this box, as the columns of a rotation matrix.
    #[inline]
    pub fn axes(&self) -> Matrix<Real> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// The 8 corners of this box.
    pub fn vertices(&self) -> [Point<Real>; 8] {
        let axes = self.axes();
        let hx = axes.column(0) * self.half_extents.x;
        let hy = axes.column(1) * self.half_extents.y;
        let hz = axes.column(2) * self.half_extents.z;

        [
            self.center - hx - hy - hz,
            self.center + hx - hy - hz,
            self.center + hx + hy - hz,
            self.center - hx + hy - hz,
            self.center - hx - hy + hz,
            self.center + hx - hy + hz,
            self.center + hx + hy + hz,
            self.center - hx + hy + hz,
        ]
    }

    /// The smallest AABB enclosing this box.
    pub fn aabb(&self) -> Aabb {
        let ws_half_extents = self.axes().abs() * self.half_extents;
        Aabb::new(self.center - ws_half_extents, self.center + ws_half_extents)
    }

    fn tolerance(&self) -> Real {
        CONTAINMENT_TOLERANCE * (1.0 + self.half_extents.amax())
    }
}

impl BoundingVolume for Obb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center
    }

    /// Separating axis test over the 15 candidate axes (3 face normals of each box and the 9
    /// cross products of their edges).
    fn intersects(&self, other: &Obb) -> bool {
        // Small bias on |r| absorbs near-parallel edges whose cross products are ~0.
        const PARALLEL_EPSILON: Real = 1.0e-6;

        let a_axes = self.axes();
        let b_axes = other.axes();
        let r = a_axes.transpose() * b_axes;
        let abs_r = r.abs().add_scalar(PARALLEL_EPSILON);
        let t = a_axes.transpose() * (other.center - self.center);
        let a = &self.half_extents;
        let b = &other.half_extents;

        for i in 0..DIM {
            let ra = a[i];
            let rb = b[0] * abs_r[(i, 0)] + b[1] * abs_r[(i, 1)] + b[2] * abs_r[(i, 2)];
            if t[i].abs() > ra + rb {
                return false;
            }
        }

        for j in 0..DIM {
            let ra = a[0] * abs_r[(0, j)] + a[1] * abs_r[(1, j)] + a[2] * abs_r[(2, j)];
            let rb = b[j];
            let dist = t[0] * r[(0, j)] + t[1] * r[(1, j)] + t[2] * r[(2, j)];
            if dist.abs() > ra + rb {
                return false;
            }
        }

        for i in 0..DIM {
            let (i1, i2) = ((i + 1) % DIM, (i + 2) % DIM);

            for j in 0..DIM {
                let (j1, j2) = ((j + 1) % DIM, (j + 2) % DIM);
                let ra = a[i1] * abs_r[(i2, j)] + a[i2] * abs_r[(i1, j)];
                let rb = b[j1] * abs_r[(i, j2)] + b[j2] * abs_r[(i, j1)];
                let dist = t[i2] * r[(i1, j)] - t[i1] * r[(i2, j)];

                if dist.abs() > ra + rb {
                    return false;
                }
            }
        }

        true
    }

    fn contains(&self, other: &Obb) -> bool {
        other
            .vertices()
            .iter()
            .all(|pt| self.contains_local_point(pt))
    }

    fn contains_local_point(&self, point: &Point<Real>) -> bool {
        let local = self.rotation.inverse_transform_vector(&(point - self.center));
        let tolerance = self.tolerance();

        (0..DIM).all(|i| local[i].abs() <= self.half_extents[i] + tolerance)
    }

    fn merge(&mut self, other: &Obb) {
        *self = self.merged(other);
    }

    /// Re-fits a box over the 16 corners of both boxes.
    fn merged(&self, other: &Obb) -> Obb {
        let mut corners = ArrayVec::<Point<Real>, 16>::new();
        corners.extend(self.vertices());
        corners.extend(other.vertices());
        Obb::from_points(&corners)
    }

    #[inline]
    fn loosen(&mut self, amount: Real) {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        self.half_extents.add_scalar_mut(amount);
    }

    #[inline]
    fn loosened(&self, amount: Real) -> Obb {
        let mut result = *self;
        result.loosen(amount);
        result
    }

    #[inline]
    fn volume(&self) -> Real {
        8.0 * self.half_extents.x * self.half_extents.y * self.half_extents.z
    }

    #[inline]
    fn transform_by(&self, m: &Isometry<Real>) -> Obb {
        Obb::new(m * self.center, self.half_extents, m.rotation * self.rotation)
    }

    /// Fits a box aligned with the principal directions of `points`.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty.
    fn from_points(points: &[Point<Real>]) -> Self {
        assert!(
            !points.is_empty(),
            "Cannot fit an oriented bounding box to an empty point set."
        );

        let cov = crate::utils::cov(points);
        let mut eigv = cov.symmetric_eigen().eigenvectors;

        if eigv.determinant() < 0.0 {
            eigv = -eigv;
        }

        let rotation = Rotation::from_rotation_matrix(&Rotation3::from_matrix_unchecked(eigv));
        // Project with the axes of the quaternion actually stored so the extents are
        // consistent with `Self::axes`.
        let axes = rotation.to_rotation_matrix().into_inner();

        let mut mins = Vector::repeat(Real::INFINITY);
        let mut maxs = Vector::repeat(-Real::INFINITY);

        for pt in points {
            for i in 0..DIM {
                let dot = axes.column(i).dot(&pt.coords);
                mins[i] = mins[i].min(dot);
                maxs[i] = maxs[i].max(dot);
            }
        }

        let center = Point::from(axes * ((maxs + mins) / 2.0));
        Obb::new(center, (maxs - mins) / 2.0, rotation)
    }
}

#[cfg(test)]
mod test {
    use super::Obb;
    use crate::bounding_volume::{Aabb, BoundingVolume};
    use crate::math::{Isometry, Point, Real, Rotation, Vector};

    fn rotated_box(center: Point<Real>, angle: Real) -> Obb {
        Obb::new(
            center,
            Vector::new(2.0, 0.25, 0.25),
            Rotation::from_axis_angle(&Vector::z_axis(), angle),
        )
    }

    #[test]
    fn fitted_obb_contains_points() {
        let pts = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(4.0, 4.0, 0.0),
            Point::new(2.0, 2.1, 0.1),
            Point::new(1.0, 0.9, -0.1),
        ];
        let obb = Obb::from_points(&pts);

        for pt in &pts {
            assert!(obb.contains_local_point(pt));
        }

        // Elongated diagonal points: the OBB is much tighter than the AABB.
        assert!(obb.volume() < Aabb::from_points(&pts).volume());
    }

    #[test]
    fn separating_axis_test() {
        let a = rotated_box(Point::origin(), core::f64::consts::FRAC_PI_4 as Real);
        let b = rotated_box(Point::new(0.5, 0.5, 0.0), -core::f64::consts::FRAC_PI_4 as Real);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));

        // The AABBs of these two overlap, but the boxes themselves are separated along
        // the diagonal.
        let c = rotated_box(Point::new(1.5, -1.5, 0.0), core::f64::consts::FRAC_PI_4 as Real);
        assert!(a.aabb().intersects(&c.aabb()));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn merged_obb_contains_both() {
        let a = rotated_box(Point::origin(), 0.3);
        let b = rotated_box(Point::new(3.0, 1.0, 0.5), -0.7);
        let ab = a.merged(&b);
        assert!(ab.contains(&a));
        assert!(ab.contains(&b));
    }

    #[test]
    fn transformed_obb_overlap() {
        let a = Obb::from_aabb(&Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0)));
        let b = a;
        let far = Isometry::translation(10.0, 0.0, 0.0);
        assert!(a.intersects_transformed(&Isometry::identity(), &b));
        assert!(!a.intersects_transformed(&far, &b));
    }
}
