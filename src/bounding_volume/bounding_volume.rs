use crate::math::{Isometry, Point, Real};

/// Trait of bounding volumes.
///
/// Bounding volumes are coarse approximations of geometry. They have constant time
/// intersection and inclusion tests, and two bounding volumes can always be merged into a
/// bigger one enclosing both.
///
/// Implementations must never under-approximate: `a.merged(&b)` contains both `a` and `b`,
/// and `from_points(pts)` contains every point of `pts`.
pub trait BoundingVolume: Clone {
    /// Returns a point inside of this bounding volume. This is ideally its center.
    fn center(&self) -> Point<Real>;

    /// Checks if this bounding volume intersect with another one.
    fn intersects(&self, _: &Self) -> bool;

    /// Checks if `self`, expressed in the local-space of `other` through `pos12`, intersects `other`.
    ///
    /// The transform `pos12` maps points from the frame of `self` to the frame of `other`.
    #[inline]
    fn intersects_transformed(&self, pos12: &Isometry<Real>, other: &Self) -> bool {
        self.transform_by(pos12).intersects(other)
    }

    /// Checks if this bounding volume contains another one.
    fn contains(&self, _: &Self) -> bool;

    /// Checks if this bounding volume contains the given point.
    fn contains_local_point(&self, _: &Point<Real>) -> bool;

    /// Merges this bounding volume with another one. The merge is done in-place.
    fn merge(&mut self, _: &Self);

    /// Merges this bounding volume with another one.
    fn merged(&self, _: &Self) -> Self;

    /// Enlarges this bounding volume.
    fn loosen(&mut self, _: Real);

    /// Creates a new, enlarged version, of this bounding volume.
    fn loosened(&self, _: Real) -> Self;

    /// The volume (in the measure-theoretic sense) enclosed by this bounding volume.
    fn volume(&self) -> Real;

    /// Computes a bounding volume of `self` transformed by `m`.
    fn transform_by(&self, m: &Isometry<Real>) -> Self;

    /// Computes a bounding volume enclosing all the given points.
    fn from_points(points: &[Point<Real>]) -> Self;
}
