use crate::math::{Point, Real, Vector};

/// The centroid of `points`, all weighted equally.
///
/// # Panics
///
/// Panics if `points` is empty.
#[inline]
pub fn center(points: &[Point<Real>]) -> Point<Real> {
    assert!(
        !points.is_empty(),
        "The centroid of an empty point set is undefined."
    );

    let sum = points
        .iter()
        .fold(Vector::zeros(), |acc: Vector<Real>, pt| acc + pt.coords);
    Point::from(sum / points.len() as Real)
}
