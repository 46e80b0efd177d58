use crate::math::{Matrix, Point, Real};

/// The covariance matrix of `points`.
///
/// # Panics
///
/// Panics if `points` is empty.
pub fn cov(points: &[Point<Real>]) -> Matrix<Real> {
    center_cov(points).1
}

/// The centroid and the covariance matrix of `points`.
///
/// # Panics
///
/// Panics if `points` is empty.
pub fn center_cov(points: &[Point<Real>]) -> (Point<Real>, Matrix<Real>) {
    let centroid = super::center(points);
    let weight = 1.0 / points.len() as Real;

    let cov = points.iter().fold(Matrix::zeros(), |acc: Matrix<Real>, pt| {
        let d = pt - centroid;
        acc + d * d.transpose() * weight
    });

    (centroid, cov)
}
