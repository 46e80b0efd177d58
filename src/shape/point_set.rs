use crate::math::{Isometry, Point, Real};
use crate::shape::{PrimitiveFault, VertexDataBinder};

/// A set of points, each point being a primitive on its own.
///
/// Primitive handles are point indices (`u32`).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PointSet {
    points: Vec<Point<Real>>,
}

impl PointSet {
    /// Creates a point set.
    pub fn new(points: Vec<Point<Real>>) -> Self {
        Self { points }
    }

    /// The points of this set.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// Mutable access to the points of this set, e.g., to move them before a refit.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Point<Real>] {
        &mut self.points
    }

    /// The handles of every point of this set, in order.
    pub fn primitive_ids(&self) -> Vec<u32> {
        (0..self.points.len() as u32).collect()
    }

    /// Applies the isometry `pos` to every point.
    pub fn transform_by(&mut self, pos: &Isometry<Real>) {
        for pt in &mut self.points {
            *pt = pos * *pt;
        }
    }
}

impl VertexDataBinder<u32> for PointSet {
    #[inline]
    fn bind(&self, primitive: &u32, out: &mut Vec<Point<Real>>) -> Result<(), PrimitiveFault> {
        let pt = self
            .points
            .get(*primitive as usize)
            .ok_or(PrimitiveFault::UnknownPrimitive)?;
        out.push(*pt);
        Ok(())
    }
}
