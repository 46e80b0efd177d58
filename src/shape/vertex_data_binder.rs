use crate::math::{Point, Real};

/// Reasons why a primitive cannot be bound to its defining points.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimitiveFault {
    /// A polygonal face with more than three vertices was found where only triangles are
    /// supported.
    #[error("only triangle faces are supported, found a face with {vertices} vertices")]
    NonTriangularFace {
        /// The number of vertices of the face.
        vertices: usize,
    },
    /// The primitive references fewer points than it needs to be well-defined.
    #[error("degenerate primitive with {points} defining points, at least {required} required")]
    Degenerate {
        /// The number of points referenced by the primitive.
        points: usize,
        /// The number of points required.
        required: usize,
    },
    /// The primitive references a vertex that does not exist.
    #[error("the primitive references the missing vertex {vertex}")]
    MissingVertex {
        /// The missing vertex index.
        vertex: u32,
    },
    /// The primitive handle itself does not exist in the primitive source.
    #[error("unknown primitive handle")]
    UnknownPrimitive,
}

/// Maps a primitive handle to the positions of the points defining it.
///
/// This is the capability contract between a bounding volume hierarchy and the geometry
/// it is built over: the hierarchy only ever sees points.
pub trait VertexDataBinder<G> {
    /// Appends the current positions of the points defining `primitive` to `out`.
    ///
    /// Malformed primitives (wrong vertex count, dangling indices) must be reported as a
    /// [`PrimitiveFault`]. The content appended to `out` before a failure is discarded by
    /// the callers.
    fn bind(&self, primitive: &G, out: &mut Vec<Point<Real>>) -> Result<(), PrimitiveFault>;
}

impl<G, F> VertexDataBinder<G> for F
where
    F: Fn(&G, &mut Vec<Point<Real>>) -> Result<(), PrimitiveFault>,
{
    #[inline]
    fn bind(&self, primitive: &G, out: &mut Vec<Point<Real>>) -> Result<(), PrimitiveFault> {
        self(primitive, out)
    }
}
