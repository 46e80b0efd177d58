//! Primitive sources: the geometry a bounding volume hierarchy is built over.
//!
//! A tree never owns geometry. Leaves are annotated with lightweight primitive handles
//! (e.g. face indices) and a [`VertexDataBinder`] resolves a handle into the points that
//! define it, both at construction time and whenever the tree is refitted.

pub use self::indexed_mesh::IndexedMesh;
pub use self::point_set::PointSet;
pub use self::vertex_data_binder::{PrimitiveFault, VertexDataBinder};

mod indexed_mesh;
mod point_set;
mod vertex_data_binder;
