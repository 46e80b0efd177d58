//! Collision queries on bounding volume hierarchies.
//!
//! Four queries share the same divide-and-conquer traversal:
//!
//! * [`SingleCollisionQuery`] to find the leaves of a tree overlapping one external object.
//! * [`WorldCollisionQuery`] to find the overlapping leaves of two trees expressed in the
//!   same frame.
//! * [`ModelCollisionQuery`] to find the overlapping leaves of two trees expressed in
//!   different local frames, related by a rigid transform.
//! * [`SelfCollisionQuery`] to find the overlapping pairs of distinct leaves of one tree.
//!
//! What "overlapping" means, and what is done with an overlapping pair of leaves, is
//! decided by a collision policy: [`SingleCollisionPolicy`], [`CollisionPolicy`],
//! [`ModelCollisionPolicy`] or [`SelfCollisionPolicy`]. [`VolumeOverlapPolicy`] implements
//! all of them with plain bounding volume tests.

pub use self::collision_policy::{
    CollisionPolicy, ModelCollisionPolicy, SelfCollisionPolicy, SingleCollisionPolicy,
};
pub use self::mesh_adjacency_exclusion::MeshAdjacencyExclusion;
pub use self::query_workspace::QueryWorkspace;
pub use self::self_collision_query::SelfCollisionQuery;
pub use self::single_collision_query::SingleCollisionQuery;
pub use self::tree_collision_query::{ModelCollisionQuery, WorldCollisionQuery};
pub use self::volume_overlap_policy::VolumeOverlapPolicy;

mod collision_policy;
mod mesh_adjacency_exclusion;
mod query_workspace;
mod self_collision_query;
mod single_collision_query;
mod tree_collision_query;
mod volume_overlap_policy;
