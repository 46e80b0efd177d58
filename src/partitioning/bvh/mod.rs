pub use bottom_up_build::{
    BottomUpConstructor, BottomUpOptions, MergePolicy, PooledVolumePolicy, SmallestVolumePolicy,
};
pub use bv_node::{BvNode, BvNodeChildren, BvNodeId, NodeRef};
pub use bvh_error::{BvhBuildError, ConfigurationError, ConstructionError, MalformedPrimitivePolicy};
pub use bvh_graph::{BvhGraph, GraphEdge, GraphNode};
pub use bvh_refit::{BinderRefitPolicy, BottomUpRefitter, RefitPolicy};
pub use bvh_tree::{AabbTree, Bvh, ObbTree, SphereTree};
pub use graph_converter::GraphConverter;
pub use top_down_build::{TopDownConstructor, TopDownOptions};

mod bottom_up_build;
mod bv_node;
mod bvh_accessors;
mod bvh_error;
mod bvh_graph;
mod bvh_refit;
mod bvh_tree;
mod bvh_validation;
mod graph_converter;
mod top_down_build;


pub(crate) const TRAVERSAL_STACK_SIZE: usize = 32;
