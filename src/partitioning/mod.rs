//! Spatial partitioning tools.

pub use self::bvh::{
    AabbTree, BinderRefitPolicy, BottomUpConstructor, BottomUpOptions, BottomUpRefitter,
    BvNode, BvNodeChildren, BvNodeId, Bvh, BvhBuildError, BvhGraph, ConfigurationError,
    ConstructionError, GraphConverter, GraphEdge, GraphNode, MalformedPrimitivePolicy,
    MergePolicy, NodeRef, ObbTree, PooledVolumePolicy, RefitPolicy, SmallestVolumePolicy,
    SphereTree, TopDownConstructor, TopDownOptions,
};

mod bvh;
