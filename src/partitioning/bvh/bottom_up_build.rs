use super::bvh_error::validate_padding;
use super::{
    BvNodeChildren, BvNodeId, Bvh, BvhBuildError, BvhGraph, ConfigurationError, GraphConverter,
    GraphNode, MalformedPrimitivePolicy,
};
use crate::bounding_volume::BoundingVolume;
use crate::math::Real;
use crate::shape::{IndexedMesh, VertexDataBinder};
use core::cmp::Reverse;
use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// Decides the order in which the bottom-up construction merges clusters, and how.
pub trait MergePolicy<BV> {
    /// How desirable merging the clusters `a` and `b` is.
    ///
    /// The adjacent pair with the highest priority is merged first. Pairs with equal
    /// priorities are merged in the order their priorities were computed.
    fn priority(&self, a: &GraphNode<BV>, b: &GraphNode<BV>) -> Real;

    /// Should the sub-nodes of `a` and `b` be pooled into a single cluster instead of
    /// becoming the two children of a new tree level?
    ///
    /// Pooling yields wider, shallower trees. By default, merges always create a new level.
    fn pools(&self, _a: &GraphNode<BV>, _b: &GraphNode<BV>) -> bool {
        false
    }

    /// Checks the parameters of this policy.
    fn validate(&self) -> Result<(), ConfigurationError> {
        Ok(())
    }
}

/// Merges first the adjacent clusters with the smallest merged volume.
///
/// Every merge creates a new tree level, so the resulting tree is binary.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SmallestVolumePolicy;

impl<BV: BoundingVolume> MergePolicy<BV> for SmallestVolumePolicy {
    #[inline]
    fn priority(&self, a: &GraphNode<BV>, b: &GraphNode<BV>) -> Real {
        -a.bounding_volume().merged(b.bounding_volume()).volume()
    }
}

/// Merges first the adjacent clusters with the smallest merged volume, pooling clusters of
/// the same level together as long as they have at most `max_degree` sub-nodes.
///
/// The resulting tree has internal nodes with up to `max_degree` children.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PooledVolumePolicy {
    /// The maximum number of children of a node created by pooling.
    pub max_degree: usize,
}

impl PooledVolumePolicy {
    /// A policy pooling up to `max_degree` sub-nodes per cluster.
    pub fn new(max_degree: usize) -> Self {
        Self { max_degree }
    }
}

impl Default for PooledVolumePolicy {
    fn default() -> Self {
        Self::new(4)
    }
}

impl<BV: BoundingVolume> MergePolicy<BV> for PooledVolumePolicy {
    #[inline]
    fn priority(&self, a: &GraphNode<BV>, b: &GraphNode<BV>) -> Real {
        SmallestVolumePolicy.priority(a, b)
    }

    fn pools(&self, a: &GraphNode<BV>, b: &GraphNode<BV>) -> bool {
        a.level() == b.level() && a.sub_nodes().len() + b.sub_nodes().len() <= self.max_degree
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_degree < 2 {
            Err(ConfigurationError::InvalidPoolDegree(self.max_degree))
        } else {
            Ok(())
        }
    }
}

/// Parameters of the bottom-up construction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BottomUpOptions {
    /// Margin added around the bounding volume of every leaf.
    pub padding: Real,
    /// What to do with primitives that can’t be bound to points.
    pub malformed: MalformedPrimitivePolicy,
}

impl BottomUpOptions {
    /// Checks these options.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_padding(self.padding)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ContractionHeapEntry {
    priority: OrderedFloat<Real>,
    // Older priorities win ties.
    stamp: Reverse<u64>,
    edge: usize,
}

/// Builds a tree by greedily contracting the edges of the adjacency graph of its leaves.
///
/// Every primitive starts as its own cluster. The adjacent pair of clusters with the
/// highest priority (as defined by the [`MergePolicy`]) is merged, the edges of the merged
/// clusters are collapsed and re-prioritized, and so on until a single cluster remains: it
/// becomes the root of the tree.
///
/// If the adjacency graph is disconnected, the remaining clusters are linked pairwise once
/// no edge is left so the construction always ends with a single root.
#[derive(Copy, Clone, Debug, Default)]
pub struct BottomUpConstructor<P> {
    /// The policy ordering and shaping the merges.
    pub policy: P,
    /// The construction parameters.
    pub options: BottomUpOptions,
}

impl<P> BottomUpConstructor<P> {
    /// Creates a new bottom-up constructor.
    pub fn new(policy: P, options: BottomUpOptions) -> Self {
        Self { policy, options }
    }

    /// Builds into `bvh` the tree of `primitives`, merging only pairs listed in `adjacency`
    /// (as positions in `primitives`) or their clusters.
    ///
    /// On error, `bvh` is left empty.
    ///
    /// # Panics
    ///
    /// Panics if `bvh` isn’t empty.
    pub fn build<BV, G, B>(
        &self,
        primitives: &[G],
        adjacency: &[(usize, usize)],
        binder: &B,
        bvh: &mut Bvh<BV, G>,
    ) -> Result<(), BvhBuildError>
    where
        P: MergePolicy<BV>,
        BV: BoundingVolume,
        G: Clone,
        B: VertexDataBinder<G> + ?Sized,
    {
        self.policy.validate()?;
        self.options.validate()?;

        let converter = GraphConverter::new(self.options.padding, self.options.malformed);

        let graph = converter.convert(primitives, adjacency, binder, bvh)?;
        self.build_from_graph(graph, bvh);
        Ok(())
    }

    /// Contracts `graph` into the tree `bvh`.
    ///
    /// The sub-nodes of the clusters of `graph` must be parentless nodes of `bvh`, as set up
    /// by [`GraphConverter::convert`]. An empty graph leaves the tree empty.
    ///
    /// # Panics
    ///
    /// Panics if `bvh` already has a root.
    pub fn build_from_graph<BV, G>(&self, mut graph: BvhGraph<BV>, bvh: &mut Bvh<BV, G>)
    where
        P: MergePolicy<BV>,
        BV: BoundingVolume,
    {
        assert!(bvh.root.is_none(), "The tree being built already has a root.");

        let mut heap = BinaryHeap::new();
        let edges: Vec<_> = graph.edge_keys().collect();

        for edge in edges {
            self.schedule(&mut graph, edge, &mut heap);
        }

        while graph.node_count() > 1 {
            let Some(entry) = heap.pop() else {
                log::debug!(
                    "Disconnected adjacency graph: linking its {} remaining components.",
                    graph.node_count()
                );
                let clusters: Vec<_> = graph.node_keys().collect();

                for (i, a) in clusters.iter().enumerate() {
                    for b in &clusters[i + 1..] {
                        if let Some(edge) = graph.add_edge(*a, *b) {
                            self.schedule(&mut graph, edge, &mut heap);
                        }
                    }
                }

                continue;
            };

            if !graph.is_current(entry.edge, entry.stamp.0) {
                continue;
            }

            let (a, b) = graph.edge(entry.edge).endpoints();
            let (cluster_a, cluster_b) = (graph.node(a), graph.node(b));
            let bounding_volume = cluster_a
                .bounding_volume()
                .merged(cluster_b.bounding_volume());

            let pools = self.policy.pools(cluster_a, cluster_b);
            let (sub_nodes, level): (BvNodeChildren, u32) = if pools {
                let pooled = cluster_a
                    .sub_nodes()
                    .iter()
                    .chain(cluster_b.sub_nodes())
                    .copied()
                    .collect();
                (pooled, cluster_a.level().max(cluster_b.level()))
            } else {
                let level = cluster_a.level().max(cluster_b.level()) + 1;
                let children = smallvec::smallvec![
                    materialize(bvh, cluster_a),
                    materialize(bvh, cluster_b)
                ];
                (children, level)
            };

            let survivor = graph.contract(entry.edge, sub_nodes, bounding_volume, level);
            let incident = graph.node(survivor).edges().to_vec();

            for edge in incident {
                self.schedule(&mut graph, edge, &mut heap);
            }
        }

        if let Some(last) = graph.node_keys().next() {
            let root = materialize(bvh, graph.node(last));
            bvh.set_root(root);
        }

        log::debug!(
            "Built a bottom-up tree with {} nodes and {} leaves.",
            bvh.len(),
            bvh.leaf_count()
        );
    }

    fn schedule<BV>(
        &self,
        graph: &mut BvhGraph<BV>,
        edge: usize,
        heap: &mut BinaryHeap<ContractionHeapEntry>,
    ) where
        P: MergePolicy<BV>,
    {
        let (a, b) = graph.edge(edge).endpoints();
        let priority = self.policy.priority(graph.node(a), graph.node(b));
        let stamp = graph.set_priority(edge, priority);
        heap.push(ContractionHeapEntry {
            priority: OrderedFloat(priority),
            stamp: Reverse(stamp),
            edge,
        });
    }
}

// The tree node standing for a whole cluster. A cluster with a single sub-node is that
// sub-node itself, so no internal node ever has a single child.
fn materialize<BV: BoundingVolume, G>(bvh: &mut Bvh<BV, G>, cluster: &GraphNode<BV>) -> BvNodeId {
    match cluster.sub_nodes() {
        [single] => *single,
        sub_nodes => bvh.push_internal(sub_nodes.into()),
    }
}

impl<BV: BoundingVolume, G: Clone> Bvh<BV, G> {
    /// Builds a binary tree over `primitives` by merging adjacent clusters with the
    /// smallest merged volume first.
    ///
    /// `adjacency` lists pairs of positions in `primitives` that may be merged together.
    pub fn build_bottom_up<B>(
        primitives: &[G],
        adjacency: &[(usize, usize)],
        binder: &B,
        options: BottomUpOptions,
    ) -> Result<Self, BvhBuildError>
    where
        B: VertexDataBinder<G> + ?Sized,
    {
        let mut result = Bvh::new();
        BottomUpConstructor::new(SmallestVolumePolicy, options).build(
            primitives,
            adjacency,
            binder,
            &mut result,
        )?;
        Ok(result)
    }
}

impl<BV: BoundingVolume> Bvh<BV, u32> {
    /// Builds a tree over the faces of `mesh`, bottom-up, merging faces sharing an edge.
    pub fn from_mesh_bottom_up(
        mesh: &IndexedMesh,
        options: BottomUpOptions,
    ) -> Result<Self, BvhBuildError> {
        Self::build_bottom_up(&mesh.face_ids(), &mesh.edge_adjacency(), mesh, options)
    }
}
