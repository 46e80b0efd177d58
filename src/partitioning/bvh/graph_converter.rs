use super::bvh_error::validate_padding;
use super::bvh_refit::{bind_geometry, fit_volume};
use super::{Bvh, BvhBuildError, BvhGraph, ConstructionError, MalformedPrimitivePolicy};
use crate::bounding_volume::BoundingVolume;
use crate::math::Real;
use crate::shape::VertexDataBinder;

/// Converts a flat set of primitives into the initial graph of the bottom-up construction.
///
/// Every primitive becomes a leaf of the tree being built, wrapped into its own graph
/// cluster. Clusters are linked according to the adjacency pairs given by the caller
/// (typically derived from the mesh topology, see
/// [`IndexedMesh::edge_adjacency`](crate::shape::IndexedMesh::edge_adjacency)).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GraphConverter {
    /// Margin added around the bounding volume of every leaf.
    pub padding: Real,
    /// What to do with primitives that can’t be bound to points.
    pub malformed: MalformedPrimitivePolicy,
}

impl GraphConverter {
    /// Creates a new converter.
    pub fn new(padding: Real, malformed: MalformedPrimitivePolicy) -> Self {
        Self { padding, malformed }
    }

    /// Pushes one leaf per primitive into `bvh` and returns the graph of their clusters.
    ///
    /// `adjacency` lists pairs of positions in `primitives`. Self-pairs and duplicate
    /// pairs are ignored. Pairs involving a skipped primitive are dropped.
    ///
    /// On error, `bvh` is left empty.
    ///
    /// # Panics
    ///
    /// Panics if `bvh` isn’t empty.
    pub fn convert<BV, G, B>(
        &self,
        primitives: &[G],
        adjacency: &[(usize, usize)],
        binder: &B,
        bvh: &mut Bvh<BV, G>,
    ) -> Result<BvhGraph<BV>, BvhBuildError>
    where
        BV: BoundingVolume,
        G: Clone,
        B: VertexDataBinder<G> + ?Sized,
    {
        assert!(
            bvh.len() == 0,
            "The graph conversion must start from an empty tree."
        );
        validate_padding(self.padding)?;

        let result = self.push_leaves(primitives, adjacency, binder, bvh);
        if result.is_err() {
            bvh.clear();
        }
        result
    }

    fn push_leaves<BV, G, B>(
        &self,
        primitives: &[G],
        adjacency: &[(usize, usize)],
        binder: &B,
        bvh: &mut Bvh<BV, G>,
    ) -> Result<BvhGraph<BV>, BvhBuildError>
    where
        BV: BoundingVolume,
        G: Clone,
        B: VertexDataBinder<G> + ?Sized,
    {

        let mut graph = BvhGraph::new();
        let mut clusters = Vec::with_capacity(primitives.len());
        let mut points = Vec::new();

        for (index, primitive) in primitives.iter().enumerate() {
            let geometry = core::slice::from_ref(primitive);

            match bind_geometry(binder, geometry, &mut points) {
                Ok(()) => {
                    let bounding_volume: BV = fit_volume(&points, self.padding);
                    let leaf = bvh.push_leaf(bounding_volume.clone(), geometry.into());
                    clusters.push(Some(graph.add_leaf(leaf, bounding_volume)));
                }
                Err(fault) => match self.malformed {
                    MalformedPrimitivePolicy::Abort => {
                        return Err(ConstructionError::MalformedPrimitive { index, fault }.into())
                    }
                    MalformedPrimitivePolicy::Skip => {
                        log::warn!("Skipping malformed primitive #{}: {}", index, fault);
                        clusters.push(None);
                    }
                },
            }
        }

        for &(a, b) in adjacency {
            let (Some(cluster_a), Some(cluster_b)) = (clusters.get(a), clusters.get(b)) else {
                return Err(ConstructionError::InvalidAdjacency(a, b).into());
            };

            if let (Some(cluster_a), Some(cluster_b)) = (cluster_a, cluster_b) {
                let _ = graph.add_edge(*cluster_a, *cluster_b);
            }
        }

        log::debug!(
            "Converted {} primitives into a graph of {} nodes and {} edges.",
            primitives.len(),
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}
