use super::{BvNodeChildren, BvNodeId};
use crate::math::Real;
use crate::utils::SortedPair;
use hashbrown::HashMap;
use slab::Slab;
use smallvec::SmallVec;

/// A cluster of tree nodes waiting to be merged by the bottom-up construction.
///
/// The sub-nodes are tree nodes without a parent yet. The cluster's bounding volume is
/// the merge of theirs. Its level is 0 for clusters of leaves and grows by one every time
/// a contraction creates a new tree level.
#[derive(Clone, Debug)]
pub struct GraphNode<BV> {
    pub(super) sub_nodes: BvNodeChildren,
    pub(super) bounding_volume: BV,
    pub(super) level: u32,
    pub(super) edges: SmallVec<[usize; 8]>,
}

impl<BV> GraphNode<BV> {
    /// The tree nodes of this cluster.
    #[inline]
    pub fn sub_nodes(&self) -> &[BvNodeId] {
        &self.sub_nodes
    }

    /// The merge of the bounding volumes of this cluster’s sub-nodes.
    #[inline]
    pub fn bounding_volume(&self) -> &BV {
        &self.bounding_volume
    }

    /// The height of the tree level this cluster’s sub-nodes belong to.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// The keys of the edges incident to this cluster.
    #[inline]
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }
}

/// An undirected edge between two adjacent clusters, weighted by a merge priority.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GraphEdge {
    pub(super) endpoints: SortedPair<usize>,
    pub(super) priority: Real,
    pub(super) stamp: u64,
}

impl GraphEdge {
    /// The keys of both clusters linked by this edge, smallest first.
    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        self.endpoints.as_tuple()
    }

    /// How desirable the contraction of this edge is. Higher contracts first.
    #[inline]
    pub fn priority(&self) -> Real {
        self.priority
    }

    /// The endpoint of this edge that isn’t `node`.
    #[inline]
    pub fn opposite(&self, node: usize) -> usize {
        if *self.endpoints.first() == node {
            *self.endpoints.second()
        } else {
            *self.endpoints.first()
        }
    }
}

/// The simple undirected graph contracted by the bottom-up construction.
///
/// Nodes are clusters of tree nodes and edges link clusters that may be merged. The
/// graph never contains self-loops nor duplicate edges: contracting an edge collapses the
/// edges that would become parallel.
#[derive(Clone, Debug)]
pub struct BvhGraph<BV> {
    nodes: Slab<GraphNode<BV>>,
    edges: Slab<GraphEdge>,
    edge_index: HashMap<SortedPair<usize>, usize>,
    next_stamp: u64,
}

impl<BV> Default for BvhGraph<BV> {
    fn default() -> Self {
        Self {
            nodes: Slab::new(),
            edges: Slab::new(),
            edge_index: HashMap::new(),
            next_stamp: 0,
        }
    }
}

impl<BV> BvhGraph<BV> {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of clusters of this graph.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The number of edges of this graph.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The cluster with key `key`.
    ///
    /// # Panics
    ///
    /// Panics if no cluster has the key `key`.
    #[inline]
    pub fn node(&self, key: usize) -> &GraphNode<BV> {
        &self.nodes[key]
    }

    /// The edge with key `key`.
    ///
    /// # Panics
    ///
    /// Panics if no edge has the key `key`.
    #[inline]
    pub fn edge(&self, key: usize) -> &GraphEdge {
        &self.edges[key]
    }

    /// The key of the edge linking `a` and `b`, if any.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<usize> {
        self.edge_index.get(&SortedPair::new(a, b)).copied()
    }

    /// The keys of every cluster, in increasing order.
    pub fn node_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().map(|(key, _)| key)
    }

    /// The keys of every edge, in increasing order.
    pub fn edge_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(|(key, _)| key)
    }

    /// Adds a cluster made of the single leaf `leaf` and returns its key.
    pub fn add_leaf(&mut self, leaf: BvNodeId, bounding_volume: BV) -> usize {
        self.nodes.insert(GraphNode {
            sub_nodes: smallvec::smallvec![leaf],
            bounding_volume,
            level: 0,
            edges: SmallVec::new(),
        })
    }

    /// Links the clusters `a` and `b` with an edge of priority 0.
    ///
    /// Returns `None`, leaving the graph unchanged, if `a == b` or if the edge already
    /// exists.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` isn’t a cluster of this graph.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Option<usize> {
        assert!(
            self.nodes.contains(a) && self.nodes.contains(b),
            "Cannot link unknown graph nodes."
        );

        let endpoints = SortedPair::new(a, b);
        if a == b || self.edge_index.contains_key(&endpoints) {
            return None;
        }

        let stamp = self.bump_stamp();
        let key = self.edges.insert(GraphEdge {
            endpoints,
            priority: 0.0,
            stamp,
        });
        let _ = self.edge_index.insert(endpoints, key);
        self.nodes[a].edges.push(key);
        self.nodes[b].edges.push(key);
        Some(key)
    }

    /// Sets the priority of the edge `key` and returns its new stamp.
    ///
    /// Stamps are unique for the lifetime of the graph, so a stamp recorded along with a
    /// priority identifies whether that priority is still current.
    pub(super) fn set_priority(&mut self, key: usize, priority: Real) -> u64 {
        let stamp = self.bump_stamp();
        let edge = &mut self.edges[key];
        edge.priority = priority;
        edge.stamp = stamp;
        stamp
    }

    /// Does the edge `key` still exist with the stamp `stamp`?
    pub(super) fn is_current(&self, key: usize, stamp: u64) -> bool {
        self.edges.get(key).map(|edge| edge.stamp) == Some(stamp)
    }

    /// Contracts the edge `key`, merging its second endpoint into its first one.
    ///
    /// The surviving cluster takes `sub_nodes`, `bounding_volume` and `level`. Edges of the
    /// removed cluster are redirected to the survivor, or removed if the survivor was already
    /// linked to the same neighbor. Returns the key of the survivor.
    ///
    /// The priorities of the survivor’s edges are left as-is and must be recomputed by the
    /// caller.
    pub(super) fn contract(
        &mut self,
        key: usize,
        sub_nodes: BvNodeChildren,
        bounding_volume: BV,
        level: u32,
    ) -> usize {
        let edge = self.edges.remove(key);
        let _ = self.edge_index.remove(&edge.endpoints);
        let (survivor, removed) = edge.endpoints.as_tuple();
        self.nodes[survivor].edges.retain(|e| *e != key);

        for e in self.nodes.remove(removed).edges {
            if e == key {
                continue;
            }

            let old_endpoints = self.edges[e].endpoints;
            let neighbor = self.edges[e].opposite(removed);
            let _ = self.edge_index.remove(&old_endpoints);
            let new_endpoints = SortedPair::new(survivor, neighbor);

            if self.edge_index.contains_key(&new_endpoints) {
                // Parallel to an existing edge of the survivor: collapse.
                let _ = self.edges.remove(e);
                self.nodes[neighbor].edges.retain(|ne| *ne != e);
            } else {
                self.edges[e].endpoints = new_endpoints;
                let _ = self.edge_index.insert(new_endpoints, e);
                self.nodes[survivor].edges.push(e);
            }
        }

        let node = &mut self.nodes[survivor];
        node.sub_nodes = sub_nodes;
        node.bounding_volume = bounding_volume;
        node.level = level;
        survivor
    }

    fn bump_stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }
}
