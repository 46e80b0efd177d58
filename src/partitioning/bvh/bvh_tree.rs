use super::{BvNode, BvNodeChildren, BvNodeId, NodeRef};
use crate::bounding_volume::{Aabb, BoundingSphere, BoundingVolume, Obb};
use smallvec::SmallVec;

/// A bounding volume hierarchy.
///
/// The tree is stored as an arena of [`BvNode`] addressed by [`BvNodeId`]. Every node stores
/// the index of its parent and the ordered indices of its children, so the tree owns its
/// nodes top-down without any reference cycle.
///
/// `BV` is the bounding volume type (see [`Aabb`], [`Obb`], [`BoundingSphere`]) and `G` the
/// primitive handle annotated on leaves (e.g. a face index). Trees are created by the
/// top-down or bottom-up constructors, updated in place by a refit, and read by the
/// accessors and the collision queries.
///
/// Accessing a node with an out-of-range index is a programming error and panics.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Bvh<BV, G> {
    pub(super) nodes: Vec<BvNode<BV, G>>,
    pub(super) root: Option<BvNodeId>,
}

/// A bounding volume hierarchy of axis-aligned bounding boxes.
pub type AabbTree<G> = Bvh<Aabb, G>;
/// A bounding volume hierarchy of oriented bounding boxes.
pub type ObbTree<G> = Bvh<Obb, G>;
/// A bounding volume hierarchy of bounding spheres.
pub type SphereTree<G> = Bvh<BoundingSphere, G>;

impl<BV, G> Default for Bvh<BV, G> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }
}

impl<BV, G> Bvh<BV, G> {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The index of the root node, `None` if the tree is empty.
    #[inline]
    pub fn root_id(&self) -> Option<BvNodeId> {
        self.root
    }

    /// The root node, `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<NodeRef<'_, BV, G>> {
        self.root.map(|id| self.node_ref(id))
    }

    /// The node with index `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` doesn’t identify a node of this tree.
    #[inline]
    pub fn node(&self, id: BvNodeId) -> &BvNode<BV, G> {
        assert!(
            id.index() < self.nodes.len(),
            "Node index {} out of range (tree of {} nodes).",
            id.0,
            self.nodes.len()
        );
        &self.nodes[id.index()]
    }

    /// The node with index `id`, paired with its index.
    ///
    /// # Panics
    ///
    /// Panics if `id` doesn’t identify a node of this tree.
    #[inline]
    pub fn node_ref(&self, id: BvNodeId) -> NodeRef<'_, BV, G> {
        NodeRef {
            id,
            node: self.node(id),
        }
    }

    /// The node with index `id`, if it exists.
    #[inline]
    pub fn get(&self, id: BvNodeId) -> Option<&BvNode<BV, G>> {
        self.nodes.get(id.index())
    }

    /// The parent of the node `id`, `None` for the root.
    #[inline]
    pub fn parent(&self, id: BvNodeId) -> Option<BvNodeId> {
        self.node(id).parent
    }

    /// The ordered children of the node `id`.
    #[inline]
    pub fn children(&self, id: BvNodeId) -> &[BvNodeId] {
        self.node(id).children()
    }

    /// The total number of nodes (internal and leaves) of this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Does this tree not contain any node?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every node of this tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// The number of leaves of this tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// The number of edges between the node `id` and the root.
    pub fn depth_of(&self, id: BvNodeId) -> u32 {
        let mut depth = 0;
        let mut curr = self.node(id).parent;

        while let Some(parent) = curr {
            depth += 1;
            curr = self.nodes[parent.index()].parent;
        }

        depth
    }

    /// Iterates through every node of this tree, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_, BV, G>> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| NodeRef {
                id: BvNodeId(i as u32),
                node,
            })
    }

    pub(super) fn push_leaf(&mut self, bounding_volume: BV, geometry: SmallVec<[G; 1]>) -> BvNodeId {
        let id = self.next_id();
        self.nodes.push(BvNode::leaf(bounding_volume, geometry));
        id
    }

    pub(super) fn set_root(&mut self, id: BvNodeId) {
        assert!(
            self.node(id).parent.is_none(),
            "The root of a tree cannot have a parent."
        );
        self.root = Some(id);
    }

    fn next_id(&self) -> BvNodeId {
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "Too many nodes for a single tree."
        );
        BvNodeId(self.nodes.len() as u32)
    }
}

impl<BV: BoundingVolume, G> Bvh<BV, G> {
    /// The bounding volume of the root, enclosing everything in this tree.
    pub fn root_bounding_volume(&self) -> Option<&BV> {
        self.root.map(|id| self.node(id).bounding_volume())
    }

    /// Creates an internal node adopting `children`, with a bounding volume merging theirs.
    ///
    /// The children must not have a parent yet.
    pub(super) fn push_internal(&mut self, children: BvNodeChildren) -> BvNodeId {
        assert!(
            children.len() >= 2,
            "An internal node must have at least two children."
        );

        let id = self.next_id();
        let bounding_volume = self.merged_volume(&children);

        for child in &children {
            let child = &mut self.nodes[child.index()];
            assert!(child.parent.is_none(), "A node cannot have two parents.");
            child.parent = Some(id);
        }

        self.nodes.push(BvNode::internal(bounding_volume, children));
        id
    }

    /// The merge, in order, of the bounding volumes of the given nodes.
    pub(super) fn merged_volume(&self, ids: &[BvNodeId]) -> BV {
        let (first, rest) = ids
            .split_first()
            .expect("Cannot merge the volumes of an empty node set.");
        let mut result = self.node(*first).bounding_volume.clone();

        for id in rest {
            result.merge(&self.node(*id).bounding_volume);
        }

        result
    }
}
