use crate::bounding_volume::BoundingVolume;
use crate::math::Real;
use core::ops::Deref;
use smallvec::SmallVec;

/// An index identifying a single node of a [`Bvh`](super::Bvh).
///
/// Indices are stable for the lifetime of the tree: refitting never moves nodes, and
/// rebuilding produces a new tree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvNodeId(pub u32);

impl BvNodeId {
    /// The position of this node in the tree's node arena.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The children list of an internal node.
///
/// Binary trees (the most common case) never spill to the heap.
pub type BvNodeChildren = SmallVec<[BvNodeId; 2]>;

/// A node (internal or leaf) of a bounding volume hierarchy.
///
/// A node is a leaf if and only if it has no children. Only leaves carry geometry: the
/// primitives (`G` handles) they were built from.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvNode<BV, G> {
    pub(super) bounding_volume: BV,
    pub(super) children: BvNodeChildren,
    pub(super) parent: Option<BvNodeId>,
    pub(super) geometry: SmallVec<[G; 1]>,
}

impl<BV, G> BvNode<BV, G> {
    #[inline]
    pub(super) fn leaf(bounding_volume: BV, geometry: SmallVec<[G; 1]>) -> Self {
        Self {
            bounding_volume,
            children: BvNodeChildren::new(),
            parent: None,
            geometry,
        }
    }

    #[inline]
    pub(super) fn internal(bounding_volume: BV, children: BvNodeChildren) -> Self {
        Self {
            bounding_volume,
            children,
            parent: None,
            geometry: SmallVec::new(),
        }
    }

    /// Is this node a leaf?
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Is this node the root of its tree?
    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The ordered children of this node. Empty for leaves.
    #[inline(always)]
    pub fn children(&self) -> &[BvNodeId] {
        &self.children
    }

    /// The parent of this node, `None` for the root.
    #[inline(always)]
    pub fn parent(&self) -> Option<BvNodeId> {
        self.parent
    }

    /// The geometry annotated on this node. Empty for internal nodes.
    #[inline(always)]
    pub fn geometry(&self) -> &[G] {
        &self.geometry
    }

    /// This node’s bounding volume.
    #[inline(always)]
    pub fn bounding_volume(&self) -> &BV {
        &self.bounding_volume
    }
}

impl<BV: BoundingVolume, G> BvNode<BV, G> {
    /// The volume enclosed by this node’s bounding volume.
    #[inline]
    pub fn volume(&self) -> Real {
        self.bounding_volume.volume()
    }
}

/// A node of a tree together with its index.
///
/// This is what traversals hand over to collision policies.
#[derive(Debug)]
pub struct NodeRef<'a, BV, G> {
    /// The index of the node in its tree.
    pub id: BvNodeId,
    /// The node itself.
    pub node: &'a BvNode<BV, G>,
}

impl<BV, G> Clone for NodeRef<'_, BV, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<BV, G> Copy for NodeRef<'_, BV, G> {}

impl<BV, G> Deref for NodeRef<'_, BV, G> {
    type Target = BvNode<BV, G>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.node
    }
}
