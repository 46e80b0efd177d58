use super::{BvNodeId, Bvh};
use crate::bounding_volume::BoundingVolume;
use crate::shape::VertexDataBinder;
use hashbrown::HashSet;

impl<BV, G> Bvh<BV, G> {
    /// Similar to [`Self::assert_well_formed`] but doesn’t check the geometry (i.e. it won’t
    /// check that parent volumes enclose child volumes).
    pub fn assert_well_formed_topology_only(&self) {
        self.assert_topology(&mut |_, _| {})
    }

    // Checks the topology and calls `f(parent, child)` on every parent-child link.
    fn assert_topology(&self, f: &mut impl FnMut(BvNodeId, BvNodeId)) {
        let Some(root) = self.root else {
            assert!(self.nodes.is_empty(), "An empty tree cannot have nodes.");
            return;
        };

        assert!(self.node(root).is_root(), "The root cannot have a parent.");

        let mut loop_detection = HashSet::new();
        let leaf_count = self.assert_well_formed_recurse(root, &mut loop_detection, f);

        assert_eq!(
            loop_detection.len(),
            self.nodes.len(),
            "Some nodes are not reachable from the root."
        );
        assert_eq!(leaf_count, self.leaf_count());
    }

    fn assert_well_formed_recurse(
        &self,
        id: BvNodeId,
        loop_detection: &mut HashSet<BvNodeId>,
        f: &mut impl FnMut(BvNodeId, BvNodeId),
    ) -> usize {
        if !loop_detection.insert(id) {
            panic!("Detected loop. Node {} visited twice.", id.0);
        }

        let node = self.node(id);

        if node.is_leaf() {
            assert!(
                !node.geometry().is_empty(),
                "Leaf {} has no geometry.",
                id.0
            );
            return 1;
        }

        assert!(
            node.geometry().is_empty(),
            "Internal node {} carries geometry.",
            id.0
        );
        assert!(
            node.children().len() >= 2,
            "Internal node {} has a single child.",
            id.0
        );

        let mut leaf_count = 0;

        for child in node.children() {
            assert_eq!(
                self.node(*child).parent(),
                Some(id),
                "Wrong parent link on node {}.",
                child.0
            );
            f(id, *child);
            leaf_count += self.assert_well_formed_recurse(*child, loop_detection, f);
        }

        leaf_count
    }
}

impl<BV: BoundingVolume, G> Bvh<BV, G> {
    /// Panics if the tree isn’t well-formed.
    ///
    /// The tree is well-formed if it is topologically correct (every node is reachable from
    /// the root exactly once, parent links match child lists, internal nodes have at least
    /// two children and no geometry, leaves have geometry) and geometrically correct (the
    /// bounding volume of a parent contains the ones of its children).
    pub fn assert_well_formed(&self) {
        self.assert_topology(&mut |parent, child| {
            assert!(
                self.node(parent)
                    .bounding_volume()
                    .contains(self.node(child).bounding_volume()),
                "The volume of node {} doesn’t contain the volume of its child {}.",
                parent.0,
                child.0
            );
        })
    }

    /// Panics if the bounding volume of a leaf doesn’t contain every point of its geometry,
    /// as given by `binder`.
    ///
    /// Together with [`Self::assert_well_formed`], this checks that every node encloses all
    /// the geometry of its subtree.
    pub fn assert_encloses_geometry<B>(&self, binder: &B)
    where
        B: VertexDataBinder<G> + ?Sized,
    {
        let mut points = Vec::new();

        for leaf in self.leaf_nodes() {
            points.clear();

            for primitive in leaf.geometry() {
                if let Err(fault) = binder.bind(primitive, &mut points) {
                    panic!("Leaf {} has malformed geometry: {}", leaf.id.0, fault);
                }
            }

            for pt in &points {
                assert!(
                    leaf.bounding_volume().contains_local_point(pt),
                    "Leaf {} doesn’t contain the point {:?} of its geometry.",
                    leaf.id.0,
                    pt
                );
            }
        }
    }
}
