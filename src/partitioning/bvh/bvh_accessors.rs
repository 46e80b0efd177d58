use super::{BvNodeId, Bvh, NodeRef, TRAVERSAL_STACK_SIZE};
use smallvec::SmallVec;
use std::collections::VecDeque;

/*
 * Read-only node selection.
 *
 * None of these walks store anything on the nodes: every bit of bookkeeping (depths,
 * heights) lives in storage local to the call, so they can run concurrently on the same
 * tree and always return the same result on an unmodified tree.
 */
impl<BV, G> Bvh<BV, G> {
    /// The indices of every node reachable from the root, in pre-order.
    ///
    /// Children are visited in order, so the root comes first and a parent always precedes
    /// its children.
    pub fn preorder(&self) -> Vec<BvNodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack: SmallVec<[BvNodeId; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        stack.extend(self.root);

        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.node(id).children().iter().rev().copied());
        }

        result
    }

    /// Every node of this tree, in pre-order.
    pub fn all_nodes(&self) -> Vec<NodeRef<'_, BV, G>> {
        self.preorder()
            .into_iter()
            .map(|id| self.node_ref(id))
            .collect()
    }

    /// Every leaf of this tree, in pre-order (i.e. from the leftmost to the rightmost leaf).
    pub fn leaf_nodes(&self) -> Vec<NodeRef<'_, BV, G>> {
        self.preorder()
            .into_iter()
            .map(|id| self.node_ref(id))
            .filter(|node| node.is_leaf())
            .collect()
    }

    /// The nodes at exactly `depth` edges from the root, from left to right.
    ///
    /// The root is the only node of depth 0. Returns an empty vector if `depth` exceeds the
    /// height of the tree.
    pub fn nodes_at_depth(&self, depth: u32) -> Vec<NodeRef<'_, BV, G>> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.extend(self.root.map(|root| (root, 0)));

        while let Some((id, node_depth)) = queue.pop_front() {
            if node_depth == depth {
                result.push(self.node_ref(id));
            } else {
                queue.extend(
                    self.node(id)
                        .children()
                        .iter()
                        .map(|child| (*child, node_depth + 1)),
                );
            }
        }

        result
    }

    /// The height of the tree, i.e., the number of edges on its longest root-to-leaf path.
    ///
    /// A tree reduced to a single leaf has a height of 0. Returns `None` if the tree is empty.
    pub fn height(&self) -> Option<u32> {
        let root = self.root?;
        Some(self.node_heights()[root.index()])
    }

    /// The nodes of height `height`, in pre-order.
    ///
    /// Leaves have a height of 0 and an internal node is one level higher than its highest
    /// child.
    pub fn nodes_at_height(&self, height: u32) -> Vec<NodeRef<'_, BV, G>> {
        let heights = self.node_heights();
        self.preorder()
            .into_iter()
            .filter(|id| heights[id.index()] == height)
            .map(|id| self.node_ref(id))
            .collect()
    }

    /// The nodes of height `height`, plus the nodes lower than `height` whose parent is
    /// higher than `height`, in pre-order.
    ///
    /// On an unbalanced tree some branches have no node at the exact height. This returns
    /// the closest frontier instead so that the selection still covers every leaf exactly
    /// once. The root is part of that frontier if the whole tree is lower than `height`.
    pub fn nodes_at_closest_height(&self, height: u32) -> Vec<NodeRef<'_, BV, G>> {
        let heights = self.node_heights();
        self.preorder()
            .into_iter()
            .filter(|id| {
                let node_height = heights[id.index()];
                node_height == height
                    || (node_height < height
                        && self
                            .parent(*id)
                            .map(|parent| heights[parent.index()] > height)
                            .unwrap_or(true))
            })
            .map(|id| self.node_ref(id))
            .collect()
    }

    // Heights indexed by node index. Nodes unreachable from the root keep a height of 0.
    fn node_heights(&self) -> Vec<u32> {
        let mut heights = vec![0; self.nodes.len()];

        for id in self.preorder().into_iter().rev() {
            heights[id.index()] = self
                .node(id)
                .children()
                .iter()
                .map(|child| heights[child.index()] + 1)
                .max()
                .unwrap_or(0);
        }

        heights
    }
}
