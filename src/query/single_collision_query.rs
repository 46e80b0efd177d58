use super::{QueryWorkspace, SingleCollisionPolicy};
use crate::partitioning::Bvh;

/// Collision query between a tree and a single external object.
///
/// The object (a bounding volume, a signed distance field, any type the policy knows how to
/// test against a node) is never subdivided: only the tree is descended, pruning the
/// subtrees of nodes that don’t overlap the object.
#[derive(Clone, Debug, Default)]
pub struct SingleCollisionQuery {
    workspace: QueryWorkspace,
}

impl SingleCollisionQuery {
    /// A new query with an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The workspace of this query, with the statistics of the last run.
    pub fn workspace(&self) -> &QueryWorkspace {
        &self.workspace
    }

    /// Runs the query between `tree` and `object`.
    ///
    /// `results` is first reset by the policy. Nothing else happens if the tree is empty.
    pub fn run<BV, G, Q, P>(
        &mut self,
        tree: &Bvh<BV, G>,
        object: &Q,
        policy: &mut P,
        results: &mut P::Results,
    ) -> Result<(), P::Error>
    where
        Q: ?Sized,
        P: SingleCollisionPolicy<BV, G, Q>,
    {
        policy.reset(results);
        self.workspace.clear();

        let Some(root) = tree.root_id() else {
            return Ok(());
        };

        let stack = &mut self.workspace.node_stack;
        stack.push(root);

        while let Some(id) = stack.pop() {
            let node = tree.node_ref(id);
            self.workspace.tested_pairs += 1;

            if !policy.overlap(node, object) {
                continue;
            }

            if node.is_leaf() {
                policy.report(node, object, results)?;
            } else {
                stack.extend(node.children().iter().rev().copied());
            }
        }

        Ok(())
    }
}
