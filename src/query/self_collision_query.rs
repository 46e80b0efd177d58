use super::tree_collision_query::{traverse_pairs, PairVisitor};
use super::{QueryWorkspace, SelfCollisionPolicy};
use crate::bounding_volume::BoundingVolume;
use crate::partitioning::{Bvh, NodeRef};

struct SelfVisitor<'a, P, R> {
    policy: &'a mut P,
    results: &'a mut R,
}

impl<BV, G, P, R> PairVisitor<BV, G, BV, G> for SelfVisitor<'_, P, R>
where
    P: SelfCollisionPolicy<BV, G, Results = R>,
{
    type Error = P::Error;

    #[inline]
    fn excluded(&mut self, a: NodeRef<'_, BV, G>, b: NodeRef<'_, BV, G>) -> bool {
        self.policy.excluded(a, b)
    }

    #[inline]
    fn overlap(&mut self, a: NodeRef<'_, BV, G>, b: NodeRef<'_, BV, G>) -> bool {
        self.policy.overlap(a, b)
    }

    #[inline]
    fn report(&mut self, a: NodeRef<'_, BV, G>, b: NodeRef<'_, BV, G>) -> Result<(), Self::Error> {
        self.policy.report(a, b, self.results)
    }
}

/// Collision query of a tree against itself.
///
/// The traversal starts with the pair `(root, root)`. A pair made of twice the same node
/// is expanded into the pairs of its children, each unordered pair considered once, so a
/// leaf is never reported against itself and no pair of leaves is reported twice. Pairs
/// rejected by [`SelfCollisionPolicy::excluded`] are skipped with their subtrees.
#[derive(Clone, Debug, Default)]
pub struct SelfCollisionQuery {
    workspace: QueryWorkspace,
}

impl SelfCollisionQuery {
    /// A new query with an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The workspace of this query, with the statistics of the last run.
    pub fn workspace(&self) -> &QueryWorkspace {
        &self.workspace
    }

    /// Runs the self-collision query of `tree`.
    ///
    /// `results` is first reset by the policy. Nothing else happens if the tree is empty.
    pub fn run<BV, G, P>(
        &mut self,
        tree: &Bvh<BV, G>,
        policy: &mut P,
        results: &mut P::Results,
    ) -> Result<(), P::Error>
    where
        BV: BoundingVolume,
        P: SelfCollisionPolicy<BV, G>,
    {
        policy.reset(results);
        let mut visitor = SelfVisitor { policy, results };
        traverse_pairs::<true, _, _, _, _, _>(&mut self.workspace, tree, tree, &mut visitor)
    }
}
