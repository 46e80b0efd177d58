use super::{CollisionPolicy, ModelCollisionPolicy, QueryWorkspace};
use crate::bounding_volume::BoundingVolume;
use crate::math::{Isometry, Real};
use crate::partitioning::{BvNodeId, Bvh, NodeRef};

// What the dual traversal does with the node pairs it visits.
pub(super) trait PairVisitor<BV1, G1, BV2, G2> {
    type Error;

    fn excluded(&mut self, _a: NodeRef<'_, BV1, G1>, _b: NodeRef<'_, BV2, G2>) -> bool {
        false
    }

    fn overlap(&mut self, a: NodeRef<'_, BV1, G1>, b: NodeRef<'_, BV2, G2>) -> bool;

    fn report(
        &mut self,
        a: NodeRef<'_, BV1, G1>,
        b: NodeRef<'_, BV2, G2>,
    ) -> Result<(), Self::Error>;
}

/// Traverses the Bounding Volume Test Tree of `tree1` against `tree2`.
///
/// If `SELF_QUERY` is `true`, both trees must be the same tree: a pair made of twice the same
/// node is then expanded into the pairs of its children (each unordered pair once) instead of
/// being tested.
pub(super) fn traverse_pairs<const SELF_QUERY: bool, BV1, G1, BV2, G2, V>(
    workspace: &mut QueryWorkspace,
    tree1: &Bvh<BV1, G1>,
    tree2: &Bvh<BV2, G2>,
    visitor: &mut V,
) -> Result<(), V::Error>
where
    BV1: BoundingVolume,
    BV2: BoundingVolume,
    V: PairVisitor<BV1, G1, BV2, G2>,
{
    workspace.clear();

    let (Some(root1), Some(root2)) = (tree1.root_id(), tree2.root_id()) else {
        return Ok(());
    };

    workspace.pair_stack.push((root1, root2));

    while let Some((id1, id2)) = workspace.pair_stack.pop() {
        let a = tree1.node_ref(id1);
        let b = tree2.node_ref(id2);

        if SELF_QUERY && id1 == id2 {
            let children = a.children();
            for i in (0..children.len()).rev() {
                for j in (i..children.len()).rev() {
                    workspace.pair_stack.push((children[i], children[j]));
                }
            }
            continue;
        }

        if visitor.excluded(a, b) {
            continue;
        }

        workspace.tested_pairs += 1;

        if !visitor.overlap(a, b) {
            continue;
        }

        match (a.is_leaf(), b.is_leaf()) {
            (true, true) => visitor.report(a, b)?,
            (false, true) => push_pairs(&mut workspace.pair_stack, a.children(), id2, false),
            (true, false) => push_pairs(&mut workspace.pair_stack, b.children(), id1, true),
            (false, false) => {
                if a.volume() > b.volume() {
                    push_pairs(&mut workspace.pair_stack, a.children(), id2, false)
                } else {
                    push_pairs(&mut workspace.pair_stack, b.children(), id1, true)
                }
            }
        }
    }

    Ok(())
}

// Pushes the pairs of each of `children` with `other`, so they are popped in the children’s
// order.
fn push_pairs(
    stack: &mut Vec<(BvNodeId, BvNodeId)>,
    children: &[BvNodeId],
    other: BvNodeId,
    children_second: bool,
) {
    for child in children.iter().rev() {
        if children_second {
            stack.push((other, *child));
        } else {
            stack.push((*child, other));
        }
    }
}

struct WorldVisitor<'a, P, R> {
    policy: &'a mut P,
    results: &'a mut R,
}

impl<BV1, G1, BV2, G2, P, R> PairVisitor<BV1, G1, BV2, G2> for WorldVisitor<'_, P, R>
where
    P: CollisionPolicy<BV1, G1, BV2, G2, Results = R>,
{
    type Error = P::Error;

    #[inline]
    fn overlap(&mut self, a: NodeRef<'_, BV1, G1>, b: NodeRef<'_, BV2, G2>) -> bool {
        self.policy.overlap(a, b)
    }

    #[inline]
    fn report(
        &mut self,
        a: NodeRef<'_, BV1, G1>,
        b: NodeRef<'_, BV2, G2>,
    ) -> Result<(), Self::Error> {
        self.policy.report(a, b, self.results)
    }
}

struct ModelVisitor<'a, P, R> {
    pos12: &'a Isometry<Real>,
    policy: &'a mut P,
    results: &'a mut R,
}

impl<BV1, G1, BV2, G2, P, R> PairVisitor<BV1, G1, BV2, G2> for ModelVisitor<'_, P, R>
where
    P: ModelCollisionPolicy<BV1, G1, BV2, G2, Results = R>,
{
    type Error = P::Error;

    #[inline]
    fn overlap(&mut self, a: NodeRef<'_, BV1, G1>, b: NodeRef<'_, BV2, G2>) -> bool {
        self.policy.overlap(self.pos12, a, b)
    }

    #[inline]
    fn report(
        &mut self,
        a: NodeRef<'_, BV1, G1>,
        b: NodeRef<'_, BV2, G2>,
    ) -> Result<(), Self::Error> {
        self.policy.report(self.pos12, a, b, self.results)
    }
}

/// Collision query between two trees expressed in the same frame.
///
/// Both trees are descended in lock-step from their roots. Pairs of nodes that don’t
/// overlap are pruned, and overlapping pairs of leaves are reported to the policy. When
/// both nodes of an overlapping pair are internal, the one with the largest volume is
/// subdivided.
#[derive(Clone, Debug, Default)]
pub struct WorldCollisionQuery {
    workspace: QueryWorkspace,
}

impl WorldCollisionQuery {
    /// A new query with an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The workspace of this query, with the statistics of the last run.
    pub fn workspace(&self) -> &QueryWorkspace {
        &self.workspace
    }

    /// Runs the query between `tree1` and `tree2`.
    ///
    /// `results` is first reset by the policy. Nothing else happens if either tree is empty.
    /// The first error returned by [`CollisionPolicy::report`] stops the query and is
    /// returned unmodified.
    pub fn run<BV1, G1, BV2, G2, P>(
        &mut self,
        tree1: &Bvh<BV1, G1>,
        tree2: &Bvh<BV2, G2>,
        policy: &mut P,
        results: &mut P::Results,
    ) -> Result<(), P::Error>
    where
        BV1: BoundingVolume,
        BV2: BoundingVolume,
        P: CollisionPolicy<BV1, G1, BV2, G2>,
    {
        policy.reset(results);
        let mut visitor = WorldVisitor { policy, results };
        traverse_pairs::<false, _, _, _, _, _>(&mut self.workspace, tree1, tree2, &mut visitor)
    }
}

/// Collision query between two trees, each expressed in its own local frame.
///
/// This follows the same traversal as [`WorldCollisionQuery`] but hands the rigid
/// transform `pos12` (from the frame of the first tree to the frame of the second tree) to
/// every policy test, so neither tree has to be transformed.
#[derive(Clone, Debug, Default)]
pub struct ModelCollisionQuery {
    workspace: QueryWorkspace,
}

impl ModelCollisionQuery {
    /// A new query with an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// The workspace of this query, with the statistics of the last run.
    pub fn workspace(&self) -> &QueryWorkspace {
        &self.workspace
    }

    /// Runs the query between `tree1`, positioned by `pos12` relative to `tree2`, and
    /// `tree2`.
    ///
    /// `results` is first reset by the policy. Nothing else happens if either tree is empty.
    pub fn run<BV1, G1, BV2, G2, P>(
        &mut self,
        tree1: &Bvh<BV1, G1>,
        pos12: &Isometry<Real>,
        tree2: &Bvh<BV2, G2>,
        policy: &mut P,
        results: &mut P::Results,
    ) -> Result<(), P::Error>
    where
        BV1: BoundingVolume,
        BV2: BoundingVolume,
        P: ModelCollisionPolicy<BV1, G1, BV2, G2>,
    {
        policy.reset(results);
        let mut visitor = ModelVisitor {
            pos12,
            policy,
            results,
        };
        traverse_pairs::<false, _, _, _, _, _>(&mut self.workspace, tree1, tree2, &mut visitor)
    }
}
