use crate::math::{Isometry, Real};
use crate::partitioning::NodeRef;

/// The policy of a [`WorldCollisionQuery`](super::WorldCollisionQuery) between a tree with
/// nodes of type `(BV1, G1)` and a tree with nodes of type `(BV2, G2)`.
pub trait CollisionPolicy<BV1, G1, BV2 = BV1, G2 = G1> {
    /// The caller-owned container filled by [`Self::report`].
    type Results;
    /// The error that may be returned by [`Self::report`]. It stops the query immediately.
    type Error;

    /// Prepares `results` for a new query. Called once at the start of every run, even if
    /// a tree is empty.
    fn reset(&mut self, results: &mut Self::Results);

    /// Do the nodes `a` and `b` possibly overlap? If not, their subtrees are pruned.
    fn overlap(&mut self, a: NodeRef<'_, BV1, G1>, b: NodeRef<'_, BV2, G2>) -> bool;

    /// Handles the overlapping pair of leaves `a` and `b`.
    fn report(
        &mut self,
        a: NodeRef<'_, BV1, G1>,
        b: NodeRef<'_, BV2, G2>,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error>;
}

/// The policy of a [`ModelCollisionQuery`](super::ModelCollisionQuery).
///
/// Same as [`CollisionPolicy`], except that every test is given the rigid transform `pos12`
/// from the local frame of the first tree to the local frame of the second tree.
pub trait ModelCollisionPolicy<BV1, G1, BV2 = BV1, G2 = G1> {
    /// The caller-owned container filled by [`Self::report`].
    type Results;
    /// The error that may be returned by [`Self::report`]. It stops the query immediately.
    type Error;

    /// Prepares `results` for a new query.
    fn reset(&mut self, results: &mut Self::Results);

    /// Do the nodes `a` (transformed by `pos12`) and `b` possibly overlap?
    fn overlap(
        &mut self,
        pos12: &Isometry<Real>,
        a: NodeRef<'_, BV1, G1>,
        b: NodeRef<'_, BV2, G2>,
    ) -> bool;

    /// Handles the overlapping pair of leaves `a` and `b`.
    fn report(
        &mut self,
        pos12: &Isometry<Real>,
        a: NodeRef<'_, BV1, G1>,
        b: NodeRef<'_, BV2, G2>,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error>;
}

/// The policy of a [`SelfCollisionQuery`](super::SelfCollisionQuery).
///
/// Pairs are only ever formed from distinct nodes, and every unordered pair is considered
/// once.
pub trait SelfCollisionPolicy<BV, G>: CollisionPolicy<BV, G> {
    /// Should the pair of distinct nodes `a` and `b` be skipped without any overlap test?
    ///
    /// This is where adjacent primitives (which trivially touch) are excluded. Returning
    /// `true` for internal nodes prunes their whole subtrees. Never excludes anything by
    /// default.
    fn excluded(&mut self, _a: NodeRef<'_, BV, G>, _b: NodeRef<'_, BV, G>) -> bool {
        false
    }
}

/// The policy of a [`SingleCollisionQuery`](super::SingleCollisionQuery) between a tree and
/// a single external object of type `Q`.
pub trait SingleCollisionPolicy<BV, G, Q: ?Sized> {
    /// The caller-owned container filled by [`Self::report`].
    type Results;
    /// The error that may be returned by [`Self::report`]. It stops the query immediately.
    type Error;

    /// Prepares `results` for a new query.
    fn reset(&mut self, results: &mut Self::Results);

    /// Does `node` possibly overlap `object`?
    fn overlap(&mut self, node: NodeRef<'_, BV, G>, object: &Q) -> bool;

    /// Handles the leaf `leaf` overlapping `object`.
    fn report(
        &mut self,
        leaf: NodeRef<'_, BV, G>,
        object: &Q,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error>;
}
