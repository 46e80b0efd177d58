use super::{
    CollisionPolicy, ModelCollisionPolicy, ModelCollisionQuery, SelfCollisionPolicy,
    SelfCollisionQuery, SingleCollisionPolicy, SingleCollisionQuery, WorldCollisionQuery,
};
use crate::bounding_volume::BoundingVolume;
use crate::math::{Isometry, Real};
use crate::partitioning::{Bvh, NodeRef};
use core::convert::Infallible;

/// A collision policy relying only on bounding volume overlaps.
///
/// Two leaves are reported as colliding as soon as their bounding volumes intersect, which is
/// what a broad phase needs. Every pair of primitives annotated on a pair of overlapping
/// leaves is pushed to the results, which are cleared at the start of each query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VolumeOverlapPolicy;

fn push_geometry_pairs<G1: Clone, G2: Clone>(a: &[G1], b: &[G2], results: &mut Vec<(G1, G2)>) {
    for ga in a {
        results.extend(b.iter().map(|gb| (ga.clone(), gb.clone())));
    }
}

impl<BV, G1, G2> CollisionPolicy<BV, G1, BV, G2> for VolumeOverlapPolicy
where
    BV: BoundingVolume,
    G1: Clone,
    G2: Clone,
{
    type Results = Vec<(G1, G2)>;
    type Error = Infallible;

    fn reset(&mut self, results: &mut Self::Results) {
        results.clear();
    }

    #[inline]
    fn overlap(&mut self, a: NodeRef<'_, BV, G1>, b: NodeRef<'_, BV, G2>) -> bool {
        a.bounding_volume().intersects(b.bounding_volume())
    }

    fn report(
        &mut self,
        a: NodeRef<'_, BV, G1>,
        b: NodeRef<'_, BV, G2>,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error> {
        push_geometry_pairs(a.geometry(), b.geometry(), results);
        Ok(())
    }
}

impl<BV, G1, G2> ModelCollisionPolicy<BV, G1, BV, G2> for VolumeOverlapPolicy
where
    BV: BoundingVolume,
    G1: Clone,
    G2: Clone,
{
    type Results = Vec<(G1, G2)>;
    type Error = Infallible;

    fn reset(&mut self, results: &mut Self::Results) {
        results.clear();
    }

    #[inline]
    fn overlap(
        &mut self,
        pos12: &Isometry<Real>,
        a: NodeRef<'_, BV, G1>,
        b: NodeRef<'_, BV, G2>,
    ) -> bool {
        a.bounding_volume()
            .intersects_transformed(pos12, b.bounding_volume())
    }

    fn report(
        &mut self,
        _: &Isometry<Real>,
        a: NodeRef<'_, BV, G1>,
        b: NodeRef<'_, BV, G2>,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error> {
        push_geometry_pairs(a.geometry(), b.geometry(), results);
        Ok(())
    }
}

impl<BV: BoundingVolume, G: Clone> SelfCollisionPolicy<BV, G> for VolumeOverlapPolicy {}

impl<BV, G> SingleCollisionPolicy<BV, G, BV> for VolumeOverlapPolicy
where
    BV: BoundingVolume,
    G: Clone,
{
    type Results = Vec<G>;
    type Error = Infallible;

    fn reset(&mut self, results: &mut Self::Results) {
        results.clear();
    }

    #[inline]
    fn overlap(&mut self, node: NodeRef<'_, BV, G>, object: &BV) -> bool {
        node.bounding_volume().intersects(object)
    }

    fn report(
        &mut self,
        leaf: NodeRef<'_, BV, G>,
        _: &BV,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error> {
        results.extend_from_slice(leaf.geometry());
        Ok(())
    }
}

fn infallible(result: Result<(), Infallible>) {
    match result {
        Ok(()) => {}
        Err(e) => match e {},
    }
}

impl<BV: BoundingVolume, G: Clone> Bvh<BV, G> {
    /// The pairs of primitives of `self` and `other` annotated on leaves with intersecting
    /// bounding volumes.
    ///
    /// Both trees must be expressed in the same frame. See [`WorldCollisionQuery`] for
    /// running this with a reusable workspace or a custom policy.
    ///
    /// # Example
    ///
    /// ```
    /// # #[cfg(all(feature = "dim3", feature = "f32"))] {
    /// use bvforge3d::math::Point;
    /// use bvforge3d::partitioning::{AabbTree, TopDownOptions};
    /// use bvforge3d::shape::PointSet;
    ///
    /// let a = PointSet::new(vec![Point::new(0.0, 0.0, 0.0), Point::new(5.0, 0.0, 0.0)]);
    /// let b = PointSet::new(vec![Point::new(5.0, 0.0, 0.0)]);
    ///
    /// let options = TopDownOptions { padding: 0.5, ..TopDownOptions::default() };
    /// let tree_a = AabbTree::build_top_down(&a.primitive_ids(), &a, options).unwrap();
    /// let tree_b = AabbTree::build_top_down(&b.primitive_ids(), &b, options).unwrap();
    ///
    /// assert_eq!(tree_a.intersecting_pairs(&tree_b), vec![(1, 0)]);
    /// # }
    /// ```
    pub fn intersecting_pairs<G2: Clone>(&self, other: &Bvh<BV, G2>) -> Vec<(G, G2)> {
        let mut results = Vec::new();
        infallible(WorldCollisionQuery::new().run(
            self,
            other,
            &mut VolumeOverlapPolicy,
            &mut results,
        ));
        results
    }

    /// The pairs of primitives of `self` and `other` annotated on leaves with intersecting
    /// bounding volumes, where `pos12` maps the frame of `self` to the frame of `other`.
    pub fn intersecting_pairs_transformed<G2: Clone>(
        &self,
        pos12: &Isometry<Real>,
        other: &Bvh<BV, G2>,
    ) -> Vec<(G, G2)> {
        let mut results = Vec::new();
        infallible(ModelCollisionQuery::new().run(
            self,
            pos12,
            other,
            &mut VolumeOverlapPolicy,
            &mut results,
        ));
        results
    }

    /// The pairs of distinct leaves of this tree with intersecting bounding volumes, as pairs
    /// of primitives. Each unordered pair of leaves appears once.
    pub fn self_intersecting_pairs(&self) -> Vec<(G, G)> {
        let mut results = Vec::new();
        infallible(SelfCollisionQuery::new().run(self, &mut VolumeOverlapPolicy, &mut results));
        results
    }

    /// The primitives annotated on leaves with a bounding volume intersecting `volume`.
    pub fn intersections_with(&self, volume: &BV) -> Vec<G> {
        let mut results = Vec::new();
        infallible(SingleCollisionQuery::new().run(
            self,
            volume,
            &mut VolumeOverlapPolicy,
            &mut results,
        ));
        results
    }
}
