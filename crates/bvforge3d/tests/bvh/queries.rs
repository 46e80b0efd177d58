use crate::common::{grid_mesh, random_cloud, sorted};
use bvforge3d::bounding_volume::{Aabb, BoundingVolume};
use bvforge3d::math::{Isometry, Point, Real, Vector};
use bvforge3d::partitioning::{BottomUpOptions, Bvh, NodeRef, TopDownOptions};
use bvforge3d::query::{
    CollisionPolicy, MeshAdjacencyExclusion, ModelCollisionQuery, SelfCollisionPolicy,
    SelfCollisionQuery, SingleCollisionQuery, VolumeOverlapPolicy, WorldCollisionQuery,
};
use bvforge3d::shape::PointSet;

const PADDING: Real = 0.25;

fn padded_tree(points: &PointSet, degree: usize) -> Bvh<Aabb, u32> {
    let options = TopDownOptions {
        degree,
        padding: PADDING,
        ..TopDownOptions::default()
    };
    Bvh::build_top_down(&points.primitive_ids(), points, options).unwrap()
}

fn brute_force(a: &PointSet, b: &PointSet) -> Vec<(u32, u32)> {
    let mut result = Vec::new();
    for (i, pa) in a.points().iter().enumerate() {
        for (j, pb) in b.points().iter().enumerate() {
            if (pa - pb).amax() <= 2.0 * PADDING {
                result.push((i as u32, j as u32));
            }
        }
    }
    result
}

#[test]
fn world_query_is_complete_and_symmetric() {
    for seed in 0..5 {
        let a = random_cloud(seed, 150, 6.0);
        let b = random_cloud(seed + 100, 120, 6.0);
        let expected = brute_force(&a, &b);
        assert!(!expected.is_empty());

        for degree in [2, 4, 8] {
            let tree_a = padded_tree(&a, degree);
            let tree_b = padded_tree(&b, 2);

            let mut query = WorldCollisionQuery::new();
            let mut ab = Vec::new();
            let mut ba = Vec::new();
            query
                .run(&tree_a, &tree_b, &mut VolumeOverlapPolicy, &mut ab)
                .unwrap();
            query
                .run(&tree_b, &tree_a, &mut VolumeOverlapPolicy, &mut ba)
                .unwrap();

            let ba = ba.into_iter().map(|(j, i)| (i, j)).collect();
            assert_eq!(sorted(ab), expected);
            assert_eq!(sorted(ba), expected);

            // Pruning is effective.
            assert!(query.workspace().tested_pairs() < tree_a.len() * tree_b.len() / 4);
        }
    }
}

#[test]
fn world_query_between_disjoint_sets_reports_nothing() {
    let a = random_cloud(1, 100, 5.0);
    let mut b = random_cloud(2, 100, 5.0);
    b.transform_by(&Isometry::translation(5.0 + 4.0 * PADDING, 0.0, 0.0));

    let tree_a = padded_tree(&a, 2);
    let tree_b = padded_tree(&b, 4);
    assert!(tree_a.intersecting_pairs(&tree_b).is_empty());
}

#[test]
fn model_query_matches_world_query_on_moved_geometry() {
    let a = random_cloud(3, 100, 4.0);
    let b = random_cloud(4, 100, 4.0);
    let pos12 = Isometry::new(Vector::new(1.0, -0.5, 0.2), Vector::new(0.3, 0.1, -0.7));

    let mut moved_a = a.clone();
    moved_a.transform_by(&pos12);

    let tree_a = padded_tree(&a, 2);
    let tree_b = padded_tree(&b, 2);

    let mut model = ModelCollisionQuery::new();
    let mut results = Vec::new();
    model
        .run(&tree_a, &pos12, &tree_b, &mut VolumeOverlapPolicy, &mut results)
        .unwrap();

    // Transformed boxes are conservative: every overlap of the moved geometry must be found,
    // and every reported pair must be close.
    let results = sorted(results);
    let exact = brute_force(&moved_a, &b);
    assert!(!exact.is_empty());
    for pair in &exact {
        assert!(results.binary_search(pair).is_ok());
    }
    for (i, j) in &results {
        let pa = moved_a.points()[*i as usize];
        let pb = b.points()[*j as usize];
        assert!((pa - pb).norm() <= 4.0 * PADDING * (3.0 as Real).sqrt());
    }
}

#[test]
fn self_query_matches_brute_force() {
    let points = random_cloud(5, 200, 5.0);
    let bvh = padded_tree(&points, 4);

    let results: Vec<_> = bvh
        .self_intersecting_pairs()
        .into_iter()
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();
    let expected: Vec<_> = brute_force(&points, &points)
        .into_iter()
        .filter(|(a, b)| a < b)
        .collect();

    assert!(!expected.is_empty());
    assert_eq!(sorted(results), expected);
}

#[test]
fn self_query_skips_adjacent_faces() {
    let mesh = grid_mesh(4);
    let bvh: Bvh<Aabb, u32> =
        Bvh::from_mesh_bottom_up(&mesh, BottomUpOptions::default()).unwrap();
    bvh.assert_well_formed();

    let normalized = |pairs: Vec<(u32, u32)>| {
        sorted(
            pairs
                .into_iter()
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect(),
        )
    };

    let all = normalized(bvh.self_intersecting_pairs());
    let not_adjacent: Vec<_> = all
        .iter()
        .copied()
        .filter(|(a, b)| !mesh.faces_share_vertex(*a, *b))
        .collect();
    assert!(not_adjacent.len() < all.len());

    let mut query = SelfCollisionQuery::new();
    let mut policy = MeshAdjacencyExclusion::new(&mesh, VolumeOverlapPolicy);
    let mut results = Vec::new();
    query.run(&bvh, &mut policy, &mut results).unwrap();
    assert_eq!(normalized(results), not_adjacent);
}

#[test]
fn single_query_against_a_box() {
    let points = random_cloud(6, 300, 10.0);
    let bvh = padded_tree(&points, 8);
    let region = Aabb::new(Point::new(1.0, 2.0, 3.0), Point::new(4.0, 5.0, 6.0));

    let mut query = SingleCollisionQuery::new();
    let mut results = Vec::new();
    query
        .run(&bvh, &region, &mut VolumeOverlapPolicy, &mut results)
        .unwrap();

    let expected: Vec<_> = points
        .points()
        .iter()
        .enumerate()
        .filter(|(_, pt)| region.loosened(PADDING).contains_local_point(pt))
        .map(|(i, _)| i as u32)
        .collect();
    assert_eq!(sorted(results), expected);
}

// Collects pairs until a maximum is reached, then fails.
struct Limited {
    max: usize,
}

#[derive(Debug, PartialEq)]
struct TooManyContacts(usize);

impl CollisionPolicy<Aabb, u32> for Limited {
    type Results = Vec<(u32, u32)>;
    type Error = TooManyContacts;

    fn reset(&mut self, results: &mut Self::Results) {
        results.clear();
    }

    fn overlap(&mut self, a: NodeRef<'_, Aabb, u32>, b: NodeRef<'_, Aabb, u32>) -> bool {
        a.bounding_volume().intersects(b.bounding_volume())
    }

    fn report(
        &mut self,
        a: NodeRef<'_, Aabb, u32>,
        b: NodeRef<'_, Aabb, u32>,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error> {
        if results.len() == self.max {
            return Err(TooManyContacts(self.max));
        }
        results.push((a.geometry()[0], b.geometry()[0]));
        Ok(())
    }
}

impl SelfCollisionPolicy<Aabb, u32> for Limited {}

#[test]
fn policy_errors_are_propagated() {
    let a = random_cloud(7, 100, 3.0);
    let tree = padded_tree(&a, 2);
    let total = tree.self_intersecting_pairs().len();
    assert!(total > 5);

    let mut results = Vec::new();
    let err = SelfCollisionQuery::new()
        .run(&tree, &mut Limited { max: 5 }, &mut results)
        .unwrap_err();
    assert_eq!(err, TooManyContacts(5));
    assert_eq!(results.len(), 5);

    SelfCollisionQuery::new()
        .run(&tree, &mut Limited { max: total }, &mut results)
        .unwrap();
    assert_eq!(results.len(), total);

    let err = WorldCollisionQuery::new()
        .run(&tree, &tree, &mut Limited { max: 0 }, &mut results)
        .unwrap_err();
    assert_eq!(err, TooManyContacts(0));
    assert!(results.is_empty());
}
