use crate::common::{cube_spanning_triangle, sorted};
use bvforge3d::bounding_volume::{Aabb, BoundingSphere, Obb};
use bvforge3d::math::{Point, Real};
use bvforge3d::partitioning::{BottomUpOptions, Bvh, TopDownOptions};
use bvforge3d::query::{VolumeOverlapPolicy, WorldCollisionQuery};
use bvforge3d::shape::PointSet;

#[test]
fn overlapping_single_triangle_trees() {
    let a = cube_spanning_triangle(0.0);
    let b = cube_spanning_triangle(0.5);
    let far = cube_spanning_triangle(10.0);

    let tree_a: Bvh<Aabb, u32> = Bvh::from_mesh_top_down(&a, TopDownOptions::default()).unwrap();
    let tree_b: Bvh<Aabb, u32> =
        Bvh::from_mesh_bottom_up(&b, BottomUpOptions::default()).unwrap();
    let tree_far: Bvh<Aabb, u32> =
        Bvh::from_mesh_top_down(&far, TopDownOptions::default()).unwrap();

    let root = tree_a.root_bounding_volume().unwrap();
    assert_eq!(root.mins, Point::origin());
    assert_eq!(root.maxs, Point::new(1.0, 1.0, 1.0));

    let mut query = WorldCollisionQuery::new();
    let mut results = Vec::new();

    query
        .run(&tree_a, &tree_b, &mut VolumeOverlapPolicy, &mut results)
        .unwrap();
    assert_eq!(results, vec![(0, 0)]);

    query
        .run(&tree_a, &tree_far, &mut VolumeOverlapPolicy, &mut results)
        .unwrap();
    assert!(results.is_empty());
    assert_eq!(query.workspace().tested_pairs(), 1);
}

#[test]
fn overlapping_single_triangle_trees_with_other_volumes() {
    let a = cube_spanning_triangle(0.0);
    let b = cube_spanning_triangle(0.5);
    let far = cube_spanning_triangle(10.0);

    // Both triangles lie in parallel planes 0.29 apart, so their flat oriented boxes only
    // overlap once padded.
    let padded = TopDownOptions {
        padding: 0.2,
        ..TopDownOptions::default()
    };
    let obb_a: Bvh<Obb, u32> = Bvh::from_mesh_top_down(&a, padded).unwrap();
    let obb_b: Bvh<Obb, u32> = Bvh::from_mesh_top_down(&b, padded).unwrap();
    let obb_far: Bvh<Obb, u32> = Bvh::from_mesh_top_down(&far, padded).unwrap();
    assert_eq!(obb_a.intersecting_pairs(&obb_b), vec![(0, 0)]);
    assert!(obb_a.intersecting_pairs(&obb_far).is_empty());

    let sphere_a: Bvh<BoundingSphere, u32> =
        Bvh::from_mesh_top_down(&a, TopDownOptions::default()).unwrap();
    let sphere_b: Bvh<BoundingSphere, u32> =
        Bvh::from_mesh_top_down(&b, TopDownOptions::default()).unwrap();
    let sphere_far: Bvh<BoundingSphere, u32> =
        Bvh::from_mesh_top_down(&far, TopDownOptions::default()).unwrap();
    assert_eq!(sphere_a.intersecting_pairs(&sphere_b), vec![(0, 0)]);
    assert!(sphere_a.intersecting_pairs(&sphere_far).is_empty());
}

#[test]
fn parents_of_leaves_of_a_balanced_binary_tree() {
    let points = PointSet::new((0..8).map(|i| Point::new(i as Real, 0.0, 0.0)).collect());
    let bvh: Bvh<Aabb, u32> =
        Bvh::build_top_down(&points.primitive_ids(), &points, TopDownOptions::with_degree(2))
            .unwrap();

    bvh.assert_well_formed();
    assert_eq!(bvh.height(), Some(3));

    let parents = bvh.nodes_at_height(1);
    assert_eq!(parents.len(), 4);

    let mut expected: Vec<_> = bvh
        .leaf_nodes()
        .iter()
        .map(|leaf| bvh.parent(leaf.id).unwrap())
        .collect();
    expected.sort();
    expected.dedup();
    assert_eq!(sorted(parents.iter().map(|node| node.id).collect()), expected);

    // Leaves are at height 0, the root at the height of the tree.
    assert_eq!(bvh.nodes_at_height(0).len(), 8);
    assert_eq!(bvh.nodes_at_height(3)[0].id, bvh.root_id().unwrap());
    assert!(bvh.nodes_at_height(4).is_empty());
    assert_eq!(bvh.nodes_at_closest_height(1).len(), 4);
}
