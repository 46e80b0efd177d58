use crate::common::{grid_mesh, random_cloud, sorted};
use bvforge3d::bounding_volume::{Aabb, BoundingVolume, Obb};
use bvforge3d::math::{Isometry, Point, Real, Vector};
use bvforge3d::partitioning::{
    BottomUpOptions, BottomUpRefitter, BvNodeId, Bvh, BvhBuildError, ConstructionError,
    RefitPolicy, TopDownOptions,
};
use bvforge3d::shape::{PointSet, PrimitiveFault};

fn topology<BV>(bvh: &Bvh<BV, u32>) -> Vec<(Option<BvNodeId>, Vec<BvNodeId>, Vec<u32>)> {
    bvh.iter()
        .map(|node| {
            (
                node.parent(),
                node.children().to_vec(),
                node.geometry().to_vec(),
            )
        })
        .collect()
}

#[test]
fn refit_a_deformed_mesh() {
    let mut mesh = grid_mesh(5);
    let mut bvh: Bvh<Obb, u32> =
        Bvh::from_mesh_bottom_up(&mesh, BottomUpOptions::default()).unwrap();
    let before = topology(&bvh);

    for pt in mesh.vertices_mut() {
        pt.z = (pt.x * 0.7).sin() + (pt.y * 1.3).cos();
    }

    bvh.refit(&mesh, 0.0).unwrap();
    bvh.assert_well_formed();
    bvh.assert_encloses_geometry(&mesh);
    assert_eq!(topology(&bvh), before);

    // A second refit over unchanged geometry changes nothing.
    let volumes: Vec<_> = bvh.iter().map(|node| *node.bounding_volume()).collect();
    bvh.refit(&mesh, 0.0).unwrap();
    let again: Vec<_> = bvh.iter().map(|node| *node.bounding_volume()).collect();
    assert_eq!(volumes, again);
}

#[test]
fn refitted_trees_answer_queries_about_the_new_geometry() {
    let a = random_cloud(21, 80, 3.0);
    let b = random_cloud(22, 80, 3.0);
    let options = TopDownOptions {
        padding: 0.2,
        ..TopDownOptions::default()
    };

    let mut far = a.clone();
    far.transform_by(&Isometry::translation(20.0, 0.0, 0.0));
    let mut tree_a: Bvh<Aabb, u32> =
        Bvh::build_top_down(&far.primitive_ids(), &far, options).unwrap();
    let tree_b: Bvh<Aabb, u32> = Bvh::build_top_down(&b.primitive_ids(), &b, options).unwrap();
    assert!(tree_a.intersecting_pairs(&tree_b).is_empty());

    // Move the geometry of `tree_a` back onto `b` and refit with the same margin.
    tree_a.refit(&a, 0.2).unwrap();
    tree_a.assert_well_formed();

    let rebuilt: Bvh<Aabb, u32> = Bvh::build_top_down(&a.primitive_ids(), &a, options).unwrap();
    let expected = sorted(rebuilt.intersecting_pairs(&tree_b));
    assert!(!expected.is_empty());
    assert_eq!(sorted(tree_a.intersecting_pairs(&tree_b)), expected);
}

#[test]
fn enlargement_absorbs_small_motions() {
    let mut points = random_cloud(23, 64, 4.0);
    let mut bvh: Bvh<Aabb, u32> = Bvh::build_top_down(
        &points.primitive_ids(),
        &points,
        TopDownOptions::with_degree(4),
    )
    .unwrap();

    bvh.refit(&points, 0.1).unwrap();
    let enlarged: Vec<_> = bvh.leaf_nodes().iter().map(|leaf| *leaf.bounding_volume()).collect();

    points.transform_by(&Isometry::translation(0.05, -0.05, 0.05));
    for (leaf, volume) in bvh.leaf_nodes().iter().zip(&enlarged) {
        let pt = points.points()[leaf.geometry()[0] as usize];
        assert!(volume.contains_local_point(&pt));
    }
}

#[test]
fn refit_failures_name_the_leaf() {
    let points = random_cloud(24, 10, 1.0);
    let mut bvh: Bvh<Aabb, u32> = Bvh::build_top_down(
        &points.primitive_ids(),
        &points,
        TopDownOptions::default(),
    )
    .unwrap();

    // The binder lost track of the last point.
    let points = PointSet::new(points.points()[..9].to_vec());
    let err = bvh.refit(&points, 0.0).unwrap_err();
    let BvhBuildError::Construction(ConstructionError::MalformedLeafGeometry { node, fault }) = err
    else {
        panic!("Unexpected refit error: {:?}", err);
    };
    assert_eq!(bvh.node(node).geometry(), &[9]);
    assert_eq!(fault, PrimitiveFault::UnknownPrimitive);
}

// Fits every leaf to a sphere of fixed radius around its point, like particles of a fluid.
struct Particles<'a> {
    positions: &'a [Point<Real>],
    radius: Real,
}

impl RefitPolicy<Aabb, u32> for Particles<'_> {
    fn refit(&mut self, bvh: &Bvh<Aabb, u32>, id: BvNodeId) -> Result<Aabb, ConstructionError> {
        let node = bvh.node(id);

        if node.is_leaf() {
            let center = self.positions[node.geometry()[0] as usize];
            Ok(Aabb::from_half_extents(center, Vector::repeat(self.radius)))
        } else {
            let mut result = *bvh.node(node.children()[0]).bounding_volume();
            for child in &node.children()[1..] {
                result.merge(bvh.node(*child).bounding_volume());
            }
            Ok(result)
        }
    }
}

#[test]
fn custom_refit_policy() {
    let mut particles = random_cloud(25, 50, 2.0);
    let mut bvh: Bvh<Aabb, u32> = Bvh::build_top_down(
        &particles.primitive_ids(),
        &particles,
        TopDownOptions::default(),
    )
    .unwrap();

    for pt in particles.points_mut() {
        pt.y *= 3.0;
    }

    let mut refitter = BottomUpRefitter::new();
    let mut policy = Particles {
        positions: particles.points(),
        radius: 0.5,
    };
    refitter.refit(&mut bvh, &mut policy).unwrap();
    bvh.assert_well_formed();

    for leaf in bvh.leaf_nodes() {
        approx::assert_relative_eq!(
            leaf.bounding_volume().half_extents(),
            Vector::repeat(0.5),
            epsilon = 1.0e-5
        );
    }

    let root = bvh.root_bounding_volume().unwrap();
    assert!(root.maxs.y > 5.0);
}
