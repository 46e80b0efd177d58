use crate::common::{grid_mesh, random_cloud};
use bvforge3d::bounding_volume::{Aabb, BoundingSphere, Obb};
use bvforge3d::math::{Point, Real};
use bvforge3d::partitioning::{
    BottomUpConstructor, BottomUpOptions, Bvh, BvhBuildError, ConfigurationError,
    ConstructionError, MalformedPrimitivePolicy, PooledVolumePolicy, TopDownOptions,
};
use bvforge3d::shape::{IndexedMesh, PrimitiveFault};

#[test]
fn bottom_up_over_a_mesh_grid() {
    let mesh = grid_mesh(4);
    let bvh: Bvh<Aabb, u32> =
        Bvh::from_mesh_bottom_up(&mesh, BottomUpOptions::default()).unwrap();

    bvh.assert_well_formed();
    bvh.assert_encloses_geometry(&mesh);
    assert_eq!(bvh.leaf_count(), 32);
    assert_eq!(bvh.len(), 63);
    assert!(bvh.all_nodes().iter().all(|node| node.is_leaf() || node.children().len() == 2));

    let root = bvh.root_bounding_volume().unwrap();
    assert_eq!(root.mins, Point::origin());
    assert_eq!(root.maxs, Point::new(4.0, 4.0, 0.0));
}

#[test]
fn bottom_up_with_pooling() {
    let mesh = grid_mesh(6);
    let constructor =
        BottomUpConstructor::new(PooledVolumePolicy::new(4), BottomUpOptions::default());
    let mut bvh: Bvh<Obb, u32> = Bvh::new();
    constructor
        .build(&mesh.face_ids(), &mesh.edge_adjacency(), &mesh, &mut bvh)
        .unwrap();

    bvh.assert_well_formed();
    bvh.assert_encloses_geometry(&mesh);
    assert_eq!(bvh.leaf_count(), 72);
    assert!(bvh.all_nodes().iter().all(|node| node.children().len() <= 4));
    assert!(bvh.len() < 2 * 72 - 1);

    let invalid =
        BottomUpConstructor::new(PooledVolumePolicy::new(1), BottomUpOptions::default());
    let mut bvh: Bvh<Obb, u32> = Bvh::new();
    assert_eq!(
        invalid.build(&mesh.face_ids(), &mesh.edge_adjacency(), &mesh, &mut bvh),
        Err(ConfigurationError::InvalidPoolDegree(1).into())
    );
    assert!(bvh.is_empty());
}

#[test]
fn top_down_over_every_volume_and_degree() {
    let points = random_cloud(11, 257, 8.0);
    let ids = points.primitive_ids();

    for degree in [2, 4, 8] {
        for max_leaf_size in [1, 3] {
            let options = TopDownOptions {
                degree,
                max_leaf_size,
                ..TopDownOptions::default()
            };

            let aabbs: Bvh<Aabb, u32> = Bvh::build_top_down(&ids, &points, options).unwrap();
            let obbs: Bvh<Obb, u32> = Bvh::build_top_down(&ids, &points, options).unwrap();
            let spheres: Bvh<BoundingSphere, u32> =
                Bvh::build_top_down(&ids, &points, options).unwrap();

            aabbs.assert_well_formed();
            aabbs.assert_encloses_geometry(&points);
            obbs.assert_well_formed();
            obbs.assert_encloses_geometry(&points);
            spheres.assert_well_formed();
            spheres.assert_encloses_geometry(&points);

            let leaf_geometry: usize = aabbs
                .leaf_nodes()
                .iter()
                .map(|leaf| {
                    assert!(leaf.geometry().len() <= max_leaf_size);
                    leaf.geometry().len()
                })
                .sum();
            assert_eq!(leaf_geometry, 257);
            assert!(aabbs
                .all_nodes()
                .iter()
                .all(|node| node.children().len() <= degree));
        }
    }
}

#[test]
fn configuration_errors() {
    let points = random_cloud(12, 10, 1.0);
    let ids = points.primitive_ids();

    let result = Bvh::<Aabb, u32>::build_top_down(&ids, &points, TopDownOptions::with_degree(3));
    assert_eq!(
        result.unwrap_err(),
        BvhBuildError::Configuration(ConfigurationError::UnsupportedDegree(3))
    );

    let options = TopDownOptions {
        max_leaf_size: 0,
        ..TopDownOptions::default()
    };
    let result = Bvh::<Aabb, u32>::build_top_down(&ids, &points, options);
    assert_eq!(result.unwrap_err(), ConfigurationError::ZeroLeafSize.into());

    let options = BottomUpOptions {
        padding: -1.0,
        ..BottomUpOptions::default()
    };
    let result = Bvh::<Aabb, u32>::build_bottom_up(&ids, &[], &points, options);
    assert_eq!(
        result.unwrap_err(),
        ConfigurationError::InvalidPadding(-1.0).into()
    );

    let options = TopDownOptions {
        padding: Real::NAN,
        ..TopDownOptions::default()
    };
    let result = Bvh::<Aabb, u32>::build_top_down(&ids, &points, options);
    assert!(matches!(
        result,
        Err(BvhBuildError::Configuration(ConfigurationError::InvalidPadding(_)))
    ));
}

fn mesh_with_a_quad() -> IndexedMesh {
    let vertices = vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(1.0, 1.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(2.0, 0.0, 0.0),
    ];
    let faces = vec![vec![0, 1, 2], vec![0, 1, 2, 3], vec![1, 4, 2], vec![2, 4, 7]];
    IndexedMesh::new(vertices, faces)
}

#[test]
fn malformed_faces() {
    let mesh = mesh_with_a_quad();

    let result = Bvh::<Aabb, u32>::from_mesh_top_down(&mesh, TopDownOptions::default());
    assert_eq!(
        result.unwrap_err(),
        ConstructionError::MalformedPrimitive {
            index: 1,
            fault: PrimitiveFault::NonTriangularFace { vertices: 4 },
        }
        .into()
    );

    let skip = TopDownOptions {
        malformed: MalformedPrimitivePolicy::Skip,
        ..TopDownOptions::default()
    };
    let bvh = Bvh::<Aabb, u32>::from_mesh_top_down(&mesh, skip).unwrap();
    bvh.assert_well_formed();
    let mut faces: Vec<_> = bvh.leaf_nodes().iter().map(|leaf| leaf.geometry()[0]).collect();
    faces.sort();
    assert_eq!(faces, vec![0, 2]);

    let result = Bvh::<Aabb, u32>::from_mesh_bottom_up(&mesh, BottomUpOptions::default());
    assert_eq!(
        result.unwrap_err(),
        ConstructionError::MalformedPrimitive {
            index: 1,
            fault: PrimitiveFault::NonTriangularFace { vertices: 4 },
        }
        .into()
    );

    let skip = BottomUpOptions {
        malformed: MalformedPrimitivePolicy::Skip,
        ..BottomUpOptions::default()
    };
    let bvh = Bvh::<Aabb, u32>::from_mesh_bottom_up(&mesh, skip).unwrap();
    bvh.assert_well_formed();
    assert_eq!(bvh.leaf_count(), 2);
}

#[test]
fn invalid_adjacency() {
    let mesh = grid_mesh(1);
    let result = Bvh::<Aabb, u32>::build_bottom_up(
        &mesh.face_ids(),
        &[(0, 1), (1, 2)],
        &mesh,
        BottomUpOptions::default(),
    );
    assert_eq!(
        result.unwrap_err(),
        ConstructionError::InvalidAdjacency(1, 2).into()
    );
}
