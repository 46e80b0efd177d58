use bvforge3d::math::{Point, Real};
use bvforge3d::shape::{IndexedMesh, PointSet};

pub fn random_cloud(seed: u64, len: usize, extent: Real) -> PointSet {
    let mut rng = oorandom::Rand32::new(seed);
    PointSet::new(
        (0..len)
            .map(|_| {
                Point::new(
                    rng.rand_float() as Real * extent,
                    rng.rand_float() as Real * extent,
                    rng.rand_float() as Real * extent,
                )
            })
            .collect(),
    )
}

// A `n x n` grid of unit quads in the xy plane, each split into two triangles.
pub fn grid_mesh(n: u32) -> IndexedMesh {
    let mut vertices = Vec::new();
    for i in 0..=n {
        for j in 0..=n {
            vertices.push(Point::new(i as Real, j as Real, 0.0));
        }
    }

    let id = |i: u32, j: u32| i * (n + 1) + j;
    let mut triangles = Vec::new();
    for i in 0..n {
        for j in 0..n {
            triangles.push([id(i, j), id(i + 1, j), id(i + 1, j + 1)]);
            triangles.push([id(i, j), id(i + 1, j + 1), id(i, j + 1)]);
        }
    }

    IndexedMesh::from_triangles(vertices, &triangles)
}

// A triangle whose axis-aligned bounding box is the unit cube translated by `shift`.
pub fn cube_spanning_triangle(shift: Real) -> IndexedMesh {
    let vertices = vec![
        Point::new(shift, shift, shift),
        Point::new(shift + 1.0, shift + 1.0, shift),
        Point::new(shift, shift + 1.0, shift + 1.0),
    ];
    IndexedMesh::from_triangles(vertices, &[[0, 1, 2]])
}

pub fn sorted<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort();
    values
}
