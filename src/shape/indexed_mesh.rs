use crate::math::{Isometry, Point, Real};
use crate::shape::{PrimitiveFault, VertexDataBinder};
use crate::utils::SortedPair;
use hashbrown::{HashMap, HashSet};

/// A polygonal mesh given as vertex positions and faces indexing them.
///
/// Faces are the primitives of the mesh (their handle is their index, as `u32`). Only
/// triangular faces can be bound to points: binding any other face fails with
/// [`PrimitiveFault::NonTriangularFace`] or [`PrimitiveFault::Degenerate`].
///
/// The mesh also provides the face adjacency (its topology) used to seed bottom-up tree
/// construction.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    vertices: Vec<Point<Real>>,
    faces: Vec<Vec<u32>>,
}

impl IndexedMesh {
    /// Creates a mesh from its vertices and polygonal faces.
    ///
    /// Faces are not validated here: malformed faces are reported when bound.
    pub fn new(vertices: Vec<Point<Real>>, faces: Vec<Vec<u32>>) -> Self {
        Self { vertices, faces }
    }

    /// Creates a triangle mesh.
    pub fn from_triangles(vertices: Vec<Point<Real>>, triangles: &[[u32; 3]]) -> Self {
        let faces = triangles.iter().map(|tri| tri.to_vec()).collect();
        Self { vertices, faces }
    }

    /// The vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// Mutable access to the vertex positions, e.g., to deform the mesh before a refit.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [Point<Real>] {
        &mut self.vertices
    }

    /// The faces of this mesh.
    #[inline]
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// The number of faces of this mesh.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The handles of every face of this mesh, in order.
    pub fn face_ids(&self) -> Vec<u32> {
        (0..self.faces.len() as u32).collect()
    }

    /// Applies the isometry `pos` to every vertex.
    pub fn transform_by(&mut self, pos: &Isometry<Real>) {
        for pt in &mut self.vertices {
            *pt = pos * *pt;
        }
    }

    /// Pairs of distinct faces sharing at least one vertex.
    ///
    /// Pairs are sorted (smallest face index first) and returned in increasing order.
    pub fn vertex_adjacency(&self) -> Vec<(usize, usize)> {
        let mut vertex_faces: HashMap<u32, Vec<usize>> = HashMap::new();

        for (fid, face) in self.faces.iter().enumerate() {
            for vid in face {
                let faces = vertex_faces.entry(*vid).or_default();
                if faces.last() != Some(&fid) {
                    faces.push(fid);
                }
            }
        }

        let mut pairs = HashSet::new();
        for faces in vertex_faces.values() {
            for (i, fa) in faces.iter().enumerate() {
                for fb in &faces[i + 1..] {
                    let _ = pairs.insert(SortedPair::new(*fa, *fb));
                }
            }
        }

        Self::sorted_pairs(pairs)
    }

    /// Pairs of distinct faces sharing at least one edge (two consecutive vertices).
    ///
    /// Pairs are sorted (smallest face index first) and returned in increasing order.
    pub fn edge_adjacency(&self) -> Vec<(usize, usize)> {
        let mut edge_faces: HashMap<SortedPair<u32>, Vec<usize>> = HashMap::new();

        for (fid, face) in self.faces.iter().enumerate() {
            for (k, vid) in face.iter().enumerate() {
                let next = face[(k + 1) % face.len()];
                if next != *vid {
                    edge_faces
                        .entry(SortedPair::new(*vid, next))
                        .or_default()
                        .push(fid);
                }
            }
        }

        let mut pairs = HashSet::new();
        for faces in edge_faces.values() {
            for (i, fa) in faces.iter().enumerate() {
                for fb in &faces[i + 1..] {
                    if fa != fb {
                        let _ = pairs.insert(SortedPair::new(*fa, *fb));
                    }
                }
            }
        }

        Self::sorted_pairs(pairs)
    }

    /// Do the faces `a` and `b` share at least one vertex?
    ///
    /// Unknown faces share nothing.
    pub fn faces_share_vertex(&self, a: u32, b: u32) -> bool {
        match (self.faces.get(a as usize), self.faces.get(b as usize)) {
            (Some(fa), Some(fb)) => fa.iter().any(|vid| fb.contains(vid)),
            _ => false,
        }
    }

    fn sorted_pairs(pairs: HashSet<SortedPair<usize>>) -> Vec<(usize, usize)> {
        let mut result: Vec<_> = pairs.into_iter().map(|pair| pair.as_tuple()).collect();
        result.sort_unstable();
        result
    }
}

impl VertexDataBinder<u32> for IndexedMesh {
    fn bind(&self, primitive: &u32, out: &mut Vec<Point<Real>>) -> Result<(), PrimitiveFault> {
        let face = self
            .faces
            .get(*primitive as usize)
            .ok_or(PrimitiveFault::UnknownPrimitive)?;

        match face.len() {
            3 => {}
            n if n > 3 => return Err(PrimitiveFault::NonTriangularFace { vertices: n }),
            n => {
                return Err(PrimitiveFault::Degenerate {
                    points: n,
                    required: 3,
                })
            }
        }

        for vid in face {
            let pt = self
                .vertices
                .get(*vid as usize)
                .ok_or(PrimitiveFault::MissingVertex { vertex: *vid })?;
            out.push(*pt);
        }

        Ok(())
    }
}
