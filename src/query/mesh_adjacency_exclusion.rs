use super::{CollisionPolicy, SelfCollisionPolicy};
use crate::partitioning::NodeRef;
use crate::shape::IndexedMesh;

/// Wraps a self-collision policy to skip the pairs of mesh faces sharing a vertex.
///
/// Adjacent faces of a mesh always touch, so reporting them as colliding is rarely useful.
/// A pair of leaves is excluded if every face of the first leaf shares a vertex with every
/// face of the second leaf. Everything else is delegated to the wrapped policy.
#[derive(Clone, Debug)]
pub struct MeshAdjacencyExclusion<'a, P> {
    mesh: &'a IndexedMesh,
    inner: P,
}

impl<'a, P> MeshAdjacencyExclusion<'a, P> {
    /// Wraps `inner` to exclude adjacent faces of `mesh`.
    ///
    /// The tree queried must be annotated with the face indices of `mesh`.
    pub fn new(mesh: &'a IndexedMesh, inner: P) -> Self {
        Self { mesh, inner }
    }

    /// The wrapped policy.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwraps the wrapped policy.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<BV, P> CollisionPolicy<BV, u32> for MeshAdjacencyExclusion<'_, P>
where
    P: CollisionPolicy<BV, u32>,
{
    type Results = P::Results;
    type Error = P::Error;

    #[inline]
    fn reset(&mut self, results: &mut Self::Results) {
        self.inner.reset(results)
    }

    #[inline]
    fn overlap(&mut self, a: NodeRef<'_, BV, u32>, b: NodeRef<'_, BV, u32>) -> bool {
        self.inner.overlap(a, b)
    }

    #[inline]
    fn report(
        &mut self,
        a: NodeRef<'_, BV, u32>,
        b: NodeRef<'_, BV, u32>,
        results: &mut Self::Results,
    ) -> Result<(), Self::Error> {
        self.inner.report(a, b, results)
    }
}

impl<BV, P> SelfCollisionPolicy<BV, u32> for MeshAdjacencyExclusion<'_, P>
where
    P: SelfCollisionPolicy<BV, u32>,
{
    fn excluded(&mut self, a: NodeRef<'_, BV, u32>, b: NodeRef<'_, BV, u32>) -> bool {
        if self.inner.excluded(a, b) {
            return true;
        }

        a.is_leaf()
            && b.is_leaf()
            && a.geometry().iter().all(|fa| {
                b.geometry()
                    .iter()
                    .all(|fb| self.mesh.faces_share_vertex(*fa, *fb))
            })
    }
}
