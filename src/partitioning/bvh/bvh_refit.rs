use super::{BvNodeId, Bvh, BvhBuildError, ConfigurationError, ConstructionError};
use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real};
use crate::shape::{PrimitiveFault, VertexDataBinder};

/// Computes the up-to-date bounding volume of a single node.
///
/// A policy only looks at one node. It may assume that the bounding volumes of the node’s
/// children are already up-to-date; calling it in any other order yields stale (but not
/// invalid) results. Ordering is the job of the driver, see [`BottomUpRefitter`].
pub trait RefitPolicy<BV, G> {
    /// The new bounding volume of the node `node` of `bvh`.
    fn refit(&mut self, bvh: &Bvh<BV, G>, node: BvNodeId) -> Result<BV, ConstructionError>;
}

/// The refit policy reading leaf geometry through a [`VertexDataBinder`].
///
/// Leaves get the tightest bounding volume of the current points of their geometry,
/// enlarged by a constant `enlargement`. Internal nodes get the merge of their children’s
/// bounding volumes.
pub struct BinderRefitPolicy<'a, B: ?Sized> {
    binder: &'a B,
    enlargement: Real,
    points: Vec<Point<Real>>,
}

impl<'a, B: ?Sized> BinderRefitPolicy<'a, B> {
    /// Creates a refit policy reading leaf geometry through `binder`.
    ///
    /// Fails with [`ConfigurationError::InvalidEnlargement`] if `enlargement` is negative
    /// or not finite.
    pub fn new(binder: &'a B, enlargement: Real) -> Result<Self, ConfigurationError> {
        if !(enlargement.is_finite() && enlargement >= 0.0) {
            return Err(ConfigurationError::InvalidEnlargement(enlargement));
        }

        Ok(Self {
            binder,
            enlargement,
            points: Vec::new(),
        })
    }

    /// The margin added around the geometry of every leaf.
    pub fn enlargement(&self) -> Real {
        self.enlargement
    }
}

impl<BV, G, B> RefitPolicy<BV, G> for BinderRefitPolicy<'_, B>
where
    BV: BoundingVolume,
    B: VertexDataBinder<G> + ?Sized,
{
    fn refit(&mut self, bvh: &Bvh<BV, G>, id: BvNodeId) -> Result<BV, ConstructionError> {
        let node = bvh.node(id);

        if node.is_leaf() {
            bind_geometry(self.binder, node.geometry(), &mut self.points)
                .map_err(|fault| ConstructionError::MalformedLeafGeometry { node: id, fault })?;
            Ok(fit_volume(&self.points, self.enlargement))
        } else {
            Ok(bvh.merged_volume(node.children()))
        }
    }
}

/// Drives a [`RefitPolicy`] over a whole tree, children first.
///
/// The refitter keeps its traversal buffer between calls so refitting the same tree every
/// frame doesn’t allocate.
#[derive(Clone, Debug, Default)]
pub struct BottomUpRefitter {
    order: Vec<BvNodeId>,
}

impl BottomUpRefitter {
    /// Creates a new refitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the bounding volume of every node of `bvh` by the one computed by `policy`.
    ///
    /// Every node is refitted after all its children. The topology of the tree is never
    /// modified. If the policy fails, the error is returned immediately and the tree is left
    /// partially refitted: it must not be queried until it is successfully refitted or
    /// rebuilt.
    pub fn refit<BV, G>(
        &mut self,
        bvh: &mut Bvh<BV, G>,
        policy: &mut impl RefitPolicy<BV, G>,
    ) -> Result<(), ConstructionError> {
        self.order.clear();
        self.order.extend(bvh.preorder());

        for id in self.order.iter().rev() {
            let bounding_volume = policy.refit(bvh, *id)?;
            bvh.nodes[id.index()].bounding_volume = bounding_volume;
        }

        Ok(())
    }
}

impl<BV: BoundingVolume, G> Bvh<BV, G> {
    /// Recomputes every bounding volume of this tree from the current positions of its
    /// geometry, as given by `binder`.
    ///
    /// Leaf volumes are enlarged by `enlargement` (usually 0, or a small margin absorbing
    /// numerical jitter). An invalid `enlargement` is rejected before any volume is
    /// touched. See [`BottomUpRefitter::refit`] for the other failure semantics.
    pub fn refit<B>(&mut self, binder: &B, enlargement: Real) -> Result<(), BvhBuildError>
    where
        B: VertexDataBinder<G> + ?Sized,
    {
        let mut policy = BinderRefitPolicy::new(binder, enlargement)?;
        BottomUpRefitter::new().refit(self, &mut policy)?;
        Ok(())
    }
}

/// Replaces the content of `out` by the points of every element of `geometry`.
pub(super) fn bind_geometry<G, B>(
    binder: &B,
    geometry: &[G],
    out: &mut Vec<Point<Real>>,
) -> Result<(), PrimitiveFault>
where
    B: VertexDataBinder<G> + ?Sized,
{
    out.clear();

    for primitive in geometry {
        binder.bind(primitive, out)?;
    }

    if out.is_empty() {
        Err(PrimitiveFault::Degenerate {
            points: 0,
            required: 1,
        })
    } else {
        Ok(())
    }
}

/// The bounding volume of `points` enlarged by `padding`.
pub(super) fn fit_volume<BV: BoundingVolume>(points: &[Point<Real>], padding: Real) -> BV {
    let result = BV::from_points(points);

    if padding > 0.0 {
        result.loosened(padding)
    } else {
        result
    }
}
