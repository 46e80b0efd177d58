use super::bvh_error::validate_padding;
use super::bvh_refit::{bind_geometry, fit_volume};
use super::{
    BvNodeChildren, BvNodeId, Bvh, BvhBuildError, ConfigurationError, ConstructionError,
    MalformedPrimitivePolicy,
};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::shape::{IndexedMesh, VertexDataBinder};
use arrayvec::ArrayVec;
use core::ops::Range;

const MAX_DEGREE: usize = 8;

/// Parameters of the top-down construction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TopDownOptions {
    /// The number of subsets each primitive set is split into: 2, 4 or 8.
    pub degree: usize,
    /// Margin added around the bounding volume of every leaf.
    pub padding: Real,
    /// The maximum number of primitives annotated on a single leaf. At least 1.
    pub max_leaf_size: usize,
    /// What to do with primitives that can’t be bound to points.
    pub malformed: MalformedPrimitivePolicy,
}

impl Default for TopDownOptions {
    fn default() -> Self {
        Self {
            degree: 2,
            padding: 0.0,
            max_leaf_size: 1,
            malformed: MalformedPrimitivePolicy::Abort,
        }
    }
}

impl TopDownOptions {
    /// The default options with a branching degree set to `degree`.
    pub fn with_degree(degree: usize) -> Self {
        Self {
            degree,
            ..Self::default()
        }
    }

    /// Checks these options.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !matches!(self.degree, 2 | 4 | 8) {
            return Err(ConfigurationError::UnsupportedDegree(self.degree));
        }

        if self.max_leaf_size == 0 {
            return Err(ConfigurationError::ZeroLeafSize);
        }

        validate_padding(self.padding)
    }
}

/// Builds a tree by recursively splitting the set of primitives.
///
/// Each set is split into `degree` subsets of (nearly) equal sizes by successive median
/// splits of the primitive centroids, along the axis where they are the most spread out.
/// The recursion stops when a set has no more than `max_leaf_size` primitives: that set
/// becomes a leaf.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TopDownConstructor {
    /// The construction parameters.
    pub options: TopDownOptions,
}

struct TopDownItem<G> {
    primitive: G,
    centroid: Point<Real>,
    points: Range<usize>,
}

impl TopDownConstructor {
    /// Creates a new top-down constructor.
    pub fn new(options: TopDownOptions) -> Self {
        Self { options }
    }

    /// Builds into `bvh` the tree of `primitives`.
    ///
    /// On error, `bvh` is left empty.
    ///
    /// # Panics
    ///
    /// Panics if `bvh` isn’t empty.
    pub fn build<BV, G, B>(
        &self,
        primitives: &[G],
        binder: &B,
        bvh: &mut Bvh<BV, G>,
    ) -> Result<(), BvhBuildError>
    where
        BV: BoundingVolume,
        G: Clone,
        B: VertexDataBinder<G> + ?Sized,
    {
        assert!(bvh.len() == 0, "The top-down construction needs an empty tree.");
        self.options.validate()?;

        let mut points = Vec::new();
        let mut items = Vec::with_capacity(primitives.len());
        let mut scratch = Vec::new();

        for (index, primitive) in primitives.iter().enumerate() {
            match bind_geometry(binder, core::slice::from_ref(primitive), &mut scratch) {
                Ok(()) => {
                    let start = points.len();
                    points.extend_from_slice(&scratch);
                    items.push(TopDownItem {
                        primitive: primitive.clone(),
                        centroid: crate::utils::center(&scratch),
                        points: start..points.len(),
                    });
                }
                Err(fault) => match self.options.malformed {
                    MalformedPrimitivePolicy::Abort => {
                        return Err(ConstructionError::MalformedPrimitive { index, fault }.into())
                    }
                    MalformedPrimitivePolicy::Skip => {
                        log::warn!("Skipping malformed primitive #{}: {}", index, fault);
                    }
                },
            }
        }

        if items.is_empty() {
            return Ok(());
        }

        let mut builder = TopDownBuilder {
            bvh: &mut *bvh,
            points: &points,
            scratch,
            options: &self.options,
        };
        let root = builder.build_recursive(&mut items);
        bvh.set_root(root);

        log::debug!(
            "Built a top-down tree with {} nodes over {} primitives.",
            bvh.len(),
            items.len()
        );

        Ok(())
    }
}

struct TopDownBuilder<'a, BV, G> {
    bvh: &'a mut Bvh<BV, G>,
    points: &'a [Point<Real>],
    scratch: Vec<Point<Real>>,
    options: &'a TopDownOptions,
}

impl<BV: BoundingVolume, G: Clone> TopDownBuilder<'_, BV, G> {
    fn build_recursive(&mut self, items: &mut [TopDownItem<G>]) -> BvNodeId {
        if items.len() <= self.options.max_leaf_size {
            self.scratch.clear();
            for item in items.iter() {
                self.scratch
                    .extend_from_slice(&self.points[item.points.clone()]);
            }

            let bounding_volume = fit_volume(&self.scratch, self.options.padding);
            let geometry = items.iter().map(|item| item.primitive.clone()).collect();
            return self.bvh.push_leaf(bounding_volume, geometry);
        }

        let mut groups = ArrayVec::<Range<usize>, MAX_DEGREE>::new();
        groups.push(0..items.len());

        // degree = 2^rounds
        for _ in 0..self.options.degree.trailing_zeros() {
            let mut split_groups = ArrayVec::<Range<usize>, MAX_DEGREE>::new();

            for group in groups {
                if group.len() < 2 {
                    split_groups.push(group);
                } else {
                    let mid = group.start + median_split(&mut items[group.clone()]);
                    split_groups.push(group.start..mid);
                    split_groups.push(mid..group.end);
                }
            }

            groups = split_groups;
        }

        let children: BvNodeChildren = groups
            .into_iter()
            .map(|group| self.build_recursive(&mut items[group]))
            .collect();
        self.bvh.push_internal(children)
    }
}

// Partially sorts `items` around its median along the axis of greatest centroid spread
// and returns the index of the median.
fn median_split<G>(items: &mut [TopDownItem<G>]) -> usize {
    let mut centroids_aabb = Aabb::new_invalid();
    for item in items.iter() {
        centroids_aabb.take_point(item.centroid);
    }

    let axis = centroids_aabb.extents().imax();
    let mid = items.len() / 2;
    let _ = items.select_nth_unstable_by(mid, |a, b| {
        a.centroid[axis].total_cmp(&b.centroid[axis])
    });
    mid
}

impl<BV: BoundingVolume, G: Clone> Bvh<BV, G> {
    /// Builds a tree over `primitives` by recursive median splits.
    pub fn build_top_down<B>(
        primitives: &[G],
        binder: &B,
        options: TopDownOptions,
    ) -> Result<Self, BvhBuildError>
    where
        B: VertexDataBinder<G> + ?Sized,
    {
        let mut result = Bvh::new();
        TopDownConstructor::new(options).build(primitives, binder, &mut result)?;
        Ok(result)
    }
}

impl<BV: BoundingVolume> Bvh<BV, u32> {
    /// Builds a tree over the faces of `mesh`, top-down.
    pub fn from_mesh_top_down(
        mesh: &IndexedMesh,
        options: TopDownOptions,
    ) -> Result<Self, BvhBuildError> {
        Self::build_top_down(&mesh.face_ids(), mesh, options)
    }
}
