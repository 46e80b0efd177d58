//! Bounding volumes.

#[doc(inline)]
pub use crate::bounding_volume::aabb::Aabb;
#[doc(inline)]
pub use crate::bounding_volume::bounding_sphere::BoundingSphere;
#[doc(inline)]
pub use crate::bounding_volume::bounding_volume::BoundingVolume;
#[doc(inline)]
pub use crate::bounding_volume::obb::Obb;

#[doc(hidden)]
pub mod aabb;
#[doc(hidden)]
pub mod bounding_sphere;
#[doc(hidden)]
pub mod bounding_volume;
#[doc(hidden)]
pub mod obb;

use crate::math::Real;

/// Relative tolerance accepted by the containment tests of volumes that are re-fitted
/// (and thus rounded) when merged, i.e., [`Obb`] and [`BoundingSphere`].
pub const CONTAINMENT_TOLERANCE: Real = 1.0e-4;
