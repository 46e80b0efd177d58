use super::BvNodeId;
use crate::math::Real;
use crate::shape::PrimitiveFault;

/// Invalid caller-supplied construction parameters.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// The top-down branching degree is not 2, 4 or 8.
    #[error("unsupported branching degree {0}, expected 2, 4 or 8")]
    UnsupportedDegree(usize),
    /// The padding is negative or not finite.
    #[error("invalid padding {0}, expected a finite non-negative value")]
    InvalidPadding(Real),
    /// The maximum number of primitives per leaf is zero.
    #[error("the maximum leaf size must be at least 1")]
    ZeroLeafSize,
    /// The maximum number of pooled sub-nodes of a bottom-up cluster is smaller than 2.
    #[error("the maximum pooled degree must be at least 2, found {0}")]
    InvalidPoolDegree(usize),
    /// The refit enlargement is negative or not finite.
    #[error("invalid refit enlargement {0}, expected a finite non-negative value")]
    InvalidEnlargement(Real),
}

/// Malformed input geometry encountered while building or refitting a tree.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstructionError {
    /// The primitive at position `index` of the input could not be bound to points.
    #[error("malformed primitive #{index}: {fault}")]
    MalformedPrimitive {
        /// The position of the primitive in the construction input.
        index: usize,
        /// Why the primitive could not be bound.
        fault: PrimitiveFault,
    },
    /// The geometry annotated on a leaf could not be bound to points during a refit.
    #[error("malformed geometry on leaf {node:?}: {fault}")]
    MalformedLeafGeometry {
        /// The leaf whose geometry could not be bound.
        node: BvNodeId,
        /// Why the geometry could not be bound.
        fault: PrimitiveFault,
    },
    /// An adjacency pair references a primitive outside of the construction input.
    #[error("adjacency pair ({0}, {1}) references a primitive out of range")]
    InvalidAdjacency(usize, usize),
}

/// Error returned by the tree construction entry points.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum BvhBuildError {
    /// Invalid construction parameters.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Malformed input geometry.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// What to do with primitives that cannot be bound to points during construction.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum MalformedPrimitivePolicy {
    /// Abort the whole construction and return a [`ConstructionError`].
    #[default]
    Abort,
    /// Leave the primitive out of the tree, logging a warning.
    Skip,
}

pub(super) fn validate_padding(padding: Real) -> Result<(), ConfigurationError> {
    if padding.is_finite() && padding >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidPadding(padding))
    }
}
