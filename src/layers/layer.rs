//! Core layer trait.

use std::fmt::Debug;

use crate::config::ItemConfig;
use crate::error::Result;
use crate::space::MotionSpace;
use crate::Point;

/// A point-generation strategy producing raw candidate coordinates.
///
/// # Contract
///
/// Implementations must:
/// - Validate parameters in their fallible constructor.
/// - Generate points of the space's dimensionality, flattened row-major
///   from the conceptual `(..., D)` batch. Points need not be aligned to
///   the space grid.
/// - Be deterministic: the same layer over the same space yields the same
///   batch, which lets the orchestrator cache it.
pub trait Layer: Debug + Send + Sync {
    /// Registry type tag of this variant.
    fn kind(&self) -> &str;

    /// Generates the candidate point batch.
    fn generate_points(&self, space: &MotionSpace) -> Vec<Point>;

    /// Declared parameters, sufficient to reconstruct this layer through
    /// the registry.
    fn config(&self) -> Result<ItemConfig>;
}
