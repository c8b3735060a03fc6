//! Core exclusion trait.

use std::fmt::Debug;

use crate::config::ItemConfig;
use crate::error::Result;
use crate::space::{Mask, MotionSpace};

/// A declarative rule removing a region of the motion space.
///
/// # Contract
///
/// Implementations must:
/// - Validate and normalize parameters in their fallible constructor;
///   a value that exists has already validated.
/// - Compute the mask contribution once, at construction, with exactly the
///   space grid's shape; [`Exclusion::mask`] is a cheap accessor.
/// - Report declared parameters from [`Exclusion::config`] in a form the
///   registry can rebuild an equivalent exclusion from.
///
/// A point is *included* by an exclusion when the contribution is `true`
/// at the point's nearest grid index.
pub trait Exclusion: Debug + Send + Sync {
    /// Registry type tag of this variant.
    fn kind(&self) -> &str;

    /// The derived mask contribution over the space grid.
    fn mask(&self) -> &Mask;

    /// Declared parameters, sufficient to reconstruct this exclusion
    /// through the registry.
    fn config(&self) -> Result<ItemConfig>;

    /// Whether `point` falls in the region removed by this exclusion,
    /// judged at the nearest grid index.
    fn is_excluded(&self, space: &MotionSpace, point: &[f64]) -> Result<bool> {
        let index = space.nearest_index(point)?;
        Ok(!self.mask().get(&index))
    }
}
