//! The motion space: labeled axes, the derived coordinate grid, and the
//! boolean inclusion mask laid over it.
//!
//! A [`MotionSpace`] is an ordered list of validated [`Axis`] definitions;
//! it precomputes each axis' sample coordinates and answers index/coordinate
//! lookups. The [`Mask`] is an N-dimensional boolean array with exactly the
//! grid's shape; `true` marks a point the motion system may visit.

mod axis;
mod mask;
mod space;

pub use axis::Axis;
pub use mask::{IndexIter, Mask};
pub use space::MotionSpace;

pub(crate) use axis::linspace;
