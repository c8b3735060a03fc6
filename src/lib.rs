//! motionlist - motion-list generation for multi-axis positioning systems
//!
//! Computes the ordered set of target positions a motion system must visit
//! inside a bounded coordinate space, respecting forbidden regions:
//! a labeled coordinate grid ([`MotionSpace`]), composable exclusion
//! regions, pluggable point layers, and the [`MotionList`] orchestrator
//! that merges them into a final ordered point sequence with a reusable
//! inclusion [`Mask`].
//!
//! The engine is synchronous and single-threaded; driving hardware with
//! the generated sequence, plotting, and file persistence are the jobs of
//! external collaborators.

pub mod config;
pub mod error;
pub mod exclusions;
pub mod layers;
pub mod motion_list;
pub mod registry;
pub mod space;

pub use config::{ItemConfig, MotionListConfig, SpaceConfig};
pub use error::{MotionError, Result};
pub use motion_list::MotionList;
pub use registry::Registry;
pub use space::{Axis, Mask, MotionSpace};

/// A single candidate coordinate: one value per space axis.
pub type Point = Vec<f64>;
