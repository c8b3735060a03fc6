//! Point layers: strategies producing raw candidate target coordinates.
//!
//! A layer generates a batch of points independent of any exclusion; the
//! [`MotionList`](crate::MotionList) filters the batch against the
//! combined inclusion mask. Variants are built only through the
//! [`LayerRegistry`]; [`builtin_registry`] returns one pre-populated with
//! the `grid` type.

pub mod layer;
pub mod regular_grid;

pub use layer::Layer;
pub use regular_grid::{GridLayer, GridParams, LimitsSpec, StepsSpec};

use crate::registry::Registry;

/// Factory registry for layer variants.
pub type LayerRegistry = Registry<dyn Layer>;

/// Registry pre-populated with every built-in layer variant.
pub fn builtin_registry() -> LayerRegistry {
    let mut registry = Registry::empty("layer");
    regular_grid::register(&mut registry).expect("built-in layer tags are unique");
    registry
}
