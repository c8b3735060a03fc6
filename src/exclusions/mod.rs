//! Exclusion regions: declarative rules removing parts of the motion space.
//!
//! Each variant validates its parameters and derives a boolean mask
//! contribution over the space grid at construction. Variants are built
//! only through the [`ExclusionRegistry`]; [`builtin_registry`] returns one
//! pre-populated with the `circle`, `divider`, and `lapd` types.

pub mod circular;
pub mod divider;
pub mod exclusion;
pub mod lapd;

pub use circular::{CircularExclusion, CircularParams, ExcludeRegion};
pub use divider::{DividerExclusion, DividerParams, SideToken, Sign, Slope};
pub use exclusion::Exclusion;
pub use lapd::{LapdExclusion, LapdParams, PortLocation};

use crate::registry::Registry;

/// Factory registry for exclusion variants.
pub type ExclusionRegistry = Registry<dyn Exclusion>;

/// Registry pre-populated with every built-in exclusion variant.
pub fn builtin_registry() -> ExclusionRegistry {
    let mut registry = Registry::empty("exclusion");
    circular::register(&mut registry).expect("built-in exclusion tags are unique");
    divider::register(&mut registry).expect("built-in exclusion tags are unique");
    lapd::register(&mut registry).expect("built-in exclusion tags are unique");
    registry
}
