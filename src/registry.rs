//! Factory registries mapping type tags to variant constructors.
//!
//! Both extension points (exclusions and layers) share this shape: an
//! explicit map from a unique string tag to a constructor function,
//! populated at registry construction by each built-in variant module and
//! open to additional registrations before a
//! [`MotionList`](crate::MotionList) is built over it. Registering a
//! duplicate tag is a configuration error and is rejected here, at
//! registration, not at lookup.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::ItemConfig;
use crate::error::{MotionError, Result};
use crate::space::MotionSpace;

/// Constructor stored in a registry: builds a variant from the space grid
/// and its declared parameters, validating both.
pub type Constructor<T> = fn(&MotionSpace, &ItemConfig) -> Result<Box<T>>;

/// An explicit tag-to-constructor map for one item family.
pub struct Registry<T: ?Sized> {
    label: &'static str,
    entries: BTreeMap<String, Constructor<T>>,
}

impl<T: ?Sized> Registry<T> {
    /// Creates an empty registry; `label` names the item family in errors
    /// (`"exclusion"` or `"layer"`).
    pub fn empty(label: &'static str) -> Self {
        Self {
            label,
            entries: BTreeMap::new(),
        }
    }

    /// Registers a constructor under `kind`.
    ///
    /// Fails with [`MotionError::DuplicateKind`] when the tag is taken.
    pub fn register(&mut self, kind: &str, constructor: Constructor<T>) -> Result<()> {
        if self.entries.contains_key(kind) {
            return Err(MotionError::DuplicateKind {
                registry: self.label,
                kind: kind.to_string(),
            });
        }
        self.entries.insert(kind.to_string(), constructor);
        Ok(())
    }

    /// Looks up the constructor for `config`'s tag and builds the item.
    ///
    /// Fails with [`MotionError::UnknownKind`] for an unregistered tag;
    /// constructor failures pass through unchanged.
    pub fn build(&self, space: &MotionSpace, config: &ItemConfig) -> Result<Box<T>> {
        let constructor =
            self.entries
                .get(&config.kind)
                .ok_or_else(|| MotionError::UnknownKind {
                    registry: self.label,
                    kind: config.kind.clone(),
                })?;
        constructor(space, config)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Registered tags, in sorted order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.label)
            .field("kinds", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: ?Sized> Clone for Registry<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            entries: self.entries.clone(),
        }
    }
}
