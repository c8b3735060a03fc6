//! The motion-list aggregate: one space, composable exclusions, pluggable
//! layers, and the generated ordered point sequence.
//!
//! # Generation algorithm
//!
//! 1. The combined inclusion mask is the logical AND of every active
//!    exclusion's contribution. Any add or remove marks the mask dirty;
//!    the next read rebuilds it from all-`true` in insertion order, so a
//!    batch of mutations costs one rebuild.
//! 2. Every layer's batch is concatenated in layer-insertion order,
//!    preserving within-layer order.
//! 3. Each candidate snaps to its nearest grid index and tests the mask.
//! 4. The final sequence keeps the accepted candidates in their original
//!    order, with no deduplication and no re-sorting. That order is the
//!    visitation order a hardware consumer walks index by index.
//!
//! Derived state (mask, per-layer batches, final sequence) is lazy:
//! invalidated by mutation, recomputed on the next read. Reads never
//! change membership.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::debug;

use crate::config::{ItemConfig, MotionListConfig};
use crate::error::Result;
use crate::exclusions::{self, Exclusion, ExclusionRegistry};
use crate::layers::{self, Layer, LayerRegistry};
use crate::space::{Mask, MotionSpace};
use crate::Point;

#[derive(Debug)]
struct ExclusionSlot {
    name: String,
    exclusion: Box<dyn Exclusion>,
}

#[derive(Debug)]
struct LayerSlot {
    name: String,
    layer: Box<dyn Layer>,
    points: OnceLock<Vec<Point>>,
}

/// Orchestrates a [`MotionSpace`], exclusions, and layers into the final
/// ordered list of target positions.
///
/// Exclusions and layers are added from [`ItemConfig`]s through the two
/// factory registries and addressed by the name assigned at insertion
/// (`mask_ex1`, `point_layer1`, ...). The whole list round-trips through
/// [`MotionList::config`] / [`MotionList::from_config`].
#[derive(Debug)]
pub struct MotionList {
    space: MotionSpace,
    exclusion_registry: ExclusionRegistry,
    layer_registry: LayerRegistry,
    exclusions: Vec<ExclusionSlot>,
    layers: Vec<LayerSlot>,
    mask: Mask,
    mask_dirty: bool,
    sequence: Option<Vec<Point>>,
    next_exclusion: usize,
    next_layer: usize,
}

impl MotionList {
    /// Creates an empty list over `space` with the built-in registries.
    pub fn new(space: MotionSpace) -> Self {
        Self::with_registries(
            space,
            exclusions::builtin_registry(),
            layers::builtin_registry(),
        )
    }

    /// Creates an empty list over `space` with caller-supplied registries,
    /// the hook for registering exclusion/layer variants defined outside
    /// this crate.
    pub fn with_registries(
        space: MotionSpace,
        exclusion_registry: ExclusionRegistry,
        layer_registry: LayerRegistry,
    ) -> Self {
        let mask = Mask::filled(&space.shape(), true);
        Self {
            space,
            exclusion_registry,
            layer_registry,
            exclusions: Vec::new(),
            layers: Vec::new(),
            mask,
            mask_dirty: false,
            sequence: None,
            next_exclusion: 0,
            next_layer: 0,
        }
    }

    /// Reconstructs a list from an exported config using the built-in
    /// registries. The rebuilt list produces an identical point sequence.
    pub fn from_config(config: &MotionListConfig) -> Result<Self> {
        Self::from_config_with(
            config,
            exclusions::builtin_registry(),
            layers::builtin_registry(),
        )
    }

    /// Reconstructs a list from an exported config over caller-supplied
    /// registries.
    pub fn from_config_with(
        config: &MotionListConfig,
        exclusion_registry: ExclusionRegistry,
        layer_registry: LayerRegistry,
    ) -> Result<Self> {
        let space = MotionSpace::from_config(&config.space)?;
        let mut list = Self::with_registries(space, exclusion_registry, layer_registry);
        for item in config.exclusion.values() {
            list.add_exclusion(item)?;
        }
        for item in config.layer.values() {
            list.add_layer(item)?;
        }
        Ok(list)
    }

    pub fn space(&self) -> &MotionSpace {
        &self.space
    }

    pub fn exclusion_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.exclusions.iter().map(|slot| slot.name.as_str())
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|slot| slot.name.as_str())
    }

    /// Builds an exclusion through the registry. Returns the assigned
    /// name. The combined mask is rebuilt on the next read.
    ///
    /// On failure the list is unchanged.
    pub fn add_exclusion(&mut self, config: &ItemConfig) -> Result<String> {
        let exclusion = self.exclusion_registry.build(&self.space, config)?;
        self.next_exclusion += 1;
        let name = format!("mask_ex{}", self.next_exclusion);
        debug!("adding exclusion '{name}' of type '{}'", exclusion.kind());
        self.exclusions.push(ExclusionSlot {
            name: name.clone(),
            exclusion,
        });
        self.mask_dirty = true;
        self.sequence = None;
        Ok(name)
    }

    /// Removes the exclusion with the given name; returns whether one was
    /// removed. The combined mask is rebuilt on the next read.
    pub fn remove_exclusion(&mut self, name: &str) -> bool {
        let Some(position) = self.exclusions.iter().position(|slot| slot.name == name) else {
            return false;
        };
        debug!("removing exclusion '{name}'");
        self.exclusions.remove(position);
        self.mask_dirty = true;
        self.sequence = None;
        true
    }

    /// Builds a layer through the registry. Returns the assigned name.
    ///
    /// On failure the list is unchanged.
    pub fn add_layer(&mut self, config: &ItemConfig) -> Result<String> {
        let layer = self.layer_registry.build(&self.space, config)?;
        self.next_layer += 1;
        let name = format!("point_layer{}", self.next_layer);
        debug!("adding layer '{name}' of type '{}'", layer.kind());
        self.layers.push(LayerSlot {
            name: name.clone(),
            layer,
            points: OnceLock::new(),
        });
        self.sequence = None;
        Ok(name)
    }

    /// Removes the layer with the given name; returns whether one was
    /// removed.
    pub fn remove_layer(&mut self, name: &str) -> bool {
        let Some(position) = self.layers.iter().position(|slot| slot.name == name) else {
            return false;
        };
        debug!("removing layer '{name}'");
        self.layers.remove(position);
        self.sequence = None;
        true
    }

    /// Resets the mask to all-`true` and reapplies every active exclusion
    /// in insertion order. Idempotent.
    pub fn rebuild(&mut self) {
        debug!("rebuilding mask from {} exclusion(s)", self.exclusions.len());
        self.mask.fill(true);
        for slot in &self.exclusions {
            self.mask &= slot.exclusion.mask();
        }
        self.mask_dirty = false;
    }

    /// The combined inclusion mask, rebuilt first if a mutation left it
    /// stale.
    pub fn mask(&mut self) -> &Mask {
        if self.mask_dirty {
            self.rebuild();
        }
        &self.mask
    }

    /// Whether `point` is forbidden, judged by the combined mask at the
    /// point's nearest grid index. Usable as a safety pre-check before
    /// commanding motion hardware.
    pub fn is_excluded(&mut self, point: &[f64]) -> Result<bool> {
        let index = self.space.nearest_index(point)?;
        Ok(!self.mask().get(&index))
    }

    /// The final ordered point sequence, regenerated lazily after any
    /// mutation.
    pub fn points(&mut self) -> Result<&[Point]> {
        if self.sequence.is_none() {
            let sequence = self.generate()?;
            self.sequence = Some(sequence);
        }
        Ok(self.sequence.as_deref().unwrap_or_default())
    }

    /// Exports the full configuration: space definition plus every
    /// exclusion and layer config keyed by insertion index.
    pub fn config(&self) -> Result<MotionListConfig> {
        let mut exclusion = BTreeMap::new();
        for (index, slot) in self.exclusions.iter().enumerate() {
            exclusion.insert(index, slot.exclusion.config()?);
        }
        let mut layer = BTreeMap::new();
        for (index, slot) in self.layers.iter().enumerate() {
            layer.insert(index, slot.layer.config()?);
        }
        Ok(MotionListConfig {
            space: self.space.config(),
            exclusion,
            layer,
        })
    }

    fn generate(&mut self) -> Result<Vec<Point>> {
        if self.mask_dirty {
            self.rebuild();
        }
        let mut accepted = Vec::new();
        let mut candidates = 0usize;
        for slot in &self.layers {
            let batch = slot
                .points
                .get_or_init(|| slot.layer.generate_points(&self.space));
            for point in batch {
                candidates += 1;
                let index = self.space.nearest_index(point)?;
                if self.mask.get(&index) {
                    accepted.push(point.clone());
                }
            }
        }
        debug!(
            "generated motion list: {} of {candidates} candidate(s) accepted",
            accepted.len()
        );
        Ok(accepted)
    }
}
