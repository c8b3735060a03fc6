//! The bounded coordinate space a motion system operates within.

use std::collections::HashSet;

use crate::config::SpaceConfig;
use crate::error::{MotionError, Result};
use crate::Point;

use super::axis::Axis;
use super::mask::IndexIter;

/// An ordered set of labeled axes and the coordinate grid they span.
///
/// Owned exclusively by the [`MotionList`](crate::MotionList) that builds
/// it; immutable after construction. Exclusions and layers receive it by
/// shared reference and never mutate it.
#[derive(Debug, Clone)]
pub struct MotionSpace {
    axes: Vec<Axis>,
    coords: Vec<Vec<f64>>,
}

impl MotionSpace {
    /// Builds a space from validated axes.
    ///
    /// Fails when no axis is given or two axes share a label.
    pub fn new(axes: Vec<Axis>) -> Result<Self> {
        if axes.is_empty() {
            return Err(MotionError::validation(
                "space",
                "at least one axis is required",
            ));
        }
        let mut seen = HashSet::new();
        for axis in &axes {
            if !seen.insert(axis.label()) {
                return Err(MotionError::validation(
                    "space",
                    format!("axis label '{}' is not unique", axis.label()),
                ));
            }
        }
        let coords = axes.iter().map(Axis::coords).collect();
        Ok(Self { axes, coords })
    }

    /// Builds one of the named preset layouts.
    ///
    /// Currently `"lapd_xy"`: axes `x` and `y`, both spanning
    /// `[-55.0, 55.0]` cm with 221 samples (0.5 cm pitch).
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "lapd_xy" => Self::new(vec![
                Axis::new("x", (-55.0, 55.0), 221)?,
                Axis::new("y", (-55.0, 55.0), 221)?,
            ]),
            _ => Err(MotionError::validation(
                "space",
                format!("unrecognized preset '{name}'"),
            )),
        }
    }

    pub fn from_config(config: &SpaceConfig) -> Result<Self> {
        if config.label.len() != config.range.len() || config.label.len() != config.num.len() {
            return Err(MotionError::validation(
                "space",
                "config vectors 'label', 'range', and 'num' differ in length",
            ));
        }
        let axes = config
            .label
            .iter()
            .zip(&config.range)
            .zip(&config.num)
            .map(|((label, &[lo, hi]), &num)| Axis::new(label.clone(), (lo, hi), num))
            .collect::<Result<Vec<_>>>()?;
        Self::new(axes)
    }

    pub fn config(&self) -> SpaceConfig {
        SpaceConfig {
            label: self.axes.iter().map(|a| a.label().to_string()).collect(),
            range: self.axes.iter().map(|a| [a.range().0, a.range().1]).collect(),
            num: self.axes.iter().map(Axis::num).collect(),
        }
    }

    /// Number of axes, i.e. the grid's dimensionality.
    pub fn ndims(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.axes.iter().map(Axis::label)
    }

    /// Per-axis sample counts: the shape of the grid and of every mask.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(Axis::num).collect()
    }

    /// Sample coordinates of one axis.
    pub fn coords(&self, axis: usize) -> &[f64] {
        &self.coords[axis]
    }

    /// Iterates over every grid multi-index in row-major order.
    pub fn indices(&self) -> IndexIter {
        IndexIter::new(self.shape())
    }

    /// Coordinate of the grid point at `index`.
    ///
    /// Fails with [`MotionError::DimensionMismatch`] on wrong arity.
    ///
    /// # Panics
    ///
    /// Panics if an index component is out of range for its axis.
    pub fn coordinate(&self, index: &[usize]) -> Result<Point> {
        self.check_dims(index.len())?;
        Ok(index
            .iter()
            .zip(&self.coords)
            .map(|(&i, axis_coords)| axis_coords[i])
            .collect())
    }

    /// Grid index of the sample nearest to `point`, snapped per axis and
    /// clamped to the grid bounds.
    pub fn nearest_index(&self, point: &[f64]) -> Result<Vec<usize>> {
        self.check_dims(point.len())?;
        Ok(point
            .iter()
            .zip(&self.axes)
            .map(|(&value, axis)| axis.nearest(value))
            .collect())
    }

    pub(crate) fn check_dims(&self, found: usize) -> Result<()> {
        if found != self.ndims() {
            return Err(MotionError::DimensionMismatch {
                expected: self.ndims(),
                found,
            });
        }
        Ok(())
    }
}
