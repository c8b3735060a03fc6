//! Regularly spaced grid layer.

use serde::{Deserialize, Serialize};

use crate::config::ItemConfig;
use crate::error::{MotionError, Result};
use crate::layers::{Layer, LayerRegistry};
use crate::space::{linspace, IndexIter, MotionSpace};
use crate::Point;

const KIND: &str = "grid";

/// Per-axis limits: one `[min, max]` pair applied to every axis, or one
/// pair per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitsSpec {
    One([f64; 2]),
    PerAxis(Vec<[f64; 2]>),
}

/// Per-axis sample counts: one count applied to every axis, or one per
/// axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepsSpec {
    One(usize),
    PerAxis(Vec<usize>),
}

/// Declared parameters of a [`GridLayer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridParams {
    pub limits: LimitsSpec,
    pub steps: StepsSpec,
}

/// Layer type `grid`: the Cartesian product of per-axis linearly spaced
/// samples, flattened row-major (first axis slowest).
///
/// An axis whose limits coincide collapses to a single sample at that
/// value, regardless of its step count.
#[derive(Debug)]
pub struct GridLayer {
    limits: Vec<[f64; 2]>,
    steps: Vec<usize>,
}

impl GridLayer {
    /// Validates `params` against the space, broadcasting single-element
    /// limits/steps across every axis.
    pub fn new(space: &MotionSpace, params: GridParams) -> Result<Self> {
        let ndims = space.ndims();

        let limits = match params.limits {
            LimitsSpec::One(pair) => vec![pair; ndims],
            LimitsSpec::PerAxis(pairs) => match pairs.len() {
                1 => vec![pairs[0]; ndims],
                n if n == ndims => pairs,
                n => {
                    return Err(MotionError::validation(
                        "grid layer",
                        format!("'limits' needs 1 or {ndims} pairs, got {n}"),
                    ))
                }
            },
        };
        for &[lo, hi] in &limits {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(MotionError::validation(
                    "grid layer",
                    "'limits' values must be finite",
                ));
            }
        }

        let steps = match params.steps {
            StepsSpec::One(count) => vec![count; ndims],
            StepsSpec::PerAxis(counts) => match counts.len() {
                1 => vec![counts[0]; ndims],
                n if n == ndims => counts,
                n => {
                    return Err(MotionError::validation(
                        "grid layer",
                        format!("'steps' needs 1 or {ndims} counts, got {n}"),
                    ))
                }
            },
        };
        if steps.iter().any(|&count| count == 0) {
            return Err(MotionError::validation(
                "grid layer",
                "'steps' counts must be at least 1",
            ));
        }

        Ok(Self { limits, steps })
    }

    pub fn from_config(space: &MotionSpace, config: &ItemConfig) -> Result<Self> {
        Self::new(space, config.unpack()?)
    }

    pub fn limits(&self) -> &[[f64; 2]] {
        &self.limits
    }

    pub fn steps(&self) -> &[usize] {
        &self.steps
    }
}

impl Layer for GridLayer {
    fn kind(&self) -> &str {
        KIND
    }

    fn generate_points(&self, _space: &MotionSpace) -> Vec<Point> {
        let axes: Vec<Vec<f64>> = self
            .limits
            .iter()
            .zip(&self.steps)
            .map(|(&[lo, hi], &count)| {
                let count = if lo == hi { 1 } else { count };
                linspace(lo, hi, count)
            })
            .collect();
        let shape: Vec<usize> = axes.iter().map(Vec::len).collect();
        let mut points = Vec::with_capacity(shape.iter().product());
        for index in IndexIter::new(shape) {
            points.push(
                index
                    .iter()
                    .zip(&axes)
                    .map(|(&i, samples)| samples[i])
                    .collect(),
            );
        }
        points
    }

    fn config(&self) -> Result<ItemConfig> {
        let params = GridParams {
            limits: LimitsSpec::PerAxis(self.limits.clone()),
            steps: StepsSpec::PerAxis(self.steps.clone()),
        };
        ItemConfig::pack(KIND, &params)
    }
}

pub(crate) fn register(registry: &mut LayerRegistry) -> Result<()> {
    registry.register(KIND, |space, config| {
        Ok(Box::new(GridLayer::from_config(space, config)?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::Axis;

    fn xy_space() -> MotionSpace {
        MotionSpace::new(vec![
            Axis::new("x", (-10.0, 10.0), 21).unwrap(),
            Axis::new("y", (-10.0, 10.0), 21).unwrap(),
        ])
        .unwrap()
    }

    fn grid(space: &MotionSpace, limits: LimitsSpec, steps: StepsSpec) -> GridLayer {
        GridLayer::new(space, GridParams { limits, steps }).unwrap()
    }

    #[test]
    fn produces_row_major_cartesian_product() {
        let space = xy_space();
        let layer = grid(
            &space,
            LimitsSpec::PerAxis(vec![[-10.0, 10.0], [-10.0, 10.0]]),
            StepsSpec::PerAxis(vec![3, 3]),
        );
        let points = layer.generate_points(&space);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], vec![-10.0, -10.0]);
        assert_eq!(points[1], vec![-10.0, 0.0]);
        assert_eq!(points[3], vec![0.0, -10.0]);
        assert_eq!(points[4], vec![0.0, 0.0]);
        assert_eq!(points[8], vec![10.0, 10.0]);
    }

    #[test]
    fn single_limit_and_step_broadcast_to_every_axis() {
        let space = xy_space();
        let layer = grid(&space, LimitsSpec::One([0.0, 1.0]), StepsSpec::One(2));
        assert_eq!(layer.limits(), &[[0.0, 1.0], [0.0, 1.0]]);
        assert_eq!(layer.steps(), &[2, 2]);
        assert_eq!(layer.generate_points(&space).len(), 4);
    }

    #[test]
    fn equal_limits_collapse_an_axis() {
        let space = xy_space();
        let layer = grid(
            &space,
            LimitsSpec::PerAxis(vec![[2.0, 2.0], [-10.0, 10.0]]),
            StepsSpec::PerAxis(vec![5, 3]),
        );
        let points = layer.generate_points(&space);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p[0] == 2.0));
    }

    #[test]
    fn incompatible_shapes_fail_validation() {
        let space = xy_space();
        let limits = GridLayer::new(
            &space,
            GridParams {
                limits: LimitsSpec::PerAxis(vec![[0.0, 1.0]; 3]),
                steps: StepsSpec::One(2),
            },
        );
        assert!(matches!(limits, Err(MotionError::Validation { .. })));

        let steps = GridLayer::new(
            &space,
            GridParams {
                limits: LimitsSpec::One([0.0, 1.0]),
                steps: StepsSpec::PerAxis(vec![2, 2, 2]),
            },
        );
        assert!(matches!(steps, Err(MotionError::Validation { .. })));
    }

    #[test]
    fn zero_steps_fail_validation() {
        let space = xy_space();
        let layer = GridLayer::new(
            &space,
            GridParams {
                limits: LimitsSpec::One([0.0, 1.0]),
                steps: StepsSpec::PerAxis(vec![2, 0]),
            },
        );
        assert!(matches!(layer, Err(MotionError::Validation { .. })));
    }

    #[test]
    fn config_exports_broadcast_form() {
        let space = xy_space();
        let layer = grid(&space, LimitsSpec::One([0.0, 1.0]), StepsSpec::One(2));
        let config = layer.config().unwrap();
        assert_eq!(
            config.params["limits"],
            serde_json::json!([[0.0, 1.0], [0.0, 1.0]])
        );
        assert_eq!(config.params["steps"], serde_json::json!([2, 2]));
        let rebuilt = GridLayer::from_config(&space, &config).unwrap();
        assert_eq!(
            rebuilt.generate_points(&space),
            layer.generate_points(&space)
        );
    }

    #[test]
    fn raw_config_with_scalar_steps() {
        let space = xy_space();
        let config = ItemConfig::new(KIND)
            .with("limits", serde_json::json!([[-10.0, 10.0], [-10.0, 10.0]]))
            .with("steps", 3);
        let layer = GridLayer::from_config(&space, &config).unwrap();
        assert_eq!(layer.steps(), &[3, 3]);
    }
}
