//! Circular exclusion: removes the region inside or outside a circle
//! (a hypersphere in spaces with more than two axes).

use serde::{Deserialize, Serialize};

use crate::config::ItemConfig;
use crate::error::{MotionError, Result};
use crate::exclusions::{Exclusion, ExclusionRegistry};
use crate::space::{Mask, MotionSpace};

const KIND: &str = "circle";

/// Which side of the boundary is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeRegion {
    Inside,
    Outside,
}

/// Declared parameters of a [`CircularExclusion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircularParams {
    /// Boundary radius; a negative value is taken as its absolute value.
    pub radius: f64,
    /// Circle center, one component per space axis. Defaults to the origin.
    #[serde(default)]
    pub center: Option<Vec<f64>>,
    /// Side to remove. Defaults to `outside`.
    #[serde(default = "default_exclude")]
    pub exclude: ExcludeRegion,
}

fn default_exclude() -> ExcludeRegion {
    ExcludeRegion::Outside
}

/// Exclusion type `circle`.
///
/// With `exclude = outside` the contribution is `true` exactly where the
/// Euclidean distance from the center is `<= radius`: the test for removal
/// is strictly `> radius`, so the boundary itself stays included.
/// `exclude = inside` inverts the test.
#[derive(Debug)]
pub struct CircularExclusion {
    params: CircularParams,
    mask: Mask,
}

impl CircularExclusion {
    /// Validates and normalizes `params` and computes the contribution.
    pub fn new(space: &MotionSpace, params: CircularParams) -> Result<Self> {
        if !params.radius.is_finite() {
            return Err(MotionError::validation(
                "circle exclusion",
                "radius must be finite",
            ));
        }
        let radius = params.radius.abs();
        let center = match params.center {
            Some(center) => {
                space.check_dims(center.len())?;
                center
            }
            None => vec![0.0; space.ndims()],
        };
        let params = CircularParams {
            radius,
            center: Some(center),
            exclude: params.exclude,
        };
        let mask = compute_mask(space, &params);
        Ok(Self { params, mask })
    }

    pub fn from_config(space: &MotionSpace, config: &ItemConfig) -> Result<Self> {
        Self::new(space, config.unpack()?)
    }

    pub fn radius(&self) -> f64 {
        self.params.radius
    }

    pub fn center(&self) -> &[f64] {
        self.params.center.as_deref().unwrap_or_default()
    }

    pub fn exclude(&self) -> ExcludeRegion {
        self.params.exclude
    }
}

fn compute_mask(space: &MotionSpace, params: &CircularParams) -> Mask {
    let center = params.center.as_deref().unwrap_or_default();
    let radius_sq = params.radius * params.radius;
    let mut mask = Mask::filled(&space.shape(), false);
    for index in space.indices() {
        let dist_sq: f64 = index
            .iter()
            .enumerate()
            .map(|(axis, &i)| {
                let delta = space.coords(axis)[i] - center[axis];
                delta * delta
            })
            .sum();
        let inside = dist_sq <= radius_sq;
        let included = match params.exclude {
            ExcludeRegion::Outside => inside,
            ExcludeRegion::Inside => !inside,
        };
        mask.set(&index, included);
    }
    mask
}

impl Exclusion for CircularExclusion {
    fn kind(&self) -> &str {
        KIND
    }

    fn mask(&self) -> &Mask {
        &self.mask
    }

    fn config(&self) -> Result<ItemConfig> {
        ItemConfig::pack(KIND, &self.params)
    }
}

pub(crate) fn register(registry: &mut ExclusionRegistry) -> Result<()> {
    registry.register(KIND, |space, config| {
        Ok(Box::new(CircularExclusion::from_config(space, config)?))
    })
}
