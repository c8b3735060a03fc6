//! LaPD-style composite exclusion: the machine's circular enclosure plus,
//! optionally, the cone a probe shaft can sweep from its entry port.
//!
//! The cone is expressed as two divider lines: unit vectors at plus/minus
//! half the cone angle off the pivot's inward radial direction in the port
//! frame, rotated into the base frame by the port angle. Each ray yields a
//! slope/intercept through the pivot point, and the exclusion side is
//! chosen from the rotated cone normal so that the region outside the cone
//! is removed.

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

use crate::config::ItemConfig;
use crate::error::{MotionError, Result};
use crate::exclusions::circular::{CircularExclusion, CircularParams, ExcludeRegion};
use crate::exclusions::divider::{DividerExclusion, DividerParams, SideToken, Sign, Slope};
use crate::exclusions::{Exclusion, ExclusionRegistry};
use crate::space::{Mask, MotionSpace};

const KIND: &str = "lapd";

/// Port location: a named direction or an explicit angle in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortLocation {
    Angle(f64),
    Named(String),
}

/// Declared parameters of a [`LapdExclusion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LapdParams {
    /// Enclosure diameter; a negative value is taken as its absolute value.
    #[serde(default = "default_diameter")]
    pub diameter: f64,
    /// Distance from machine center to the probe pivot (ball valve);
    /// normalized to its absolute value.
    #[serde(default = "default_pivot_radius")]
    pub pivot_radius: Option<f64>,
    /// Port direction: `e/east`, `t/top`, `w/west`, `b/bot/bottom`
    /// (case-insensitive), or any angle in degrees within `(-180, 360)`.
    #[serde(default = "default_port_location")]
    pub port_location: Option<PortLocation>,
    /// Full opening angle of the probe cone, degrees, within `(0, 180)`.
    #[serde(default = "default_cone_full_angle")]
    pub cone_full_angle: Option<f64>,
    /// When `false`, only the enclosure circle applies and the cone
    /// parameters are cleared.
    #[serde(default = "default_include_cone")]
    pub include_cone: bool,
}

fn default_diameter() -> f64 {
    100.0
}

fn default_pivot_radius() -> Option<f64> {
    Some(-58.771)
}

fn default_port_location() -> Option<PortLocation> {
    Some(PortLocation::Named("E".to_string()))
}

fn default_cone_full_angle() -> Option<f64> {
    Some(80.0)
}

fn default_include_cone() -> bool {
    true
}

fn port_angle(location: &PortLocation) -> Result<f64> {
    let angle = match location {
        PortLocation::Angle(angle) => {
            if !angle.is_finite() {
                return Err(MotionError::validation(
                    "lapd exclusion",
                    "port angle must be finite",
                ));
            }
            *angle
        }
        PortLocation::Named(name) => match name.to_lowercase().as_str() {
            "e" | "east" => 0.0,
            "t" | "top" => 90.0,
            "w" | "west" => 180.0,
            "b" | "bot" | "bottom" => 270.0,
            _ => {
                return Err(MotionError::validation(
                    "lapd exclusion",
                    format!("unrecognized port location '{name}'"),
                ))
            }
        },
    };
    if angle <= -180.0 || angle >= 360.0 {
        return Err(MotionError::validation(
            "lapd exclusion",
            format!("port angle is {angle}, expected a value inside (-180, 360) degrees"),
        ));
    }
    Ok(angle)
}

/// Exclusion type `lapd`. Requires a 2-D space.
///
/// Always composes a circular enclosure boundary; with the cone enabled,
/// additionally composes two dividers bounding the probe cone. The
/// contribution is the logical AND of every sub-exclusion's mask, so the
/// cone can only shrink the allowed region, never grow it.
#[derive(Debug)]
pub struct LapdExclusion {
    params: LapdParams,
    composed: Vec<Box<dyn Exclusion>>,
    mask: Mask,
}

impl LapdExclusion {
    /// Validates and normalizes `params`, builds the sub-exclusions, and
    /// combines their contributions.
    pub fn new(space: &MotionSpace, params: LapdParams) -> Result<Self> {
        if space.ndims() != 2 {
            return Err(MotionError::DimensionMismatch {
                expected: 2,
                found: space.ndims(),
            });
        }
        if !params.diameter.is_finite() {
            return Err(MotionError::validation(
                "lapd exclusion",
                "diameter must be finite",
            ));
        }
        let diameter = params.diameter.abs();

        let mut composed: Vec<Box<dyn Exclusion>> = vec![Box::new(CircularExclusion::new(
            space,
            CircularParams {
                radius: 0.5 * diameter,
                center: Some(vec![0.0, 0.0]),
                exclude: ExcludeRegion::Outside,
            },
        )?)];

        let params = if params.include_cone {
            let pivot_radius = params
                .pivot_radius
                .ok_or_else(|| {
                    MotionError::validation("lapd exclusion", "pivot_radius is required for a cone")
                })?
                .abs();
            let location = params.port_location.as_ref().ok_or_else(|| {
                MotionError::validation("lapd exclusion", "port_location is required for a cone")
            })?;
            let angle = port_angle(location)?;
            let cone_full_angle = params.cone_full_angle.ok_or_else(|| {
                MotionError::validation("lapd exclusion", "cone_full_angle is required for a cone")
            })?;
            if !cone_full_angle.is_finite() || cone_full_angle <= 0.0 || cone_full_angle >= 180.0 {
                return Err(MotionError::validation(
                    "lapd exclusion",
                    format!(
                        "cone full angle is {cone_full_angle}, expected a value inside (0, 180) degrees"
                    ),
                ));
            }

            for divider in cone_dividers(space, pivot_radius, angle, cone_full_angle)? {
                composed.push(Box::new(divider));
            }

            LapdParams {
                diameter,
                pivot_radius: Some(pivot_radius),
                port_location: Some(PortLocation::Angle(angle)),
                cone_full_angle: Some(cone_full_angle),
                include_cone: true,
            }
        } else {
            LapdParams {
                diameter,
                pivot_radius: None,
                port_location: None,
                cone_full_angle: None,
                include_cone: false,
            }
        };

        let mut mask = Mask::filled(&space.shape(), true);
        for exclusion in &composed {
            mask &= exclusion.mask();
        }
        Ok(Self {
            params,
            composed,
            mask,
        })
    }

    pub fn from_config(space: &MotionSpace, config: &ItemConfig) -> Result<Self> {
        Self::new(space, config.unpack()?)
    }

    pub fn diameter(&self) -> f64 {
        self.params.diameter
    }

    pub fn include_cone(&self) -> bool {
        self.params.include_cone
    }

    /// The sub-exclusions this composite is built from: the enclosure
    /// circle, then the two cone dividers when the cone is enabled.
    pub fn composed(&self) -> &[Box<dyn Exclusion>] {
        &self.composed
    }
}

/// The two dividers bounding the probe cone.
fn cone_dividers(
    space: &MotionSpace,
    pivot_radius: f64,
    port_angle_deg: f64,
    cone_full_angle: f64,
) -> Result<[DividerExclusion; 2]> {
    let theta = port_angle_deg.to_radians();
    let alpha = 0.5 * cone_full_angle.to_radians();
    let rotation = Rotation2::new(theta);
    let pivot = rotation * Vector2::new(pivot_radius, 0.0);

    // In the port frame the cone axis points back toward machine center
    // (-x); its bounding rays sit at +/- alpha off that axis.
    let bounding_ray = |ray: Vector2<f64>, normal_sign: f64| -> Result<DividerExclusion> {
        let ray = rotation * ray;
        let slope = ray.y / ray.x;
        let intercept = pivot.y - slope * pivot.x;

        // The outward normal of this ray, rotated into the base frame,
        // picks the half-plane to remove.
        let normal = rotation * Vector2::new(0.0, normal_sign);
        let axis = if normal.x.abs() > normal.y.abs() { 0 } else { 1 };
        let component = if axis == 0 { normal.x } else { normal.y };
        let sign = if component > 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        };

        DividerExclusion::new(
            space,
            DividerParams {
                mb: (Slope(slope), intercept),
                exclude: SideToken::new(sign, axis)?,
            },
        )
    };

    Ok([
        bounding_ray(Vector2::new(-alpha.cos(), alpha.sin()), 1.0)?,
        bounding_ray(Vector2::new(-alpha.cos(), -alpha.sin()), -1.0)?,
    ])
}

impl Exclusion for LapdExclusion {
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
        Ok(Box::new(LapdExclusion::from_config(space, config)?))
    })
}
