//! Divider exclusion: a linear boundary in a 2-D motion space, removing
//! one side of the dividing line.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ItemConfig;
use crate::error::{MotionError, Result};
use crate::exclusions::{Exclusion, ExclusionRegistry};
use crate::space::{Mask, MotionSpace};

const KIND: &str = "divider";

/// Line slope. Infinity is a legal value (a vertical line) and travels
/// through serde as the string sentinel `"inf"` / `"-inf"`, since JSON
/// numbers cannot carry infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slope(pub f64);

impl Slope {
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }
}

impl Serialize for Slope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0.is_infinite() {
            serializer.serialize_str(if self.0 > 0.0 { "inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Slope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Slope(value)),
            Raw::Text(text) => match text.as_str() {
                "inf" | "+inf" => Ok(Slope(f64::INFINITY)),
                "-inf" => Ok(Slope(f64::NEG_INFINITY)),
                other => Err(D::Error::custom(format!("invalid slope '{other}'"))),
            },
        }
    }
}

/// Sign half of a [`SideToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

/// Signed-axis token naming the excluded half-plane: `[+-]e[01]`, e.g.
/// `"-e1"` removes the points on the negative side of axis 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideToken {
    sign: Sign,
    axis: usize,
}

impl SideToken {
    pub fn new(sign: Sign, axis: usize) -> Result<Self> {
        if axis > 1 {
            return Err(MotionError::validation(
                "divider exclusion",
                format!("exclude axis must be 0 or 1, got {axis}"),
            ));
        }
        Ok(Self { sign, axis })
    }

    pub const fn sign(self) -> Sign {
        self.sign
    }

    pub const fn axis(self) -> usize {
        self.axis
    }
}

impl FromStr for SideToken {
    type Err = MotionError;

    fn from_str(token: &str) -> Result<Self> {
        let malformed = || {
            MotionError::validation(
                "divider exclusion",
                format!("exclude token '{token}' does not match the pattern [+-]e[01]"),
            )
        };
        let bytes = token.as_bytes();
        if bytes.len() != 3 || bytes[1] != b'e' {
            return Err(malformed());
        }
        let sign = match bytes[0] {
            b'+' => Sign::Positive,
            b'-' => Sign::Negative,
            _ => return Err(malformed()),
        };
        let axis = match bytes[2] {
            b'0' => 0,
            b'1' => 1,
            _ => return Err(malformed()),
        };
        Ok(Self { sign, axis })
    }
}

impl fmt::Display for SideToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.sign {
            Sign::Positive => '+',
            Sign::Negative => '-',
        };
        write!(f, "{sign}e{}", self.axis)
    }
}

impl Serialize for SideToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SideToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}

/// Declared parameters of a [`DividerExclusion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DividerParams {
    /// Slope and intercept of the dividing line. An infinite slope is a
    /// vertical line at `x = intercept`.
    pub mb: (Slope, f64),
    /// Excluded half-plane. Defaults to `-e0`.
    #[serde(default = "default_exclude")]
    pub exclude: SideToken,
}

fn default_exclude() -> SideToken {
    SideToken {
        sign: Sign::Negative,
        axis: 0,
    }
}

/// Exclusion type `divider`. Requires a 2-D space.
///
/// Each grid point's signed distance from the line is taken along the
/// token's axis; sign `-` removes `distance <= 0`, sign `+` removes
/// `distance >= 0` (the line itself is always removed).
#[derive(Debug)]
pub struct DividerExclusion {
    params: DividerParams,
    mask: Mask,
}

impl DividerExclusion {
    /// Validates `params` against the space and computes the contribution.
    ///
    /// Fails when the space is not 2-D, the token does not parse, an
    /// infinite slope is combined with an axis-1 token, or a zero slope is
    /// combined with an axis-0 token.
    pub fn new(space: &MotionSpace, params: DividerParams) -> Result<Self> {
        if space.ndims() != 2 {
            return Err(MotionError::DimensionMismatch {
                expected: 2,
                found: space.ndims(),
            });
        }
        let (slope, intercept) = params.mb;
        if slope.0.is_nan() || !intercept.is_finite() {
            return Err(MotionError::validation(
                "divider exclusion",
                "slope must be a number and intercept finite",
            ));
        }
        if slope.is_infinite() && params.exclude.axis() == 1 {
            return Err(MotionError::validation(
                "divider exclusion",
                "an infinite slope cannot exclude along axis 1",
            ));
        }
        if slope.0 == 0.0 && params.exclude.axis() == 0 {
            return Err(MotionError::validation(
                "divider exclusion",
                "a zero slope cannot exclude along axis 0",
            ));
        }
        let mask = compute_mask(space, &params);
        Ok(Self { params, mask })
    }

    pub fn from_config(space: &MotionSpace, config: &ItemConfig) -> Result<Self> {
        Self::new(space, config.unpack()?)
    }

    pub fn mb(&self) -> (Slope, f64) {
        self.params.mb
    }

    pub fn exclude(&self) -> SideToken {
        self.params.exclude
    }
}

fn compute_mask(space: &MotionSpace, params: &DividerParams) -> Mask {
    let (Slope(slope), intercept) = params.mb;
    let token = params.exclude;
    let mut mask = Mask::filled(&space.shape(), false);
    for index in space.indices() {
        let x = space.coords(0)[index[0]];
        let y = space.coords(1)[index[1]];
        let distance = if slope.is_infinite() {
            x - intercept
        } else if slope == 0.0 {
            y - intercept
        } else if token.axis() == 1 {
            y - slope * x - intercept
        } else {
            x - (y - intercept) / slope
        };
        let excluded = match token.sign() {
            Sign::Negative => distance <= 0.0,
            Sign::Positive => distance >= 0.0,
        };
        mask.set(&index, !excluded);
    }
    mask
}

impl Exclusion for DividerExclusion {
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
        Ok(Box::new(DividerExclusion::from_config(space, config)?))
    })
}
