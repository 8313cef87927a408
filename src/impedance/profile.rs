use super::ImpedanceError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fractional coolant temperature along the pipe, one value per region
/// boundary. Only the shape matters: values are rescaled so the first point
/// maps to the inlet and the last to the outlet temperature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRepr", into = "Vec<f64>")]
pub struct LiquidProfile(Vec<f64>);

/// Accepted on-disk forms: a list of numbers or a comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileRepr {
    List(Vec<f64>),
    Text(String),
}

impl TryFrom<ProfileRepr> for LiquidProfile {
    type Error = ImpedanceError;

    fn try_from(repr: ProfileRepr) -> Result<Self, Self::Error> {
        match repr {
            ProfileRepr::List(values) => LiquidProfile::new(values),
            ProfileRepr::Text(text) => text.parse(),
        }
    }
}

impl From<LiquidProfile> for Vec<f64> {
    fn from(p: LiquidProfile) -> Self {
        p.0
    }
}

impl LiquidProfile {
    pub fn new(values: Vec<f64>) -> Result<Self, ImpedanceError> {
        let invalid = |reason: &str| ImpedanceError::InvalidProfile {
            reason: reason.to_string(),
        };
        if values.len() < 2 {
            return Err(invalid("at least two points are required"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(invalid("values must be finite"));
        }
        if values[values.len() - 1] == 0.0 {
            return Err(invalid("last point must be non-zero"));
        }
        Ok(Self(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of regions this profile describes.
    pub fn segments(&self) -> usize {
        self.0.len() - 1
    }

    /// `n` equal steps from 0 to 1.
    pub fn linear(n: usize) -> Result<Self, ImpedanceError> {
        Self::new((0..=n).map(|i| i as f64 / n.max(1) as f64).collect())
    }
}

impl FromStr for LiquidProfile {
    type Err = ImpedanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<f64>().map_err(|e| ImpedanceError::InvalidProfile {
                    reason: format!("'{t}': {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(values)
    }
}
