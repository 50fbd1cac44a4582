//! Interpolation method selection and order validation

use crate::constants::{INTERPOLATION_METHOD_NAMES, MAX_SPLINE_DEGREE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of interpolation methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Straight line between the bracketing known samples
    Linear,
    /// Interpolating B-spline of degree 2 through every known sample
    Quadratic,
    /// Interpolating B-spline of degree 3 through every known sample
    Cubic,
    /// Interpolating B-spline of degree `order`
    Spline,
    /// Piecewise polynomial of degree `order`; the same interpolating B-spline as `spline`
    Polynomial,
}

/// Numeric scheme an [`InterpolationMethod`] resolves to once its order is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Linear,
    Spline { degree: usize },
}

impl InterpolationMethod {
    pub const ALL: [Self; 5] = [
        Self::Linear,
        Self::Quadratic,
        Self::Cubic,
        Self::Spline,
        Self::Polynomial,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
            Self::Cubic => "cubic",
            Self::Spline => "spline",
            Self::Polynomial => "polynomial",
        }
    }

    /// Whether the method takes an order parameter
    pub fn uses_order(&self) -> bool {
        !matches!(self, Self::Linear)
    }

    /// Validate `order` for this method and pick the numeric kernel
    ///
    /// Linear ignores `order` entirely, whatever its value. Every other method
    /// requires a positive order; `quadratic` and `cubic` keep their fixed
    /// degree regardless of it.
    pub fn kernel(&self, order: Option<u32>) -> Result<Kernel> {
        if !self.uses_order() {
            return Ok(Kernel::Linear);
        }

        let order = match order {
            Some(0) => {
                return Err(Error::interpolation(format!(
                    "{} interpolation needs a positive order, got 0",
                    self
                )));
            }
            Some(order) => order as usize,
            None => {
                return Err(Error::interpolation(format!(
                    "{} interpolation requires an order",
                    self
                )));
            }
        };

        match self {
            Self::Linear => Ok(Kernel::Linear),
            Self::Quadratic => Ok(Kernel::Spline { degree: 2 }),
            Self::Cubic => Ok(Kernel::Spline { degree: 3 }),
            Self::Spline | Self::Polynomial if order > MAX_SPLINE_DEGREE => {
                Err(Error::interpolation(format!(
                    "{} order must be between 1 and {}, got {}",
                    self, MAX_SPLINE_DEGREE, order
                )))
            }
            Self::Spline | Self::Polynomial => Ok(Kernel::Spline { degree: order }),
        }
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::interpolation(format!(
                    "unsupported method '{}': expected one of {}",
                    wanted,
                    INTERPOLATION_METHOD_NAMES.join(", ")
                ))
            })
    }
}
