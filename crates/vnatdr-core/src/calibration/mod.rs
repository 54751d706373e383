//! Calibration module - error correction from measured reference standards
//!
//! - `sol` - per-frequency error terms (Short-Open-Load, enhanced response)
//! - `store` - accumulates standard measurements and computes a `CalibrationSet`
//! - `corrector` - applies a `CalibrationSet` to raw datapoints
//! - `wizard` - state machine driving the capture of each standard

mod corrector;
mod sol;
mod store;
mod wizard;

use std::fmt;
use std::str::FromStr;

use crate::error::VnaError;
use crate::sweep::Channel;

pub use sol::{OnePortTerms, TransmissionTerms};
pub use store::{CalibrationSet, CalibrationStore};
pub use wizard::{
    calibrate, calibrate_one_port, calibrate_two_port, CalibrationKind, CalibrationState,
    CalibrationWizard, StandardPrompt,
};

/// A calibration reference termination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Standard {
    Short,
    Open,
    Load,
    Through,
    Isolation,
}

impl Standard {
    /// Standards required for one-port correction
    pub const ONE_PORT: [Standard; 3] = [Standard::Short, Standard::Open, Standard::Load];

    /// Standards required, on top of `ONE_PORT`, for two-port correction
    pub const TWO_PORT: [Standard; 2] = [Standard::Through, Standard::Isolation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Standard::Short => "short",
            Standard::Open => "open",
            Standard::Load => "load",
            Standard::Through => "through",
            Standard::Isolation => "isolation",
        }
    }

    /// Channel on which the standard is measured
    pub fn channel(&self) -> Channel {
        match self {
            Standard::Short | Standard::Open | Standard::Load => Channel::Reflection,
            Standard::Through | Standard::Isolation => Channel::Transmission,
        }
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Standard {
    type Err = VnaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(Standard::Short),
            "open" => Ok(Standard::Open),
            "load" => Ok(Standard::Load),
            "through" | "thru" => Ok(Standard::Through),
            "isolation" => Ok(Standard::Isolation),
            _ => Err(VnaError::InvalidStandard(s.to_string())),
        }
    }
}
