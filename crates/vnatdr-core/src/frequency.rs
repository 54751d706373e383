//! Frequency module - the frequency axis of a sweep
//!
//! VNA sweeps are linear: the time-domain transform relies on a constant
//! step between consecutive points, so the axis can be validated here.

use crate::constants::UNIFORM_STEP_TOL;
use crate::error::{Result, VnaError};

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    #[default]
    Hz,
    KHz,
    MHz,
    GHz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }
}

/// An ordered frequency axis in Hz
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    f: Vec<f64>,
}

impl Frequency {
    /// Create a linear sweep with start/stop/npoints
    ///
    /// # Example
    /// ```
    /// use vnatdr_core::frequency::{Frequency, FrequencyUnit};
    /// let freq = Frequency::new(0.0, 100.0, 101, FrequencyUnit::MHz);
    /// assert_eq!(freq.npoints(), 101);
    /// assert_eq!(freq.f()[100], 100e6);
    /// ```
    pub fn new(start: f64, stop: f64, npoints: usize, unit: FrequencyUnit) -> Self {
        let mult = unit.multiplier();
        let start_hz = start * mult;
        let stop_hz = stop * mult;

        let f = match npoints {
            0 => Vec::new(),
            1 => vec![start_hz],
            _ => {
                let step = (stop_hz - start_hz) / (npoints - 1) as f64;
                (0..npoints).map(|i| start_hz + i as f64 * step).collect()
            }
        };

        Self { f }
    }

    /// Create from a frequency vector in Hz
    pub fn from_f(f: Vec<f64>) -> Self {
        Self { f }
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }
}

/// Check that `f` has at least two strictly increasing, uniformly spaced
/// points and return the step `f[1] - f[0]`.
pub fn validate_uniform(f: &[f64]) -> Result<f64> {
    if f.len() < 2 {
        return Err(VnaError::InvalidFrequencyAxis(format!(
            "at least 2 points are required, got {}",
            f.len()
        )));
    }
    if f.iter().any(|x| !x.is_finite() || *x < 0.0) {
        return Err(VnaError::InvalidFrequencyAxis(
            "frequencies must be finite and non-negative".to_string(),
        ));
    }

    let df = f[1] - f[0];
    if df <= 0.0 {
        return Err(VnaError::InvalidFrequencyAxis(
            "frequencies must be strictly increasing".to_string(),
        ));
    }

    for (i, w) in f.windows(2).enumerate() {
        let step = w[1] - w[0];
        if step <= 0.0 {
            return Err(VnaError::InvalidFrequencyAxis(
                "frequencies must be strictly increasing".to_string(),
            ));
        }
        if ((step - df) / df).abs() > UNIFORM_STEP_TOL {
            return Err(VnaError::InvalidFrequencyAxis(format!(
                "non-uniform step at index {}: {} Hz, expected {} Hz",
                i + 1,
                step,
                df
            )));
        }
    }

    Ok(df)
}
