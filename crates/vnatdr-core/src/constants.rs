//! Numerical constants for calibration and time-domain calculations
//!
//! Provides standardized tolerance values, ideal calibration standard
//! reflection coefficients and the Kaiser window shape parameters.

/// Tolerance for detecting near-zero values in division and singularity checks.
/// Used to prevent division by zero and detect ill-conditioned calibrations.
pub const NEAR_ZERO: f64 = 1e-15;

/// Relative tolerance on the frequency step when checking that a sweep is
/// uniformly spaced. VNA sweeps are reported in integer Hz, so consecutive
/// steps may differ by rounding.
pub const UNIFORM_STEP_TOL: f64 = 1e-6;

/// Relative tolerance used when matching a datapoint frequency against the
/// calibration frequency axis.
pub const FREQ_MATCH_TOL: f64 = 1e-9;

/// Reflection coefficient of an ideal short.
pub const GAMMA_SHORT: f64 = -1.0;

/// Reflection coefficient of an ideal open.
pub const GAMMA_OPEN: f64 = 1.0;

/// Reflection coefficient of an ideal matched load.
pub const GAMMA_LOAD: f64 = 0.0;

/// Transmission coefficient of an ideal zero-length through.
pub const GAMMA_THROUGH: f64 = 1.0;

/// Kaiser β for `WindowShape::Minimum` (rectangular).
pub const KAISER_BETA_MINIMUM: f64 = 0.0;

/// Kaiser β for `WindowShape::Normal`.
pub const KAISER_BETA_NORMAL: f64 = 6.0;

/// Kaiser β for `WindowShape::Maximum`.
pub const KAISER_BETA_MAXIMUM: f64 = 13.0;
