//! Time-domain analysis functions
//!
//! Provides impulse and step responses of a one-sided (positive frequency)
//! S-parameter sweep via inverse FFT:
//!
//! 1. Kaiser window (lowpass modes apply only its falling half)
//! 2. Extrapolation of the windowed spectrum to DC
//! 3. Conjugate-symmetric full spectrum, so the time response is real
//! 4. Inverse FFT, integrated into a step response for `LowpassStep`
//!
//! Note: the frequency data must have uniform frequency spacing.

use std::fmt;
use std::str::FromStr;

use ndarray::Array1;
use num_complex::Complex64;

use crate::constants::{KAISER_BETA_MAXIMUM, KAISER_BETA_MINIMUM, KAISER_BETA_NORMAL};
use crate::error::{Result, VnaError};
use crate::frequency::validate_uniform;
use crate::math::{kaiser_window, unwrap_phase};
use crate::sweep::Measurement;

/// Time-domain transform mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TdrMode {
    /// Step response (cumulative sum of the impulse response)
    #[default]
    LowpassStep,
    /// Impulse response
    LowpassImpulse,
    /// Impulse response with the full window applied
    Bandpass,
}

impl TdrMode {
    pub fn is_lowpass(&self) -> bool {
        matches!(self, TdrMode::LowpassStep | TdrMode::LowpassImpulse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TdrMode::LowpassStep => "lowpass_step",
            TdrMode::LowpassImpulse => "lowpass_impulse",
            TdrMode::Bandpass => "bandpass",
        }
    }
}

impl fmt::Display for TdrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TdrMode {
    type Err = VnaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lowpass_step" => Ok(TdrMode::LowpassStep),
            "lowpass_impulse" => Ok(TdrMode::LowpassImpulse),
            "bandpass" => Ok(TdrMode::Bandpass),
            _ => Err(VnaError::InvalidTdrMode(s.to_string())),
        }
    }
}

/// Window shape, matching the NanoVNA-V2 firmware TD_WINDOW settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WindowShape {
    /// No taper (rectangular)
    Minimum,
    #[default]
    Normal,
    Maximum,
}

impl WindowShape {
    /// Kaiser β for this shape
    pub fn beta(&self) -> f64 {
        match self {
            WindowShape::Minimum => KAISER_BETA_MINIMUM,
            WindowShape::Normal => KAISER_BETA_NORMAL,
            WindowShape::Maximum => KAISER_BETA_MAXIMUM,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowShape::Minimum => "minimum",
            WindowShape::Normal => "normal",
            WindowShape::Maximum => "maximum",
        }
    }
}

impl fmt::Display for WindowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowShape {
    type Err = VnaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minimum" => Ok(WindowShape::Minimum),
            "normal" => Ok(WindowShape::Normal),
            "maximum" => Ok(WindowShape::Maximum),
            _ => Err(VnaError::InvalidWindowShape(s.to_string())),
        }
    }
}

/// Electrical delay compensation
///
/// Compensation is not implemented. `Unsupported` is accepted so callers can
/// pass their setting through, but it has no effect on the result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ElectricalDelay {
    #[default]
    None,
    Unsupported { seconds: f64 },
}

impl ElectricalDelay {
    /// `None` for a zero delay, `Unsupported` otherwise
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds == 0.0 {
            ElectricalDelay::None
        } else {
            ElectricalDelay::Unsupported { seconds }
        }
    }
}

/// Time-domain transform settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TdrConfig {
    pub mode: TdrMode,
    pub window: WindowShape,
    pub electrical_delay: ElectricalDelay,
}

impl TdrConfig {
    pub fn new(mode: TdrMode, window: WindowShape) -> Self {
        Self {
            mode,
            window,
            electrical_delay: ElectricalDelay::None,
        }
    }

    pub fn with_electrical_delay(mut self, electrical_delay: ElectricalDelay) -> Self {
        self.electrical_delay = electrical_delay;
        self
    }
}

/// Time axis and response of a transform
#[derive(Debug, Clone)]
pub struct TdrResult {
    /// Time in seconds, starting at 0
    pub t: Array1<f64>,
    pub response: Array1<Complex64>,
}

impl TdrResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Apply a Kaiser window to a one-sided spectrum
///
/// Lowpass modes generate the window at twice the sample count and apply
/// its second half, so the taper starts near unity at the first bin and
/// falls towards the last. Bandpass applies the full window.
pub fn apply_window(s: &[Complex64], shape: WindowShape, mode: TdrMode) -> Vec<Complex64> {
    let n = s.len();
    let w = if mode.is_lowpass() {
        let mut w = kaiser_window(2 * n, shape.beta());
        w.split_off(n)
    } else {
        kaiser_window(n, shape.beta())
    };

    s.iter().zip(&w).map(|(&z, &wk)| z * wk).collect()
}

/// Extrapolate a sweep to DC
///
/// Returns `f` with `0` prepended and `s` with the estimated DC value
/// prepended. Magnitude and unwrapped phase are extrapolated linearly from
/// the first two samples; the DC value is the real part of
/// `magnitude·exp(-i·phase)`. The DC bin is assumed to sit one step below
/// the first sample.
pub fn extrapolate_to_dc(f: &[f64], s: &[Complex64]) -> Result<(Vec<f64>, Vec<Complex64>)> {
    if f.len() != s.len() {
        return Err(VnaError::SweepLengthMismatch {
            frequencies: f.len(),
            channel0: s.len(),
            channel1: s.len(),
        });
    }
    if f.len() < 2 {
        return Err(VnaError::InsufficientSamples {
            required: 2,
            actual: f.len(),
        });
    }
    if f.windows(2).any(|w| w[1] <= w[0]) {
        return Err(VnaError::InvalidFrequencyAxis(
            "frequencies must be strictly increasing".to_string(),
        ));
    }

    let phase: Vec<f64> = s.iter().map(|z| z.arg()).collect();
    let phase = unwrap_phase(&phase);
    let magnitude = [s[0].norm(), s[1].norm()];

    let dc_phase = linear_at_zero(f[0], f[1], phase[0], phase[1]);
    let dc_magnitude = linear_at_zero(f[0], f[1], magnitude[0], magnitude[1]);
    let dc = Complex64::from_polar(dc_magnitude, -dc_phase).re;

    let mut f_dc = Vec::with_capacity(f.len() + 1);
    f_dc.push(0.0);
    f_dc.extend_from_slice(f);

    let mut s_dc = Vec::with_capacity(s.len() + 1);
    s_dc.push(Complex64::new(dc, 0.0));
    s_dc.extend_from_slice(s);

    Ok((f_dc, s_dc))
}

/// Line through (x0, y0) and (x1, y1) evaluated at x = 0
fn linear_at_zero(x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    y0 - x0 * (y1 - y0) / (x1 - x0)
}

/// Transform a one-sided sweep into a time-domain response
///
/// The response has `2N + 1` samples for `N` input samples. The time axis is
/// `t[k] = k / (n·Δf)`, spanning `[0, 1/Δf)` with `Δf = f[1] - f[0]`.
pub fn to_time_domain(f: &[f64], s: &[Complex64], config: &TdrConfig) -> Result<TdrResult> {
    if f.len() != s.len() {
        return Err(VnaError::SweepLengthMismatch {
            frequencies: f.len(),
            channel0: s.len(),
            channel1: s.len(),
        });
    }
    let df = validate_uniform(f)?;

    if let ElectricalDelay::Unsupported { seconds } = config.electrical_delay {
        tracing::warn!(
            seconds,
            "electrical delay compensation is not supported and was not applied"
        );
    }

    tracing::debug!(
        npoints = f.len(),
        mode = %config.mode,
        window = %config.window,
        "time-domain transform"
    );

    let windowed = apply_window(s, config.window, config.mode);
    let (_, s_dc) = extrapolate_to_dc(f, &windowed)?;

    // Negative frequencies: conjugate mirror of the non-DC bins
    let mut spectrum = s_dc;
    spectrum.extend(windowed.iter().rev().map(|z| z.conj()));

    let mut td = ifft(&spectrum);
    if config.mode == TdrMode::LowpassStep {
        cumulative_sum(&mut td);
    }

    let n = td.len();
    let dt = 1.0 / (df * n as f64);
    let t = Array1::from_shape_fn(n, |k| k as f64 * dt);

    Ok(TdrResult {
        t,
        response: Array1::from_vec(td),
    })
}

impl Measurement {
    /// Time-domain response of S11
    pub fn s11_time_domain(&self, config: &TdrConfig) -> Result<TdrResult> {
        to_time_domain(self.f(), &self.s11.to_vec(), config)
    }

    /// Time-domain response of S21
    pub fn s21_time_domain(&self, config: &TdrConfig) -> Result<TdrResult> {
        to_time_domain(self.f(), &self.s21.to_vec(), config)
    }
}

fn cumulative_sum(data: &mut [Complex64]) {
    let mut acc = Complex64::new(0.0, 0.0);
    for z in data.iter_mut() {
        acc += *z;
        *z = acc;
    }
}

/// IFFT using rustfft library, normalised by 1/n
fn ifft(data: &[Complex64]) -> Vec<Complex64> {
    use rustfft::FftPlanner;

    let n = data.len();
    if n == 0 {
        return vec![];
    }

    let mut buffer: Vec<Complex64> = data.to_vec();

    let mut planner = FftPlanner::new();
    let ifft_plan = planner.plan_fft_inverse(n);
    ifft_plan.process(&mut buffer);

    let scale = 1.0 / n as f64;
    for c in buffer.iter_mut() {
        *c *= scale;
    }
    buffer
}
