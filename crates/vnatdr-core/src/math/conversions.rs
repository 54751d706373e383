//! Unit and phase conversion functions
//!
//! Provides conversions between different representations of complex numbers
//! (magnitude, dB, phase) and phase unwrapping.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Convert complex number to dB (20*log10(|z|))
pub fn complex_2_db(z: Complex64) -> f64 {
    20.0 * z.norm().log10()
}

/// Convert complex number to phase in radians
pub fn complex_2_radian(z: Complex64) -> f64 {
    z.arg()
}

/// Unwrap a phase sequence in radians.
///
/// Jumps between consecutive samples of π or more are folded back into
/// `[-π, π)` by adding multiples of 2π, accumulated along the sequence. A jump
/// of exactly +π is kept as +π.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(phase.len());
    let Some(&first) = phase.first() else {
        return out;
    };
    out.push(first);

    let mut correction = 0.0;
    for w in phase.windows(2) {
        let d = w[1] - w[0];
        if d.abs() >= PI {
            let mut dmod = (d + PI).rem_euclid(2.0 * PI) - PI;
            if dmod == -PI && d > 0.0 {
                dmod = PI;
            }
            correction += dmod - d;
        }
        out.push(w[1] + correction);
    }
    out
}
