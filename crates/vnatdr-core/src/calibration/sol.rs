use crate::constants::{GAMMA_LOAD, GAMMA_OPEN, GAMMA_SHORT, GAMMA_THROUGH, NEAR_ZERO};
use num_complex::Complex64;

/// 1-Port SOL (Short-Open-Load) error terms at one frequency
///
/// e00: Directivity
/// e11: Source Match
/// delta_e: Determinant of error matrix (e00*e11 - e10*e01)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePortTerms {
    pub e00: Complex64,
    pub e11: Complex64,
    pub delta_e: Complex64,
}

impl OnePortTerms {
    /// Solve the error terms from the raw readings of the three standards,
    /// assuming ideal short, open and load.
    ///
    /// Returns `None` when the equations are singular.
    pub fn solve(short: Complex64, open: Complex64, load: Complex64) -> Option<Self> {
        let one = Complex64::new(1.0, 0.0);
        let si = Complex64::new(GAMMA_SHORT, 0.0);
        let oi = Complex64::new(GAMMA_OPEN, 0.0);
        let li = Complex64::new(GAMMA_LOAD, 0.0);

        // Sm = e00 - Si*de + Sm*Si*e11
        //
        // [ 1  -Si  Sm*Si ] [ e00 ]   [ Sm ]
        // [ 1  -Oi  Om*Oi ] [ de  ] = [ Om ]
        // [ 1  -Li  Lm*Li ] [ e11 ]   [ Lm ]
        let a = nalgebra::Matrix3::new(
            one,
            -si,
            short * si,
            one,
            -oi,
            open * oi,
            one,
            -li,
            load * li,
        );
        let b = nalgebra::Vector3::new(short, open, load);

        if a.determinant().norm() < NEAR_ZERO {
            return None;
        }
        let x = a.qr().solve(&b)?;
        let terms = Self {
            e00: x[0],
            delta_e: x[1],
            e11: x[2],
        };

        if terms.is_finite() {
            Some(terms)
        } else {
            None
        }
    }

    /// S_actual = (Sm - e00) / (Sm*e11 - de)
    ///
    /// A vanishing denominator yields zero rather than a non-finite value.
    pub fn correct(&self, sm: Complex64) -> Complex64 {
        let den = sm * self.e11 - self.delta_e;
        if den.norm() < NEAR_ZERO {
            Complex64::new(0.0, 0.0)
        } else {
            (sm - self.e00) / den
        }
    }

    /// Reflection tracking e10*e01
    pub fn reflection_tracking(&self) -> Complex64 {
        self.e00 * self.e11 - self.delta_e
    }

    pub(crate) fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            e00: self.e00 + (other.e00 - self.e00) * t,
            e11: self.e11 + (other.e11 - self.e11) * t,
            delta_e: self.delta_e + (other.delta_e - self.delta_e) * t,
        }
    }

    fn is_finite(&self) -> bool {
        self.e00.is_finite() && self.e11.is_finite() && self.delta_e.is_finite()
    }
}

/// Enhanced-response transmission error terms at one frequency
///
/// e30: Isolation (crosstalk)
/// e10e32: Transmission tracking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionTerms {
    pub e30: Complex64,
    pub e10e32: Complex64,
}

impl TransmissionTerms {
    /// Solve from the raw channel-1 readings of the through and isolation
    /// standards, assuming an ideal zero-length through.
    pub fn solve(through: Complex64, isolation: Complex64) -> Option<Self> {
        let e10e32 = (through - isolation) / GAMMA_THROUGH;
        if e10e32.norm() < NEAR_ZERO || !e10e32.is_finite() {
            return None;
        }
        Some(Self {
            e30: isolation,
            e10e32,
        })
    }

    /// S21 = (S21m - e30) / e10e32
    pub fn correct(&self, s21m: Complex64) -> Complex64 {
        (s21m - self.e30) / self.e10e32
    }

    pub(crate) fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            e30: self.e30 + (other.e30 - self.e30) * t,
            e10e32: self.e10e32 + (other.e10e32 - self.e10e32) * t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Directivity=0.1, SourceMatch=0.05, ReflectionTracking=0.9
    fn simulate(si: Complex64) -> Complex64 {
        let e00 = Complex64::new(0.1, 0.0);
        let e11 = Complex64::new(0.05, 0.0);
        let et = Complex64::new(0.9, 0.0);
        e00 + (et * si) / (Complex64::new(1.0, 0.0) - e11 * si)
    }

    #[test]
    fn test_one_port_sol_recovers_error_terms() {
        let terms = OnePortTerms::solve(
            simulate(Complex64::new(-1.0, 0.0)),
            simulate(Complex64::new(1.0, 0.0)),
            simulate(Complex64::new(0.0, 0.0)),
        )
        .unwrap();

        assert_relative_eq!(terms.e00.re, 0.1, epsilon = 1e-12);
        assert_relative_eq!(terms.e11.re, 0.05, epsilon = 1e-12);
        assert_relative_eq!(terms.reflection_tracking().re, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_one_port_sol_corrects_dut() {
        let terms = OnePortTerms::solve(
            simulate(Complex64::new(-1.0, 0.0)),
            simulate(Complex64::new(1.0, 0.0)),
            simulate(Complex64::new(0.0, 0.0)),
        )
        .unwrap();

        let si_dirty = Complex64::new(0.5, 0.2);
        let s_actual = terms.correct(simulate(si_dirty));
        assert_relative_eq!(s_actual.re, si_dirty.re, epsilon = 1e-12);
        assert_relative_eq!(s_actual.im, si_dirty.im, epsilon = 1e-12);
    }

    #[test]
    fn test_ideal_standards_give_identity() {
        let terms = OnePortTerms::solve(
            Complex64::new(-1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        )
        .unwrap();

        let s = Complex64::new(0.3, -0.4);
        let corrected = terms.correct(s);
        assert_relative_eq!(corrected.re, s.re, epsilon = 1e-12);
        assert_relative_eq!(corrected.im, s.im, epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_standards_are_singular() {
        let z = Complex64::new(0.2, 0.1);
        assert!(OnePortTerms::solve(z, z, z).is_none());
    }

    #[test]
    fn test_transmission_terms() {
        let isolation = Complex64::new(0.01, -0.02);
        let tracking = Complex64::new(0.8, 0.3);
        let terms = TransmissionTerms::solve(isolation + tracking, isolation).unwrap();

        let s21 = Complex64::new(0.5, -0.5);
        let corrected = terms.correct(isolation + tracking * s21);
        assert_relative_eq!(corrected.re, s21.re, epsilon = 1e-12);
        assert_relative_eq!(corrected.im, s21.im, epsilon = 1e-12);
    }

    #[test]
    fn test_through_standard_corrects_to_unity() {
        // Raw through includes a mismatch factor against the 0.05 source match
        let isolation = Complex64::new(0.02, 0.01);
        let tracking = Complex64::new(0.7, -0.2);
        let mismatch = Complex64::new(1.0, 0.0) - Complex64::new(0.05, 0.0).powi(2);
        let through = isolation + tracking / mismatch;
        let terms = TransmissionTerms::solve(through, isolation).unwrap();

        let corrected = terms.correct(through);
        assert_relative_eq!(corrected.re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(corrected.im, 0.0, epsilon = 1e-12);
        assert_relative_eq!(terms.correct(isolation).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_through_equal_to_isolation_is_singular() {
        let z = Complex64::new(0.01, 0.0);
        assert!(TransmissionTerms::solve(z, z).is_none());
    }
}
