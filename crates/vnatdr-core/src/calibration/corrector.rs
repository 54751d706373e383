//! Application of a `CalibrationSet` to raw datapoints
//!
//! Coefficients are looked up by the datapoint frequency. Frequencies between
//! calibration points use linearly interpolated coefficients; frequencies
//! outside the calibrated range use the nearest edge coefficients.

use super::store::CalibrationSet;
use super::Standard;
use crate::constants::FREQ_MATCH_TOL;
use crate::datapoint::Datapoint;
use crate::error::{Result, VnaError};

impl CalibrationSet {
    /// Correct a raw channel-0 reading into S11
    pub fn correct_one_port(&self, raw: &Datapoint) -> Result<Datapoint> {
        let terms = self
            .one_port
            .as_deref()
            .ok_or_else(|| VnaError::InsufficientStandards {
                missing: Standard::ONE_PORT.to_vec(),
            })?;

        let (i, t) = self.locate(raw.freq())?;
        let coeffs = if t == 0.0 {
            terms[i]
        } else {
            terms[i].lerp(&terms[i + 1], t)
        };

        Ok(Datapoint::from_complex(raw.freq(), coeffs.correct(raw.z())))
    }

    /// Correct a raw channel-1 reading into S21
    pub fn correct_two_port(&self, raw: &Datapoint) -> Result<Datapoint> {
        let terms = match (&self.one_port, &self.two_port) {
            (Some(_), Some(terms)) => terms,
            (None, _) => {
                return Err(VnaError::InsufficientStandards {
                    missing: Standard::ONE_PORT
                        .iter()
                        .chain(Standard::TWO_PORT.iter())
                        .copied()
                        .collect(),
                })
            }
            (Some(_), None) => {
                return Err(VnaError::InsufficientStandards {
                    missing: Standard::TWO_PORT.to_vec(),
                })
            }
        };

        let (i, t) = self.locate(raw.freq())?;
        let coeffs = if t == 0.0 {
            terms[i]
        } else {
            terms[i].lerp(&terms[i + 1], t)
        };

        Ok(Datapoint::from_complex(raw.freq(), coeffs.correct(raw.z())))
    }

    /// Index of the calibration point at or below `freq`, and the fractional
    /// position towards the next one. `t == 0.0` means an exact (or clamped) match.
    fn locate(&self, freq: f64) -> Result<(usize, f64)> {
        if !freq.is_finite() {
            return Err(VnaError::InvalidFrequencyAxis(format!(
                "cannot correct a datapoint at {} Hz",
                freq
            )));
        }

        let f = &self.frequencies;
        let last = match f.len().checked_sub(1) {
            Some(last) => last,
            None => {
                return Err(VnaError::InvalidFrequencyAxis(
                    "calibration has no frequencies".to_string(),
                ))
            }
        };

        if freq <= f[0] {
            return Ok((0, 0.0));
        }
        if freq >= f[last] {
            return Ok((last, 0.0));
        }

        let i = f.partition_point(|&x| x <= freq) - 1;
        let span = f[i + 1] - f[i];
        let t = (freq - f[i]) / span;

        Ok(if t < FREQ_MATCH_TOL {
            (i, 0.0)
        } else if 1.0 - t < FREQ_MATCH_TOL {
            (i + 1, 0.0)
        } else {
            (i, t)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::calibration::{CalibrationStore, Standard};
    use crate::datapoint::{Datapoint, Sweep};
    use crate::error::VnaError;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    // Error terms that drift linearly with frequency
    fn error_terms(freq: f64) -> (Complex64, Complex64, Complex64) {
        let x = freq / 1e6;
        (
            Complex64::new(0.02 * x, 0.01),
            Complex64::new(0.05, -0.01 * x),
            Complex64::new(0.9 - 0.01 * x, 0.05),
        )
    }

    fn simulate(freq: f64, si: Complex64) -> Complex64 {
        let (e00, e11, et) = error_terms(freq);
        e00 + (et * si) / (Complex64::new(1.0, 0.0) - e11 * si)
    }

    fn standard_sweep(freqs: &[f64], si: Complex64) -> Sweep {
        freqs
            .iter()
            .map(|&f| Datapoint::from_complex(f, simulate(f, si)))
            .collect()
    }

    fn calibrated_store(freqs: &[f64]) -> CalibrationStore {
        let mut store = CalibrationStore::new();
        store.insert(
            Standard::Short,
            standard_sweep(freqs, Complex64::new(-1.0, 0.0)),
        );
        store.insert(Standard::Open, standard_sweep(freqs, Complex64::new(1.0, 0.0)));
        store.insert(Standard::Load, standard_sweep(freqs, Complex64::new(0.0, 0.0)));
        store.compute_corrections().unwrap();
        store
    }

    #[test]
    fn test_correct_one_port_at_calibration_points() {
        let freqs = [1e6, 2e6, 3e6, 4e6];
        let store = calibrated_store(&freqs);
        let cal = store.calibration();

        let dut = Complex64::new(0.3, -0.2);
        for &f in &freqs {
            let raw = Datapoint::from_complex(f, simulate(f, dut));
            let corrected = cal.correct_one_port(&raw).unwrap();
            assert_eq!(corrected.freq(), f);
            assert_relative_eq!(corrected.re(), dut.re, epsilon = 1e-10);
            assert_relative_eq!(corrected.im(), dut.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_interpolated_coefficients_between_points() {
        let freqs = [1e6, 2e6, 3e6];
        let store = calibrated_store(&freqs);
        let cal = store.calibration();
        let terms = cal.one_port_terms().unwrap();

        let raw = Datapoint::new(1.5e6, 0.2, 0.1);
        let corrected = cal.correct_one_port(&raw).unwrap();
        let expected = terms[0].lerp(&terms[1], 0.5).correct(raw.z());
        assert_relative_eq!(corrected.re(), expected.re, epsilon = 1e-12);
        assert_relative_eq!(corrected.im(), expected.im, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_range_frequencies_clamp() {
        let freqs = [1e6, 2e6, 3e6];
        let store = calibrated_store(&freqs);
        let cal = store.calibration();
        let terms = cal.one_port_terms().unwrap();

        let below = Datapoint::new(0.5e6, 0.2, 0.1);
        let above = Datapoint::new(9e6, 0.2, 0.1);
        assert_eq!(
            cal.correct_one_port(&below).unwrap().z(),
            terms[0].correct(below.z())
        );
        assert_eq!(
            cal.correct_one_port(&above).unwrap().z(),
            terms[2].correct(above.z())
        );
    }

    #[test]
    fn test_non_finite_frequency_rejected() {
        let store = calibrated_store(&[1e6, 2e6, 3e6]);
        let cal = store.calibration();

        for freq in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let raw = Datapoint::new(freq, 0.1, 0.1);
            assert!(matches!(
                cal.correct_one_port(&raw),
                Err(VnaError::InvalidFrequencyAxis(_))
            ));
        }
    }

    #[test]
    fn test_uncalculated_set_rejects_correction() {
        let store = CalibrationStore::new();
        let raw = Datapoint::new(1e6, 0.1, 0.1);
        assert!(matches!(
            store.calibration().correct_one_port(&raw),
            Err(VnaError::InsufficientStandards { .. })
        ));
        assert!(matches!(
            store.calibration().correct_two_port(&raw),
            Err(VnaError::InsufficientStandards { .. })
        ));
    }

    #[test]
    fn test_one_port_set_rejects_two_port_correction() {
        let store = calibrated_store(&[1e6, 2e6]);
        let raw = Datapoint::new(1e6, 0.1, 0.1);
        match store.calibration().correct_two_port(&raw) {
            Err(VnaError::InsufficientStandards { missing }) => {
                assert_eq!(missing, vec![Standard::Through, Standard::Isolation]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_correct_two_port() {
        let freqs = [1e6, 2e6];
        let mut store = calibrated_store(&freqs);
        let isolation = Complex64::new(0.001, 0.002);
        let tracking = Complex64::new(0.7, -0.2);
        let through: Sweep = freqs
            .iter()
            .map(|&f| Datapoint::from_complex(f, isolation + tracking))
            .collect();
        let iso: Sweep = freqs
            .iter()
            .map(|&f| Datapoint::from_complex(f, isolation))
            .collect();
        store.insert(Standard::Through, through);
        store.insert(Standard::Isolation, iso);
        store.compute_corrections().unwrap();

        let cal = store.calibration();
        assert!(cal.is_valid_2port());

        let s21 = Complex64::new(0.4, 0.4);
        let raw = Datapoint::from_complex(2e6, isolation + tracking * s21);
        let corrected = cal.correct_two_port(&raw).unwrap();
        assert_relative_eq!(corrected.re(), s21.re, epsilon = 1e-12);
        assert_relative_eq!(corrected.im(), s21.im, epsilon = 1e-12);
    }
}
