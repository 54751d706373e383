//! Accumulated standard measurements and the correction set derived from them

use std::collections::BTreeMap;

use super::sol::{OnePortTerms, TransmissionTerms};
use super::Standard;
use crate::constants::FREQ_MATCH_TOL;
use crate::datapoint::Sweep;
use crate::error::{Result, VnaError};

/// Per-frequency correction coefficients
///
/// The default value is uncalculated: both validity flags are false and the
/// sweep orchestrator passes raw data through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationSet {
    pub(crate) frequencies: Vec<f64>,
    pub(crate) one_port: Option<Vec<OnePortTerms>>,
    pub(crate) two_port: Option<Vec<TransmissionTerms>>,
}

impl CalibrationSet {
    /// An uncalculated set (identity correction)
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_calculated(&self) -> bool {
        self.one_port.is_some()
    }

    #[inline]
    pub fn is_valid_1port(&self) -> bool {
        self.one_port.is_some()
    }

    #[inline]
    pub fn is_valid_2port(&self) -> bool {
        self.one_port.is_some() && self.two_port.is_some()
    }

    /// Calibration frequency axis in Hz
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn one_port_terms(&self) -> Option<&[OnePortTerms]> {
        self.one_port.as_deref()
    }

    pub fn two_port_terms(&self) -> Option<&[TransmissionTerms]> {
        self.two_port.as_deref()
    }
}

/// Named standard measurements of one calibration session
#[derive(Debug, Clone, Default)]
pub struct CalibrationStore {
    standards: BTreeMap<Standard, Sweep>,
    calibration: CalibrationSet,
}

impl CalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a standard, replacing any earlier measurement of it.
    ///
    /// Previously computed corrections are discarded.
    pub fn insert(&mut self, standard: Standard, sweep: Sweep) {
        tracing::debug!(%standard, npoints = sweep.len(), "calibration standard recorded");
        self.standards.insert(standard, sweep);
        self.calibration = CalibrationSet::default();
    }

    pub fn get(&self, standard: Standard) -> Option<&Sweep> {
        self.standards.get(&standard)
    }

    pub fn contains(&self, standard: Standard) -> bool {
        self.standards.contains_key(&standard)
    }

    pub fn is_valid_1port(&self) -> bool {
        Standard::ONE_PORT.iter().all(|s| self.contains(*s))
    }

    pub fn is_valid_2port(&self) -> bool {
        self.is_valid_1port() && Standard::TWO_PORT.iter().all(|s| self.contains(*s))
    }

    /// Standards still needed for one-port (or, with `two_port`, two-port) correction
    pub fn missing(&self, two_port: bool) -> Vec<Standard> {
        let required: &[Standard] = if two_port {
            &[
                Standard::Short,
                Standard::Open,
                Standard::Load,
                Standard::Through,
                Standard::Isolation,
            ]
        } else {
            &Standard::ONE_PORT
        };
        required
            .iter()
            .copied()
            .filter(|s| !self.contains(*s))
            .collect()
    }

    pub fn is_calculated(&self) -> bool {
        self.calibration.is_calculated()
    }

    /// The current correction set (uncalculated until `compute_corrections`)
    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    pub fn into_calibration(self) -> CalibrationSet {
        self.calibration
    }

    /// Derive the correction coefficients from the standards present.
    ///
    /// Two-port terms are computed only when through and isolation are both
    /// present. The set is always rebuilt from scratch.
    pub fn compute_corrections(&mut self) -> Result<&CalibrationSet> {
        if !self.is_valid_1port() {
            return Err(VnaError::InsufficientStandards {
                missing: self.missing(false),
            });
        }

        let short = self.standard(Standard::Short)?;
        let open = self.standard(Standard::Open)?;
        let load = self.standard(Standard::Load)?;
        let nfreq = short.len();
        if nfreq == 0 {
            return Err(VnaError::InsufficientSamples {
                required: 1,
                actual: 0,
            });
        }
        let frequencies: Vec<f64> = short.iter().map(|dp| dp.freq()).collect();
        check_axis_order(&frequencies)?;
        for (standard, sweep) in [(Standard::Open, open), (Standard::Load, load)] {
            check_axis(standard, &frequencies, sweep)?;
        }

        let one_port = (0..nfreq)
            .map(|i| {
                OnePortTerms::solve(short[i].z(), open[i].z(), load[i].z())
                    .ok_or(VnaError::SingularCalibration { index: i })
            })
            .collect::<Result<Vec<_>>>()?;

        let two_port = if self.is_valid_2port() {
            let through = self.standard(Standard::Through)?;
            let isolation = self.standard(Standard::Isolation)?;
            for (standard, sweep) in [(Standard::Through, through), (Standard::Isolation, isolation)]
            {
                check_axis(standard, &frequencies, sweep)?;
            }
            let terms = (0..nfreq)
                .map(|i| {
                    TransmissionTerms::solve(through[i].z(), isolation[i].z())
                        .ok_or(VnaError::SingularCalibration { index: i })
                })
                .collect::<Result<Vec<_>>>()?;
            Some(terms)
        } else {
            None
        };

        tracing::info!(
            nfreq,
            two_port = two_port.is_some(),
            "calibration corrections computed"
        );

        self.calibration = CalibrationSet {
            frequencies,
            one_port: Some(one_port),
            two_port,
        };
        Ok(&self.calibration)
    }

    fn standard(&self, standard: Standard) -> Result<&Sweep> {
        self.standards
            .get(&standard)
            .ok_or_else(|| VnaError::InsufficientStandards {
                missing: vec![standard],
            })
    }
}

/// The short's axis drives coefficient lookup, so it must be finite and
/// strictly increasing
fn check_axis_order(frequencies: &[f64]) -> Result<()> {
    if frequencies.iter().any(|f| !f.is_finite()) {
        return Err(VnaError::InvalidFrequencyAxis(
            "calibration frequencies must be finite".to_string(),
        ));
    }
    if let Some(i) = frequencies.windows(2).position(|w| w[1] <= w[0]) {
        return Err(VnaError::InvalidFrequencyAxis(format!(
            "calibration frequencies must be strictly increasing, got {} Hz after {} Hz",
            frequencies[i + 1],
            frequencies[i]
        )));
    }
    Ok(())
}

/// Every standard must be swept over the short's frequency axis
fn check_axis(standard: Standard, frequencies: &[f64], sweep: &Sweep) -> Result<()> {
    if sweep.len() != frequencies.len() {
        return Err(VnaError::SweepLengthMismatch {
            frequencies: frequencies.len(),
            channel0: sweep.len(),
            channel1: sweep.len(),
        });
    }

    for (i, (dp, &f)) in sweep.iter().zip(frequencies).enumerate() {
        let tol = FREQ_MATCH_TOL * f.abs().max(1.0);
        let matches = (dp.freq() - f).abs() <= tol;
        if !matches {
            return Err(VnaError::InvalidFrequencyAxis(format!(
                "{} sweep has {} Hz at index {}, short has {} Hz",
                standard,
                dp.freq(),
                i,
                f
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datapoint::Datapoint;
    use num_complex::Complex64;

    fn flat_sweep(n: usize, z: Complex64) -> Sweep {
        (0..n)
            .map(|i| Datapoint::from_complex(1e6 * (i + 1) as f64, z))
            .collect()
    }

    fn ideal_store(n: usize) -> CalibrationStore {
        let mut store = CalibrationStore::new();
        store.insert(Standard::Short, flat_sweep(n, Complex64::new(-1.0, 0.0)));
        store.insert(Standard::Open, flat_sweep(n, Complex64::new(1.0, 0.0)));
        store.insert(Standard::Load, flat_sweep(n, Complex64::new(0.0, 0.0)));
        store
    }

    #[test]
    fn test_validity_flags() {
        let mut store = CalibrationStore::new();
        assert!(!store.is_valid_1port());

        store.insert(Standard::Short, flat_sweep(3, Complex64::new(-1.0, 0.0)));
        store.insert(Standard::Open, flat_sweep(3, Complex64::new(1.0, 0.0)));
        assert!(!store.is_valid_1port());
        assert_eq!(store.missing(false), vec![Standard::Load]);

        store.insert(Standard::Load, flat_sweep(3, Complex64::new(0.0, 0.0)));
        assert!(store.is_valid_1port());
        assert!(!store.is_valid_2port());

        store.insert(Standard::Through, flat_sweep(3, Complex64::new(1.0, 0.0)));
        assert!(!store.is_valid_2port());
        store.insert(Standard::Isolation, flat_sweep(3, Complex64::new(0.0, 0.0)));
        assert!(store.is_valid_2port());
    }

    #[test]
    fn test_insufficient_standards() {
        let mut store = CalibrationStore::new();
        store.insert(Standard::Open, flat_sweep(3, Complex64::new(1.0, 0.0)));

        match store.compute_corrections() {
            Err(VnaError::InsufficientStandards { missing }) => {
                assert_eq!(missing, vec![Standard::Short, Standard::Load]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!store.is_calculated());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut store = ideal_store(4);
        let first = store.compute_corrections().unwrap().clone();
        let second = store.compute_corrections().unwrap().clone();
        assert_eq!(first, second);
        assert!(first.is_valid_1port());
        assert!(!first.is_valid_2port());
    }

    #[test]
    fn test_insert_discards_corrections() {
        let mut store = ideal_store(4);
        store.compute_corrections().unwrap();
        assert!(store.is_calculated());

        store.insert(Standard::Load, flat_sweep(4, Complex64::new(0.01, 0.0)));
        assert!(!store.is_calculated());
        assert!(!store.calibration().is_valid_1port());
    }

    #[test]
    fn test_standard_length_mismatch() {
        let mut store = ideal_store(4);
        store.insert(Standard::Load, flat_sweep(3, Complex64::new(0.0, 0.0)));
        assert!(matches!(
            store.compute_corrections(),
            Err(VnaError::SweepLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_axis_mismatch() {
        let mut store = ideal_store(3);
        let shifted: Sweep = (1..=3)
            .map(|i| Datapoint::new(10e6 * i as f64, 1.0, 0.0))
            .collect();
        store.insert(Standard::Open, shifted);

        match store.compute_corrections() {
            Err(VnaError::InvalidFrequencyAxis(msg)) => assert!(msg.starts_with("open")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!store.is_calculated());
    }

    #[test]
    fn test_transmission_axis_mismatch() {
        let mut store = ideal_store(3);
        let shifted: Sweep = (1..=3)
            .map(|i| Datapoint::new(1e6 * i as f64 + 1e3, 0.9, 0.0))
            .collect();
        store.insert(Standard::Through, shifted);
        store.insert(Standard::Isolation, flat_sweep(3, Complex64::new(0.0, 0.0)));

        assert!(matches!(
            store.compute_corrections(),
            Err(VnaError::InvalidFrequencyAxis(_))
        ));
    }

    #[test]
    fn test_unordered_axis_rejected() {
        let reversed = |z: Complex64| -> Sweep {
            (1..=3)
                .rev()
                .map(|i| Datapoint::from_complex(1e6 * i as f64, z))
                .collect()
        };
        let mut store = CalibrationStore::new();
        store.insert(Standard::Short, reversed(Complex64::new(-1.0, 0.0)));
        store.insert(Standard::Open, reversed(Complex64::new(1.0, 0.0)));
        store.insert(Standard::Load, reversed(Complex64::new(0.0, 0.0)));

        assert!(matches!(
            store.compute_corrections(),
            Err(VnaError::InvalidFrequencyAxis(_))
        ));
    }

    #[test]
    fn test_non_finite_axis_rejected() {
        let mut store = ideal_store(3);
        let sweep: Sweep = [1e6, f64::NAN, 3e6]
            .iter()
            .map(|&f| Datapoint::new(f, -1.0, 0.0))
            .collect();
        store.insert(Standard::Short, sweep);

        assert!(matches!(
            store.compute_corrections(),
            Err(VnaError::InvalidFrequencyAxis(_))
        ));
    }

    #[test]
    fn test_singular_through() {
        let mut store = ideal_store(4);
        store.insert(Standard::Through, flat_sweep(4, Complex64::new(0.1, 0.0)));
        store.insert(Standard::Isolation, flat_sweep(4, Complex64::new(0.1, 0.0)));
        assert!(matches!(
            store.compute_corrections(),
            Err(VnaError::SingularCalibration { index: 0 })
        ));
    }
}
