//! Python bindings for calibration

use numpy::{PyArray1, ToPyArray};
use pyo3::prelude::*;
use vnatdr_core::calibration::{calibrate, CalibrationKind};
use vnatdr_core::CalibrationSet;

use crate::error::into_py_err;
use crate::instrument::{PyPrompt, PyVna};

/// Python wrapper for a computed calibration
#[pyclass(name = "Calibration")]
#[derive(Clone, Default)]
pub struct PyCalibration {
    inner: CalibrationSet,
}

#[pymethods]
impl PyCalibration {
    /// Create an empty calibration
    ///
    /// An empty calibration is never calculated, so measurements taken with
    /// it return the raw instrument values.
    #[new]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once corrections have been computed
    #[getter]
    pub fn is_calculated(&self) -> bool {
        self.inner.is_calculated()
    }

    /// True if S11 is corrected (short, open and load captured)
    pub fn is_valid_1port(&self) -> bool {
        self.inner.is_valid_1port()
    }

    /// True if S21 is corrected as well (through and isolation captured)
    pub fn is_valid_2port(&self) -> bool {
        self.inner.is_valid_2port()
    }

    /// Calibration frequency axis in Hz as numpy array
    #[getter]
    pub fn frequencies<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.inner.frequencies().to_pyarray(py)
    }

    fn __repr__(&self) -> String {
        let kind = if self.inner.is_valid_2port() {
            "2-port"
        } else if self.inner.is_valid_1port() {
            "1-port"
        } else {
            "uncalculated"
        };
        format!(
            "Calibration({}, {} points)",
            kind,
            self.inner.frequencies().len()
        )
    }
}

impl PyCalibration {
    /// Get the inner CalibrationSet reference (for internal use)
    pub fn inner(&self) -> &CalibrationSet {
        &self.inner
    }
}

fn run_calibration<'py>(
    py: Python<'py>,
    vna: &Bound<'py, PyAny>,
    prompt: Option<Bound<'py, PyAny>>,
    kind: CalibrationKind,
) -> PyResult<PyCalibration> {
    let mut source = PyVna::source(vna)?;
    let mut prompt = PyPrompt::new(py, prompt)?;
    let inner = calibrate(&mut source, &mut prompt, kind).map_err(into_py_err)?;
    Ok(PyCalibration { inner })
}

/// Perform a full single port calibration
///
/// Place each requested termination on the end of port 1 and confirm.
///
/// Args:
///     vna: Instrument with read_frequencies() and read_values(channel)
///     prompt: Callable taking a message, called before each standard
///         (default: input)
///
/// Returns:
///     Calibration object
#[pyfunction]
#[pyo3(signature = (vna, prompt=None))]
pub fn calibrate_1port<'py>(
    py: Python<'py>,
    vna: &Bound<'py, PyAny>,
    prompt: Option<Bound<'py, PyAny>>,
) -> PyResult<PyCalibration> {
    run_calibration(py, vna, prompt, CalibrationKind::OnePort)
}

/// Perform a complete two port calibration
///
/// Short, open and load on port 1, then through, then isolation with both
/// ports capped by 50 ohm loads.
///
/// Args:
///     vna: Instrument with read_frequencies() and read_values(channel)
///     prompt: Callable taking a message, called before each standard
///         (default: input)
///
/// Returns:
///     Calibration object
#[pyfunction]
#[pyo3(signature = (vna, prompt=None))]
pub fn calibrate_2port<'py>(
    py: Python<'py>,
    vna: &Bound<'py, PyAny>,
    prompt: Option<Bound<'py, PyAny>>,
) -> PyResult<PyCalibration> {
    run_calibration(py, vna, prompt, CalibrationKind::TwoPort)
}
