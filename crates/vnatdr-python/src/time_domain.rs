//! Python bindings for measurement and time-domain functions

use num_complex::Complex64;
use numpy::{PyArray1, ToPyArray};
use pyo3::prelude::*;
use vnatdr_core::{ElectricalDelay, TdrConfig, TdrMode, TdrResult, WindowShape};

use crate::calibration::PyCalibration;
use crate::error::into_py_err;
use crate::instrument::PyVna;

type ComplexArray<'py> = Bound<'py, PyArray1<Complex64>>;
type RealArray<'py> = Bound<'py, PyArray1<f64>>;

fn tdr_config(mode: &str, window: &str, electrical_delay: f64) -> PyResult<TdrConfig> {
    let mode: TdrMode = mode.parse().map_err(into_py_err)?;
    let window: WindowShape = window.parse().map_err(into_py_err)?;
    Ok(TdrConfig::new(mode, window)
        .with_electrical_delay(ElectricalDelay::from_seconds(electrical_delay)))
}

fn tdr_arrays<'py>(py: Python<'py>, tdr: &TdrResult) -> (RealArray<'py>, ComplexArray<'py>) {
    (tdr.t.to_pyarray(py), tdr.response.to_pyarray(py))
}

/// Measure the calibrated complex S-parameters
///
/// Args:
///     vna: Instrument with read_frequencies() and read_values(channel)
///     calibration: Calibration object (an empty one returns raw values)
///
/// Returns:
///     Tuple (f, s11, s21) of numpy arrays
#[pyfunction]
pub fn measure<'py>(
    py: Python<'py>,
    vna: &Bound<'py, PyAny>,
    calibration: &PyCalibration,
) -> PyResult<(RealArray<'py>, ComplexArray<'py>, ComplexArray<'py>)> {
    let mut source = PyVna::source(vna)?;
    let m = vnatdr_core::measure(&mut source, calibration.inner()).map_err(into_py_err)?;
    Ok((
        m.f().to_pyarray(py),
        m.s11.to_pyarray(py),
        m.s21.to_pyarray(py),
    ))
}

/// Extrapolate S-parameters to DC
///
/// Assumes the frequency difference between DC and the first point equals
/// the spacing of adjacent points.
///
/// Returns:
///     Tuple (f, s) with the DC point prepended
#[pyfunction]
pub fn extrapolate_to_dc<'py>(
    py: Python<'py>,
    f: Vec<f64>,
    s: Vec<Complex64>,
) -> PyResult<(RealArray<'py>, ComplexArray<'py>)> {
    let (f_dc, s_dc) = vnatdr_core::extrapolate_to_dc(&f, &s).map_err(into_py_err)?;
    Ok((f_dc.to_pyarray(py), s_dc.to_pyarray(py)))
}

/// Calculate the time-domain response of a sweep
///
/// Uses the Kaiser windows of the NanoVNA-V2 firmware.
///
/// Args:
///     f: Uniformly spaced frequencies in Hz
///     s: Complex S-parameter per frequency
///     mode: 'lowpass_step', 'lowpass_impulse' or 'bandpass'
///     window: 'minimum', 'normal' or 'maximum'
///     electrical_delay: Accepted for compatibility; not applied
///
/// Returns:
///     Tuple (t, td) of numpy arrays
#[pyfunction]
#[pyo3(signature = (f, s, mode="lowpass_step", window="normal", electrical_delay=0.0))]
pub fn calculate_tdr<'py>(
    py: Python<'py>,
    f: Vec<f64>,
    s: Vec<Complex64>,
    mode: &str,
    window: &str,
    electrical_delay: f64,
) -> PyResult<(RealArray<'py>, ComplexArray<'py>)> {
    let config = tdr_config(mode, window, electrical_delay)?;
    let tdr = vnatdr_core::to_time_domain(&f, &s, &config).map_err(into_py_err)?;
    Ok(tdr_arrays(py, &tdr))
}

/// Measure S11 and calculate its time-domain response
///
/// Returns:
///     Tuple (t, td) of numpy arrays
#[pyfunction]
#[pyo3(signature = (vna, calibration, mode="lowpass_step", window="normal", electrical_delay=0.0))]
pub fn measure_tdr<'py>(
    py: Python<'py>,
    vna: &Bound<'py, PyAny>,
    calibration: &PyCalibration,
    mode: &str,
    window: &str,
    electrical_delay: f64,
) -> PyResult<(RealArray<'py>, ComplexArray<'py>)> {
    let config = tdr_config(mode, window, electrical_delay)?;
    let mut source = PyVna::source(vna)?;
    let tdr = vnatdr_core::measure_tdr(&mut source, calibration.inner(), &config)
        .map_err(into_py_err)?;
    Ok(tdr_arrays(py, &tdr))
}
