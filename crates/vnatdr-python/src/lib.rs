//! Python bindings for vnatdr-core
//!
//! This module exposes calibration, measurement and time-domain functions
//! to Python via PyO3, for use from notebooks.
//!
//! ## Classes
//!
//! - `Calibration` - Computed error correction for one or two ports
//!
//! ## Functions
//!
//! - `calibrate_1port`, `calibrate_2port` - Interactive calibration
//! - `measure` - Calibrated S11/S21
//! - `extrapolate_to_dc`, `calculate_tdr`, `measure_tdr` - Time domain
//! - `init_logging` - Route library logs to stderr

use pyo3::prelude::*;

mod calibration;
mod error;
mod instrument;
mod logging;
mod time_domain;

pub use calibration::PyCalibration;

/// vnatdr_python - VNA calibration and time-domain reflectometry in Rust
///
/// Example:
///     >>> import vnatdr_python as vt
///     >>> cal = vt.calibrate_1port(vna)
///     >>> f, s11, s21 = vt.measure(vna, cal)
///     >>> t, td = vt.calculate_tdr(f, s11, mode="lowpass_step", window="normal")
#[pymodule]
fn vnatdr_python(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Add classes with clean names (no Py prefix in Python)
    m.add_class::<PyCalibration>()?;

    m.add_function(wrap_pyfunction!(calibration::calibrate_1port, m)?)?;
    m.add_function(wrap_pyfunction!(calibration::calibrate_2port, m)?)?;
    m.add_function(wrap_pyfunction!(time_domain::measure, m)?)?;
    m.add_function(wrap_pyfunction!(time_domain::extrapolate_to_dc, m)?)?;
    m.add_function(wrap_pyfunction!(time_domain::calculate_tdr, m)?)?;
    m.add_function(wrap_pyfunction!(time_domain::measure_tdr, m)?)?;
    m.add_function(wrap_pyfunction!(logging::init_logging, m)?)?;

    // Add module version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
