//! Conversion of library errors into Python exceptions

use pyo3::exceptions::PyValueError;
use pyo3::PyErr;
use vnatdr_core::VnaError;

/// Python exceptions raised by the instrument or prompt are re-raised as-is,
/// everything else becomes `ValueError`
pub fn into_py_err(err: VnaError) -> PyErr {
    match err {
        VnaError::Source(source) => match source.downcast::<PyErr>() {
            Ok(py_err) => py_err,
            Err(other) => PyValueError::new_err(format!("{:#}", other)),
        },
        other => PyValueError::new_err(other.to_string()),
    }
}
