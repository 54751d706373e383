//! Log output for notebook sessions

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Print library log events to stderr
///
/// Args:
///     level: Filter directive such as 'info', 'debug' or
///         'vnatdr_core=trace'. Defaults to RUST_LOG, then 'info'.
///
/// Only the first call installs a subscriber; later calls are ignored.
#[pyfunction]
#[pyo3(signature = (level=None))]
pub fn init_logging(level: Option<&str>) -> PyResult<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| PyValueError::new_err(format!("invalid log level '{}': {}", directive, e)))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();

    // Ignore error if subscriber was already set
    let _ = result;
    Ok(())
}
