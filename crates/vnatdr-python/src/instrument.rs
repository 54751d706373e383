//! Adapters from Python objects to the instrument and prompt traits

use anyhow::Context;
use num_complex::Complex64;
use pyo3::prelude::*;
use pyo3::types::PyString;
use vnatdr_core::calibration::StandardPrompt;
use vnatdr_core::sweep::{parse_value, Channel, ChannelReader, SequentialReads};
use vnatdr_core::Standard;

/// A Python VNA object with `read_frequencies()` and `read_values(channel)`
///
/// NanoVNA-Saver style `readFrequencies()` / `readValues(channel)` are
/// accepted as well. Values may be complex numbers or `"re im"` strings.
pub struct PyVna<'py> {
    read_frequencies: Bound<'py, PyAny>,
    read_values: Bound<'py, PyAny>,
}

impl<'py> PyVna<'py> {
    pub fn new(vna: &Bound<'py, PyAny>) -> PyResult<Self> {
        Ok(Self {
            read_frequencies: method(vna, "read_frequencies", "readFrequencies")?,
            read_values: method(vna, "read_values", "readValues")?,
        })
    }

    /// Capture one sweep per call by reading the axis, then each channel
    pub fn source(vna: &Bound<'py, PyAny>) -> PyResult<SequentialReads<Self>> {
        Ok(SequentialReads(Self::new(vna)?))
    }
}

fn method<'py>(obj: &Bound<'py, PyAny>, name: &str, legacy: &str) -> PyResult<Bound<'py, PyAny>> {
    if obj.hasattr(name)? {
        obj.getattr(name)
    } else {
        obj.getattr(legacy)
    }
}

fn extract_value(item: &Bound<'_, PyAny>) -> anyhow::Result<Complex64> {
    if let Ok(text) = item.downcast::<PyString>() {
        return Ok(parse_value(text.to_str()?)?);
    }
    Ok(item.extract::<Complex64>()?)
}

impl ChannelReader for PyVna<'_> {
    fn frequency_axis(&mut self) -> anyhow::Result<Vec<f64>> {
        let freqs = self.read_frequencies.call0()?;
        freqs
            .try_iter()?
            .map(|item| Ok(item?.extract::<f64>()?))
            .collect()
    }

    fn channel_values(&mut self, channel: Channel) -> anyhow::Result<Vec<Complex64>> {
        let values = self.read_values.call1((channel.data_name(),))?;
        values
            .try_iter()?
            .map(|item| extract_value(&item?))
            .collect()
    }
}

/// Asks the operator to attach each standard through a Python callable
/// taking one message string (`input` by default)
pub struct PyPrompt<'py> {
    callback: Bound<'py, PyAny>,
}

impl<'py> PyPrompt<'py> {
    pub fn new(py: Python<'py>, callback: Option<Bound<'py, PyAny>>) -> PyResult<Self> {
        let callback = match callback {
            Some(cb) => cb,
            None => py.import("builtins")?.getattr("input")?,
        };
        if !callback.is_callable() {
            return Err(pyo3::exceptions::PyTypeError::new_err(
                "prompt must be callable",
            ));
        }
        Ok(Self { callback })
    }
}

fn prompt_message(standard: Standard) -> &'static str {
    match standard {
        Standard::Short => "Connect the short to port 1 and press Enter",
        Standard::Open => "Connect the open to port 1 and press Enter",
        Standard::Load => "Connect the load to port 1 and press Enter",
        Standard::Through => "Connect port 1 to port 2 and press Enter",
        Standard::Isolation => "Cap both ports with loads and press Enter",
    }
}

impl StandardPrompt for PyPrompt<'_> {
    fn attach(&mut self, standard: Standard) -> anyhow::Result<()> {
        self.callback
            .call1((prompt_message(standard),))
            .with_context(|| format!("prompt for {} failed", standard))?;
        Ok(())
    }
}
