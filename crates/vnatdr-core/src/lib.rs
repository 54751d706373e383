//! vnatdr-core: VNA calibration and time-domain reflectometry
//!
//! Turns raw vector network analyzer readings into calibrated S-parameters
//! and transforms them into time-domain step or impulse responses.
//!
//! ## Modules
//!
//! - `calibration` - Standards, error terms, correction and calibration workflow
//! - `sweep` - Instrument collaborator traits and sweep orchestration
//! - `time_domain` - Windowing, DC extrapolation and inverse transform
//! - `frequency` - Frequency axis representation
//! - `math` - Phase conversions and window functions
//!
//! ## Example
//!
//! ```
//! use num_complex::Complex64;
//! use vnatdr_core::{to_time_domain, TdrConfig, TdrMode, WindowShape};
//!
//! let f: Vec<f64> = (1..=100).map(|i| i as f64 * 1e7).collect();
//! let s11 = vec![Complex64::new(0.0, 0.0); f.len()];
//! let config = TdrConfig::new(TdrMode::LowpassStep, WindowShape::Normal);
//! let tdr = to_time_domain(&f, &s11, &config).unwrap();
//! assert_eq!(tdr.len(), 2 * f.len() + 1);
//! ```

pub mod calibration;
pub mod constants;
pub mod datapoint;
pub mod error;
pub mod frequency;
pub mod math;
pub mod sweep;
pub mod time_domain;

pub use calibration::{
    calibrate_one_port, calibrate_two_port, CalibrationSet, CalibrationStore, Standard,
};
pub use datapoint::{Datapoint, Sweep};
pub use error::{Result, VnaError};
pub use frequency::Frequency;
pub use sweep::{measure, measure_tdr, run_sweep, Measurement, RawSweep, SweepSource};
pub use time_domain::{
    extrapolate_to_dc, to_time_domain, ElectricalDelay, TdrConfig, TdrMode, TdrResult,
    WindowShape,
};
