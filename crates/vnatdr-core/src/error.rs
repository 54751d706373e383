//! Error types shared by the calibration and time-domain modules

use thiserror::Error;

use crate::calibration::Standard;

/// Errors reported by calibration, sweep and transform operations
#[derive(Error, Debug)]
pub enum VnaError {
    #[error("insufficient calibration standards, missing: {}", format_standards(.missing))]
    InsufficientStandards { missing: Vec<Standard> },

    #[error("sweep length mismatch: {frequencies} frequencies, {channel0} channel 0 values, {channel1} channel 1 values")]
    SweepLengthMismatch {
        frequencies: usize,
        channel0: usize,
        channel1: usize,
    },

    #[error("at least {required} samples are required, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("invalid frequency axis: {0}")]
    InvalidFrequencyAxis(String),

    #[error("invalid window shape '{0}': expected minimum, normal or maximum")]
    InvalidWindowShape(String),

    #[error("invalid time-domain mode '{0}': expected lowpass_step, lowpass_impulse or bandpass")]
    InvalidTdrMode(String),

    #[error("invalid sample value '{0}': expected \"re im\"")]
    InvalidValue(String),

    #[error("invalid calibration standard '{0}'")]
    InvalidStandard(String),

    #[error("singular calibration equations at frequency index {index}")]
    SingularCalibration { index: usize },

    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VnaError>;

fn format_standards(standards: &[Standard]) -> String {
    standards
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
