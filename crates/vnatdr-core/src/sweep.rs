//! Sweep orchestration - raw dual-channel captures to calibrated S-parameters
//!
//! The hardware side is an external collaborator behind `SweepSource`. A
//! capture returns the frequency axis and both channels together, so the two
//! channels can never drift against the axis between reads.

use ndarray::Array1;
use num_complex::Complex64;

use crate::calibration::CalibrationSet;
use crate::datapoint::{Datapoint, Sweep};
use crate::error::{Result, VnaError};
use crate::frequency::Frequency;
use crate::math::{complex_2_db, complex_2_radian};
use crate::time_domain::{TdrConfig, TdrResult};

/// VNA measurement channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Channel 0, port 1 reflection (S11)
    Reflection,
    /// Channel 1, port 1 to port 2 transmission (S21)
    Transmission,
}

impl Channel {
    pub fn index(&self) -> usize {
        match self {
            Channel::Reflection => 0,
            Channel::Transmission => 1,
        }
    }

    /// Serial-console name of the channel (`data 0`, `data 1`)
    pub fn data_name(&self) -> &'static str {
        match self {
            Channel::Reflection => "data 0",
            Channel::Transmission => "data 1",
        }
    }
}

/// One dual-channel capture as read from the instrument
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSweep {
    /// Frequency axis in Hz
    pub frequencies: Vec<f64>,
    /// Channel 0 raw values
    pub channel0: Vec<Complex64>,
    /// Channel 1 raw values
    pub channel1: Vec<Complex64>,
}

impl RawSweep {
    pub fn new(frequencies: Vec<f64>, channel0: Vec<Complex64>, channel1: Vec<Complex64>) -> Self {
        Self {
            frequencies,
            channel0,
            channel1,
        }
    }

    pub fn channel(&self, channel: Channel) -> &[Complex64] {
        match channel {
            Channel::Reflection => &self.channel0,
            Channel::Transmission => &self.channel1,
        }
    }

    /// Pair each frequency with its raw values.
    ///
    /// Fails with `SweepLengthMismatch` unless all three sequences have the
    /// same length.
    pub fn into_datapoints(self) -> Result<(Sweep, Sweep)> {
        let n = self.frequencies.len();
        if self.channel0.len() != n || self.channel1.len() != n {
            return Err(VnaError::SweepLengthMismatch {
                frequencies: n,
                channel0: self.channel0.len(),
                channel1: self.channel1.len(),
            });
        }

        let data0 = self
            .frequencies
            .iter()
            .zip(&self.channel0)
            .map(|(&f, &z)| Datapoint::from_complex(f, z))
            .collect();
        let data1 = self
            .frequencies
            .iter()
            .zip(&self.channel1)
            .map(|(&f, &z)| Datapoint::from_complex(f, z))
            .collect();

        Ok((data0, data1))
    }
}

/// Parse one sample in the instrument's text format, `"<re> <im>"`
pub fn parse_value(text: &str) -> Result<Complex64> {
    let mut parts = text.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(re), Some(im), None) => match (re.parse(), im.parse()) {
            (Ok(re), Ok(im)) => Ok(Complex64::new(re, im)),
            _ => Err(VnaError::InvalidValue(text.to_string())),
        },
        _ => Err(VnaError::InvalidValue(text.to_string())),
    }
}

/// Source of raw dual-channel sweeps (the instrument connection)
pub trait SweepSource {
    /// Capture the frequency axis and both channels as one operation
    fn read_sweep(&mut self) -> anyhow::Result<RawSweep>;
}

impl<S: SweepSource + ?Sized> SweepSource for &mut S {
    fn read_sweep(&mut self) -> anyhow::Result<RawSweep> {
        (**self).read_sweep()
    }
}

/// Instruments that expose the frequency axis and each channel as separate reads
pub trait ChannelReader {
    fn frequency_axis(&mut self) -> anyhow::Result<Vec<f64>>;

    fn channel_values(&mut self, channel: Channel) -> anyhow::Result<Vec<Complex64>>;
}

/// Adapts a `ChannelReader` into a `SweepSource` by reading the axis, then
/// channel 0, then channel 1. The instrument must hold the sweep between reads.
#[derive(Debug)]
pub struct SequentialReads<R>(pub R);

impl<R: ChannelReader> SweepSource for SequentialReads<R> {
    fn read_sweep(&mut self) -> anyhow::Result<RawSweep> {
        let frequencies = self.0.frequency_axis()?;
        let channel0 = self.0.channel_values(Channel::Reflection)?;
        let channel1 = self.0.channel_values(Channel::Transmission)?;
        Ok(RawSweep::new(frequencies, channel0, channel1))
    }
}

/// Apply a calibration to raw channel data.
///
/// Each channel is corrected only when the calibration is valid for it;
/// otherwise its raw values pass through unchanged.
pub fn apply_calibration(
    calibration: &CalibrationSet,
    raw0: Sweep,
    raw1: Sweep,
) -> Result<(Sweep, Sweep)> {
    if !calibration.is_calculated() {
        return Ok((raw0, raw1));
    }

    let data0 = if calibration.is_valid_1port() {
        raw0.iter()
            .map(|dp| calibration.correct_one_port(dp))
            .collect::<Result<Sweep>>()?
    } else {
        raw0
    };

    let data1 = if calibration.is_valid_2port() {
        raw1.iter()
            .map(|dp| calibration.correct_two_port(dp))
            .collect::<Result<Sweep>>()?
    } else {
        raw1
    };

    Ok((data0, data1))
}

/// Run one sweep and apply the calibration to both channels
pub fn run_sweep<S: SweepSource + ?Sized>(
    source: &mut S,
    calibration: &CalibrationSet,
) -> Result<(Sweep, Sweep)> {
    let raw = source.read_sweep()?;
    tracing::debug!(
        npoints = raw.frequencies.len(),
        one_port = calibration.is_valid_1port(),
        two_port = calibration.is_valid_2port(),
        "sweep captured"
    );
    let (raw0, raw1) = raw.into_datapoints()?;
    apply_calibration(calibration, raw0, raw1)
}

/// A calibrated frequency-domain measurement
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Frequency axis
    pub frequency: Frequency,
    /// Reflection S11 per frequency
    pub s11: Array1<Complex64>,
    /// Transmission S21 per frequency
    pub s21: Array1<Complex64>,
}

impl Measurement {
    /// Build from the two corrected channels of one sweep
    pub fn from_sweeps(data0: &[Datapoint], data1: &[Datapoint]) -> Result<Self> {
        if data0.len() != data1.len() {
            return Err(VnaError::SweepLengthMismatch {
                frequencies: data0.len(),
                channel0: data0.len(),
                channel1: data1.len(),
            });
        }

        let frequency = Frequency::from_f(data0.iter().map(|dp| dp.freq()).collect());
        let s11 = data0.iter().map(|dp| dp.z()).collect();
        let s21 = data1.iter().map(|dp| dp.z()).collect();

        Ok(Self {
            frequency,
            s11,
            s21,
        })
    }

    /// Frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        self.frequency.f()
    }

    #[inline]
    pub fn nfreq(&self) -> usize {
        self.frequency.npoints()
    }

    /// S11 magnitude in dB
    pub fn s11_db(&self) -> Array1<f64> {
        self.s11.mapv(complex_2_db)
    }

    /// S21 magnitude in dB
    pub fn s21_db(&self) -> Array1<f64> {
        self.s21.mapv(complex_2_db)
    }

    /// S11 phase in radians
    pub fn s11_rad(&self) -> Array1<f64> {
        self.s11.mapv(complex_2_radian)
    }

    /// S21 phase in radians
    pub fn s21_rad(&self) -> Array1<f64> {
        self.s21.mapv(complex_2_radian)
    }
}

/// Measure calibrated S11 and S21
pub fn measure<S: SweepSource + ?Sized>(
    source: &mut S,
    calibration: &CalibrationSet,
) -> Result<Measurement> {
    let (data0, data1) = run_sweep(source, calibration)?;
    Measurement::from_sweeps(&data0, &data1)
}

/// Measure and transform calibrated S11 to the time domain
pub fn measure_tdr<S: SweepSource + ?Sized>(
    source: &mut S,
    calibration: &CalibrationSet,
    config: &TdrConfig,
) -> Result<TdrResult> {
    measure(source, calibration)?.s11_time_domain(config)
}
