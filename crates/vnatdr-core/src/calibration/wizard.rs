//! Calibration workflow as an explicit state machine
//!
//! Each transition is triggered by a "standard attached" event carrying one
//! capture. The interactive part (asking a person to attach a termination)
//! stays outside, behind `StandardPrompt`.

use std::fmt;

use super::store::{CalibrationSet, CalibrationStore};
use super::Standard;
use crate::error::{Result, VnaError};
use crate::sweep::{Channel, RawSweep, SweepSource};

/// One-port (short/open/load) or two-port (adds through/isolation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CalibrationKind {
    #[default]
    OnePort,
    TwoPort,
}

/// Progress of a calibration session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    AwaitingShort,
    AwaitingOpen,
    AwaitingLoad,
    AwaitingThrough,
    AwaitingIsolation,
    Ready,
}

impl CalibrationState {
    /// Standard expected in this state, `None` once ready
    pub fn expected_standard(&self) -> Option<Standard> {
        match self {
            CalibrationState::AwaitingShort => Some(Standard::Short),
            CalibrationState::AwaitingOpen => Some(Standard::Open),
            CalibrationState::AwaitingLoad => Some(Standard::Load),
            CalibrationState::AwaitingThrough => Some(Standard::Through),
            CalibrationState::AwaitingIsolation => Some(Standard::Isolation),
            CalibrationState::Ready => None,
        }
    }

    fn next(&self, kind: CalibrationKind) -> Self {
        match (self, kind) {
            (CalibrationState::AwaitingShort, _) => CalibrationState::AwaitingOpen,
            (CalibrationState::AwaitingOpen, _) => CalibrationState::AwaitingLoad,
            (CalibrationState::AwaitingLoad, CalibrationKind::OnePort) => CalibrationState::Ready,
            (CalibrationState::AwaitingLoad, CalibrationKind::TwoPort) => {
                CalibrationState::AwaitingThrough
            }
            (CalibrationState::AwaitingThrough, _) => CalibrationState::AwaitingIsolation,
            (CalibrationState::AwaitingIsolation, _) => CalibrationState::Ready,
            (CalibrationState::Ready, _) => CalibrationState::Ready,
        }
    }
}

impl fmt::Display for CalibrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected_standard() {
            Some(standard) => write!(f, "awaiting {}", standard),
            None => f.write_str("ready"),
        }
    }
}

/// Blocks until a person confirms that `standard` is attached
pub trait StandardPrompt {
    fn attach(&mut self, standard: Standard) -> anyhow::Result<()>;
}

impl<F> StandardPrompt for F
where
    F: FnMut(Standard) -> anyhow::Result<()>,
{
    fn attach(&mut self, standard: Standard) -> anyhow::Result<()> {
        self(standard)
    }
}

/// Drives the capture of each standard in order and computes corrections
/// when the last one is recorded
#[derive(Debug, Clone)]
pub struct CalibrationWizard {
    kind: CalibrationKind,
    state: CalibrationState,
    store: CalibrationStore,
}

impl CalibrationWizard {
    pub fn new(kind: CalibrationKind) -> Self {
        Self {
            kind,
            state: CalibrationState::AwaitingShort,
            store: CalibrationStore::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> CalibrationKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    #[inline]
    pub fn expected_standard(&self) -> Option<Standard> {
        self.state.expected_standard()
    }

    pub fn is_ready(&self) -> bool {
        self.state == CalibrationState::Ready
    }

    pub fn store(&self) -> &CalibrationStore {
        &self.store
    }

    /// Record a capture for the expected standard and advance.
    ///
    /// Reflection standards keep channel 0, through and isolation keep
    /// channel 1. Reaching `Ready` computes the corrections; if that fails
    /// the wizard stays in its current state.
    pub fn record(&mut self, raw: RawSweep) -> Result<CalibrationState> {
        let Some(standard) = self.expected_standard() else {
            return Ok(self.state);
        };

        let (data0, data1) = raw.into_datapoints()?;
        let sweep = match standard.channel() {
            Channel::Reflection => data0,
            Channel::Transmission => data1,
        };

        self.store.insert(standard, sweep);
        let next = self.state.next(self.kind);
        if next == CalibrationState::Ready {
            self.store.compute_corrections()?;
        }

        tracing::info!(%standard, state = %next, "calibration standard captured");
        self.state = next;
        Ok(next)
    }

    /// Capture the expected standard from `source` and record it
    pub fn standard_attached<S: SweepSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<CalibrationState> {
        if self.is_ready() {
            return Ok(self.state);
        }
        let raw = source.read_sweep()?;
        self.record(raw)
    }

    /// The finished calibration, or the standards still missing
    pub fn finish(self) -> Result<CalibrationSet> {
        if !self.is_ready() {
            return Err(VnaError::InsufficientStandards {
                missing: self.store.missing(self.kind == CalibrationKind::TwoPort),
            });
        }
        Ok(self.store.into_calibration())
    }
}

/// Run a full calibration, prompting for each standard before capturing it
pub fn calibrate<S, P>(source: &mut S, prompt: &mut P, kind: CalibrationKind) -> Result<CalibrationSet>
where
    S: SweepSource + ?Sized,
    P: StandardPrompt + ?Sized,
{
    let mut wizard = CalibrationWizard::new(kind);
    while let Some(standard) = wizard.expected_standard() {
        prompt.attach(standard)?;
        wizard.standard_attached(source)?;
    }
    wizard.finish()
}

/// Short, open and load on port 1
pub fn calibrate_one_port<S, P>(source: &mut S, prompt: &mut P) -> Result<CalibrationSet>
where
    S: SweepSource + ?Sized,
    P: StandardPrompt + ?Sized,
{
    calibrate(source, prompt, CalibrationKind::OnePort)
}

/// Short, open and load on port 1, then through and isolation (both ports
/// capped with loads)
pub fn calibrate_two_port<S, P>(source: &mut S, prompt: &mut P) -> Result<CalibrationSet>
where
    S: SweepSource + ?Sized,
    P: StandardPrompt + ?Sized,
{
    calibrate(source, prompt, CalibrationKind::TwoPort)
}
