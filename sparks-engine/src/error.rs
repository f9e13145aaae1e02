//! Error taxonomy shared by every engine component.
use std::fmt;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::metric::Metric;

/// Whether a failure is a local integration bug or an expected remote outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Programming or wiring error; abort the current operation.
    Local,
    /// Remote collaborator failure; notify the user and keep existing state.
    Remote,
}

/// Reason a control could not be turned into a scale factor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultKind {
    Missing,
    NotANumber(String),
    NonFinite(String),
    NonPositive(String),
}

/// A single control that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFault {
    pub metric: Metric,
    pub kind: FaultKind,
}

impl fmt::Display for InputFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let control = self.metric.control_id();
        match &self.kind {
            FaultKind::Missing => write!(f, "{control} is missing"),
            FaultKind::NotANumber(raw) => write!(f, "{control} is not a number ({raw:?})"),
            FaultKind::NonFinite(raw) => write!(f, "{control} is not finite ({raw:?})"),
            FaultKind::NonPositive(raw) => write!(f, "{control} must be positive ({raw:?})"),
        }
    }
}

fn join_faults(faults: &[InputFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Why a save round trip did not persist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SaveFailure {
    #[error("scenario name is empty")]
    EmptyName,
    #[error("store rejected scenario `{0}`")]
    Rejected(String),
    #[error("store unreachable: {0}")]
    Transport(String),
}

/// Errors raised by the collector, catalog, projector and synchronizer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("could not read scale inputs: {}", join_faults(.faults))]
    InputParse { faults: Vec<InputFault> },
    #[error("unknown metric key `{0}`")]
    UnknownMetric(String),
    #[error("scale input set has no factor for {0}")]
    MissingScaleFactor(Metric),
    #[error("computation failed (status {status}): {message}")]
    ComputationFailed { status: u16, message: String },
    #[error("saving scenario failed: {0}")]
    SaveFailed(SaveFailure),
    #[error("scenario `{0}` not found")]
    LoadNotFound(String),
    #[error("scenario store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ScenarioError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InputParse { .. } | Self::UnknownMetric(_) | Self::MissingScaleFactor(_) => {
                ErrorClass::Local
            }
            Self::ComputationFailed { .. }
            | Self::SaveFailed(_)
            | Self::LoadNotFound(_)
            | Self::StoreUnavailable(_) => ErrorClass::Remote,
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self.class(), ErrorClass::Remote)
    }
}

/// Start-up failure: the catalog or configuration is inconsistent.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
