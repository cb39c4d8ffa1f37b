//! Crate-wide error type.
//!
//! Each calculator has its own error enum; [`CalcError`] wraps all of them
//! so a host can handle any failure in one place and decide how to show it
//! from its [`ErrorKind`].

use thiserror::Error;

use crate::{
    assistant::AssistantError,
    expression::{EvalError, NumericConstantError, ParseError},
    plot::{DomainError, PlotError},
    repayment::RepaymentError,
    settings::SettingsError,
    stats::StatsError,
};

/// How a failure should be surfaced.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad user input; shown inline next to the form and fixed by the user.
    Validation,
    /// The settings file could not be loaded or saved.
    Configuration,
    /// The host is wired up wrongly.
    Internal,
}

#[derive(Debug, Error)]
pub enum CalcError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Number(#[from] NumericConstantError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Repayment(#[from] RepaymentError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Parse(_)
            | CalcError::Eval(_)
            | CalcError::Number(_)
            | CalcError::Domain(_)
            | CalcError::Plot(_)
            | CalcError::Stats(_)
            | CalcError::Repayment(_) => ErrorKind::Validation,
            CalcError::Settings(_) => ErrorKind::Configuration,
            CalcError::Assistant(_) => ErrorKind::Internal,
        }
    }

    /// Whether the user can fix this by correcting their input.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

pub type Result<T, E = CalcError> = std::result::Result<T, E>;
