//! Error types for tau energy correction

use thiserror::Error;

/// Parameter lookup errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Missing parameter: {0}")]
    Missing(String),

    #[error("Parameter {name} has wrong type: expected {expected}")]
    WrongType { name: String, expected: &'static str },
}

/// Coarse error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing parameters at configure time
    Configuration,
    /// Correction requested before configuration or event context
    NotInitialized,
    /// Event or event setup lacks a product the collaborator requires
    MissingEventData,
    /// The tau-jet itself cannot be corrected
    InvalidInput,
}

/// Tau correction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TauError {
    // Configuration errors
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    // Initialization errors
    #[error("Corrector not configured")]
    NotConfigured,

    #[error("No event context applied")]
    NoEventContext,

    // Event data errors
    #[error("Missing event product: {label}")]
    MissingProduct { label: String },

    #[error("Missing conditions record: {0}")]
    MissingConditions(&'static str),

    // Input errors
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

impl TauError {
    /// Shorthand for an out-of-range parameter
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        TauError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Error class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TauError::Parameter(_)
            | TauError::InvalidParameter { .. }
            | TauError::UnknownAlgorithm(_)
            | TauError::ConfigParse(_) => ErrorKind::Configuration,
            TauError::NotConfigured | TauError::NoEventContext => ErrorKind::NotInitialized,
            TauError::MissingProduct { .. } | TauError::MissingConditions(_) => {
                ErrorKind::MissingEventData
            }
            TauError::DegenerateInput(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Result type for tau correction operations
pub type TauResult<T> = Result<T, TauError>;
