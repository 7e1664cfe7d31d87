use thiserror::Error;

/// Result type alias using [`RcError`].
pub type Result<T> = std::result::Result<T, RcError>;

/// Errors raised by circuit construction, value parsing and result export.
#[derive(Error, Debug)]
pub enum RcError {
    /// A circuit that cannot be given a finite capacitance
    #[error("Invalid circuit: {reason}")]
    InvalidCircuit { reason: String },

    /// A component value that failed to parse or is out of range
    #[error("Invalid component value '{value}': {reason}")]
    InvalidValue { value: String, reason: String },

    /// Search parameters that cannot produce a meaningful enumeration
    #[error("Invalid search parameter: {message}")]
    InvalidParameter { message: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl RcError {
    pub fn invalid_circuit(reason: impl Into<String>) -> Self {
        Self::InvalidCircuit {
            reason: reason.into(),
        }
    }

    pub fn invalid_value(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
