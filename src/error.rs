use std::fmt;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, DqnError>;

/// Main error type for the DQN agent
#[derive(Debug, Clone, PartialEq)]
pub enum DqnError {
    /// Action name is not part of the configured action set
    InvalidAction {
        name: String,
    },

    /// Rejected hyperparameter or construction argument
    Configuration {
        name: String,
        reason: String,
    },

    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Sampling from an empty buffer
    EmptyBuffer(String),

    /// Numerical computation errors (diverged loss, NaN predictions)
    NumericalError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors
    SerializationError(String),
}

impl fmt::Display for DqnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DqnError::InvalidAction { name } => {
                write!(f, "Invalid action '{}': not in the configured action set", name)
            }
            DqnError::Configuration { name, reason } => {
                write!(f, "Invalid configuration '{}': {}", name, reason)
            }
            DqnError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            DqnError::EmptyBuffer(msg) => write!(f, "Empty buffer: {}", msg),
            DqnError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            DqnError::IoError(msg) => write!(f, "IO error: {}", msg),
            DqnError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for DqnError {}

impl From<std::io::Error> for DqnError {
    fn from(err: std::io::Error) -> Self {
        DqnError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for DqnError {
    fn from(err: bincode::Error) -> Self {
        DqnError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for DqnError {
    fn from(err: serde_json::Error) -> Self {
        DqnError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl DqnError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DqnError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn configuration<S: Into<String>>(name: S, reason: S) -> Self {
        DqnError::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_action<S: Into<String>>(name: S) -> Self {
        DqnError::InvalidAction { name: name.into() }
    }
}
