use thiserror::Error;

/// Main error type for the Pravartak system
#[derive(Error, Debug)]
pub enum PvError {
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by record operations.
///
/// Both kinds are recoverable by the caller; neither is ever retried
/// automatically and neither leaves a record partially written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Student record not found: {id}")]
    NotFound { id: String },
}

impl RecordError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        RecordError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(id: impl ToString) -> Self {
        RecordError::NotFound { id: id.to_string() }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RecordError::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound { .. })
    }

    /// Name of the offending field for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            RecordError::Validation { field, .. } => Some(field),
            RecordError::NotFound { .. } => None,
        }
    }
}

/// Result type alias for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type alias for Pravartak operations that touch config or I/O
pub type PvResult<T> = Result<T, PvError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $($arg:tt)*) => {
        $crate::RecordError::Validation {
            field: ($field).to_string(),
            message: format!($($arg)*),
        }
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::PvError::Config(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RecordError::validation("cgpa", "must be within [0, 10], got 11");

        assert!(error.to_string().contains("Validation error"));
        assert!(error.to_string().contains("cgpa"));
        assert!(error.to_string().contains("11"));
        assert_eq!(error.field(), Some("cgpa"));
    }

    #[test]
    fn test_error_conversion() {
        let record_error = RecordError::not_found("abc");
        let pv_error: PvError = record_error.into();

        match pv_error {
            PvError::Record(RecordError::NotFound { id }) => assert_eq!(id, "abc"),
            _ => panic!("Expected Record error"),
        }
    }

    #[test]
    fn test_macros() {
        let validation_err = validation_error!("attendance", "got {}", 120);
        assert!(validation_err.is_validation());
        assert_eq!(validation_err.field(), Some("attendance"));

        let config_err = config_error!("missing field: {}", "timeout");
        assert!(config_err.to_string().contains("timeout"));
    }
}
