//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration (bucket definitions, rate tables, presets).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid ledger input data.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Input could not be read or parsed.
    #[error("Input error: {0}")]
    Input(String),

    /// Output could not be produced.
    #[error("Output error: {0}")]
    Output(String),

    /// Internal error (a defect, not a user mistake).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the process exit code for this error.
    ///
    /// Codes follow the BSD `sysexits.h` convention.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 78,
            Self::Validation(_) => 65,
            Self::Input(_) => 66,
            Self::Output(_) => 74,
            Self::Internal(_) => 70,
        }
    }

    /// Returns the stable error code for machine-readable output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Input(_) => "INPUT_ERROR",
            Self::Output(_) => "OUTPUT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Input(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(AppError::Configuration(String::new()).exit_code(), 78);
        assert_eq!(AppError::Validation(String::new()).exit_code(), 65);
        assert_eq!(AppError::Input(String::new()).exit_code(), 66);
        assert_eq!(AppError::Output(String::new()).exit_code(), 74);
        assert_eq!(AppError::Internal(String::new()).exit_code(), 70);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Configuration(String::new()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Input(String::new()).error_code(), "INPUT_ERROR");
        assert_eq!(AppError::Output(String::new()).error_code(), "OUTPUT_ERROR");
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Configuration("msg".into()).to_string(),
            "Configuration error: msg"
        );
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(AppError::Input("msg".into()).to_string(), "Input error: msg");
        assert_eq!(
            AppError::Output("msg".into()).to_string(),
            "Output error: msg"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn test_json_error_is_input_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert_eq!(AppError::from(err).error_code(), "INPUT_ERROR");
    }
}
