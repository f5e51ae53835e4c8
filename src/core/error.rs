//! Error handling and error types for gbm-control.
//!
//! Every validation failure in this crate is raised synchronously, before any
//! call reaches the boosting engine, so a rejected configuration never leaves
//! a partially trained handle behind.

use std::io;
use thiserror::Error;

/// Main error type for the control layer.
#[derive(Error, Debug)]
pub enum GbmError {
    /// Malformed or contradictory configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Two mutually exclusive sources for the same logical setting
    #[error("Conflicting settings: {message}")]
    Conflict { message: String },

    /// A value has the wrong shape or kind
    #[error("Type error: {message}")]
    Type { message: String },

    /// A valid but unimplemented combination
    #[error("Unsupported: {message}")]
    Unsupported { message: String },

    /// Failure reported by the external boosting engine
    #[error("Engine error: {message}")]
    Engine { message: String },

    /// The engine's textual evaluation report could not be parsed
    #[error("Malformed evaluation report: {message} (report: {report:?})")]
    ReportParse { message: String, report: String },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parameter file errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parameter file errors
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
}

/// Type alias for Results using GbmError
pub type Result<T> = std::result::Result<T, GbmError>;

impl GbmError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        GbmError::Config {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        GbmError::Conflict {
            message: message.into(),
        }
    }

    /// Create a type error
    pub fn type_error<S: Into<String>>(message: S) -> Self {
        GbmError::Type {
            message: message.into(),
        }
    }

    /// Create an unsupported-combination error
    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        GbmError::Unsupported {
            message: message.into(),
        }
    }

    /// Create an engine error
    pub fn engine<S: Into<String>>(message: S) -> Self {
        GbmError::Engine {
            message: message.into(),
        }
    }

    /// Create a report parse error
    pub fn report_parse<M, R>(message: M, report: R) -> Self
    where
        M: Into<String>,
        R: Into<String>,
    {
        GbmError::ReportParse {
            message: message.into(),
            report: report.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        GbmError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for errors raised while checking user configuration, as opposed
    /// to failures coming back from the engine or the filesystem.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            GbmError::Config { .. }
                | GbmError::Conflict { .. }
                | GbmError::Type { .. }
                | GbmError::Unsupported { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            GbmError::Config { .. } => "config",
            GbmError::Conflict { .. } => "conflict",
            GbmError::Type { .. } => "type",
            GbmError::Unsupported { .. } => "unsupported",
            GbmError::Engine { .. } => "engine",
            GbmError::ReportParse { .. } => "report_parse",
            GbmError::DimensionMismatch { .. } => "dimension_mismatch",
            GbmError::Io { .. } => "io",
            GbmError::Json { .. } => "json",
            GbmError::Toml { .. } => "toml",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::GbmError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::GbmError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! type_error {
    ($msg:expr) => {
        $crate::core::error::GbmError::type_error($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::GbmError::type_error(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
