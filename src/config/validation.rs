//! Non-fatal validation outcomes.
//!
//! Resolvers never print on their own terms: each warning is logged through
//! the `log` facade and also handed back to the caller inside a
//! [`Validated`] value, so callers and tests can inspect what was reported.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    /// A parameter was supplied more than once; the last value wins
    DuplicateParameter,
    /// A deprecated parameter name was used
    Deprecated,
    /// A parameter name was resolved by prefix
    PartialMatch,
    /// Stratification was requested with a label vector of the wrong length
    LabelLengthMismatch,
}

/// Validation warning structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigWarning {
    /// Warning category
    pub kind: WarningKind,
    /// Parameter name
    pub parameter: String,
    /// Warning message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ConfigWarning {
    /// Create a warning and log it.
    pub fn emit<P, M>(kind: WarningKind, parameter: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        let warning = ConfigWarning {
            kind,
            parameter: parameter.into(),
            message: message.into(),
            suggestion: None,
        };
        log::warn!("{}", warning);
        warning
    }

    /// Attach a suggested replacement.
    pub fn with_suggestion<S: Into<String>>(mut self, suggestion: S) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (use '{}' instead)", suggestion)?;
        }
        Ok(())
    }
}

/// A value together with the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    /// The produced value
    pub value: T,
    /// Warnings, in the order they were raised
    pub warnings: Vec<ConfigWarning>,
}

impl<T> Validated<T> {
    /// Wrap a value with no warnings.
    pub fn clean(value: T) -> Self {
        Validated {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wrap a value with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ConfigWarning>) -> Self {
        Validated { value, warnings }
    }

    /// Number of warnings of a given kind.
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    /// Split into value and warnings.
    pub fn into_parts(self) -> (T, Vec<ConfigWarning>) {
        (self.value, self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_with_suggestion() {
        let warning = ConfigWarning::emit(
            WarningKind::Deprecated,
            "early.stop.round",
            "'early.stop.round' is deprecated",
        )
        .with_suggestion("early_stopping_rounds");
        assert_eq!(
            warning.to_string(),
            "'early.stop.round' is deprecated (use 'early_stopping_rounds' instead)"
        );
    }

    #[test]
    fn test_validated_count() {
        let warnings = vec![
            ConfigWarning::emit(WarningKind::PartialMatch, "early", "partial"),
            ConfigWarning::emit(WarningKind::Deprecated, "early", "deprecated"),
        ];
        let validated = Validated::with_warnings(1, warnings);
        assert_eq!(validated.count(WarningKind::Deprecated), 1);
        assert_eq!(validated.count(WarningKind::DuplicateParameter), 0);
        let (value, warnings) = validated.into_parts();
        assert_eq!(value, 1);
        assert_eq!(warnings.len(), 2);
    }
}
