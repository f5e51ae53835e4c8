//! Migration of legacy argument names.
//!
//! Names are looked up in a fixed table, first exactly and then as an
//! unambiguous prefix of a legacy name. Matched bindings are renamed to their
//! canonical name; the resolver returns the rewritten bindings instead of
//! touching any caller state.

use crate::config::params::Params;
use crate::config::validation::{ConfigWarning, Validated, WarningKind};
use crate::core::constants::DEPRECATED_SENTINEL;
use crate::core::error::{GbmError, Result};

/// Legacy name to canonical name.
pub static DEPRECATION_TABLE: &[(&str, &str)] = &[
    ("print.every.n", "print_every_n"),
    ("early.stop.round", "early_stopping_rounds"),
    ("training.data", "data"),
    ("with.stats", "with_stats"),
    ("numberOfClusters", "n_clusters"),
    ("features.keep", "features_keep"),
    ("plot.height", "plot_height"),
    ("plot.width", "plot_width"),
    ("n_first_tree", "trees"),
    ("dummy", DEPRECATED_SENTINEL),
];

/// How a supplied name matched the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeprecatedMatch {
    /// The supplied name is a legacy name
    Exact {
        /// Legacy name
        old: &'static str,
        /// Canonical replacement
        new: &'static str,
    },
    /// The supplied name is a prefix of exactly one legacy name
    Partial {
        /// Legacy name
        old: &'static str,
        /// Canonical replacement
        new: &'static str,
    },
}

impl DeprecatedMatch {
    /// Canonical replacement name.
    pub fn new_name(&self) -> &'static str {
        match self {
            DeprecatedMatch::Exact { new, .. } | DeprecatedMatch::Partial { new, .. } => new,
        }
    }

    /// Legacy name that was matched.
    pub fn old_name(&self) -> &'static str {
        match self {
            DeprecatedMatch::Exact { old, .. } | DeprecatedMatch::Partial { old, .. } => old,
        }
    }
}

/// Look `name` up in the deprecation table.
///
/// Returns `Ok(None)` for names that are not deprecated, and a config error
/// when the name is a prefix of more than one legacy name.
pub fn lookup(name: &str) -> Result<Option<DeprecatedMatch>> {
    if name.is_empty() {
        return Ok(None);
    }

    if let Some(&(old, new)) = DEPRECATION_TABLE.iter().find(|(old, _)| *old == name) {
        return Ok(Some(DeprecatedMatch::Exact { old, new }));
    }

    let candidates: Vec<&(&str, &str)> = DEPRECATION_TABLE
        .iter()
        .filter(|(old, _)| old.starts_with(name))
        .collect();

    match candidates.as_slice() {
        [] => Ok(None),
        [&(old, new)] => Ok(Some(DeprecatedMatch::Partial { old, new })),
        many => Err(GbmError::config(format!(
            "'{}' is ambiguous: it partially matches deprecated names {}",
            name,
            many.iter()
                .map(|(old, _)| format!("'{}'", old))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Rewrite deprecated names in `supplied`.
///
/// Unmatched bindings pass through unchanged. Bindings whose canonical name
/// is the `DUMMY` sentinel are dropped.
pub fn resolve(supplied: Params) -> Result<Validated<Params>> {
    let mut resolved = Params::new();
    let mut warnings = Vec::new();

    for (name, value) in supplied {
        let matched = match lookup(&name)? {
            Some(matched) => matched,
            None => {
                resolved.push(name, value);
                continue;
            }
        };

        if let DeprecatedMatch::Partial { old, .. } = matched {
            warnings.push(ConfigWarning::emit(
                WarningKind::PartialMatch,
                name.as_str(),
                format!("'{}' was partially matched to '{}'", name, old),
            ));
        }

        let new = matched.new_name();
        if new == DEPRECATED_SENTINEL {
            warnings.push(ConfigWarning::emit(
                WarningKind::Deprecated,
                matched.old_name(),
                format!("'{}' is deprecated and ignored", matched.old_name()),
            ));
            continue;
        }

        warnings.push(
            ConfigWarning::emit(
                WarningKind::Deprecated,
                matched.old_name(),
                format!("'{}' is deprecated", matched.old_name()),
            )
            .with_suggestion(new),
        );
        resolved.push(new, value);
    }

    Ok(Validated::with_warnings(resolved, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::params::ParamValue;

    #[test]
    fn test_lookup_exact() {
        let matched = lookup("early.stop.round").unwrap().unwrap();
        assert_eq!(
            matched,
            DeprecatedMatch::Exact {
                old: "early.stop.round",
                new: "early_stopping_rounds"
            }
        );
    }

    #[test]
    fn test_lookup_partial() {
        let matched = lookup("early.stop").unwrap().unwrap();
        assert!(matches!(matched, DeprecatedMatch::Partial { .. }));
        assert_eq!(matched.new_name(), "early_stopping_rounds");
    }

    #[test]
    fn test_lookup_ambiguous_prefix() {
        let err = lookup("plot.").unwrap_err();
        assert!(matches!(err, GbmError::Config { .. }));
        assert!(err.to_string().contains("plot.height"));
        assert!(err.to_string().contains("plot.width"));
    }

    #[test]
    fn test_lookup_unmatched() {
        assert!(lookup("max_depth").unwrap().is_none());
        assert!(lookup("").unwrap().is_none());
    }

    #[test]
    fn test_resolve_exact_rebinds() {
        let supplied = Params::new()
            .with("early.stop.round", 10)
            .with("max_depth", 4);
        let result = resolve(supplied).unwrap();
        assert_eq!(result.count(WarningKind::Deprecated), 1);
        assert_eq!(result.count(WarningKind::PartialMatch), 0);
        assert_eq!(result.value.get("early_stopping_rounds"), Some(&ParamValue::Int(10)));
        assert!(!result.value.contains("early.stop.round"));
        assert_eq!(result.value.get("max_depth"), Some(&ParamValue::Int(4)));
    }

    #[test]
    fn test_resolve_partial_warns_twice() {
        let supplied = Params::new().with("print.every", 5);
        let result = resolve(supplied).unwrap();
        assert_eq!(result.count(WarningKind::PartialMatch), 1);
        assert_eq!(result.count(WarningKind::Deprecated), 1);
        assert_eq!(result.value.get("print_every_n"), Some(&ParamValue::Int(5)));
    }

    #[test]
    fn test_resolve_dummy_is_dropped() {
        let supplied = Params::new().with("dummy", 1);
        let result = resolve(supplied).unwrap();
        assert!(result.value.is_empty());
        assert_eq!(result.count(WarningKind::Deprecated), 1);
        assert!(!result.value.contains(DEPRECATED_SENTINEL));
    }

    #[test]
    fn test_resolve_ambiguous_fails() {
        let supplied = Params::new().with("p", 1);
        assert!(matches!(resolve(supplied), Err(GbmError::Config { .. })));
    }
}
