//! Parameter maps and the parameter normalizer.
//!
//! [`Params`] is an ordered multimap: callers may legitimately supply
//! `eval_metric` several times, and duplicates of other names have to be
//! observed before they can be reported. [`normalize`] reduces it to the form
//! the engine accepts.

use crate::config::constraints::{encode_interaction_value, encode_monotone_value};
use crate::config::validation::{ConfigWarning, Validated, WarningKind};
use crate::core::constants::*;
use crate::core::error::{GbmError, Result};
use crate::core::types::Callable;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// A single parameter value.
#[derive(Debug, Clone)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value, including objective and metric identifiers
    Str(String),
    /// Structured value, e.g. constraint specifications
    List(Vec<ParamValue>),
    /// User-supplied function in a hook slot
    Callable(Callable),
}

impl ParamValue {
    /// String content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric content. Strings holding a number are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            ParamValue::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Integral numeric content. Floats qualify when they hold a whole number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            ParamValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Boolean content. Accepts the engine's textual spellings as well.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            ParamValue::Int(0) => Some(false),
            ParamValue::Int(1) => Some(true),
            ParamValue::Str(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// The callable in this slot, if any.
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            ParamValue::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// True if this value holds a user function.
    pub fn is_callable(&self) -> bool {
        matches!(self, ParamValue::Callable(_))
    }

    /// Largest numeric element: the value itself for scalars, the maximum
    /// over elements for lists.
    pub fn max_numeric(&self) -> Option<f64> {
        match self {
            ParamValue::List(items) => items
                .iter()
                .filter_map(|item| item.max_numeric())
                .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))),
            other => other.as_f64(),
        }
    }

    /// Render the value the way the engine's key/value interface expects.
    pub fn to_engine_string(&self) -> Result<String> {
        match self {
            ParamValue::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
            ParamValue::Int(i) => Ok(i.to_string()),
            ParamValue::Float(f) => Ok(f.to_string()),
            ParamValue::Str(s) => Ok(s.clone()),
            ParamValue::List(items) => Ok(items
                .iter()
                .map(|item| item.to_engine_string())
                .collect::<Result<Vec<_>>>()?
                .join(",")),
            ParamValue::Callable(c) => Err(GbmError::type_error(format!(
                "a {} cannot be passed to the engine as a parameter",
                c.kind()
            ))),
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a == b,
            (ParamValue::Int(a), ParamValue::Int(b)) => a == b,
            (ParamValue::Float(a), ParamValue::Float(b)) => a == b,
            (ParamValue::Str(a), ParamValue::Str(b)) => a == b,
            (ParamValue::List(a), ParamValue::List(b)) => a == b,
            (ParamValue::Callable(Callable::Objective(a)), ParamValue::Callable(Callable::Objective(b))) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            (ParamValue::Callable(Callable::Metric(a)), ParamValue::Callable(Callable::Metric(b))) => {
                Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Str(s) => write!(f, "\"{}\"", s),
            ParamValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ParamValue::Callable(c) => write!(f, "{:?}", c),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<Callable> for ParamValue {
    fn from(value: Callable) -> Self {
        ParamValue::Callable(value)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered parameter multimap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    /// Create an empty parameter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a binding, builder style.
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, name: K, value: V) -> Self {
        self.push(name, value);
        self
    }

    /// Append a binding, keeping earlier bindings of the same name.
    pub fn push<K: Into<String>, V: Into<ParamValue>>(&mut self, name: K, value: V) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replace every binding of `name` with a single one, at the position of
    /// the first existing binding, or at the end if there was none.
    pub fn set<K: Into<String>, V: Into<ParamValue>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter().position(|(n, _)| *n == name) {
            Some(pos) => {
                self.entries[pos].1 = value;
                let mut index = 0;
                self.entries.retain(|(n, _)| {
                    let keep = index <= pos || *n != name;
                    index += 1;
                    keep
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// Last value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// String value bound to `name`, if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Every value bound to `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ParamValue> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// True if `name` is bound at least once.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Remove every binding of `name`, returning the removed values.
    pub fn remove(&mut self, name: &str) -> Vec<ParamValue> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for (n, v) in self.entries.drain(..) {
            if n == name {
                removed.push(v);
            } else {
                kept.push((n, v));
            }
        }
        self.entries = kept;
        removed
    }

    /// Number of bindings, counting repeats.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Distinct names, in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .filter(|(n, _)| seen.insert(n.as_str()))
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Append every binding of `other`.
    pub fn extend(&mut self, other: Params) {
        self.entries.extend(other.entries);
    }

    /// Treat `.` in names as `_`.
    pub fn canonicalize_names(self) -> Self {
        Params {
            entries: self
                .entries
                .into_iter()
                .map(|(n, v)| (canonical_name(&n), v))
                .collect(),
        }
    }

    /// Render every binding as an engine key/value pair.
    ///
    /// Callables are rejected: they are resolved into hooks before the
    /// parameters reach the engine.
    pub fn to_engine_pairs(&self) -> Result<Vec<(String, String)>> {
        self.entries
            .iter()
            .map(|(n, v)| Ok((n.clone(), v.to_engine_string()?)))
            .collect()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Params {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Legacy dotted names use `_` in their canonical form.
pub fn canonical_name(name: &str) -> String {
    name.replace('.', "_")
}

/// Merge `params` with `extra_named_args` and reduce the result to the form
/// the engine accepts.
///
/// Fails with a conflict if a name appears in both sources. Names repeated
/// within the merged list keep their last value, with a warning, except
/// `eval_metric`. Multiclass objectives require `num_class >= 2`, and
/// structured constraint values are replaced by their string encodings.
pub fn normalize(params: Params, extra_named_args: Params) -> Result<Validated<Params>> {
    let params = params.canonicalize_names();
    let extra = extra_named_args.canonicalize_names();

    let param_names: BTreeSet<&str> = params.iter().map(|(n, _)| n).collect();
    let overlap: Vec<&str> = extra
        .names()
        .into_iter()
        .filter(|n| param_names.contains(n))
        .collect();
    if !overlap.is_empty() {
        return Err(GbmError::conflict(format!(
            "same parameters in 'params' and in the call are not allowed: {}",
            overlap.join(", ")
        )));
    }

    let mut merged = params;
    merged.extend(extra);

    let mut warnings = Vec::new();
    let merged = keep_last_values(merged, &mut warnings);

    check_num_class(&merged)?;
    let merged = encode_constraints(merged)?;

    log::debug!("normalized {} parameters", merged.len());
    Ok(Validated::with_warnings(merged, warnings))
}

fn keep_last_values(params: Params, warnings: &mut Vec<ConfigWarning>) -> Params {
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (i, (name, _)) in params.entries.iter().enumerate() {
        last_index.insert(name.as_str(), i);
        *counts.entry(name.as_str()).or_insert(0) += 1;
    }

    for name in params.names() {
        if name != MULTI_VALUED_PARAM && counts[name] > 1 {
            warnings.push(ConfigWarning::emit(
                WarningKind::DuplicateParameter,
                name,
                format!(
                    "parameter '{}' was provided {} times; only the last value will be used",
                    name, counts[name]
                ),
            ));
        }
    }

    let keep: Vec<bool> = params
        .entries
        .iter()
        .enumerate()
        .map(|(i, (name, _))| name == MULTI_VALUED_PARAM || last_index[name.as_str()] == i)
        .collect();

    Params {
        entries: params
            .entries
            .into_iter()
            .zip(keep)
            .filter_map(|(entry, keep)| keep.then_some(entry))
            .collect(),
    }
}

fn check_num_class(params: &Params) -> Result<()> {
    let objective = match params.get_str(OBJECTIVE_PARAM) {
        Some(objective) if objective.starts_with(MULTICLASS_PREFIX) => objective,
        _ => return Ok(()),
    };

    let num_class = params.get(NUM_CLASS_PARAM).and_then(ParamValue::max_numeric);
    match num_class {
        Some(n) if n >= 2.0 => Ok(()),
        _ => Err(GbmError::config(format!(
            "'{}' > 1 must be set for multiclass objective '{}'",
            NUM_CLASS_PARAM, objective
        ))),
    }
}

fn encode_constraints(mut params: Params) -> Result<Params> {
    if let Some(value) = params.get(MONOTONE_CONSTRAINTS_PARAM) {
        if value.as_str().is_none() {
            let encoded = encode_monotone_value(value)?;
            params.set(MONOTONE_CONSTRAINTS_PARAM, encoded);
        }
    }

    if let Some(value) = params.get(INTERACTION_CONSTRAINTS_PARAM) {
        if value.as_str().is_none() {
            let encoded = encode_interaction_value(value)?;
            params.set(INTERACTION_CONSTRAINTS_PARAM, encoded);
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_builder_and_lookup() {
        let params = Params::new()
            .with("max_depth", 3)
            .with("eta", 0.3)
            .with("objective", "binary:logistic");

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("max_depth"), Some(&ParamValue::Int(3)));
        assert_eq!(params.get_str("objective"), Some("binary:logistic"));
        assert!(params.get("missing").is_none());
    }

    #[test]
    fn test_params_set_replaces_in_place() {
        let mut params = Params::new()
            .with("a", 1)
            .with("b", 2)
            .with("a", 3);
        params.set("a", 4);
        let names: Vec<&str> = params.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(params.get("a"), Some(&ParamValue::Int(4)));
    }

    #[test]
    fn test_params_remove() {
        let mut params = Params::new()
            .with("eval_metric", "auc")
            .with("eta", 0.1)
            .with("eval_metric", "logloss");
        let removed = params.remove("eval_metric");
        assert_eq!(removed.len(), 2);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_normalize_canonicalizes_dots() {
        let params = Params::new().with("max.depth", 3);
        let extra = Params::new().with("min.child.weight", 1);
        let result = normalize(params, extra).unwrap();
        assert!(result.value.contains("max_depth"));
        assert!(result.value.contains("min_child_weight"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_normalize_conflict_between_sources() {
        let params = Params::new().with("max_depth", 3);
        let extra = Params::new().with("max.depth", 4);
        let err = normalize(params, extra).unwrap_err();
        assert!(matches!(err, GbmError::Conflict { .. }));
        assert!(err.to_string().contains("max_depth"));
    }

    #[test]
    fn test_normalize_duplicate_keeps_last() {
        let params = Params::new()
            .with("eta", 0.1)
            .with("max_depth", 2)
            .with("eta", 0.3);
        let result = normalize(params, Params::new()).unwrap();
        assert_eq!(result.value.get_all("eta").count(), 1);
        assert_eq!(result.value.get("eta"), Some(&ParamValue::Float(0.3)));
        assert_eq!(result.count(WarningKind::DuplicateParameter), 1);
        assert_eq!(result.warnings[0].parameter, "eta");
    }

    #[test]
    fn test_normalize_keeps_repeated_eval_metric() {
        let params = Params::new()
            .with("eval_metric", "auc")
            .with("eval.metric", "logloss");
        let result = normalize(params, Params::new()).unwrap();
        let metrics: Vec<&str> = result
            .value
            .get_all("eval_metric")
            .filter_map(ParamValue::as_str)
            .collect();
        assert_eq!(metrics, vec!["auc", "logloss"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_normalize_multiclass_requires_num_class() {
        let params = Params::new().with("objective", "multi:softprob");
        let err = normalize(params, Params::new()).unwrap_err();
        assert!(matches!(err, GbmError::Config { .. }));

        let params = Params::new()
            .with("objective", "multi:softmax")
            .with("num_class", 1);
        assert!(normalize(params, Params::new()).is_err());

        let params = Params::new().with("objective", "multi:softmax");
        let extra = Params::new().with("num_class", 3);
        assert!(normalize(params, extra).is_ok());
    }

    #[test]
    fn test_normalize_encodes_constraints() {
        let params = Params::new()
            .with("monotone_constraints", vec![1, -1, 0])
            .with(
                "interaction_constraints",
                ParamValue::List(vec![ParamValue::from(vec![0, 1]), ParamValue::from(vec![2])]),
            );
        let result = normalize(params, Params::new()).unwrap();
        assert_eq!(result.value.get_str("monotone_constraints"), Some("(1,-1,0)"));
        assert_eq!(result.value.get_str("interaction_constraints"), Some("[[0,1],[2]]"));
    }

    #[test]
    fn test_normalize_passes_encoded_strings_through() {
        let params = Params::new().with("monotone_constraints", "(1,0)");
        let result = normalize(params, Params::new()).unwrap();
        assert_eq!(result.value.get_str("monotone_constraints"), Some("(1,0)"));
    }

    #[test]
    fn test_normalize_rejects_malformed_interactions() {
        let params = Params::new().with("interaction_constraints", vec![0, 1]);
        let err = normalize(params, Params::new()).unwrap_err();
        assert!(matches!(err, GbmError::Type { .. }));
    }

    #[test]
    fn test_to_engine_pairs() {
        let params = Params::new()
            .with("eta", 0.5)
            .with("max_depth", 6)
            .with("verbose", false);
        let pairs = params.to_engine_pairs().unwrap();
        assert_eq!(
            pairs,
            vec![
                ("eta".to_string(), "0.5".to_string()),
                ("max_depth".to_string(), "6".to_string()),
                ("verbose".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_to_engine_pairs_rejects_callables() {
        let hook = Callable::metric(|_, _| Ok(crate::core::types::MetricValue::new("e", 0.0)));
        let params = Params::new().with("eval_metric", hook);
        assert!(matches!(params.to_engine_pairs(), Err(GbmError::Type { .. })));
    }
}
