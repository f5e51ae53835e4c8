//! Core data types for gbm-control.
//!
//! Numeric aliases follow the engine's single-precision prediction buffers,
//! while metric values are kept in double precision.

use crate::core::constants::*;
use crate::core::error::Result;
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Prediction and gradient value type.
pub type Score = f32;

/// Target value type.
pub type Label = f32;

/// Boosting round number.
pub type IterationIndex = usize;

/// Ordered `(name, value)` pairs produced by one evaluation step. Names follow
/// the `"dataset-metric"` convention.
pub type NamedMetrics = Vec<(String, f64)>;

/// Family of a textual objective, derived from its `family:variant` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveKind {
    /// `reg:*` objectives
    Regression,
    /// `binary:*` objectives
    Binary,
    /// `multi:*` objectives
    Multiclass,
    /// `rank:*` objectives
    Ranking,
    /// `count:*` objectives
    Count,
    /// `survival:*` objectives
    Survival,
    /// Anything the engine may accept that this layer does not classify
    Other,
}

impl ObjectiveKind {
    /// Classify an objective name such as `"multi:softprob"`.
    pub fn from_name(name: &str) -> Self {
        if name.starts_with(MULTICLASS_PREFIX) {
            ObjectiveKind::Multiclass
        } else if name.starts_with(RANKING_PREFIX) {
            ObjectiveKind::Ranking
        } else if name.starts_with(BINARY_PREFIX) {
            ObjectiveKind::Binary
        } else if name.starts_with("reg:") {
            ObjectiveKind::Regression
        } else if name.starts_with("count:") {
            ObjectiveKind::Count
        } else if name.starts_with("survival:") {
            ObjectiveKind::Survival
        } else {
            ObjectiveKind::Other
        }
    }

    /// Objectives whose labels are class levels.
    pub fn is_classification(&self) -> bool {
        matches!(self, ObjectiveKind::Binary | ObjectiveKind::Multiclass)
    }

    /// Objectives whose labels are stratified as categorical levels.
    pub fn has_categorical_labels(&self) -> bool {
        self.is_classification() || *self == ObjectiveKind::Ranking
    }
}

impl fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveKind::Regression => write!(f, "regression"),
            ObjectiveKind::Binary => write!(f, "binary"),
            ObjectiveKind::Multiclass => write!(f, "multiclass"),
            ObjectiveKind::Ranking => write!(f, "ranking"),
            ObjectiveKind::Count => write!(f, "count"),
            ObjectiveKind::Survival => write!(f, "survival"),
            ObjectiveKind::Other => write!(f, "other"),
        }
    }
}

/// Read access to an engine dataset, as seen by user hooks.
pub trait DataView {
    /// Number of rows in the dataset.
    fn num_rows(&self) -> usize;

    /// Training labels, one per row.
    fn labels(&self) -> ArrayView1<'_, Label>;
}

/// First and second order gradients returned by a custom objective.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPair {
    /// First order gradients
    pub grad: Array1<Score>,
    /// Second order gradients
    pub hess: Array1<Score>,
}

/// Value returned by a custom evaluation metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    /// Metric name, without dataset prefix
    pub metric: String,
    /// Metric value
    pub value: f64,
}

impl MetricValue {
    /// Create a metric value
    pub fn new<S: Into<String>>(metric: S, value: f64) -> Self {
        MetricValue {
            metric: metric.into(),
            value,
        }
    }
}

/// User objective: margin predictions and training data to gradients.
pub type ObjectiveFn =
    Arc<dyn Fn(ArrayView1<'_, Score>, &dyn DataView) -> Result<GradientPair> + Send + Sync>;

/// User metric: margin predictions and a watched dataset to a named value.
pub type MetricFn =
    Arc<dyn Fn(ArrayView1<'_, Score>, &dyn DataView) -> Result<MetricValue> + Send + Sync>;

/// A user-supplied function stored in a parameter slot.
#[derive(Clone)]
pub enum Callable {
    /// Custom objective
    Objective(ObjectiveFn),
    /// Custom evaluation metric
    Metric(MetricFn),
}

impl Callable {
    /// Wrap a closure as a custom objective.
    pub fn objective<F>(f: F) -> Self
    where
        F: Fn(ArrayView1<'_, Score>, &dyn DataView) -> Result<GradientPair> + Send + Sync + 'static,
    {
        Callable::Objective(Arc::new(f))
    }

    /// Wrap a closure as a custom evaluation metric.
    pub fn metric<F>(f: F) -> Self
    where
        F: Fn(ArrayView1<'_, Score>, &dyn DataView) -> Result<MetricValue> + Send + Sync + 'static,
    {
        Callable::Metric(Arc::new(f))
    }

    /// Short kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Callable::Objective(_) => "objective function",
            Callable::Metric(_) => "metric function",
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.kind())
    }
}
