//! Parameter names, prefixes and limits shared across the control layer.

/// Canonical name of the objective parameter.
pub const OBJECTIVE_PARAM: &str = "objective";

/// Canonical name of the evaluation metric parameter.
pub const EVAL_METRIC_PARAM: &str = "eval_metric";

/// The only parameter allowed to appear more than once after normalization.
pub const MULTI_VALUED_PARAM: &str = EVAL_METRIC_PARAM;

/// Class-count parameter required by multiclass objectives.
pub const NUM_CLASS_PARAM: &str = "num_class";

/// Monotonicity constraint parameter.
pub const MONOTONE_CONSTRAINTS_PARAM: &str = "monotone_constraints";

/// Interaction constraint parameter.
pub const INTERACTION_CONSTRAINTS_PARAM: &str = "interaction_constraints";

/// Driver-level option: rounds without improvement before stopping.
pub const EARLY_STOPPING_ROUNDS_PARAM: &str = "early_stopping_rounds";

/// Driver-level option: progress logging period.
pub const PRINT_EVERY_N_PARAM: &str = "print_every_n";

/// Driver-level option: explicit metric direction.
pub const MAXIMIZE_PARAM: &str = "maximize";

/// Objective-name prefix of multiclass objectives.
pub const MULTICLASS_PREFIX: &str = "multi:";

/// Objective-name prefix of ranking objectives.
pub const RANKING_PREFIX: &str = "rank:";

/// Objective-name prefix of binary classification objectives.
pub const BINARY_PREFIX: &str = "binary:";

/// Target marking a deprecated parameter that is dropped without rebinding.
pub const DEPRECATED_SENTINEL: &str = "DUMMY";

/// Labels with at most this many distinct values are stratified as classes
/// when no textual objective is configured.
pub const MAX_IMPLICIT_CLASS_LEVELS: usize = 5;

/// Bounds on the number of quantile groups used to stratify continuous labels.
pub const MIN_QUANTILE_GROUPS: usize = 2;
/// Upper bound on the number of quantile groups.
pub const MAX_QUANTILE_GROUPS: usize = 5;

/// Smallest number of cross-validation folds.
pub const MIN_NFOLD: usize = 2;

/// Default number of cross-validation folds.
pub const DEFAULT_NFOLD: usize = 5;

/// Default progress logging period, in rounds.
pub const DEFAULT_PRINT_EVERY_N: usize = 1;

/// Metric names whose values improve upward.
pub const MAXIMIZED_METRICS: &[&str] = &["auc", "aucpr", "map", "ndcg", "pre"];

/// Crate version.
pub const GBM_CONTROL_VERSION: &str = env!("CARGO_PKG_VERSION");
