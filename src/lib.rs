//! # gbm-control
//!
//! The control plane around an external gradient boosting engine: parameter
//! normalization and validation, legacy argument migration, custom objective
//! and metric hooks, cross-validation fold generation, and the per-round
//! update and evaluation loop.
//!
//! The engine itself is not part of this crate. It is reached through the
//! [`BoostingEngine`] trait, implemented by whatever handle wraps it.
//!
//! ## Quick Start
//!
//! ```rust
//! use gbm_control::{ConfigPipeline, CvConfig, Params};
//!
//! # fn main() -> gbm_control::Result<()> {
//! let params = Params::new()
//!     .with("objective", "binary:logistic")
//!     .with("eta", 0.1)
//!     .with("monotone_constraints", vec![1, 0, -1]);
//!
//! let resolved = ConfigPipeline::new(params)
//!     .extra_args(Params::new().with("early.stop.round", 5))
//!     .resolve()?;
//! assert_eq!(resolved.params.get_str("monotone_constraints"), Some("(1,0,-1)"));
//! assert_eq!(resolved.options.early_stopping_rounds, Some(5));
//!
//! let labels = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
//! let folds = CvConfig::new()
//!     .with_nfold(2)
//!     .with_stratified(true)
//!     .with_seed(42)
//!     .make_folds(labels.len(), Some(&labels[..]), resolved.objective_name())?
//!     .value;
//! assert_eq!(folds.num_folds(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: types, constants, errors and the engine contract
//! - [`config`]: parameter normalization, deprecated names, hook resolution
//! - [`cv`]: fold generation and cross-validation
//! - [`boosting`]: per-round driver, early stopping and training sessions

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]

pub mod core;

pub mod config;

pub mod cv;

pub mod boosting;

pub use crate::core::{
    constants::*,
    error::{GbmError, Result},
    traits::*,
    types::*,
};

pub use config::{
    ConfigFormat, ConfigPipeline, ConfigWarning, DriverOptions, HookSlot, ParamValue, Params,
    ResolvedConfig, Validated, WarningKind,
};

pub use cv::{
    cross_validate, generate_folds, CvConfig, CvResult, FoldData, FoldPartition, FoldSplit,
    MetricSummary,
};

pub use boosting::{
    evaluate, parse_eval_report, update, EarlyStopping, EvaluationLog, TrainingSession,
};

pub use crate::core::constants::GBM_CONTROL_VERSION as VERSION;

/// Initialize the library.
///
/// Installs an `env_logger` logger unless the host application already set
/// one. Calling it more than once is harmless.
///
/// # Examples
///
/// ```rust
/// fn main() -> gbm_control::Result<()> {
///     gbm_control::init()?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    crate::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    crate::core::is_core_initialized()
}
