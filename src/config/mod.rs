//! Configuration management for gbm-control.
//!
//! Raw user configuration passes through these stages before any engine call:
//!
//! 1. [`deprecated`]: legacy argument names are renamed or dropped
//! 2. [`params::normalize`]: sources are merged, duplicates and conflicts are
//!    handled, constraints are encoded by [`constraints`]
//! 3. [`hooks`]: custom objective and metric functions are separated from
//!    engine parameters
//!
//! [`pipeline::ConfigPipeline`] runs all three in order.

pub mod constraints;
pub mod deprecated;
pub mod hooks;
pub mod loader;
pub mod params;
pub mod pipeline;
pub mod validation;

pub use constraints::{encode_interaction_constraints, encode_monotone_constraints};
pub use hooks::{resolve_eval, resolve_objective, HookSlot};
pub use loader::{read_config_file, ConfigFormat};
pub use params::{normalize, ParamValue, Params};
pub use pipeline::{ConfigPipeline, DriverOptions, ResolvedConfig};
pub use validation::{ConfigWarning, Validated, WarningKind};
