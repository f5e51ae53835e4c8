//! The full configuration pipeline, in data-flow order:
//! deprecated names, then normalization, then hook resolution.

use crate::config::deprecated;
use crate::config::hooks::{resolve_eval, resolve_objective};
use crate::config::params::{normalize, ParamValue, Params};
use crate::config::validation::ConfigWarning;
use crate::core::constants::*;
use crate::core::error::{GbmError, Result};
use crate::core::types::{MetricFn, ObjectiveFn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Options consumed by the training loop rather than by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverOptions {
    /// Stop after this many rounds without improvement
    pub early_stopping_rounds: Option<usize>,
    /// Log evaluation results every this many rounds
    pub print_every_n: usize,
    /// Explicit metric direction
    pub maximize: Option<bool>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        DriverOptions {
            early_stopping_rounds: None,
            print_every_n: DEFAULT_PRINT_EVERY_N,
            maximize: None,
        }
    }
}

/// Output of [`ConfigPipeline::resolve`].
#[derive(Clone)]
pub struct ResolvedConfig {
    /// Booster parameters, ready for the engine
    pub params: Params,
    /// Custom objective, if any
    pub objective: Option<ObjectiveFn>,
    /// Custom evaluation metric, if any
    pub eval_metric: Option<MetricFn>,
    /// Training loop options
    pub options: DriverOptions,
    /// Every warning raised along the way
    pub warnings: Vec<ConfigWarning>,
}

impl ResolvedConfig {
    /// Textual objective, when the engine's built-in objective is used.
    pub fn objective_name(&self) -> Option<&str> {
        self.params.get_str(OBJECTIVE_PARAM)
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("params", &self.params)
            .field("objective", &self.objective.as_ref().map(|_| "<objective function>"))
            .field("eval_metric", &self.eval_metric.as_ref().map(|_| "<metric function>"))
            .field("options", &self.options)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Builder running every configuration check before training starts.
#[derive(Debug, Clone, Default)]
pub struct ConfigPipeline {
    params: Params,
    extra_args: Params,
    objective: Option<ParamValue>,
    eval_metric: Option<ParamValue>,
    maximize: Option<bool>,
    early_stopping_rounds: Option<usize>,
    print_every_n: Option<usize>,
    early_stopping_callback: bool,
}

impl ConfigPipeline {
    /// Start from a parameter map.
    pub fn new(params: Params) -> Self {
        ConfigPipeline {
            params,
            ..Self::default()
        }
    }

    /// Extra named arguments, possibly using legacy names.
    pub fn extra_args(mut self, extra_args: Params) -> Self {
        self.extra_args = extra_args;
        self
    }

    /// Explicit objective argument.
    pub fn objective<V: Into<ParamValue>>(mut self, objective: V) -> Self {
        self.objective = Some(objective.into());
        self
    }

    /// Explicit evaluation metric argument.
    pub fn eval_metric<V: Into<ParamValue>>(mut self, eval_metric: V) -> Self {
        self.eval_metric = Some(eval_metric.into());
        self
    }

    /// Explicit metric direction.
    pub fn maximize(mut self, maximize: bool) -> Self {
        self.maximize = Some(maximize);
        self
    }

    /// Enable early stopping after `rounds` rounds without improvement.
    pub fn early_stopping_rounds(mut self, rounds: usize) -> Self {
        self.early_stopping_rounds = Some(rounds);
        self
    }

    /// Progress logging period.
    pub fn print_every_n(mut self, n: usize) -> Self {
        self.print_every_n = Some(n);
        self
    }

    /// Declare that an early-stopping callback is registered by other means.
    pub fn with_early_stopping_callback(mut self, registered: bool) -> Self {
        self.early_stopping_callback = registered;
        self
    }

    /// Run the pipeline.
    pub fn resolve(self) -> Result<ResolvedConfig> {
        let (extra, mut warnings) = deprecated::resolve(self.extra_args)?.into_parts();
        let mut extra = extra.canonicalize_names();

        let early_stopping_rounds = merge_option(
            EARLY_STOPPING_ROUNDS_PARAM,
            self.early_stopping_rounds,
            take_count(&mut extra, EARLY_STOPPING_ROUNDS_PARAM)?,
        )?;
        let print_every_n = merge_option(
            PRINT_EVERY_N_PARAM,
            self.print_every_n,
            take_count(&mut extra, PRINT_EVERY_N_PARAM)?,
        )?;
        let maximize = merge_option(
            MAXIMIZE_PARAM,
            self.maximize,
            take_flag(&mut extra, MAXIMIZE_PARAM)?,
        )?;

        if early_stopping_rounds == Some(0) {
            return Err(GbmError::config("'early_stopping_rounds' must be positive"));
        }
        if print_every_n == Some(0) {
            return Err(GbmError::config("'print_every_n' must be positive"));
        }

        let (params, normalize_warnings) = normalize(self.params, extra)?.into_parts();
        warnings.extend(normalize_warnings);

        let (params, objective) = resolve_objective(params, self.objective)?;
        let has_early_stopping = early_stopping_rounds.is_some() || self.early_stopping_callback;
        let (params, eval_metric) =
            resolve_eval(params, self.eval_metric, maximize, has_early_stopping)?;

        log::debug!(
            "configuration resolved: {} parameters, {} warnings",
            params.len(),
            warnings.len()
        );

        Ok(ResolvedConfig {
            params,
            objective,
            eval_metric,
            options: DriverOptions {
                early_stopping_rounds,
                print_every_n: print_every_n.unwrap_or(DEFAULT_PRINT_EVERY_N),
                maximize,
            },
            warnings,
        })
    }
}

fn merge_option<T>(name: &str, explicit: Option<T>, from_args: Option<T>) -> Result<Option<T>> {
    match (explicit, from_args) {
        (Some(_), Some(_)) => Err(GbmError::conflict(format!(
            "'{}' was given both explicitly and as a named argument",
            name
        ))),
        (explicit, from_args) => Ok(explicit.or(from_args)),
    }
}

fn take_count(extra: &mut Params, name: &str) -> Result<Option<usize>> {
    match extra.remove(name).pop() {
        None => Ok(None),
        Some(value) => match value.as_integer() {
            Some(n) if n >= 0 => Ok(Some(n as usize)),
            _ => Err(GbmError::type_error(format!(
                "'{}' must be a non-negative integer, got {}",
                name, value
            ))),
        },
    }
}

fn take_flag(extra: &mut Params, name: &str) -> Result<Option<bool>> {
    match extra.remove(name).pop() {
        None => Ok(None),
        Some(value) => value.as_bool().map(Some).ok_or_else(|| {
            GbmError::type_error(format!("'{}' must be a boolean, got {}", name, value))
        }),
    }
}
