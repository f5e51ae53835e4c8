//! Resolution of custom objective and evaluation hooks.
//!
//! An objective or metric can arrive either inside the parameter map or as an
//! explicit argument, and in the parameter map it can be an identifier the
//! engine understands or a user function. Functions are always pulled out of
//! the map and returned as hooks, so they never reach the engine as
//! parameters.

use crate::boosting::early_stopping::require_direction;
use crate::config::params::{ParamValue, Params};
use crate::core::constants::*;
use crate::core::error::{GbmError, Result};
use crate::core::types::{Callable, MetricFn, ObjectiveFn};

/// Content of an objective or metric slot.
#[derive(Debug, Clone)]
pub enum HookSlot {
    /// Nothing configured
    Absent,
    /// Built-in engine identifier, e.g. `"reg:squarederror"`
    Identifier(String),
    /// User-supplied function
    Hook(Callable),
}

impl HookSlot {
    /// Classify a slot value. Only strings and functions are valid.
    pub fn from_value(name: &str, value: Option<&ParamValue>) -> Result<Self> {
        match value {
            None => Ok(HookSlot::Absent),
            Some(ParamValue::Str(s)) => Ok(HookSlot::Identifier(s.clone())),
            Some(ParamValue::Callable(c)) => Ok(HookSlot::Hook(c.clone())),
            Some(other) => Err(GbmError::type_error(format!(
                "'{}' must be a string identifier or a function, got {}",
                name, other
            ))),
        }
    }

    /// Classify the last binding of `name` in `params`.
    pub fn from_params(params: &Params, name: &str) -> Result<Self> {
        Self::from_value(name, params.get(name))
    }

    /// True if nothing is configured.
    pub fn is_absent(&self) -> bool {
        matches!(self, HookSlot::Absent)
    }

    /// The identifier, if the slot holds one.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            HookSlot::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

/// Resolve the objective slot against an explicit `obj` argument.
///
/// Returns the parameters without any objective function, and the custom
/// objective to use, if any.
pub fn resolve_objective(
    mut params: Params,
    obj: Option<ParamValue>,
) -> Result<(Params, Option<ObjectiveFn>)> {
    let slot = HookSlot::from_params(&params, OBJECTIVE_PARAM)?;

    if let Some(obj) = obj {
        if !slot.is_absent() {
            return Err(GbmError::conflict(
                "setting objectives in 'params' and 'obj' at the same time is not allowed",
            ));
        }
        return match obj {
            ParamValue::Callable(Callable::Objective(f)) => Ok((params, Some(f))),
            other => Err(GbmError::type_error(format!(
                "'obj' must be an objective function, got {}",
                other
            ))),
        };
    }

    match slot {
        HookSlot::Hook(Callable::Objective(f)) => {
            params.remove(OBJECTIVE_PARAM);
            log::debug!("custom objective moved out of parameters");
            Ok((params, Some(f)))
        }
        HookSlot::Hook(other) => Err(GbmError::type_error(format!(
            "'{}' holds a {}, expected an objective function",
            OBJECTIVE_PARAM,
            other.kind()
        ))),
        HookSlot::Absent | HookSlot::Identifier(_) => Ok((params, None)),
    }
}

/// Resolve the evaluation metric slot against an explicit `feval` argument.
///
/// A custom metric combined with early stopping needs an explicit
/// `maximize` flag, since the direction of a user metric is unknown.
pub fn resolve_eval(
    mut params: Params,
    feval: Option<ParamValue>,
    maximize: Option<bool>,
    has_early_stopping: bool,
) -> Result<(Params, Option<MetricFn>)> {
    let slots = params
        .get_all(EVAL_METRIC_PARAM)
        .map(|v| HookSlot::from_value(EVAL_METRIC_PARAM, Some(v)))
        .collect::<Result<Vec<_>>>()?;

    if feval.is_some() && !slots.is_empty() {
        return Err(GbmError::conflict(
            "setting evaluation metrics in 'params' and 'feval' at the same time is not allowed",
        ));
    }

    let hooks: Vec<Callable> = slots
        .iter()
        .filter_map(|slot| match slot {
            HookSlot::Hook(c) => Some(c.clone()),
            _ => None,
        })
        .collect();
    if !hooks.is_empty() && slots.len() > 1 {
        return Err(GbmError::conflict(format!(
            "a custom '{}' function cannot be combined with other '{}' values",
            EVAL_METRIC_PARAM, EVAL_METRIC_PARAM
        )));
    }

    let custom = match (feval, hooks.into_iter().next()) {
        (Some(ParamValue::Callable(Callable::Metric(f))), _) => Some(f),
        (Some(other), _) => {
            return Err(GbmError::type_error(format!(
                "'feval' must be a metric function, got {}",
                other
            )))
        }
        (None, Some(Callable::Metric(f))) => {
            params.remove(EVAL_METRIC_PARAM);
            log::debug!("custom evaluation metric moved out of parameters");
            Some(f)
        }
        (None, Some(other)) => {
            return Err(GbmError::type_error(format!(
                "'{}' holds a {}, expected a metric function",
                EVAL_METRIC_PARAM,
                other.kind()
            )))
        }
        (None, None) => None,
    };

    require_direction(custom.is_some(), has_early_stopping, maximize)?;

    Ok((params, custom))
}
