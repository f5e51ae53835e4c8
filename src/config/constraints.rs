//! Textual encoding of structured constraint parameters.
//!
//! The engine takes monotonicity constraints as `(v1,v2,...)` and interaction
//! constraints as `[[i1,i2],[i3],...]`. No escaping is performed, so every
//! element is checked to be an integral number before it is rendered.

use crate::config::params::ParamValue;
use crate::core::constants::*;
use crate::core::error::{GbmError, Result};

/// Render monotonicity directions as `(v1,v2,...,vn)`.
pub fn encode_monotone_constraints(directions: &[i64]) -> String {
    let joined = directions
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("({})", joined)
}

/// Render interaction groups as `[[i1,i2,...],[...],...]`.
pub fn encode_interaction_constraints(groups: &[Vec<i64>]) -> String {
    let rendered = groups
        .iter()
        .map(|group| {
            let joined = group
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("[{}]", joined)
        })
        .collect::<Vec<_>>()
        .join(",");
    format!("[{}]", rendered)
}

/// Encode a structured `monotone_constraints` value.
///
/// Accepts a list of numbers, or a single number for a one-feature model.
pub fn encode_monotone_value(value: &ParamValue) -> Result<String> {
    let elements: Vec<&ParamValue> = match value {
        ParamValue::List(items) => items.iter().collect(),
        other => vec![other],
    };

    let mut directions = Vec::with_capacity(elements.len());
    for (i, element) in elements.into_iter().enumerate() {
        let direction = element.as_integer().ok_or_else(|| {
            GbmError::type_error(format!(
                "{}[{}] must be numeric, got {}",
                MONOTONE_CONSTRAINTS_PARAM, i, element
            ))
        })?;
        if !(-1..=1).contains(&direction) {
            return Err(GbmError::type_error(format!(
                "{}[{}] must be one of -1, 0, 1, got {}",
                MONOTONE_CONSTRAINTS_PARAM, i, direction
            )));
        }
        directions.push(direction);
    }

    Ok(encode_monotone_constraints(&directions))
}

/// Encode a structured `interaction_constraints` value.
///
/// The value must be a list of numeric lists; anything else is a type error.
pub fn encode_interaction_value(value: &ParamValue) -> Result<String> {
    let groups = match value {
        ParamValue::List(groups) => groups,
        other => {
            return Err(GbmError::type_error(format!(
                "{} should be a list of numeric lists, got {}",
                INTERACTION_CONSTRAINTS_PARAM, other
            )))
        }
    };

    let mut parsed = Vec::with_capacity(groups.len());
    for (g, group) in groups.iter().enumerate() {
        let members = match group {
            ParamValue::List(members) => members,
            other => {
                return Err(GbmError::type_error(format!(
                    "{}[{}] should be a numeric list, got {}",
                    INTERACTION_CONSTRAINTS_PARAM, g, other
                )))
            }
        };
        let indices = members
            .iter()
            .map(|m| {
                m.as_integer().ok_or_else(|| {
                    GbmError::type_error(format!(
                        "{}[{}] should contain only integral feature indices, got {}",
                        INTERACTION_CONSTRAINTS_PARAM, g, m
                    ))
                })
            })
            .collect::<Result<Vec<i64>>>()?;
        parsed.push(indices);
    }

    Ok(encode_interaction_constraints(&parsed))
}
