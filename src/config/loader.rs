//! Loading parameter maps and settings from JSON or TOML.

use crate::config::params::{ParamValue, Params};
use crate::core::constants::MULTI_VALUED_PARAM;
use crate::core::error::{GbmError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a `.json` or `.toml` extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(GbmError::config(format!(
                "unsupported config file format for {}; use .json or .toml",
                path.display()
            ))),
        }
    }
}

/// Deserialize a settings struct from a `.json` or `.toml` file.
pub fn read_config_file<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let value = match format {
        ConfigFormat::Json => serde_json::from_str(&content)?,
        ConfigFormat::Toml => toml::from_str(&content)?,
    };
    log::debug!("loaded {:?} settings from {}", format, path.display());
    Ok(value)
}

impl Params {
    /// Parse a JSON object of parameters.
    ///
    /// An array bound to `eval_metric` becomes one binding per element.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let object = match value {
            serde_json::Value::Object(object) => object,
            other => {
                return Err(GbmError::type_error(format!(
                    "parameters must be a JSON object, got {}",
                    other
                )))
            }
        };

        let mut params = Params::new();
        for (name, value) in object {
            push_loaded(&mut params, name.clone(), json_to_param(&name, value)?);
        }
        Ok(params)
    }

    /// Parse a TOML table of parameters.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut params = Params::new();
        for (name, value) in table {
            push_loaded(&mut params, name.clone(), toml_to_param(&name, value)?);
        }
        Ok(params)
    }

    /// Load parameters from a `.json` or `.toml` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;
        let params = match format {
            ConfigFormat::Json => Self::from_json_str(&content)?,
            ConfigFormat::Toml => Self::from_toml_str(&content)?,
        };
        log::debug!("loaded {} parameters from {}", params.len(), path.display());
        Ok(params)
    }
}

fn push_loaded(params: &mut Params, name: String, value: ParamValue) {
    match value {
        ParamValue::List(items) if name == MULTI_VALUED_PARAM => {
            for item in items {
                params.push(name.as_str(), item);
            }
        }
        other => params.push(name, other),
    }
}

fn json_to_param(name: &str, value: serde_json::Value) -> Result<ParamValue> {
    use serde_json::Value;
    match value {
        Value::Bool(b) => Ok(ParamValue::Bool(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(ParamValue::Int(i)),
            None => n
                .as_f64()
                .map(ParamValue::Float)
                .ok_or_else(|| GbmError::type_error(format!("'{}' is not a finite number", name))),
        },
        Value::String(s) => Ok(ParamValue::Str(s)),
        Value::Array(items) => Ok(ParamValue::List(
            items
                .into_iter()
                .map(|item| json_to_param(name, item))
                .collect::<Result<Vec<_>>>()?,
        )),
        Value::Null | Value::Object(_) => Err(GbmError::type_error(format!(
            "'{}' must be a scalar, string or list",
            name
        ))),
    }
}

fn toml_to_param(name: &str, value: toml::Value) -> Result<ParamValue> {
    use toml::Value;
    match value {
        Value::Boolean(b) => Ok(ParamValue::Bool(b)),
        Value::Integer(i) => Ok(ParamValue::Int(i)),
        Value::Float(f) => Ok(ParamValue::Float(f)),
        Value::String(s) => Ok(ParamValue::Str(s)),
        Value::Datetime(d) => Ok(ParamValue::Str(d.to_string())),
        Value::Array(items) => Ok(ParamValue::List(
            items
                .into_iter()
                .map(|item| toml_to_param(name, item))
                .collect::<Result<Vec<_>>>()?,
        )),
        Value::Table(_) => Err(GbmError::type_error(format!(
            "'{}' must be a scalar, string or list",
            name
        ))),
    }
}
