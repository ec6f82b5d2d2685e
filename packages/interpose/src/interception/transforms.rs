// packages/interpose/src/interception/transforms.rs
//! Built-in declarative transforms
//!
//! Lets a registry be described in a configuration file instead of code.
//! Each transform turns into a processor closure keyed by the member it is
//! configured for.

use crate::interception::registry::{PostProcessor, PreProcessor};
use crate::interception::value::{Args, Value};
use crate::utils::errors::{InterposeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Argument transforms applied before a method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreTransform {
    /// Discard the caller's arguments and call with these instead
    ReplaceArgs {
        #[serde(default)]
        args: Vec<serde_json::Value>,
        #[serde(default)]
        kwargs: BTreeMap<String, serde_json::Value>,
    },

    /// Keep positional arguments, drop all keyword arguments
    DropKeywords,
}

impl PreTransform {
    pub fn to_processor(&self) -> PreProcessor {
        match self {
            PreTransform::ReplaceArgs { args, kwargs } => {
                let replacement = Args {
                    positional: args.iter().cloned().map(Value::from).collect(),
                    keyword: kwargs
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
                        .collect(),
                };
                Arc::new(move |_: Args| -> Result<Args> { Ok(replacement.clone()) })
            }
            PreTransform::DropKeywords => Arc::new(|args: Args| -> Result<Args> {
                Ok(Args {
                    positional: args.positional,
                    keyword: BTreeMap::new(),
                })
            }),
        }
    }
}

/// Value transforms applied to method results and property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostTransform {
    /// Render non-string scalars as text; `null` stays `null`
    Stringify,

    /// Uppercase string values
    Uppercase,

    /// Lowercase string values
    Lowercase,

    /// Strip surrounding whitespace from string values
    Trim,

    /// Replace `null` with a fixed value
    DefaultIfNull { value: serde_json::Value },
}

impl PostTransform {
    pub fn to_processor(&self, name: &str) -> PostProcessor {
        match self {
            PostTransform::Stringify => {
                Arc::new(|value: Value| -> Result<Value> { Ok(stringify(value)) })
            }
            PostTransform::Uppercase => {
                let name = name.to_string();
                Arc::new(move |value: Value| map_str(&name, value, |s| s.to_uppercase()))
            }
            PostTransform::Lowercase => {
                let name = name.to_string();
                Arc::new(move |value: Value| map_str(&name, value, |s| s.to_lowercase()))
            }
            PostTransform::Trim => {
                let name = name.to_string();
                Arc::new(move |value: Value| map_str(&name, value, |s| s.trim().to_string()))
            }
            PostTransform::DefaultIfNull { value: default } => {
                let default = Value::from(default.clone());
                Arc::new(move |value: Value| -> Result<Value> {
                    Ok(match value {
                        Value::Null => default.clone(),
                        other => other,
                    })
                })
            }
        }
    }
}

/// Render a value as text, leaving strings and `null` untouched
pub fn stringify(value: Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Str(s) => Value::Str(s),
        other => Value::Str(other.to_string()),
    }
}

fn map_str(name: &str, value: Value, f: impl Fn(&str) -> String) -> Result<Value> {
    match value {
        Value::Str(s) => Ok(Value::Str(f(&s))),
        Value::Null => Ok(Value::Null),
        other => Err(InterposeError::processor_failed(
            name,
            format!("expected a string, got {}", other.kind()),
        )),
    }
}
