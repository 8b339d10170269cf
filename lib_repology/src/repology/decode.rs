//! # Tolerant Decoding
//!
//! Turns raw JSON payloads into record collections. Each element is decoded
//! on its own: one that fails validation is logged and skipped, the rest are
//! kept. Only a wrong top-level shape fails the whole payload.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::RepologyError;
use crate::models::{Package, Problem, ProjectPackages};

/// Name of the JSON kind of `value`, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decodes every element that validates as `T`, skipping the others.
///
/// # Arguments
/// * `items` - The raw elements.
/// * `record` - What an element is (`package`, `problem`), for the log line.
pub fn decode_each<T: DeserializeOwned>(items: Vec<Value>, record: &str) -> Vec<T> {
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(record, index, error = %e, "skipping invalid {} entry", record);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        warn!(record, kept = decoded.len(), total, "dropped invalid entries");
    }
    decoded
}

/// Decodes a JSON array of `T`.
///
/// # Errors
/// `ShapeMismatch` when `value` is not an array.
pub fn decode_list<T: DeserializeOwned>(
    value: Value,
    record: &str,
) -> Result<Vec<T>, RepologyError> {
    match value {
        Value::Array(items) => Ok(decode_each(items, record)),
        other => Err(RepologyError::ShapeMismatch {
            expected: "array",
            found: json_kind(&other),
        }),
    }
}

/// Decodes a JSON array of packages.
pub fn decode_packages(value: Value) -> Result<Vec<Package>, RepologyError> {
    decode_list(value, "package")
}

/// Decodes a JSON array of problems.
pub fn decode_problems(value: Value) -> Result<Vec<Problem>, RepologyError> {
    decode_list(value, "problem")
}

/// Decodes a JSON object mapping project names to package arrays, keeping the
/// server's order. A project whose value is not an array is skipped.
///
/// # Errors
/// `ShapeMismatch` when `value` is not an object.
pub fn decode_project_packages(value: Value) -> Result<ProjectPackages, RepologyError> {
    let projects = match value {
        Value::Object(projects) => projects,
        other => {
            return Err(RepologyError::ShapeMismatch {
                expected: "object",
                found: json_kind(&other),
            })
        }
    };

    let mut decoded = ProjectPackages::with_capacity(projects.len());
    for (name, packages) in projects {
        match packages {
            Value::Array(items) => {
                decoded.insert(name, decode_each(items, "package"));
            }
            other => {
                warn!(
                    project = %name,
                    found = json_kind(&other),
                    "skipping project without a package array"
                );
            }
        }
    }
    Ok(decoded)
}
