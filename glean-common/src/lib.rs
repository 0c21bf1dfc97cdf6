//! Common types and utilities shared across glean crates.
//!
//! Every pipeline in the workspace consumes the same kind of input (a JSON
//! array of parameter sets) and produces the same kind of output (a
//! pretty-printed JSON array). The helpers for both ends live here, along
//! with the path extractor used on JSON responses and the shared logging
//! initialiser.
//!
//! # Overview
//!
//! - [`ParamSet`], [`load_params`], [`query_pairs`]: parameter input
//! - [`path::JsonPath`]: dotted-path extraction over `serde_json::Value`
//! - [`output::write_json_pretty`]: 4-space indented JSON output
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use glean_common::{query_pairs, ParamSet};
//! use serde_json::json;
//!
//! let params: ParamSet = serde_json::from_value(json!({
//!     "spotId": "5842041f4e65fad6a7708827",
//!     "days": 2,
//! }))
//! .unwrap();
//!
//! let pairs = query_pairs(&params).unwrap();
//! assert_eq!(pairs[1], ("days".to_string(), "2".to_string()));
//! ```
use serde_json::{Map, Value};
use std::path::Path;

pub mod observability;
pub mod output;
pub mod path;

/// One unit of query input, kept in the order the operator wrote it.
pub type ParamSet = Map<String, Value>;

/// Errors raised while reading or encoding parameter sets.
#[derive(thiserror::Error, Debug)]
pub enum ParamError {
    #[error("failed to read parameters file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parameters file {path} is not a JSON array of objects: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Nested objects have no query-string form.
    #[error("parameter `{key}` holds a value with no query-string form: {value}")]
    Unencodable { key: String, value: String },
}

/// Read a parameters file: a JSON array whose elements are objects.
pub fn load_params(path: impl AsRef<Path>) -> Result<Vec<ParamSet>, ParamError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ParamError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ParamError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Flatten a parameter set into query pairs.
///
/// Strings pass through, numbers use their JSON text, booleans render as
/// `True`/`False`, `null` drops the key and arrays repeat it once per
/// element.
pub fn query_pairs(params: &ParamSet) -> Result<Vec<(String, String)>, ParamError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(key, item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(key, other)? {
                    pairs.push((key.clone(), text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_text(key: &str, value: &Value) -> Result<Option<String>, ParamError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(true) => Ok(Some("True".to_string())),
        Value::Bool(false) => Ok(Some("False".to_string())),
        Value::Array(_) | Value::Object(_) => Err(ParamError::Unencodable {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Render a parameter set compactly for log lines and diagnostics.
pub fn describe_params(params: &ParamSet) -> String {
    serde_json::to_string(params).unwrap_or_else(|_| format!("{params:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn params(v: Value) -> ParamSet {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn keeps_operator_order() {
        let p = params(json!({ "zeta": "1", "alpha": "2", "mid": "3" }));
        let keys: Vec<_> = query_pairs(&p).unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn encodes_scalars_like_the_http_layer_expects() {
        let p = params(json!({
            "lat": 33.5,
            "days": 3,
            "adult": true,
            "child": false,
            "skip": null,
        }));
        assert_eq!(
            query_pairs(&p).unwrap(),
            vec![
                ("lat".to_string(), "33.5".to_string()),
                ("days".to_string(), "3".to_string()),
                ("adult".to_string(), "True".to_string()),
                ("child".to_string(), "False".to_string()),
            ]
        );
    }

    #[test]
    fn arrays_repeat_the_key() {
        let p = params(json!({ "id": ["a", "b", null] }));
        assert_eq!(
            query_pairs(&p).unwrap(),
            vec![
                ("id".to_string(), "a".to_string()),
                ("id".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn nested_objects_are_rejected() {
        let p = params(json!({ "bounds": { "north": 1 } }));
        let err = query_pairs(&p).unwrap_err();
        assert!(matches!(err, ParamError::Unencodable { ref key, .. } if key == "bounds"));
    }

    #[test]
    fn loads_params_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"origin":"DAL","destination":"HOU"}}, {{}}]"#).unwrap();
        let loaded = load_params(file.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0]["origin"], json!("DAL"));
        assert!(loaded[1].is_empty());
    }

    #[test]
    fn rejects_non_array_params_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"origin":"DAL"}}"#).unwrap();
        assert!(matches!(
            load_params(file.path()),
            Err(ParamError::Json { .. })
        ));
    }

    #[test]
    fn missing_params_file_is_io_error() {
        assert!(matches!(
            load_params("/definitely/not/here.json"),
            Err(ParamError::Io { .. })
        ));
    }
}
