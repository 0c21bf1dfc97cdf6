//! Dotted-path extraction over JSON values.
//!
//! ```
//! use glean_common::path::JsonPath;
//! use serde_json::json;
//!
//! let body = json!({ "data": { "spots": [{ "name": "Lowers" }] } });
//! let path = JsonPath::parse("data.spots.0.name").unwrap();
//! assert_eq!(path.extract(&body).unwrap(), &json!("Lowers"));
//! ```
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid path `{0}`: paths are non-empty dot-separated segments")]
    Invalid(String),

    #[error("path `{path}` not found: no `{segment}` at {parent}")]
    Missing {
        path: String,
        segment: String,
        parent: String,
    },
}

/// A parsed `a.b.0.c` style path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<String>,
}

impl JsonPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Invalid(raw.to_string()));
        }
        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::Invalid(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk `root` segment by segment. A missing key, a non-numeric or
    /// out-of-range array index, or descending into a scalar all fail.
    pub fn extract<'v>(&self, root: &'v Value) -> Result<&'v Value, PathError> {
        let mut current = root;
        for (depth, segment) in self.segments.iter().enumerate() {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            current = next.ok_or_else(|| PathError::Missing {
                path: self.raw.clone(),
                segment: segment.clone(),
                parent: self.parent_label(depth),
            })?;
        }
        Ok(current)
    }

    fn parent_label(&self, depth: usize) -> String {
        if depth == 0 {
            "<root>".to_string()
        } else {
            self.segments[..depth].join(".")
        }
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_nested_object() {
        let body = json!({ "data": { "spots": [1, 2, 3] }, "associated": {} });
        let path = JsonPath::parse("data.spots").unwrap();
        assert_eq!(path.extract(&body).unwrap(), &json!([1, 2, 3]));
    }

    #[test]
    fn null_at_path_is_a_value_not_an_error() {
        let body = json!({ "data": { "spots": null } });
        let path = JsonPath::parse("data.spots").unwrap();
        assert_eq!(path.extract(&body).unwrap(), &Value::Null);
    }

    #[test]
    fn missing_key_names_the_segment() {
        let body = json!({ "data": { "other": 1 } });
        let err = JsonPath::parse("data.spots").unwrap().extract(&body).unwrap_err();
        assert_eq!(
            err,
            PathError::Missing {
                path: "data.spots".into(),
                segment: "spots".into(),
                parent: "data".into(),
            }
        );
    }

    #[test]
    fn missing_root_key() {
        let err = JsonPath::parse("data.spots")
            .unwrap()
            .extract(&json!([]))
            .unwrap_err();
        assert!(matches!(err, PathError::Missing { ref parent, .. } if parent == "<root>"));
    }

    #[test]
    fn scalar_cannot_be_descended() {
        let body = json!({ "data": "text" });
        assert!(JsonPath::parse("data.spots").unwrap().extract(&body).is_err());
    }

    #[test]
    fn array_index_out_of_range() {
        let body = json!({ "items": ["a"] });
        assert!(JsonPath::parse("items.3").unwrap().extract(&body).is_err());
        assert!(JsonPath::parse("items.x").unwrap().extract(&body).is_err());
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(JsonPath::parse("").is_err());
        assert!(JsonPath::parse("data..spots").is_err());
        assert!(JsonPath::parse(".data").is_err());
        assert_eq!("data.spots".parse::<JsonPath>().unwrap().to_string(), "data.spots");
    }
}
