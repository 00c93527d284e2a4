use std::fmt;

use serde_json::Value;

use crate::{Field, ModelError};

/// RFC 6901 JSON pointer into a response document, e.g. `/0/taskId`.
///
/// The empty pointer addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    pointer: String,
}

impl JsonPath {
    pub fn parse(path: &str) -> Result<Self, ModelError> {
        let pointer = path.trim();
        let invalid = |reason: &str| ModelError::InvalidJsonPath {
            path: path.to_string(),
            reason: reason.to_string(),
        };

        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(invalid("pointer must be empty or start with '/'"));
        }
        let mut chars = pointer.chars();
        while let Some(c) = chars.next() {
            if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
                return Err(invalid("'~' must be followed by '0' or '1'"));
            }
        }

        Ok(Self {
            pointer: pointer.to_string(),
        })
    }

    pub fn root() -> Self {
        Self {
            pointer: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pointer
    }

    /// Walk the document. `null` values count as absent.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        doc.pointer(&self.pointer).filter(|v| !v.is_null())
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pointer)
    }
}

/// Result of running an [`Extraction`] against a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// A candidate path resolved to a scalar; the value as field text.
    Value(String),
    /// No candidate path exists in the payload.
    Missing,
    /// A candidate path exists but points at an object or array.
    NotScalar { path: String },
}

/// Declared output of an operation: `field <- first resolving candidate path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub field: Field,
    pub paths: Vec<JsonPath>,
}

impl Extraction {
    pub fn new(field: Field, paths: &[&str]) -> Result<Self, ModelError> {
        let paths = paths
            .iter()
            .map(|p| JsonPath::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { field, paths })
    }

    /// Try every candidate in order; the first scalar wins.
    pub fn extract(&self, doc: &Value) -> Extracted {
        let mut non_scalar = None;
        for path in &self.paths {
            match path.resolve(doc) {
                Some(Value::String(s)) => return Extracted::Value(s.clone()),
                Some(v @ (Value::Number(_) | Value::Bool(_))) => {
                    return Extracted::Value(v.to_string());
                }
                Some(_) if non_scalar.is_none() => non_scalar = Some(path.to_string()),
                Some(_) => {}
                None => {}
            }
        }
        match non_scalar {
            Some(path) => Extracted::NotScalar { path },
            None => Extracted::Missing,
        }
    }
}
