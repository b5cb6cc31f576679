//! Schema descriptions for route payloads.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Declarative description of a JSON payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Matches only `null`.
    Null,
    /// Matches `true` / `false`.
    Boolean,
    /// Matches whole numbers (no fractional part).
    Integer,
    /// Matches any JSON number.
    Number,
    /// Matches strings.
    String,
    /// Matches arrays whose every element conforms to the item schema.
    Array(Box<Schema>),
    /// Matches objects against declared fields.
    Object(ObjectSchema),
    /// Matches anything.
    Any,
}

impl Schema {
    /// Array schema with the given item shape.
    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    /// Start building an object schema.
    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    /// Check a value against this schema, collecting every issue found.
    ///
    /// An empty result means the value conforms.
    pub fn check(&self, value: &Value) -> Vec<Issue> {
        let mut issues = Vec::new();
        check_value(self, value, "", &mut issues);
        issues
    }
}

/// Object shape: declared fields plus the subset that is required.
///
/// Fields not declared in the schema are passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    fields: BTreeMap<String, Schema>,
    required: BTreeSet<String>,
}

impl ObjectSchema {
    /// Declare an optional field.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    /// Declare a required field.
    pub fn required(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.fields.insert(name, schema);
        self
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

/// Request/response schema pair declared at route registration.
#[derive(Debug, Clone)]
pub struct RouteSchema {
    /// Shape the request body must conform to. `None` skips body validation
    /// (the handler receives `Value::Null`).
    pub request: Option<Schema>,
    /// Shape the handler's return value must conform to.
    pub response: Schema,
}

impl RouteSchema {
    pub fn new(request: impl Into<Schema>, response: impl Into<Schema>) -> Self {
        Self {
            request: Some(request.into()),
            response: response.into(),
        }
    }

    /// Schema pair for routes without a request body (e.g. GET).
    pub fn response_only(response: impl Into<Schema>) -> Self {
        Self {
            request: None,
            response: response.into(),
        }
    }
}

/// A single conformance problem, located by JSON-pointer-style path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

fn check_value(schema: &Schema, value: &Value, path: &str, issues: &mut Vec<Issue>) {
    match schema {
        Schema::Any => {}
        Schema::Null => {
            if !value.is_null() {
                push_mismatch(issues, path, "null", value);
            }
        }
        Schema::Boolean => {
            if !value.is_boolean() {
                push_mismatch(issues, path, "boolean", value);
            }
        }
        Schema::Integer => {
            if !value.is_i64() && !value.is_u64() {
                push_mismatch(issues, path, "integer", value);
            }
        }
        Schema::Number => {
            if !value.is_number() {
                push_mismatch(issues, path, "number", value);
            }
        }
        Schema::String => {
            if !value.is_string() {
                push_mismatch(issues, path, "string", value);
            }
        }
        Schema::Array(items) => match value.as_array() {
            Some(elements) => {
                for (index, element) in elements.iter().enumerate() {
                    let element_path = format!("{}/{}", path, index);
                    check_value(items, element, &element_path, issues);
                }
            }
            None => push_mismatch(issues, path, "array", value),
        },
        Schema::Object(object) => match value.as_object() {
            Some(map) => {
                for name in &object.required {
                    if !map.contains_key(name) {
                        issues.push(Issue {
                            path: format!("{}/{}", path, name),
                            message: "missing required field".to_string(),
                        });
                    }
                }
                for (name, field_schema) in &object.fields {
                    if let Some(field_value) = map.get(name) {
                        let field_path = format!("{}/{}", path, name);
                        check_value(field_schema, field_value, &field_path, issues);
                    }
                }
            }
            None => push_mismatch(issues, path, "object", value),
        },
    }
}

fn push_mismatch(issues: &mut Vec<Issue>, path: &str, expected: &str, found: &Value) {
    issues.push(Issue {
        path: if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        },
        message: format!("expected {}, found {}", expected, type_name(found)),
    });
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
