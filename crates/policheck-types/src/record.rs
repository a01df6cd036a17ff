use crate::{Operator, Value};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// A declarative condition checked against every user record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    pub policy_id: String,

    #[serde(default)]
    pub description: String,

    /// Record attribute inspected by the condition.
    pub field: String,

    #[schemars(with = "String")]
    pub operator: Operator,

    /// Typed operand, already coerced at authoring time.
    #[serde(default)]
    #[schemars(with = "JsonValue")]
    pub value: Value,
}

impl Policy {
    pub fn new(
        policy_id: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<Operator>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            description: String::new(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A dynamically shaped user record.
///
/// Attributes are kept in a `BTreeMap` so serialized output is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserRecord {
    pub username: String,

    #[serde(flatten)]
    #[schemars(with = "BTreeMap<String, JsonValue>")]
    pub attributes: BTreeMap<String, Value>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    /// Look up a field by name. `username` resolves to the identifier itself.
    ///
    /// Explicit nulls are reported as absent.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "username" {
            return Some(Value::String(self.username.clone()));
        }
        self.attributes
            .get(name)
            .filter(|v| !v.is_null())
            .cloned()
    }
}
