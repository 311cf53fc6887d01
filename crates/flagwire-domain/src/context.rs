//! Evaluation context value objects
//!
//! An [`EvaluationContext`] is an immutable key/value bag influencing flag
//! evaluation (user id, tenant, environment attributes). It is built once via
//! [`EvaluationContextBuilder`] and shared by every client handle in its
//! resolution scope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single attribute value in an evaluation context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Boolean attribute
    Bool(bool),
    /// Integer attribute
    Int(i64),
    /// Floating point attribute
    Float(f64),
    /// String attribute
    String(String),
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            // Null, arrays and objects degrade to their JSON text form
            other => Self::String(other.to_string()),
        }
    }
}

/// Immutable key/value bag influencing flag evaluation
///
/// # Example
///
/// ```
/// use flagwire_domain::EvaluationContext;
///
/// let context = EvaluationContext::builder()
///     .targeting_key("user-42")
///     .set("tenant", "acme")
///     .set("beta", true)
///     .build();
///
/// assert_eq!(context.targeting_key(), Some("user-42"));
/// assert_eq!(context.attributes().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationContext {
    targeting_key: Option<String>,
    attributes: BTreeMap<String, ContextValue>,
}

impl EvaluationContext {
    /// Start building a new evaluation context
    pub fn builder() -> EvaluationContextBuilder {
        EvaluationContextBuilder::default()
    }

    /// The targeting key identifying the evaluation subject, if set
    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref()
    }

    /// All attributes in this context
    pub fn attributes(&self) -> &BTreeMap<String, ContextValue> {
        &self.attributes
    }

    /// Look up a single attribute by key
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.attributes.get(key)
    }

    /// True when the context carries neither a targeting key nor attributes
    pub fn is_empty(&self) -> bool {
        self.targeting_key.is_none() && self.attributes.is_empty()
    }
}

/// Builder for [`EvaluationContext`]
#[derive(Debug, Default)]
pub struct EvaluationContextBuilder {
    targeting_key: Option<String>,
    attributes: BTreeMap<String, ContextValue>,
}

impl EvaluationContextBuilder {
    /// Set the targeting key
    pub fn targeting_key(mut self, key: impl Into<String>) -> Self {
        self.targeting_key = Some(key.into());
        self
    }

    /// Set an attribute, replacing any previous value for the key
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Finalize the builder into an immutable context
    pub fn build(self) -> EvaluationContext {
        EvaluationContext {
            targeting_key: self.targeting_key,
            attributes: self.attributes,
        }
    }
}
