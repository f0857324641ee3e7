use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded payload of a verified token.
///
/// Kept as a plain JSON object so that provider-specific claims survive
/// verification untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Look up a raw claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The `sub` claim, if present and a string
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// The raw `permissions` claim
    pub fn permissions(&self) -> Option<&Value> {
        self.get("permissions")
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(claims: Map<String, Value>) -> Self {
        Self::new(claims)
    }
}
