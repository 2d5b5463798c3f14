//! Request and response shapes for the cache manager's invalidation API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status value the cache manager reports in an acknowledged payload.
pub const ACKNOWLEDGED_STATUS: u16 = 200;

/// Operations exposed by the cache manager, one endpoint each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Update,
    Delete,
    Status,
}

impl Operation {
    /// Endpoint path relative to the configured cache manager host.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Add => "/api/v1/add",
            Operation::Update => "/api/v1/update",
            Operation::Delete => "/api/v1/delete",
            Operation::Status => "/api/v1/status",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Status => "status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body posted to every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationBody {
    pub url: String,
}

impl InvalidationBody {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Returns true when a decoded payload carries `status` equal to 200.
///
/// The comparison is numeric: `200`, `200.0` and the string `"200"` all
/// match. Any other shape, including a missing field, does not.
pub fn is_acknowledged(payload: &Value) -> bool {
    let expected = f64::from(ACKNOWLEDGED_STATUS);
    match payload.get("status") {
        Some(Value::Number(number)) => number.as_f64() == Some(expected),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .is_ok_and(|value| value == expected),
        _ => false,
    }
}
