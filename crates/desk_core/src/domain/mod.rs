use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw backend attributes preserved next to the canonical fields, in source order.
pub type ExtraFields = Map<String, Value>;

/// Canonical incident representation produced by normalization.
///
/// Notes:
/// - `number` is never empty; records without any identifier carry the `UNKNOWN` sentinel.
/// - Every backend field other than the canonical ones is kept verbatim in `extra`.
/// - Canonical fields win over same-named raw fields, so `extra` never holds `number` or
///   `short_description`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub number: String,
    pub short_description: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Incident {
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Non-empty string value of a raw field.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.extra.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn state(&self) -> Option<&str> {
        self.text("state")
    }

    pub fn priority(&self) -> Option<String> {
        match self.extra.get("priority") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Assignee display name. Any truthy value counts as assigned.
    pub fn assigned_to(&self) -> Option<String> {
        match self.extra.get("assigned_to") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Object(obj)) => obj
                .get("display_value")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| Some(Value::Object(obj.clone()).to_string())),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(true)) => Some("true".to_string()),
            _ => None,
        }
    }
}

/// A user affected by an incident.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AffectedUser {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl AffectedUser {
    pub fn new(id: &str, name: &str, email: &str, department: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: Some(email.to_string()),
            department: Some(department.to_string()),
            extra: ExtraFields::new(),
        }
    }
}

/// Directory entry returned by user search and used as an assignee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl User {
    pub fn new(id: &str, name: &str, email: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            department: None,
            title: None,
        }
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

/// Outcome of a confirmed assignment.
///
/// `updated_at` is stamped by the client when the backend confirms, not read from the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentResult {
    pub success: bool,
    pub message: String,
    pub incident_id: String,
    pub assigned_to: String,
    pub updated_at: String,
}
