use serde_json::{Map, Value};

use crate::domain::{AffectedUser, Incident, User};
use crate::error::AppError;
use crate::normalize::payload::{extract_records, AFFECTED_USERS_SHAPE, INCIDENTS_SHAPE};
use crate::normalize::{extra_fields, first_alias};

pub const UNKNOWN_INCIDENT_NUMBER: &str = "UNKNOWN";
pub const NO_DESCRIPTION: &str = "(no description)";
pub const UNKNOWN_USER_ID: &str = "unknown";
pub const UNKNOWN_USER_NAME: &str = "Unknown User";

const INCIDENT_NUMBER_ALIASES: &[&str] =
    &["number", "sys_id", "id", "incident_number", "incidentNumber"];
const INCIDENT_DESCRIPTION_ALIASES: &[&str] =
    &["short_description", "shortDescription", "title", "description"];

fn as_object(raw: &Value) -> Map<String, Value> {
    match raw {
        Value::Object(m) => m.clone(),
        _ => Map::new(),
    }
}

pub fn normalize_incident(raw: &Value) -> Incident {
    let raw = as_object(raw);
    Incident {
        number: first_alias(&raw, INCIDENT_NUMBER_ALIASES)
            .unwrap_or_else(|| UNKNOWN_INCIDENT_NUMBER.to_string()),
        short_description: first_alias(&raw, INCIDENT_DESCRIPTION_ALIASES)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        extra: extra_fields(&raw, &["number", "short_description"]),
    }
}

/// Decode an incidents list body in any of the accepted shapes.
pub fn normalize_incidents(body: Value) -> Result<Vec<Incident>, AppError> {
    let records = extract_records(body, &INCIDENTS_SHAPE)?;
    Ok(records.iter().map(normalize_incident).collect())
}

pub fn normalize_affected_user(raw: &Value) -> AffectedUser {
    let raw = as_object(raw);
    AffectedUser {
        id: first_alias(&raw, &["id", "user_id", "sys_id"])
            .unwrap_or_else(|| UNKNOWN_USER_ID.to_string()),
        name: first_alias(&raw, &["name", "display_name", "full_name", "username"])
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
        email: first_alias(&raw, &["email", "email_address"]),
        department: first_alias(&raw, &["department", "dept"]),
        extra: extra_fields(&raw, &["id", "name", "email", "department"]),
    }
}

pub fn normalize_affected_users(body: Value) -> Result<Vec<AffectedUser>, AppError> {
    let records = extract_records(body, &AFFECTED_USERS_SHAPE)?;
    Ok(records.iter().map(normalize_affected_user).collect())
}

/// Map a user-search body. Directory rows (`result`) and plain rows (`users`) resolve their
/// aliases differently; unnamed directory rows are dropped. Any other body yields no users.
pub fn normalize_user_search(body: &Value) -> Vec<User> {
    if let Some(rows) = body.get("result").and_then(Value::as_array) {
        return rows
            .iter()
            .map(|row| {
                let raw = as_object(row);
                User {
                    id: first_alias(&raw, &["sys_id", "id"]).unwrap_or_default(),
                    name: first_alias(&raw, &["name", "display_name", "user_name"])
                        .unwrap_or_default(),
                    email: first_alias(&raw, &["email", "user_name"]).unwrap_or_default(),
                    department: first_alias(&raw, &["department", "u_department"]),
                    title: first_alias(&raw, &["title", "u_title"]),
                }
            })
            .filter(|user| !user.name.trim().is_empty())
            .collect();
    }

    if let Some(rows) = body.get("users").and_then(Value::as_array) {
        return rows
            .iter()
            .map(|row| {
                let raw = as_object(row);
                User {
                    id: first_alias(&raw, &["id", "sys_id"]).unwrap_or_default(),
                    name: first_alias(&raw, &["name", "display_name"]).unwrap_or_default(),
                    email: first_alias(&raw, &["email", "user_name"]).unwrap_or_default(),
                    department: first_alias(&raw, &["department"]),
                    title: first_alias(&raw, &["title"]),
                }
            })
            .collect();
    }

    Vec::new()
}
