use desk_core::cache::Clock;
use desk_core::config::DeskConfig;
use desk_core::domain::{AssignmentResult, User};
use desk_core::error::{codes, AppError};
use desk_core::validate::validate_assignee;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::{HttpRequest, HttpResponse, Transport};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Incident assigned successfully";

// The backend keys assignees by display name.
#[derive(Debug, Clone, Serialize)]
struct AssigneeRequest<'a> {
    assigned_to: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AssigneeResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Best message from a failed assignment response: JSON `message`, then JSON
/// `error.message`, then the raw body, then the status line.
fn failure_message(resp: &HttpResponse) -> String {
    let non_empty = |s: &&str| !s.is_empty();
    match serde_json::from_str::<Value>(&resp.body) {
        Ok(v) => {
            if let Some(m) = v.get("message").and_then(Value::as_str).filter(non_empty) {
                return m.to_string();
            }
            if let Some(m) = v
                .pointer("/error/message")
                .and_then(Value::as_str)
                .filter(non_empty)
            {
                return m.to_string();
            }
        }
        Err(_) if !resp.body.is_empty() => return resp.body.clone(),
        Err(_) => {}
    }
    format!(
        "Failed to assign incident: {} {}",
        resp.status, resp.status_text
    )
}

/// Assign `incident_number` to `assignee`.
///
/// Validation failures return before any request. Backend failures are returned with the best
/// available message and nothing is retried.
pub fn assign(
    config: &DeskConfig,
    transport: &dyn Transport,
    clock: &dyn Clock,
    incident_number: &str,
    assignee: Option<&User>,
) -> Result<AssignmentResult, AppError> {
    let user = validate_assignee(assignee)?;

    let url = config.assignee_url(incident_number);
    let body = serde_json::to_value(AssigneeRequest {
        assigned_to: &user.name,
    })
    .map_err(|e| {
        AppError::new(codes::ASSIGN_FAILED, "Failed to encode assignment request")
            .with_details(e.to_string())
    })?;
    let request = HttpRequest::put_json(&url, body).bearer(config.bearer());

    tracing::info!(incident_number, assignee = %user.name, "assigning incident");
    let resp = transport.send(&request)?;

    if !resp.is_success() {
        let message = failure_message(&resp);
        tracing::warn!(
            incident_number,
            status = resp.status,
            error = %message,
            "assignment rejected"
        );
        return Err(AppError::new(codes::ASSIGN_FAILED, message)
            .with_details(format!("url={url}; status={}", resp.status))
            .with_retryable(resp.status >= 500));
    }

    // Success bodies are optional; an empty or non-JSON body keeps the default message.
    let parsed: AssigneeResponse = serde_json::from_str(&resp.body).unwrap_or_default();
    Ok(AssignmentResult {
        success: true,
        message: parsed
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
        incident_id: incident_number.to_string(),
        assigned_to: user.name.clone(),
        updated_at: clock.now_rfc3339(),
    })
}
