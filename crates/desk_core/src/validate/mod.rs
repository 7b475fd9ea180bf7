use crate::domain::User;
use crate::error::{codes, AppError};

pub const MISSING_ASSIGNEE: &str = "Please select a user to assign the incident to";
pub const MISSING_ID: &str = "Selected user is missing ID";
pub const MISSING_NAME: &str = "Selected user is missing name";
pub const MISSING_EMAIL: &str = "Selected user is missing email";

/// Check an assignee before any request is made. The first failing rule wins:
/// presence, then id, then name, then email.
pub fn validate_assignee(assignee: Option<&User>) -> Result<&User, AppError> {
    let Some(user) = assignee else {
        return Err(AppError::new(codes::ASSIGN_VALIDATION, MISSING_ASSIGNEE));
    };

    for (value, message) in [
        (&user.id, MISSING_ID),
        (&user.name, MISSING_NAME),
        (&user.email, MISSING_EMAIL),
    ] {
        if value.is_empty() {
            return Err(AppError::new(codes::ASSIGN_VALIDATION, message)
                .with_details(format!("user_id={}", user.id)));
        }
    }

    Ok(user)
}
