use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes shared by both crates. Read paths match on these to decide between
/// "not found" placeholders and a logged fallback.
pub mod codes {
    pub const HTTP_TRANSPORT: &str = "HTTP_TRANSPORT";
    pub const HTTP_NOT_FOUND: &str = "HTTP_NOT_FOUND";
    pub const HTTP_STATUS: &str = "HTTP_STATUS";
    pub const PAYLOAD_DECODE: &str = "PAYLOAD_DECODE";
    pub const PAYLOAD_SHAPE: &str = "PAYLOAD_SHAPE";
    pub const ASSIGN_VALIDATION: &str = "ASSIGN_VALIDATION";
    pub const ASSIGN_FAILED: &str = "ASSIGN_FAILED";
    pub const TAB_NOT_FOUND: &str = "TAB_NOT_FOUND";
    pub const TAB_NOT_CLOSEABLE: &str = "TAB_NOT_CLOSEABLE";
    pub const TAB_INVALID_PARENT: &str = "TAB_INVALID_PARENT";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const LOGGING_INIT_FAILED: &str = "LOGGING_INIT_FAILED";
}

/// Single structured error shape used across the core and HTTP layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    pub fn is_not_found(&self) -> bool {
        self.is(codes::HTTP_NOT_FOUND)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
