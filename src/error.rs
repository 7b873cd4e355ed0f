// Client error types
use serde_json::{json, Value};
use thiserror::Error;

/// Every failure the client can surface to a command
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AppError {
    // Transport-level failure (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    // Body was not JSON or did not match the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    // Local storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    // Missing or invalid input, caught before submit
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("รหัสผ่านไม่ถูกต้อง")]
    InvalidPin,

    // No session, or the session timed out
    #[error("กรุณาเข้าสู่ระบบ")]
    NotAuthenticated,

    // Backend answered with success=false
    #[error("{0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Get error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InvalidPin => "INVALID_PIN",
            AppError::NotAuthenticated => "NOT_AUTHENTICATED",
            AppError::Api(_) => "API_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Convert to JSON body for `--json` output
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code(),
        });

        if let AppError::Validation { field, .. } = self {
            response["field"] = json!(field);
        }

        response
    }
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        AppError::Api(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::MalformedResponse(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_in_json() {
        let err = AppError::validation("late_time", "กรุณาระบุเวลา");
        let body = err.to_json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("กรุณาระบุเวลา"));
        assert_eq!(body["error_code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["field"], json!("late_time"));
    }

    #[test]
    fn api_error_displays_backend_message() {
        let err = AppError::api("Student not found");
        assert_eq!(err.to_string(), "Student not found");
        assert_eq!(err.error_code(), "API_ERROR");
    }
}
