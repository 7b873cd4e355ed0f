pub mod client;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::{LateRecord, LateRecordFilter, LateSummary, NewLateRecord, NewStudent, Student};

pub use client::ApiClient;

/// Uniform result of every backend call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(AppError),
}

/// Wire shape: `{success, data?, error?}`
#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success(_))
    }

    pub fn into_result(self) -> Result<T, AppError> {
        match self {
            ApiResponse::Success(data) => Ok(data),
            ApiResponse::Failure(err) => Err(err),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            ApiResponse::Success(data) => ApiResponse::Success(f(data)),
            ApiResponse::Failure(err) => ApiResponse::Failure(err),
        }
    }

    /// Error message for display, `None` on success
    pub fn error(&self) -> Option<String> {
        match self {
            ApiResponse::Success(_) => None,
            ApiResponse::Failure(err) => Some(err.to_string()),
        }
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode a raw response body into an envelope
    pub fn from_body(body: &str) -> Self {
        let envelope: Envelope = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => return ApiResponse::Failure(AppError::MalformedResponse(e.to_string())),
        };

        if !envelope.success {
            let message = envelope
                .error
                .or(envelope.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return ApiResponse::Failure(AppError::Api(message));
        }

        match serde_json::from_value(envelope.data) {
            Ok(data) => ApiResponse::Success(data),
            Err(e) => ApiResponse::Failure(AppError::MalformedResponse(e.to_string())),
        }
    }
}

impl<T> From<ApiResponse<T>> for Result<T, AppError> {
    fn from(response: ApiResponse<T>) -> Self {
        response.into_result()
    }
}

/// Backend capabilities. `fresh` asks for a cache-busted read.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn students(&self, class_room: Option<&str>, fresh: bool) -> ApiResponse<Vec<Student>>;

    async fn student(&self, student_id: i64) -> ApiResponse<Student>;

    async fn late_records(&self, filter: &LateRecordFilter, fresh: bool) -> ApiResponse<Vec<LateRecord>>;

    async fn late_summary(&self, class_room: Option<&str>, fresh: bool) -> ApiResponse<Vec<LateSummary>>;

    async fn add_late_record(&self, record: &NewLateRecord) -> ApiResponse<Value>;

    async fn add_student(&self, student: &NewStudent) -> ApiResponse<Value>;

    async fn delete_late_record(&self, late_id: i64) -> ApiResponse<Value>;

    async fn clear_cache(&self) -> ApiResponse<Value>;
}
