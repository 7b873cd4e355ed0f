use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::{ApiResponse, AttendanceApi};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{LateRecord, LateRecordFilter, LateSummary, NewLateRecord, NewStudent, Student};

/// HTTP client for the single script endpoint.
///
/// Every capability is a GET with `path=<name>` and its parameters in the
/// query string.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl ApiClient {
    pub fn new(endpoint: &str) -> Result<Self, AppError> {
        let endpoint = Url::parse(endpoint.trim())
            .map_err(|e| AppError::config(format!("invalid API URL '{}': {}", endpoint.trim(), e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match &config.api.url {
            Some(url) if !url.trim().is_empty() => Self::new(url),
            _ => Err(AppError::config("API URL not set (LATECHECK_API_URL)")),
        }
    }

    pub fn request_url(&self, path: &str, params: &[(&str, String)], fresh: bool) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("path", path);
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if fresh {
                query.append_pair("_t", &Utc::now().timestamp_millis().to_string());
            }
        }
        url
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        fresh: bool,
    ) -> ApiResponse<T> {
        let url = self.request_url(path, params, fresh);
        tracing::debug!("GET {}", url);

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Request to '{}' failed: {}", path, e);
                return ApiResponse::Failure(AppError::from(e));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Reading '{}' response failed: {}", path, e);
                return ApiResponse::Failure(AppError::from(e));
            }
        };

        let result = ApiResponse::from_body(&body);
        if let ApiResponse::Failure(err) = &result {
            tracing::warn!("'{}' returned failure (HTTP {}): {}", path, status, err);
        }
        result
    }
}

fn opt_param(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

#[async_trait]
impl AttendanceApi for ApiClient {
    async fn students(&self, class_room: Option<&str>, fresh: bool) -> ApiResponse<Vec<Student>> {
        let mut params = Vec::new();
        if let Some(class_room) = class_room {
            params.push(("class_room", class_room.to_string()));
        }
        self.call("students", &params, fresh).await
    }

    async fn student(&self, student_id: i64) -> ApiResponse<Student> {
        self.call("student", &[("id", student_id.to_string())], false).await
    }

    async fn late_records(&self, filter: &LateRecordFilter, fresh: bool) -> ApiResponse<Vec<LateRecord>> {
        self.call("late-records", &filter.to_params(), fresh).await
    }

    async fn late_summary(&self, class_room: Option<&str>, fresh: bool) -> ApiResponse<Vec<LateSummary>> {
        let mut params = Vec::new();
        if let Some(class_room) = class_room {
            params.push(("class_room", class_room.to_string()));
        }
        self.call("late-summary", &params, fresh).await
    }

    async fn add_late_record(&self, record: &NewLateRecord) -> ApiResponse<Value> {
        let params = [
            ("student_id", record.student_id.to_string()),
            ("late_date", record.late_date.clone()),
            ("late_time", record.late_time.clone()),
            ("reason", opt_param(record.reason.as_deref())),
        ];
        self.call("add-late-record", &params, false).await
    }

    async fn add_student(&self, student: &NewStudent) -> ApiResponse<Value> {
        let params = [
            ("student_code", student.student_code.clone()),
            ("first_name", student.first_name.clone()),
            ("last_name", student.last_name.clone()),
            ("class_room", opt_param(student.class_room.as_deref())),
            ("grade_level", opt_param(student.grade_level.as_deref())),
        ];
        self.call("add-student", &params, false).await
    }

    async fn delete_late_record(&self, late_id: i64) -> ApiResponse<Value> {
        self.call("delete-late-record", &[("late_id", late_id.to_string())], false).await
    }

    async fn clear_cache(&self) -> ApiResponse<Value> {
        self.call("clear-cache", &[], false).await
    }
}
