//! Time-boxed local snapshot of the roster and the late summary.

use chrono::Utc;
use serde::Serialize;

use crate::api::AttendanceApi;
use crate::error::AppError;
use crate::models::{LateSummary, Student};
use crate::storage::{Storage, CACHE_STUDENTS_KEY, CACHE_SUMMARY_KEY, CACHE_TIMESTAMP_KEY};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheSnapshot {
    pub students: Vec<Student>,
    pub summary: Vec<LateSummary>,
    pub cached_at: i64,
    /// True when served without touching the network
    pub from_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStatus {
    pub cached_at: Option<i64>,
    pub age_ms: Option<i64>,
    pub ttl_ms: i64,
    pub valid: bool,
    pub students: Option<usize>,
    pub summary: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    storage: Storage,
    ttl_ms: i64,
    cached_at: Option<i64>,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl LocalCache {
    pub fn new(storage: Storage, ttl_ms: i64) -> Self {
        let cached_at = storage.get(CACHE_TIMESTAMP_KEY);
        Self {
            storage,
            ttl_ms,
            cached_at,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_ms())
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        match self.cached_at {
            Some(cached_at) => now - cached_at <= self.ttl_ms,
            None => false,
        }
    }

    pub async fn load(&mut self, api: &dyn AttendanceApi, force_refresh: bool) -> Result<CacheSnapshot, AppError> {
        self.load_at(api, force_refresh, now_ms()).await
    }

    pub async fn load_at(
        &mut self,
        api: &dyn AttendanceApi,
        force_refresh: bool,
        now: i64,
    ) -> Result<CacheSnapshot, AppError> {
        if !force_refresh && self.is_valid_at(now) {
            let students = self.storage.get::<Vec<Student>>(CACHE_STUDENTS_KEY);
            let summary = self.storage.get::<Vec<LateSummary>>(CACHE_SUMMARY_KEY);
            if let (Some(students), Some(summary), Some(cached_at)) = (students, summary, self.cached_at) {
                tracing::debug!(
                    "Cache hit: {} students, {} summary rows, age {} ms",
                    students.len(),
                    summary.len(),
                    now - cached_at
                );
                return Ok(CacheSnapshot {
                    students,
                    summary,
                    cached_at,
                    from_cache: true,
                });
            }
            tracing::debug!("Cache timestamp valid but entries missing; refetching");
        }

        let (students, summary) = tokio::join!(
            api.students(None, force_refresh),
            api.late_summary(None, force_refresh)
        );
        let students = students.into_result()?;
        let summary = summary.into_result()?;

        self.storage.set(CACHE_STUDENTS_KEY, &students);
        self.storage.set(CACHE_SUMMARY_KEY, &summary);
        self.storage.set(CACHE_TIMESTAMP_KEY, &now);
        self.cached_at = Some(now);
        tracing::debug!("Cache stored: {} students, {} summary rows", students.len(), summary.len());

        Ok(CacheSnapshot {
            students,
            summary,
            cached_at: now,
            from_cache: false,
        })
    }

    pub fn invalidate(&mut self) {
        self.storage.remove(CACHE_STUDENTS_KEY);
        self.storage.remove(CACHE_SUMMARY_KEY);
        self.storage.remove(CACHE_TIMESTAMP_KEY);
        self.cached_at = None;
        tracing::debug!("Cache invalidated");
    }

    /// Drop the backend's cache and ours, then refetch.
    pub async fn refresh(&mut self, api: &dyn AttendanceApi) -> Result<CacheSnapshot, AppError> {
        if let Some(err) = api.clear_cache().await.error() {
            tracing::warn!("Backend cache clear failed, refetching anyway: {}", err);
        }
        self.invalidate();
        self.load(api, true).await
    }

    pub fn status_at(&self, now: i64) -> CacheStatus {
        CacheStatus {
            cached_at: self.cached_at,
            age_ms: self.cached_at.map(|t| now - t),
            ttl_ms: self.ttl_ms,
            valid: self.is_valid_at(now),
            students: self.storage.get::<Vec<Student>>(CACHE_STUDENTS_KEY).map(|s| s.len()),
            summary: self.storage.get::<Vec<LateSummary>>(CACHE_SUMMARY_KEY).map(|s| s.len()),
        }
    }

    pub fn status(&self) -> CacheStatus {
        self.status_at(now_ms())
    }
}
