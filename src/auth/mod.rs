//! Shared-PIN session guard.
//!
//! The PIN is a placeholder gate for staff devices, not a security
//! boundary: no hashing, no rate limiting.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::storage::{Storage, AUTH_KEY};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub logged_in: bool,
    /// Epoch milliseconds of the last authenticated use
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub logged_in: bool,
    pub expires_in_ms: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct SessionGuard {
    storage: Storage,
    pin: String,
    timeout_ms: i64,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl SessionGuard {
    pub fn new(storage: Storage, pin: impl Into<String>, timeout_ms: i64) -> Self {
        Self {
            storage,
            pin: pin.into(),
            timeout_ms,
        }
    }

    pub fn from_config(storage: Storage, config: &AppConfig) -> Self {
        Self::new(storage, config.auth.pin.clone(), config.auth.session_timeout_ms)
    }

    pub fn login(&self, pin: &str) -> bool {
        self.login_at(pin, now_ms())
    }

    pub fn login_at(&self, pin: &str, now: i64) -> bool {
        if pin != self.pin {
            tracing::info!("Login rejected: wrong PIN");
            return false;
        }

        let session = Session {
            logged_in: true,
            timestamp: now,
        };
        if !self.storage.set(AUTH_KEY, &session) {
            tracing::warn!("Session could not be persisted; login will not survive this command");
        }
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(now_ms())
    }

    /// Sliding expiration: a live session is re-stamped on every check.
    pub fn is_authenticated_at(&self, now: i64) -> bool {
        let mut session = match self.storage.get::<Session>(AUTH_KEY) {
            Some(session) if session.logged_in => session,
            _ => return false,
        };

        if now - session.timestamp > self.timeout_ms {
            tracing::info!("Session expired after {} ms", now - session.timestamp);
            self.logout();
            return false;
        }

        session.timestamp = now;
        self.storage.set(AUTH_KEY, &session);
        true
    }

    pub fn require_auth(&self) -> Result<(), AppError> {
        self.require_auth_at(now_ms())
    }

    pub fn require_auth_at(&self, now: i64) -> Result<(), AppError> {
        if self.is_authenticated_at(now) {
            Ok(())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    pub fn logout(&self) {
        self.storage.remove(AUTH_KEY);
    }

    /// Inspect the session without refreshing it
    pub fn status_at(&self, now: i64) -> SessionStatus {
        match self.storage.get::<Session>(AUTH_KEY) {
            Some(session) if session.logged_in && now - session.timestamp <= self.timeout_ms => {
                SessionStatus {
                    logged_in: true,
                    expires_in_ms: Some(self.timeout_ms - (now - session.timestamp)),
                }
            }
            _ => SessionStatus {
                logged_in: false,
                expires_in_ms: None,
            },
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status_at(now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const HOUR: i64 = 3_600_000;

    fn guard(dir: &std::path::Path) -> SessionGuard {
        SessionGuard::new(Storage::new(dir), "1234", HOUR)
    }

    #[test]
    fn wrong_pin_writes_nothing() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        assert!(!guard.login_at("0000", 1_000));
        assert!(!guard.is_authenticated_at(1_000));
        assert!(matches!(guard.require_auth_at(1_000), Err(AppError::NotAuthenticated)));
    }

    #[test]
    fn login_persists_camel_case_session() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        assert!(guard.login_at("1234", 1_000));
        let raw: serde_json::Value = Storage::new(dir.path()).get(AUTH_KEY).unwrap();
        assert_eq!(raw, serde_json::json!({"loggedIn": true, "timestamp": 1_000}));
    }

    #[test]
    fn session_slides_on_each_check() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        guard.login_at("1234", 0);
        // Exactly at the timeout is still valid
        assert!(guard.is_authenticated_at(HOUR));
        // Refreshed at HOUR, so 2*HOUR is again exactly at the boundary
        assert!(guard.is_authenticated_at(2 * HOUR));
        assert!(guard.require_auth_at(2 * HOUR + 10).is_ok());
    }

    #[test]
    fn expired_session_is_evicted() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        guard.login_at("1234", 0);
        assert!(!guard.is_authenticated_at(HOUR + 1));
        assert!(!Storage::new(dir.path()).has(AUTH_KEY));
        // Stays logged out even if time goes back
        assert!(!guard.is_authenticated_at(10));
    }

    #[test]
    fn logged_out_flag_is_not_a_session() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path());
        storage.set(AUTH_KEY, &Session { logged_in: false, timestamp: 5 });

        assert!(!guard(dir.path()).is_authenticated_at(5));
    }

    #[test]
    fn status_does_not_refresh() {
        let dir = tempdir().unwrap();
        let guard = guard(dir.path());

        guard.login_at("1234", 0);
        let status = guard.status_at(HOUR / 2);
        assert!(status.logged_in);
        assert_eq!(status.expires_in_ms, Some(HOUR / 2));

        let session: Session = Storage::new(dir.path()).get(AUTH_KEY).unwrap();
        assert_eq!(session.timestamp, 0);

        guard.logout();
        assert!(!guard.status_at(0).logged_in);
    }
}
