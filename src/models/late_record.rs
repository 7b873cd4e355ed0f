use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::de;
use crate::error::AppError;

/// One instance of a student being marked late
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateRecord {
    #[serde(deserialize_with = "de::id")]
    pub late_id: i64,
    #[serde(deserialize_with = "de::id")]
    pub student_id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub late_date: String,
    #[serde(default, deserialize_with = "de::text")]
    pub late_time: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub reason: Option<String>,
}

impl LateRecord {
    /// Calendar date of the record, if `late_date` is parseable.
    ///
    /// Sheet date cells serialize as UTC timestamps; those are converted to
    /// the local calendar day before comparison.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.late_date)
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date() == Some(date)
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_date_in(raw, &Local)
}

/// Timestamps take the calendar day they fall on in `tz`; plain
/// `YYYY-MM-DD` cells are used as-is.
pub fn parse_date_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(tz).date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Query parameters for the `late-records` path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LateRecordFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub student_id: Option<i64>,
}

impl LateRecordFilter {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            date_from: Some(date),
            date_to: Some(date),
            student_id: None,
        }
    }

    pub fn for_student(student_id: i64) -> Self {
        Self {
            student_id: Some(student_id),
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(d) = self.date_from {
            params.push(("date_from", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.date_to {
            params.push(("date_to", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(id) = self.student_id {
            params.push(("student_id", id.to_string()));
        }
        params
    }
}

/// Payload for the `add-late-record` path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLateRecord {
    pub student_id: i64,
    pub late_date: String,
    pub late_time: String,
    pub reason: Option<String>,
}

impl NewLateRecord {
    pub fn validate(&self) -> Result<(), AppError> {
        if NaiveDate::parse_from_str(&self.late_date, "%Y-%m-%d").is_err() {
            return Err(AppError::validation("late_date", "กรุณาระบุวันที่ (YYYY-MM-DD)"));
        }
        if self.late_time.trim().is_empty() {
            return Err(AppError::validation("late_time", "กรุณาระบุเวลา"));
        }
        if NaiveTime::parse_from_str(&self.late_time, "%H:%M").is_err()
            && NaiveTime::parse_from_str(&self.late_time, "%H:%M:%S").is_err()
        {
            return Err(AppError::validation("late_time", "รูปแบบเวลาไม่ถูกต้อง (HH:MM)"));
        }
        Ok(())
    }
}
