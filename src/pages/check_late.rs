use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, AttendanceApi};
use crate::error::AppError;
use crate::models::{LateRecord, LateRecordFilter, NewLateRecord, Student};
use crate::report::format::format_time;
use crate::report::{late_records_for_class, late_student_ids, paginate, search_students, unique_classrooms, PageWindow};

pub const DEFAULT_REASON: &str = "อื่นๆ";

pub const REASONS: [&str; 7] = [
    DEFAULT_REASON,
    "รถติด",
    "ตื่นสาย",
    "ธุระส่วนตัว",
    "ป่วย",
    "ไปโรงพยาบาล",
    "รถเสีย",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLateState {
    Idle,
    Loading,
    Ready,
    Selecting,
    Saving,
}

/// In-progress selection persisted between invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub class_room: String,
    pub date: NaiveDate,
    pub selection: BTreeMap<i64, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    pub order: usize,
    pub student: Student,
    /// Already marked late today; shown checked, not selectable
    pub locked: bool,
    pub selected: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterView {
    pub rows: Vec<RosterRow>,
    pub window: PageWindow,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayEntry {
    pub late_id: i64,
    pub student: Student,
    pub time: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveFailure {
    pub student_id: i64,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub succeeded: Vec<i64>,
    pub failed: Vec<SaveFailure>,
}

impl SaveOutcome {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Nothing was written
    pub fn is_failure(&self) -> bool {
        self.succeeded.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CheckLatePage {
    pub class_room: String,
    pub date: NaiveDate,
    pub roster: Vec<Student>,
    pub classrooms: Vec<String>,
    /// Today's records for this classroom only
    pub today: Vec<LateRecord>,
    selection: BTreeMap<i64, String>,
    state: CheckLateState,
}

impl CheckLatePage {
    pub fn new(class_room: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            class_room: class_room.into(),
            date,
            roster: Vec::new(),
            classrooms: Vec::new(),
            today: Vec::new(),
            selection: BTreeMap::new(),
            state: CheckLateState::Idle,
        }
    }

    pub fn state(&self) -> CheckLateState {
        self.state
    }

    pub fn selection(&self) -> &BTreeMap<i64, String> {
        &self.selection
    }

    fn settle(&mut self) {
        self.state = if self.selection.is_empty() {
            CheckLateState::Ready
        } else {
            CheckLateState::Selecting
        };
    }

    /// Roster and classroom list in parallel, then today's records, which
    /// can only be attributed once the roster is known.
    pub async fn load(&mut self, api: &dyn AttendanceApi) -> Result<(), AppError> {
        self.state = CheckLateState::Loading;

        let (roster, everyone) = tokio::join!(
            api.students(Some(&self.class_room), true),
            api.students(None, false)
        );

        self.roster = match roster.into_result() {
            Ok(roster) => roster,
            Err(err) => {
                self.state = CheckLateState::Idle;
                return Err(err);
            }
        };
        tracing::debug!("Loaded {} students for {}", self.roster.len(), self.class_room);

        match everyone {
            ApiResponse::Success(students) => self.classrooms = unique_classrooms(&students),
            ApiResponse::Failure(err) => tracing::warn!("Classroom list unavailable: {}", err),
        }

        if let Err(err) = self.reload_today(api).await {
            self.state = CheckLateState::Idle;
            return Err(err);
        }

        // A restored selection may now point at locked or departed students
        let locked = late_student_ids(&self.today);
        let roster = &self.roster;
        self.selection
            .retain(|id, _| !locked.contains(id) && roster.iter().any(|s| s.student_id == *id));

        self.settle();
        Ok(())
    }

    pub async fn reload_today(&mut self, api: &dyn AttendanceApi) -> Result<(), AppError> {
        let records = api
            .late_records(&LateRecordFilter::on(self.date), true)
            .await
            .into_result()?;

        self.today = late_records_for_class(&records, &self.roster, &self.class_room, self.date)
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(
            "{} of {} records today belong to {}",
            self.today.len(),
            records.len(),
            self.class_room
        );
        Ok(())
    }

    pub fn is_locked(&self, student_id: i64) -> bool {
        self.today.iter().any(|r| r.student_id == student_id)
    }

    pub fn rows(&self, query: &str, page: usize, page_size: usize) -> RosterView {
        let matched = search_students(&self.roster, query);
        let window = paginate(matched.len(), page, page_size);
        let locked = late_student_ids(&self.today);

        let rows = window
            .slice(&matched)
            .iter()
            .enumerate()
            .map(|(i, student)| {
                let is_locked = locked.contains(&student.student_id);
                let reason = if is_locked {
                    self.today
                        .iter()
                        .find(|r| r.student_id == student.student_id)
                        .and_then(|r| r.reason.clone())
                } else {
                    self.selection.get(&student.student_id).cloned()
                };

                RosterRow {
                    order: window.start + i + 1,
                    student: (*student).clone(),
                    locked: is_locked,
                    selected: self.selection.contains_key(&student.student_id),
                    reason,
                }
            })
            .collect();

        RosterView {
            rows,
            window,
            selected: self.selection.len(),
        }
    }

    pub fn today_entries(&self) -> Vec<TodayEntry> {
        self.today
            .iter()
            .filter_map(|record| {
                let student = self.roster.iter().find(|s| s.student_id == record.student_id)?;
                Some(TodayEntry {
                    late_id: record.late_id,
                    student: student.clone(),
                    time: format_time(&record.late_time),
                    reason: record.reason.clone(),
                })
            })
            .collect()
    }

    fn ensure_interactive(&self) -> Result<(), AppError> {
        match self.state {
            CheckLateState::Ready | CheckLateState::Selecting => Ok(()),
            other => Err(AppError::validation(
                "state",
                format!("ยังไม่พร้อมสำหรับการเลือก ({:?})", other),
            )),
        }
    }

    pub fn select(&mut self, student_id: i64, reason: Option<String>) -> Result<(), AppError> {
        self.ensure_interactive()?;

        if !self.roster.iter().any(|s| s.student_id == student_id) {
            return Err(AppError::validation(
                "student_id",
                format!("ไม่พบนักเรียนรหัส {} ในห้อง {}", student_id, self.class_room),
            ));
        }
        if self.is_locked(student_id) {
            return Err(AppError::validation(
                "student_id",
                format!("นักเรียนรหัส {} ถูกบันทึกมาสายแล้ววันนี้", student_id),
            ));
        }

        let reason = reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REASON.to_string());
        self.selection.insert(student_id, reason);
        self.state = CheckLateState::Selecting;
        Ok(())
    }

    pub fn unselect(&mut self, student_id: i64) {
        self.selection.remove(&student_id);
        if matches!(self.state, CheckLateState::Selecting) {
            self.settle();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        if matches!(self.state, CheckLateState::Selecting) {
            self.settle();
        }
    }

    /// Re-apply a stored draft. Returns ids that could not be selected.
    pub fn restore(&mut self, draft: &Draft) -> Vec<i64> {
        if draft.class_room != self.class_room || draft.date != self.date {
            return draft.selection.keys().copied().collect();
        }

        let mut dropped = Vec::new();
        for (id, reason) in &draft.selection {
            if self.select(*id, Some(reason.clone())).is_err() {
                dropped.push(*id);
            }
        }
        dropped
    }

    pub fn draft(&self) -> Draft {
        Draft {
            class_room: self.class_room.clone(),
            date: self.date,
            selection: self.selection.clone(),
        }
    }

    /// One add-record call per selected student, issued concurrently.
    ///
    /// No rollback: partial success stands. With at least one success the
    /// selection is cleared and today's records reloaded; with none the
    /// selection is kept so the user can try again.
    pub async fn save(&mut self, api: &dyn AttendanceApi, late_time: &str) -> Result<SaveOutcome, AppError> {
        self.ensure_interactive()?;
        if self.selection.is_empty() {
            return Err(AppError::validation("selection", "กรุณาเลือกนักเรียนที่มาสาย"));
        }

        let late_date = self.date.format("%Y-%m-%d").to_string();
        // `8:05` goes out as `08:05`; anything unparseable is left for validate()
        let late_time = format_time(late_time);
        let records: Vec<NewLateRecord> = self
            .selection
            .iter()
            .map(|(id, reason)| NewLateRecord {
                student_id: *id,
                late_date: late_date.clone(),
                late_time: late_time.clone(),
                reason: Some(reason.clone()),
            })
            .collect();
        for record in &records {
            record.validate()?;
        }

        self.state = CheckLateState::Saving;
        tracing::info!("Saving {} late records for {}", records.len(), self.class_room);

        let results = join_all(records.iter().map(|record| async move {
            (record.student_id, api.add_late_record(record).await)
        }))
        .await;

        let mut outcome = SaveOutcome::default();
        for (student_id, result) in results {
            match result {
                ApiResponse::Success(_) => outcome.succeeded.push(student_id),
                ApiResponse::Failure(err) => outcome.failed.push(SaveFailure {
                    student_id,
                    error: err.to_string(),
                }),
            }
        }

        if outcome.is_failure() {
            tracing::warn!("No late records saved ({} failed)", outcome.failure_count());
            self.settle();
            return Ok(outcome);
        }

        self.selection.clear();
        if let Err(err) = self.reload_today(api).await {
            tracing::warn!("Saved, but reloading today's records failed: {}", err);
        }
        self.settle();
        Ok(outcome)
    }

    pub async fn delete_record(&mut self, api: &dyn AttendanceApi, late_id: i64) -> Result<(), AppError> {
        if !self.today.iter().any(|r| r.late_id == late_id) {
            return Err(AppError::validation(
                "late_id",
                format!("ไม่พบบันทึก {} ของห้อง {} วันนี้", late_id, self.class_room),
            ));
        }

        api.delete_late_record(late_id).await.map(|_| ()).into_result()?;
        tracing::info!("Deleted late record {}", late_id);
        self.reload_today(api).await
    }
}
