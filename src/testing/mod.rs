use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::api::{ApiResponse, AttendanceApi};
use crate::error::AppError;
use crate::models::{LateRecord, LateRecordFilter, LateSummary, NewLateRecord, NewStudent, Student};

/// In-memory backend double for controller and cache tests
#[derive(Default)]
pub struct FakeApi {
    students: Mutex<Vec<Student>>,
    summary: Mutex<Vec<LateSummary>>,
    records: Mutex<Vec<LateRecord>>,
    calls: Mutex<HashMap<String, usize>>,
    failing_paths: Mutex<HashSet<String>>,
    rejected_students: Mutex<HashSet<i64>>,
}

pub fn student(id: i64, class_room: &str, first: &str, last: &str) -> Student {
    Student {
        student_id: id,
        student_code: format!("{}", 10000 + id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        class_room: class_room.to_string(),
        grade_level: "4".to_string(),
    }
}

pub fn summary(id: i64, class_room: &str, total_late: u32) -> LateSummary {
    LateSummary {
        student_id: id,
        student_code: Some(format!("{}", 10000 + id)),
        class_room: class_room.to_string(),
        first_name: format!("First{}", id),
        last_name: format!("Last{}", id),
        total_late,
    }
}

pub fn record(late_id: i64, student_id: i64, date: &str) -> LateRecord {
    LateRecord {
        late_id,
        student_id,
        late_date: date.to_string(),
        late_time: "08:10".to_string(),
        reason: None,
    }
}

impl FakeApi {
    pub fn new(students: Vec<Student>, summary: Vec<LateSummary>) -> Self {
        Self {
            students: Mutex::new(students),
            summary: Mutex::new(summary),
            ..Default::default()
        }
    }

    pub fn with_records(self, records: Vec<LateRecord>) -> Self {
        *self.records.lock().unwrap() = records;
        self
    }

    /// Every call to `path` fails with a network error from now on
    pub fn fail_path(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    /// `add-late-record` for this student reports a backend failure
    pub fn reject_student(&self, student_id: i64) {
        self.rejected_students.lock().unwrap().insert(student_id);
    }

    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn records(&self) -> Vec<LateRecord> {
        self.records.lock().unwrap().clone()
    }

    fn enter(&self, path: &str) -> Result<(), AppError> {
        *self.calls.lock().unwrap().entry(path.to_string()).or_default() += 1;
        if self.failing_paths.lock().unwrap().contains(path) {
            return Err(AppError::Network("connection refused".into()));
        }
        Ok(())
    }
}

fn respond<T>(result: Result<T, AppError>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::Success(data),
        Err(err) => ApiResponse::Failure(err),
    }
}

#[async_trait]
impl AttendanceApi for FakeApi {
    async fn students(&self, class_room: Option<&str>, _fresh: bool) -> ApiResponse<Vec<Student>> {
        respond(self.enter("students").map(|_| {
            self.students
                .lock()
                .unwrap()
                .iter()
                .filter(|s| class_room.map_or(true, |c| s.class_room == c))
                .cloned()
                .collect()
        }))
    }

    async fn student(&self, student_id: i64) -> ApiResponse<Student> {
        respond(self.enter("student").and_then(|_| {
            self.students
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.student_id == student_id)
                .cloned()
                .ok_or_else(|| AppError::api("Student not found"))
        }))
    }

    async fn late_records(&self, filter: &LateRecordFilter, _fresh: bool) -> ApiResponse<Vec<LateRecord>> {
        respond(self.enter("late-records").map(|_| {
            self.records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| filter.student_id.map_or(true, |id| r.student_id == id))
                .filter(|r| filter.date_from.map_or(true, |d| r.date().map_or(false, |rd| rd >= d)))
                .filter(|r| filter.date_to.map_or(true, |d| r.date().map_or(false, |rd| rd <= d)))
                .cloned()
                .collect()
        }))
    }

    async fn late_summary(&self, class_room: Option<&str>, _fresh: bool) -> ApiResponse<Vec<LateSummary>> {
        respond(self.enter("late-summary").map(|_| {
            self.summary
                .lock()
                .unwrap()
                .iter()
                .filter(|s| class_room.map_or(true, |c| s.class_room == c))
                .cloned()
                .collect()
        }))
    }

    async fn add_late_record(&self, new: &NewLateRecord) -> ApiResponse<Value> {
        respond(self.enter("add-late-record").and_then(|_| {
            if self.rejected_students.lock().unwrap().contains(&new.student_id) {
                return Err(AppError::api("Sheet is locked"));
            }
            let mut records = self.records.lock().unwrap();
            let late_id = records.iter().map(|r| r.late_id).max().unwrap_or(0) + 1;
            records.push(LateRecord {
                late_id,
                student_id: new.student_id,
                late_date: new.late_date.clone(),
                late_time: new.late_time.clone(),
                reason: new.reason.clone(),
            });
            Ok(json!({ "late_id": late_id }))
        }))
    }

    async fn add_student(&self, new: &NewStudent) -> ApiResponse<Value> {
        respond(self.enter("add-student").map(|_| {
            let mut students = self.students.lock().unwrap();
            let student_id = students.iter().map(|s| s.student_id).max().unwrap_or(0) + 1;
            students.push(Student {
                student_id,
                student_code: new.student_code.clone(),
                first_name: new.first_name.clone(),
                last_name: new.last_name.clone(),
                class_room: new.class_room.clone().unwrap_or_default(),
                grade_level: new.grade_level.clone().unwrap_or_default(),
            });
            json!({ "student_id": student_id })
        }))
    }

    async fn delete_late_record(&self, late_id: i64) -> ApiResponse<Value> {
        respond(self.enter("delete-late-record").and_then(|_| {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.late_id != late_id);
            if records.len() == before {
                Err(AppError::api("Record not found"))
            } else {
                Ok(Value::Null)
            }
        }))
    }

    async fn clear_cache(&self) -> ApiResponse<Value> {
        respond(self.enter("clear-cache").map(|_| Value::Null))
    }
}
