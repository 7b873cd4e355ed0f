#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// In-process stand-in for the spreadsheet script endpoint
#[derive(Default)]
pub struct MockBackend {
    pub students: Mutex<Vec<Value>>,
    pub summary: Mutex<Vec<Value>>,
    pub records: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<HashMap<String, String>>>,
    /// `add-late-record` fails for these student ids
    pub rejected: Mutex<HashSet<i64>>,
}

pub struct MockServer {
    pub base_url: String,
    pub backend: Arc<MockBackend>,
}

impl MockServer {
    /// URL of the script endpoint
    pub fn exec_url(&self) -> String {
        format!("{}/exec", self.base_url)
    }

    /// URL that answers every request with an HTML error page
    pub fn broken_url(&self) -> String {
        format!("{}/broken", self.base_url)
    }

    pub fn requests_for(&self, path: &str) -> Vec<HashMap<String, String>> {
        self.backend
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.get("path").map(String::as_str) == Some(path))
            .cloned()
            .collect()
    }
}

pub fn student(id: i64, class_room: &str, first: &str, last: &str) -> Value {
    // Sheet cells come back as a mix of numbers and strings
    json!({
        "student_id": id.to_string(),
        "student_code": 10000 + id,
        "first_name": first,
        "last_name": last,
        "class_room": class_room,
        "grade_level": 4
    })
}

pub fn record(late_id: i64, student_id: i64, date: &str, time: &str) -> Value {
    json!({
        "late_id": late_id,
        "student_id": student_id,
        "late_date": date,
        "late_time": time,
        "reason": ""
    })
}

pub fn summary(id: i64, class_room: &str, total_late: u32) -> Value {
    json!({
        "student_id": id,
        "student_code": (10000 + id).to_string(),
        "class_room": class_room,
        "first_name": format!("First{}", id),
        "last_name": format!("Last{}", id),
        "total_late": total_late
    })
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn fail(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "error": message }))
}

fn field(value: &Value, key: &str) -> String {
    match &value[key] {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

async fn exec(
    State(backend): State<Arc<MockBackend>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.requests.lock().unwrap().push(params.clone());

    match param(&params, "path").unwrap_or_default() {
        "students" => {
            let students = backend.students.lock().unwrap();
            let class_room = param(&params, "class_room");
            let rows: Vec<Value> = students
                .iter()
                .filter(|s| class_room.map_or(true, |c| field(s, "class_room") == c))
                .cloned()
                .collect();
            ok(json!(rows))
        }
        "student" => {
            let id = param(&params, "id").unwrap_or_default();
            match backend.students.lock().unwrap().iter().find(|s| field(s, "student_id") == id) {
                Some(s) => ok(s.clone()),
                None => fail("Student not found"),
            }
        }
        "late-records" => {
            let records = backend.records.lock().unwrap();
            let from = param(&params, "date_from");
            let to = param(&params, "date_to");
            let student_id = param(&params, "student_id");
            let rows: Vec<Value> = records
                .iter()
                .filter(|r| {
                    let date = field(r, "late_date");
                    let date = date.get(..10).unwrap_or_default();
                    from.map_or(true, |f| date >= f)
                        && to.map_or(true, |t| date <= t)
                        && student_id.map_or(true, |id| field(r, "student_id") == id)
                })
                .cloned()
                .collect();
            ok(json!(rows))
        }
        "late-summary" => {
            let summary = backend.summary.lock().unwrap();
            let class_room = param(&params, "class_room");
            let rows: Vec<Value> = summary
                .iter()
                .filter(|s| class_room.map_or(true, |c| field(s, "class_room") == c))
                .cloned()
                .collect();
            ok(json!(rows))
        }
        "add-late-record" => {
            let student_id: i64 = param(&params, "student_id").and_then(|v| v.parse().ok()).unwrap_or(0);
            if backend.rejected.lock().unwrap().contains(&student_id) {
                return Json(json!({ "success": false, "message": "Sheet is locked" }));
            }
            let mut records = backend.records.lock().unwrap();
            let late_id = records.len() as i64 + 1000;
            records.push(json!({
                "late_id": late_id,
                "student_id": student_id,
                "late_date": params.get("late_date").cloned().unwrap_or_default(),
                "late_time": params.get("late_time").cloned().unwrap_or_default(),
                "reason": params.get("reason").cloned().unwrap_or_default(),
            }));
            ok(json!({ "late_id": late_id }))
        }
        "add-student" => {
            let mut students = backend.students.lock().unwrap();
            let student_id = students.len() as i64 + 1;
            students.push(json!({
                "student_id": student_id,
                "student_code": params.get("student_code").cloned().unwrap_or_default(),
                "first_name": params.get("first_name").cloned().unwrap_or_default(),
                "last_name": params.get("last_name").cloned().unwrap_or_default(),
                "class_room": params.get("class_room").cloned().unwrap_or_default(),
                "grade_level": params.get("grade_level").cloned().unwrap_or_default(),
            }));
            ok(json!({ "student_id": student_id }))
        }
        "delete-late-record" => {
            let late_id = param(&params, "late_id").unwrap_or_default();
            let mut records = backend.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| field(r, "late_id") != late_id);
            if records.len() == before {
                fail("Record not found")
            } else {
                ok(Value::Null)
            }
        }
        "clear-cache" => ok(Value::Null),
        // No message on purpose: the client must fill in a default
        _ => Json(json!({ "success": false })),
    }
}

async fn broken() -> &'static str {
    "<html><body>Script error</body></html>"
}

pub async fn spawn(backend: MockBackend) -> Result<MockServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let backend = Arc::new(backend);

    let app = Router::new()
        .route("/exec", get(exec))
        .route("/broken", get(broken))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock backend")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(MockServer {
        base_url: format!("http://127.0.0.1:{}", port),
        backend,
    })
}

/// Backend with two classrooms and a couple of records on 2025-01-10
pub fn seeded() -> MockBackend {
    let backend = MockBackend::default();
    *backend.students.lock().unwrap() = vec![
        student(1, "4/2", "Somchai", "Jaidee"),
        student(2, "4/2", "Malee", "Sukjai"),
        student(3, "4/2", "Anan", "Dee"),
        student(4, "4/2", "Suda", "Rak"),
        student(5, "4/2", "Preecha", "Mee"),
        student(6, "4/2", "Wichai", "Ngam"),
        student(7, "4/3", "Other", "Room"),
    ];
    *backend.summary.lock().unwrap() = vec![summary(1, "4/2", 3), summary(2, "4/2", 1), summary(7, "4/3", 2)];
    *backend.records.lock().unwrap() = vec![
        record(1, 1, "2025-01-10", "08:05:00"),
        record(2, 7, "2025-01-10T00:00:00.000Z", "08:12"),
        record(3, 2, "2025-01-09", "07:59"),
    ];
    backend
}
