mod common;

use anyhow::Result;
use chrono::NaiveDate;
use latecheck::api::{ApiClient, ApiResponse, AttendanceApi};
use latecheck::error::AppError;
use latecheck::models::{LateRecordFilter, NewLateRecord, NewStudent};

#[tokio::test]
async fn students_filtered_by_classroom() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.exec_url())?;

    let students = client.students(Some("4/2"), false).await.into_result()?;
    assert_eq!(students.len(), 6);
    assert_eq!(students[0].student_id, 1);
    assert_eq!(students[0].student_code, "10001");
    assert_eq!(students[0].grade_level, "4");

    let requests = server.requests_for("students");
    assert_eq!(requests[0].get("class_room").map(String::as_str), Some("4/2"));
    assert!(!requests[0].contains_key("_t"));
    Ok(())
}

#[tokio::test]
async fn fresh_reads_carry_cache_buster() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.exec_url())?;

    let summary = client.late_summary(None, true).await.into_result()?;
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[0].student_code.as_deref(), Some("10001"));

    let requests = server.requests_for("late-summary");
    assert!(requests[0].get("_t").is_some_and(|t| t.parse::<i64>().is_ok()));
    Ok(())
}

#[tokio::test]
async fn late_records_send_filter_params() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.exec_url())?;
    let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    let records = client.late_records(&LateRecordFilter::on(day), false).await.into_result()?;
    let ids: Vec<i64> = records.iter().map(|r| r.late_id).collect();
    assert_eq!(ids, vec![1, 2]);

    let request = &server.requests_for("late-records")[0];
    assert_eq!(request.get("date_from").map(String::as_str), Some("2025-01-10"));
    assert_eq!(request.get("date_to").map(String::as_str), Some("2025-01-10"));
    assert!(!request.contains_key("student_id"));
    Ok(())
}

#[tokio::test]
async fn backend_failures_carry_their_message() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.exec_url())?;

    let missing = client.student(99).await;
    assert_eq!(missing, ApiResponse::Failure(AppError::api("Student not found")));

    server.backend.rejected.lock().unwrap().insert(3);
    let record = NewLateRecord {
        student_id: 3,
        late_date: "2025-01-10".into(),
        late_time: "08:20".into(),
        reason: None,
    };
    let rejected = client.add_late_record(&record).await;
    assert_eq!(rejected.error().as_deref(), Some("Sheet is locked"));
    Ok(())
}

#[tokio::test]
async fn mutations_send_empty_strings_for_missing_fields() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.exec_url())?;

    let record = NewLateRecord {
        student_id: 3,
        late_date: "2025-01-10".into(),
        late_time: "08:20".into(),
        reason: None,
    };
    assert!(client.add_late_record(&record).await.is_success());

    let student = NewStudent {
        student_code: "20001".into(),
        first_name: "Anan".into(),
        last_name: "Dee".into(),
        class_room: None,
        grade_level: None,
    };
    assert!(client.add_student(&student).await.is_success());

    let add_record = &server.requests_for("add-late-record")[0];
    assert_eq!(add_record.get("reason").map(String::as_str), Some(""));
    assert_eq!(add_record.get("late_time").map(String::as_str), Some("08:20"));

    let add_student = &server.requests_for("add-student")[0];
    assert_eq!(add_student.get("class_room").map(String::as_str), Some(""));
    assert_eq!(add_student.get("grade_level").map(String::as_str), Some(""));
    Ok(())
}

#[tokio::test]
async fn delete_and_clear_cache() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.exec_url())?;

    assert!(client.delete_late_record(1).await.is_success());
    assert_eq!(
        client.delete_late_record(1).await.into_result(),
        Err(AppError::api("Record not found"))
    );
    assert!(client.clear_cache().await.is_success());
    assert_eq!(server.backend.records.lock().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_malformed() -> Result<()> {
    let server = common::spawn(common::seeded()).await?;
    let client = ApiClient::new(&server.broken_url())?;

    let response = client.students(None, false).await;
    assert!(matches!(response, ApiResponse::Failure(AppError::MalformedResponse(_))));
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_network_error() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let client = ApiClient::new(&format!("http://127.0.0.1:{}/exec", port))?;

    let response = client.late_summary(None, false).await;
    assert!(matches!(response, ApiResponse::Failure(AppError::Network(_))));
    Ok(())
}
