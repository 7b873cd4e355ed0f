//! Text views for the terminal. Every function here is pure: the same view
//! model always renders the same string. `--json` output bypasses this
//! module and serializes the view models directly.

mod check_late;
mod stats;

pub use check_late::{roster, save_outcome, today_entries};
pub use stats::{chart, history, overview, ranking};

use chrono::{Local, TimeZone};

use crate::auth::SessionStatus;
use crate::cache::CacheStatus;
use crate::models::Student;
use crate::pages::{ClassroomCard, StudentList};
use crate::report::PageWindow;

pub const NO_LATE_DATA: &str = "ไม่มีข้อมูลการมาสาย";

fn duration_text(ms: i64) -> String {
    let minutes = ms.max(0) / 60_000;
    if minutes >= 60 {
        format!("{} ชม. {} นาที", minutes / 60, minutes % 60)
    } else {
        format!("{} นาที", minutes)
    }
}

fn timestamp_text(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => epoch_ms.to_string(),
    }
}

fn page_hint(window: &PageWindow) -> String {
    match (window.has_previous(), window.has_next()) {
        (false, false) => String::new(),
        (true, false) => format!("ก่อนหน้า: --page {}\n", window.page - 1),
        (false, true) => format!("ถัดไป: --page {}\n", window.page + 1),
        (true, true) => format!("ก่อนหน้า: --page {}  ถัดไป: --page {}\n", window.page - 1, window.page + 1),
    }
}

pub fn cards(cards: &[ClassroomCard]) -> String {
    if cards.is_empty() {
        return "ไม่มีข้อมูลห้องเรียน\n".to_string();
    }

    let mut out = String::new();
    for card in cards {
        out.push_str(&format!(
            "ห้อง {:<8} นักเรียน {:>4} คน   มาสาย {:>4} ครั้ง\n",
            card.classroom, card.total_students, card.late_count
        ));
    }
    out
}

pub fn student(student: &Student) -> String {
    format!(
        "[{}] {} {}  ห้อง {}  ชั้น {}  (id {})\n",
        student.student_code,
        student.first_name,
        student.last_name,
        student.class_room,
        student.grade_level,
        student.student_id
    )
}

pub fn student_list(list: &StudentList) -> String {
    if list.students.is_empty() {
        return "ไม่พบนักเรียน\n".to_string();
    }

    let mut out = String::new();
    for (i, s) in list.students.iter().enumerate() {
        out.push_str(&format!("{:>4}. {}", list.window.start + i + 1, student(s)));
    }
    out.push_str(&format!(
        "หน้า {}/{} (ทั้งหมด {} คน)\n",
        list.window.page, list.window.total_pages, list.window.total
    ));
    out.push_str(&page_hint(&list.window));
    out
}

pub fn cache_status(status: &CacheStatus) -> String {
    let Some(cached_at) = status.cached_at else {
        return "ยังไม่มีข้อมูลในแคช\n".to_string();
    };

    let mut out = format!("แคชเมื่อ: {}\n", timestamp_text(cached_at));
    if let Some(age) = status.age_ms {
        out.push_str(&format!("อายุ: {} (TTL {})\n", duration_text(age), duration_text(status.ttl_ms)));
    }
    out.push_str(&format!("สถานะ: {}\n", if status.valid { "ใช้งานได้" } else { "หมดอายุ" }));
    if let Some(n) = status.students {
        out.push_str(&format!("นักเรียน: {} คน\n", n));
    }
    if let Some(n) = status.summary {
        out.push_str(&format!("สรุปการมาสาย: {} รายการ\n", n));
    }
    out
}

pub fn session_status(status: &SessionStatus) -> String {
    match (status.logged_in, status.expires_in_ms) {
        (true, Some(ms)) => format!("เข้าสู่ระบบแล้ว (หมดอายุใน {})\n", duration_text(ms)),
        (true, None) => "เข้าสู่ระบบแล้ว\n".to_string(),
        (false, _) => "ยังไม่ได้เข้าสู่ระบบ\n".to_string(),
    }
}
