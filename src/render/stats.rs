use crate::pages::StudentDetail;
use crate::report::{ClassTotal, Overview, RankedStudent};

use super::NO_LATE_DATA;

const BAR_WIDTH: usize = 30;

pub fn overview(o: &Overview) -> String {
    format!(
        "มาสายทั้งหมด: {} ครั้ง\nนักเรียนที่มาสาย: {} คน\nเฉลี่ย: {:.1} ครั้ง/คน\nห้องที่มาสายมากที่สุด: {}\n",
        o.total_late,
        o.late_students,
        o.average_late,
        match &o.top_class {
            Some(class) => format!("{} ({} ครั้ง)", class, o.top_class_count),
            None => "-".to_string(),
        }
    )
}

/// Horizontal bars scaled to the largest classroom
pub fn chart(totals: &[ClassTotal]) -> String {
    if totals.is_empty() {
        return format!("{}\n", NO_LATE_DATA);
    }

    let mut out = String::new();
    for t in totals {
        let width = (t.width_pct / 100.0 * BAR_WIDTH as f64).round() as usize;
        out.push_str(&format!("{:<8} {:<w$} {}\n", t.classroom, "█".repeat(width), t.total, w = BAR_WIDTH));
    }
    out
}

pub fn ranking(ranked: &[RankedStudent]) -> String {
    if ranked.is_empty() {
        return format!("{}\n", NO_LATE_DATA);
    }

    let mut out = String::new();
    for r in ranked {
        let s = &r.summary;
        out.push_str(&format!(
            "{:>3}. {} ({})  ห้อง {}  {} ครั้ง\n",
            r.rank,
            s.full_name(),
            s.student_code.as_deref().unwrap_or("-"),
            s.class_room,
            s.total_late
        ));
    }
    out
}

pub fn history(detail: &StudentDetail) -> String {
    let s = &detail.student;
    let mut out = format!(
        "{} ({})  ห้อง {}\nมาสายทั้งหมด {} ครั้ง\n",
        s.full_name(),
        s.student_code,
        s.class_room,
        detail.total_late
    );

    if detail.history.is_empty() {
        out.push_str("ไม่มีประวัติการมาสาย\n");
        return out;
    }
    for entry in &detail.history {
        out.push_str(&format!(
            "  {}  {}  {}\n",
            entry.date,
            entry.time,
            entry.reason.as_deref().unwrap_or("-")
        ));
    }
    out
}
