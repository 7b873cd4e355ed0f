use crate::pages::check_late::{RosterView, SaveOutcome, TodayEntry};

/// Numbered roster with a check column: `✓` already late today (locked),
/// `x` selected, blank otherwise.
pub fn roster(class_room: &str, view: &RosterView) -> String {
    let mut out = format!("ห้อง {}\n", class_room);

    if view.rows.is_empty() {
        out.push_str("ไม่พบนักเรียน\n");
    }
    for row in &view.rows {
        let mark = if row.locked {
            "✓"
        } else if row.selected {
            "x"
        } else {
            " "
        };
        out.push_str(&format!(
            "{:>4}. [{}] {:<8} {} {}",
            row.order, mark, row.student.student_code, row.student.first_name, row.student.last_name
        ));
        if let Some(reason) = &row.reason {
            out.push_str(&format!("  ({})", reason));
        }
        out.push_str(&format!("  #{}\n", row.student.student_id));
    }

    out.push_str(&format!(
        "หน้า {}/{}  พบ {} คน  เลือกแล้ว {} คน\n",
        view.window.page, view.window.total_pages, view.window.total, view.selected
    ));
    out.push_str(&super::page_hint(&view.window));
    out
}

pub fn today_entries(entries: &[TodayEntry]) -> String {
    if entries.is_empty() {
        return "วันนี้ยังไม่มีนักเรียนมาสาย\n".to_string();
    }

    let mut out = format!("มาสายวันนี้ {} คน\n", entries.len());
    for entry in entries {
        out.push_str(&format!(
            "  {}  {} ({})  {}  [ลบ: {}]\n",
            entry.time,
            entry.student.full_name(),
            entry.student.student_code,
            entry.reason.as_deref().unwrap_or("-"),
            entry.late_id
        ));
    }
    out
}

pub fn save_outcome(outcome: &SaveOutcome) -> String {
    if outcome.is_failure() {
        let mut out = "❌ เกิดข้อผิดพลาดในการบันทึก\n".to_string();
        for failure in &outcome.failed {
            out.push_str(&format!("  #{}: {}\n", failure.student_id, failure.error));
        }
        return out;
    }

    let mut out = format!("✅ บันทึกสำเร็จ {} คน\n", outcome.success_count());
    if outcome.failure_count() > 0 {
        out.push_str(&format!("⚠️ บันทึกไม่สำเร็จ {} คน\n", outcome.failure_count()));
        for failure in &outcome.failed {
            out.push_str(&format!("  #{}: {}\n", failure.student_id, failure.error));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::check_late::{RosterRow, SaveFailure};
    use crate::report::paginate;
    use crate::testing::student;

    #[test]
    fn roster_marks_locked_and_selected() {
        let view = RosterView {
            rows: vec![
                RosterRow { order: 1, student: student(1, "4/2", "A", "B"), locked: true, selected: false, reason: None },
                RosterRow {
                    order: 2,
                    student: student(2, "4/2", "C", "D"),
                    locked: false,
                    selected: true,
                    reason: Some("รถติด".into()),
                },
            ],
            window: paginate(2, 1, 50),
            selected: 1,
        };

        let text = roster("4/2", &view);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("[✓]"));
        assert!(lines[2].contains("[x]") && lines[2].contains("(รถติด)"));
        assert!(lines[3].contains("เลือกแล้ว 1 คน"));
    }

    #[test]
    fn partial_save_reports_both_counts() {
        let outcome = SaveOutcome {
            succeeded: vec![1, 2, 3],
            failed: vec![
                SaveFailure { student_id: 4, error: "Sheet is locked".into() },
                SaveFailure { student_id: 5, error: "Sheet is locked".into() },
            ],
        };
        let text = save_outcome(&outcome);
        assert!(text.starts_with("✅ บันทึกสำเร็จ 3 คน"));
        assert!(text.contains("บันทึกไม่สำเร็จ 2 คน"));

        let failed = SaveOutcome { succeeded: vec![], failed: outcome.failed.clone() };
        assert!(save_outcome(&failed).starts_with("❌"));
    }
}
