use serde::Serialize;

use super::group::group_by;
use crate::models::LateSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTotal {
    pub classroom: String,
    pub total: u32,
    /// Bar width as a percentage of the largest classroom total
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_late: u32,
    /// Students with at least one late record
    pub late_students: usize,
    /// Late count per late student, one decimal
    pub average_late: f64,
    pub top_class: Option<String>,
    pub top_class_count: u32,
}

fn sum_late<'a>(rows: impl IntoIterator<Item = &'a LateSummary>) -> u32 {
    rows.into_iter().map(|s| s.total_late).sum()
}

/// Summed late count of one classroom
pub fn classroom_late_count(summaries: &[LateSummary], classroom: &str) -> u32 {
    sum_late(summaries.iter().filter(|s| s.class_room == classroom))
}

/// Per-classroom totals, largest first, scaled for a bar chart
pub fn classroom_totals(summaries: &[LateSummary]) -> Vec<ClassTotal> {
    let mut totals: Vec<(String, u32)> = group_by(summaries, |s| s.class_room.clone())
        .into_iter()
        .map(|(classroom, rows)| (classroom, sum_late(rows)))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let max = totals.iter().map(|(_, t)| *t).max().unwrap_or(0).max(1);

    totals
        .into_iter()
        .map(|(classroom, total)| ClassTotal {
            classroom,
            total,
            width_pct: f64::from(total) / f64::from(max) * 100.0,
        })
        .collect()
}

pub fn overview(summaries: &[LateSummary]) -> Overview {
    let total_late = sum_late(summaries);
    let late_students = summaries.iter().filter(|s| s.total_late > 0).count();
    let average_late = if late_students > 0 {
        (f64::from(total_late) / late_students as f64 * 10.0).round() / 10.0
    } else {
        0.0
    };

    let mut top_class = None;
    let mut top_class_count = 0;
    for (classroom, rows) in group_by(summaries, |s| s.class_room.clone()) {
        let total = sum_late(rows);
        if total > top_class_count {
            top_class_count = total;
            top_class = Some(classroom);
        }
    }

    Overview {
        total_late,
        late_students,
        average_late,
        top_class,
        top_class_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::summary;

    #[test]
    fn totals_sorted_and_scaled_to_max() {
        let rows = vec![
            summary(1, "4/1", 2),
            summary(2, "4/2", 5),
            summary(3, "4/2", 3),
            summary(4, "4/3", 0),
        ];
        let totals = classroom_totals(&rows);

        let labels: Vec<&str> = totals.iter().map(|t| t.classroom.as_str()).collect();
        assert_eq!(labels, vec!["4/2", "4/1", "4/3"]);
        assert_eq!(totals[0].total, 8);
        assert_eq!(totals[0].width_pct, 100.0);
        assert_eq!(totals[1].width_pct, 25.0);
        assert_eq!(totals[2].width_pct, 0.0);
    }

    #[test]
    fn all_zero_totals_do_not_divide_by_zero() {
        let totals = classroom_totals(&[summary(1, "4/1", 0), summary(2, "4/2", 0)]);
        assert!(totals.iter().all(|t| t.width_pct == 0.0));
        assert!(classroom_totals(&[]).is_empty());
    }

    #[test]
    fn overview_counts_and_top_class() {
        let rows = vec![
            summary(1, "4/1", 4),
            summary(2, "4/2", 3),
            summary(3, "4/2", 0),
            summary(4, "4/3", 2),
            summary(5, "4/2", 1),
        ];
        let o = overview(&rows);
        assert_eq!(o.total_late, 10);
        assert_eq!(o.late_students, 4);
        assert_eq!(o.average_late, 2.5);
        // 4/1 and 4/2 both have 4; the first in classroom order wins
        assert_eq!(o.top_class.as_deref(), Some("4/1"));
        assert_eq!(o.top_class_count, 4);
        assert_eq!(classroom_late_count(&rows, "4/2"), 4);
    }

    #[test]
    fn empty_overview() {
        let o = overview(&[summary(1, "4/1", 0)]);
        assert_eq!(o.total_late, 0);
        assert_eq!(o.average_late, 0.0);
        assert_eq!(o.top_class, None);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let o = overview(&[summary(1, "4/1", 1), summary(2, "4/1", 1), summary(3, "4/1", 2)]);
        assert_eq!(o.average_late, 1.3);
    }
}
