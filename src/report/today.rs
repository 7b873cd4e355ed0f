use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::models::{LateRecord, Student};

/// Records dated `date` whose student is in `roster` and in `class_room`.
/// Records for students missing from the roster are dropped.
pub fn late_records_for_class<'a>(
    records: &'a [LateRecord],
    roster: &[Student],
    class_room: &str,
    date: NaiveDate,
) -> Vec<&'a LateRecord> {
    let by_id: HashMap<i64, &Student> = roster.iter().map(|s| (s.student_id, s)).collect();

    records
        .iter()
        .filter(|r| r.is_on(date))
        .filter(|r| {
            by_id
                .get(&r.student_id)
                .map_or(false, |s| s.class_room == class_room)
        })
        .collect()
}

/// Students who already have a record in `records`; they are locked in the
/// check-late list.
pub fn late_student_ids<'a>(records: impl IntoIterator<Item = &'a LateRecord>) -> HashSet<i64> {
    records.into_iter().map(|r| r.student_id).collect()
}
