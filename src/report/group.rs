use std::collections::BTreeMap;

use crate::models::Student;

/// Partition `items` by `key`. Groups keep the input order of their items.
pub fn group_by<'a, T, K, F>(items: &'a [T], key: F) -> BTreeMap<K, Vec<&'a T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

/// Sorted, de-duplicated classroom labels
pub fn unique_classrooms(students: &[Student]) -> Vec<String> {
    group_by(students, |s| s.class_room.clone()).into_keys().collect()
}
