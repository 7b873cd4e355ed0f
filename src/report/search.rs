use crate::models::Student;

/// Case-insensitive substring match on code, first name or last name
pub fn matches_query(student: &Student, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    [&student.student_code, &student.first_name, &student.last_name]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
}

pub fn search_students<'a>(students: &'a [Student], query: &str) -> Vec<&'a Student> {
    students.iter().filter(|s| matches_query(s, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::student;

    #[test]
    fn matches_any_field_ignoring_case() {
        let s = student(1, "4/2", "Somchai", "Jaidee");
        assert!(matches_query(&s, "so"));
        assert!(matches_query(&s, "SOM"));
        assert!(matches_query(&s, "dee"));
        assert!(matches_query(&s, "10001"));
        assert!(!matches_query(&s, "malee"));
    }

    #[test]
    fn empty_query_keeps_everyone() {
        let students = vec![student(1, "4/2", "A", "B"), student(2, "4/2", "C", "D")];
        assert_eq!(search_students(&students, "  ").len(), 2);
    }

    #[test]
    fn thai_names_match() {
        let students = vec![student(1, "4/2", "สมชาย", "ใจดี"), student(2, "4/2", "มาลี", "สุขใจ")];
        let found = search_students(&students, "ใจ");
        assert_eq!(found.len(), 2);
        let found = search_students(&students, "มาลี");
        assert_eq!(found[0].student_id, 2);
    }
}
