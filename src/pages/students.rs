use serde::Serialize;

use crate::api::AttendanceApi;
use crate::cache::LocalCache;
use crate::error::AppError;
use crate::models::{NewStudent, Student};
use crate::report::{paginate, search_students, PageWindow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentList {
    pub students: Vec<Student>,
    pub window: PageWindow,
}

/// Roster browsing over the cached student list
#[derive(Debug, Clone)]
pub struct StudentsPage {
    pub students: Vec<Student>,
}

impl StudentsPage {
    pub async fn load(cache: &mut LocalCache, api: &dyn AttendanceApi) -> Result<Self, AppError> {
        let snapshot = cache.load(api, false).await?;
        Ok(Self {
            students: snapshot.students,
        })
    }

    pub fn list(&self, class_room: Option<&str>, query: &str, page: usize, page_size: usize) -> StudentList {
        let scoped: Vec<Student> = match class_room {
            Some(class_room) => self
                .students
                .iter()
                .filter(|s| s.class_room == class_room)
                .cloned()
                .collect(),
            None => self.students.clone(),
        };

        let matched = search_students(&scoped, query);
        let window = paginate(matched.len(), page, page_size);
        StudentList {
            students: window.slice(&matched).iter().map(|s| (*s).clone()).collect(),
            window,
        }
    }
}

pub async fn get_student(api: &dyn AttendanceApi, student_id: i64) -> Result<Student, AppError> {
    api.student(student_id).await.into_result()
}

/// Validates, then submits. The cache is invalidated so the new student
/// shows up on the next roster read.
pub async fn add_student(
    cache: &mut LocalCache,
    api: &dyn AttendanceApi,
    student: &NewStudent,
) -> Result<(), AppError> {
    student.validate()?;
    api.add_student(student).await.into_result()?;
    tracing::info!("Added student {}", student.student_code);
    cache.invalidate();
    Ok(())
}
