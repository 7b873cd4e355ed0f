use serde::{Deserialize, Serialize};

use super::de;
use crate::error::AppError;

/// A student as returned by the `students` and `student` paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(deserialize_with = "de::id")]
    pub student_id: i64,
    #[serde(default, deserialize_with = "de::text")]
    pub student_code: String,
    #[serde(default, deserialize_with = "de::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub class_room: String,
    #[serde(default, deserialize_with = "de::text")]
    pub grade_level: String,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for the `add-student` path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStudent {
    pub student_code: String,
    pub first_name: String,
    pub last_name: String,
    pub class_room: Option<String>,
    pub grade_level: Option<String>,
}

impl NewStudent {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("student_code", &self.student_code),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::validation(field, format!("กรุณาระบุ {}", field)));
            }
        }
        Ok(())
    }
}
