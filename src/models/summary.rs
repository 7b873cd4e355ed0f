use serde::{Deserialize, Serialize};

use super::de;

/// Per-student late count, precomputed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateSummary {
    #[serde(deserialize_with = "de::id")]
    pub student_id: i64,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub student_code: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    pub class_room: String,
    #[serde(default, deserialize_with = "de::text")]
    pub first_name: String,
    #[serde(default, deserialize_with = "de::text")]
    pub last_name: String,
    #[serde(default, deserialize_with = "de::count")]
    pub total_late: u32,
}

impl LateSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
