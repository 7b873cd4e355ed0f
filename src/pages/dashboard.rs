use serde::Serialize;

use crate::api::AttendanceApi;
use crate::cache::{CacheSnapshot, LocalCache};
use crate::error::AppError;
use crate::models::{LateSummary, Student};
use crate::report::{classroom_late_count, group_by};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassroomCard {
    pub classroom: String,
    pub total_students: usize,
    pub late_count: u32,
}

/// One card per classroom in the roster, sorted by label
pub fn classroom_cards(students: &[Student], summary: &[LateSummary]) -> Vec<ClassroomCard> {
    group_by(students, |s| s.class_room.clone())
        .into_iter()
        .map(|(classroom, members)| ClassroomCard {
            late_count: classroom_late_count(summary, &classroom),
            total_students: members.len(),
            classroom,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DashboardPage {
    pub snapshot: CacheSnapshot,
}

impl DashboardPage {
    pub async fn load(
        cache: &mut LocalCache,
        api: &dyn AttendanceApi,
        refresh: bool,
    ) -> Result<Self, AppError> {
        let snapshot = if refresh {
            cache.refresh(api).await?
        } else {
            cache.load(api, false).await?
        };
        Ok(Self { snapshot })
    }

    pub fn cards(&self) -> Vec<ClassroomCard> {
        classroom_cards(&self.snapshot.students, &self.snapshot.summary)
    }
}
