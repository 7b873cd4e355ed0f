use serde::Serialize;

use crate::api::AttendanceApi;
use crate::cache::LocalCache;
use crate::error::AppError;
use crate::models::{LateRecordFilter, LateSummary, Student};
use crate::report::format::{format_date_thai, format_time};
use crate::report::{
    classroom_totals, overview, rank, ranking_csv, unique_classrooms, ClassTotal, Overview, RankLimit,
    RankedStudent, RankingOptions,
};

#[derive(Debug, Clone)]
pub struct StatsPage {
    /// `None` means every classroom
    pub class_room: Option<String>,
    pub summary: Vec<LateSummary>,
    pub classrooms: Vec<String>,
}

impl StatsPage {
    /// Unfiltered stats read through the cache; a classroom filter goes to
    /// the backend directly while the classroom list still comes from the
    /// cache.
    pub async fn load(
        cache: &mut LocalCache,
        api: &dyn AttendanceApi,
        class_room: Option<&str>,
        refresh: bool,
    ) -> Result<Self, AppError> {
        let class_room = class_room.map(str::trim).filter(|c| !c.is_empty());

        let Some(class_room) = class_room else {
            let snapshot = if refresh {
                cache.refresh(api).await?
            } else {
                cache.load(api, false).await?
            };
            return Ok(Self {
                class_room: None,
                classrooms: unique_classrooms(&snapshot.students),
                summary: snapshot.summary,
            });
        };

        let (summary, snapshot) = tokio::join!(
            api.late_summary(Some(class_room), refresh),
            cache.load(api, false)
        );
        let summary = summary.into_result()?;
        let classrooms = match snapshot {
            Ok(snapshot) => unique_classrooms(&snapshot.students),
            Err(err) => {
                tracing::warn!("Classroom list unavailable: {}", err);
                Vec::new()
            }
        };

        Ok(Self {
            class_room: Some(class_room.to_string()),
            summary,
            classrooms,
        })
    }

    pub fn overview(&self) -> Overview {
        overview(&self.summary)
    }

    pub fn ranking(&self, options: &RankingOptions) -> Vec<RankedStudent> {
        rank(&self.summary, options)
    }

    pub fn chart(&self) -> Vec<ClassTotal> {
        classroom_totals(&self.summary)
    }

    /// Every student late at least once, most-late first
    pub fn export_csv(&self) -> String {
        ranking_csv(&self.ranking(&RankingOptions {
            threshold: 1,
            limit: RankLimit::All,
        }))
    }

    pub fn find(&self, student_id: i64) -> Option<&LateSummary> {
        self.summary.iter().find(|s| s.student_id == student_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub late_id: i64,
    /// Thai display date, or the raw cell when unparseable
    pub date: String,
    pub time: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentDetail {
    pub student: Student,
    pub total_late: usize,
    /// Newest first
    pub history: Vec<HistoryEntry>,
}

impl StudentDetail {
    pub async fn load(api: &dyn AttendanceApi, student_id: i64) -> Result<Self, AppError> {
        let filter = LateRecordFilter::for_student(student_id);
        let (student, records) = tokio::join!(api.student(student_id), api.late_records(&filter, true));

        let student = student.into_result()?;
        let mut records = records.into_result()?;
        // Backend filters already; keep only this student in case it did not
        records.retain(|r| r.student_id == student_id);
        records.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| b.late_time.cmp(&a.late_time)));

        let history = records
            .iter()
            .map(|r| HistoryEntry {
                late_id: r.late_id,
                date: r.date().map(format_date_thai).unwrap_or_else(|| r.late_date.clone()),
                time: format_time(&r.late_time),
                reason: r.reason.clone(),
            })
            .collect::<Vec<_>>();

        Ok(Self {
            student,
            total_late: history.len(),
            history,
        })
    }
}
