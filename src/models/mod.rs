pub mod de;
pub mod late_record;
pub mod student;
pub mod summary;

pub use late_record::{LateRecord, LateRecordFilter, NewLateRecord};
pub use student::{NewStudent, Student};
pub use summary::LateSummary;
