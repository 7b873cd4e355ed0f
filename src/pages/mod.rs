//! Page controllers. Each page owns its state explicitly and hands it to
//! the pure `report` transforms; nothing here prints.

pub mod check_late;
pub mod dashboard;
pub mod stats;
pub mod students;

pub use check_late::{CheckLatePage, CheckLateState, Draft, RosterView, SaveOutcome};
pub use dashboard::{classroom_cards, ClassroomCard, DashboardPage};
pub use stats::{StatsPage, StudentDetail};
pub use students::{StudentList, StudentsPage};
