pub mod auth;
pub mod cache;
pub mod check_late;
pub mod dashboard;
pub mod stats;
pub mod students;
