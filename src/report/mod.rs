//! Pure transforms from fetched records to view-ready structures.
//!
//! Nothing here performs I/O; the `render` module binds these results to
//! terminal output.

pub mod debounce;
pub mod export;
pub mod format;
pub mod group;
pub mod paginate;
pub mod ranking;
pub mod search;
pub mod today;
pub mod totals;

pub use debounce::Debouncer;
pub use export::{export_file_name, ranking_csv, CSV_HEADER};
pub use group::{group_by, unique_classrooms};
pub use paginate::{paginate, PageWindow};
pub use ranking::{rank, RankLimit, RankedStudent, RankingOptions};
pub use search::{matches_query, search_students};
pub use today::{late_records_for_class, late_student_ids};
pub use totals::{classroom_late_count, classroom_totals, overview, ClassTotal, Overview};
