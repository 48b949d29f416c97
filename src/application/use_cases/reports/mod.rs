pub mod attendance_report;
pub mod giving_report;
pub mod members_report;

/// Upper bound on rows fetched for an unpaginated report export.
pub(crate) const REPORT_ROW_LIMIT: i64 = 100_000;
