pub mod import_contributions;
pub mod import_members;

use crate::application::services::csv_import::{ImportFileError, RowError};

/// Shared outcome for both CSV imports. Parsing/validation happens before
/// anything is written; valid rows commit in one transaction.
pub enum ImportOutcome {
    /// Rows were committed. `errors` is non-empty only for `partial=true`.
    Committed {
        imported: u64,
        total_rows: usize,
        errors: Vec<RowError>,
    },
    /// `partial=false` and at least one row failed; nothing was committed.
    Rejected {
        total_rows: usize,
        errors: Vec<RowError>,
    },
    /// The plan's member cap would be exceeded.
    CapExceeded { cap: i64 },
    /// The file itself was unusable (size, row count, missing columns).
    FileError(ImportFileError),
}
