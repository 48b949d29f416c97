pub mod csv_import;
pub mod reports;
pub mod statements;
