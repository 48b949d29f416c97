//! CSV bulk-import parsing and validation.
//!
//! Files are fully parsed and validated before anything touches the
//! database; valid rows are then inserted in one transaction by the import
//! repository. Row errors carry 1-based data-row numbers (header excluded).

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::application::ports::import_repository::MemberInsert;
use crate::domain::giving::GivingMethod;
use crate::domain::members::ParticipationStatus;

pub const MAX_IMPORT_BYTES: usize = 1024 * 1024;
pub const MAX_IMPORT_ROWS: usize = 10_000;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RowError {
    /// 1-based data row number (the header row is not counted).
    pub row: usize,
    pub message: String,
}

/// File-level failures that abort the import before validation.
#[derive(Debug, thiserror::Error)]
pub enum ImportFileError {
    #[error("file exceeds {MAX_IMPORT_BYTES} bytes")]
    TooLarge,
    #[error("file exceeds {MAX_IMPORT_ROWS} data rows")]
    TooManyRows,
    #[error("missing required columns: {0}")]
    MissingColumns(String),
    #[error("malformed CSV header: {0}")]
    Malformed(String),
}

#[derive(Debug)]
pub struct ParsedImport<T> {
    pub rows: Vec<T>,
    pub errors: Vec<RowError>,
    /// Total data rows seen, valid or not.
    pub total_rows: usize,
}

/// A validated contribution row; the member is still identified by email and
/// resolved against the tenant's roster by the use case.
#[derive(Debug, Clone)]
pub struct ContributionCsvRow {
    /// 1-based data row number, kept so later resolution failures (unknown
    /// member email) can still point at the offending row.
    pub row: usize,
    pub member_email: String,
    pub fund: String,
    pub amount: Decimal,
    pub received_on: NaiveDate,
    pub method: GivingMethod,
    pub note: Option<String>,
}

struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, required: &[&str]) -> Result<Self, ImportFileError> {
        let mut index = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.insert(h.trim().to_ascii_lowercase(), i);
        }
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !index.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            return Err(ImportFileError::MissingColumns(missing.join(", ")));
        }
        Ok(Columns { index })
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        self.index
            .get(name)
            .and_then(|i| record.get(*i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn reader(bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes)
}

fn check_size(bytes: &[u8]) -> Result<(), ImportFileError> {
    if bytes.len() > MAX_IMPORT_BYTES {
        return Err(ImportFileError::TooLarge);
    }
    Ok(())
}

/// Parses a member roster CSV. Required columns: `first_name`, `last_name`.
/// Optional: `email`, `phone`, `birthdate` (YYYY-MM-DD), `status`,
/// `household`.
pub fn parse_members(bytes: &[u8]) -> Result<ParsedImport<MemberInsert>, ImportFileError> {
    check_size(bytes)?;
    let mut rdr = reader(bytes);
    let headers = rdr
        .headers()
        .map_err(|e| ImportFileError::Malformed(e.to_string()))?
        .clone();
    let cols = Columns::from_headers(&headers, &["first_name", "last_name"])?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut total = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let row_no = i + 1;
        total += 1;
        if total > MAX_IMPORT_ROWS {
            return Err(ImportFileError::TooManyRows);
        }
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(RowError {
                    row: row_no,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let first_name = cols.get(&record, "first_name");
        let last_name = cols.get(&record, "last_name");
        let (first_name, last_name) = match (first_name, last_name) {
            (Some(f), Some(l)) => (f.to_string(), l.to_string()),
            _ => {
                errors.push(RowError {
                    row: row_no,
                    message: "first_name and last_name are required".into(),
                });
                continue;
            }
        };

        let email = cols.get(&record, "email").map(|s| s.to_ascii_lowercase());
        if let Some(e) = email.as_deref() {
            if !EMAIL_RE.is_match(e) {
                errors.push(RowError {
                    row: row_no,
                    message: format!("invalid email: {e}"),
                });
                continue;
            }
        }

        let birthdate = match cols.get(&record, "birthdate") {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push(RowError {
                        row: row_no,
                        message: format!("invalid birthdate (expected YYYY-MM-DD): {raw}"),
                    });
                    continue;
                }
            },
            None => None,
        };

        let participation_status = match cols.get(&record, "status") {
            Some(raw) => match ParticipationStatus::parse(&raw.to_ascii_lowercase()) {
                Some(s) => s,
                None => {
                    errors.push(RowError {
                        row: row_no,
                        message: format!("unknown status: {raw}"),
                    });
                    continue;
                }
            },
            None => ParticipationStatus::Active,
        };

        rows.push(MemberInsert {
            first_name,
            last_name,
            email,
            phone: cols.get(&record, "phone").map(str::to_string),
            birthdate,
            participation_status,
            household_name: cols.get(&record, "household").map(str::to_string),
        });
    }

    Ok(ParsedImport {
        rows,
        errors,
        total_rows: total,
    })
}

/// Parses a contribution CSV. Required columns: `member_email`, `fund`,
/// `amount`, `received_on`. Optional: `method`, `note`.
pub fn parse_contributions(
    bytes: &[u8],
) -> Result<ParsedImport<ContributionCsvRow>, ImportFileError> {
    check_size(bytes)?;
    let mut rdr = reader(bytes);
    let headers = rdr
        .headers()
        .map_err(|e| ImportFileError::Malformed(e.to_string()))?
        .clone();
    let cols = Columns::from_headers(&headers, &["member_email", "fund", "amount", "received_on"])?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut total = 0usize;
    for (i, record) in rdr.records().enumerate() {
        let row_no = i + 1;
        total += 1;
        if total > MAX_IMPORT_ROWS {
            return Err(ImportFileError::TooManyRows);
        }
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                errors.push(RowError {
                    row: row_no,
                    message: format!("unreadable row: {e}"),
                });
                continue;
            }
        };

        let member_email = match cols.get(&record, "member_email") {
            Some(e) if EMAIL_RE.is_match(e) => e.to_ascii_lowercase(),
            Some(e) => {
                errors.push(RowError {
                    row: row_no,
                    message: format!("invalid member_email: {e}"),
                });
                continue;
            }
            None => {
                errors.push(RowError {
                    row: row_no,
                    message: "member_email is required".into(),
                });
                continue;
            }
        };

        let fund = match cols.get(&record, "fund") {
            Some(f) => f.to_string(),
            None => {
                errors.push(RowError {
                    row: row_no,
                    message: "fund is required".into(),
                });
                continue;
            }
        };

        let amount = match cols.get(&record, "amount").map(Decimal::from_str) {
            Some(Ok(a)) if a > Decimal::ZERO => a.round_dp(2),
            Some(Ok(_)) => {
                errors.push(RowError {
                    row: row_no,
                    message: "amount must be positive".into(),
                });
                continue;
            }
            Some(Err(_)) | None => {
                errors.push(RowError {
                    row: row_no,
                    message: "amount is required and must be a number".into(),
                });
                continue;
            }
        };

        let received_on = match cols.get(&record, "received_on") {
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => d,
                Err(_) => {
                    errors.push(RowError {
                        row: row_no,
                        message: format!("invalid received_on (expected YYYY-MM-DD): {raw}"),
                    });
                    continue;
                }
            },
            None => {
                errors.push(RowError {
                    row: row_no,
                    message: "received_on is required".into(),
                });
                continue;
            }
        };

        let method = match cols.get(&record, "method") {
            Some(raw) => match GivingMethod::parse(&raw.to_ascii_lowercase()) {
                Some(m) => m,
                None => {
                    errors.push(RowError {
                        row: row_no,
                        message: format!("unknown method: {raw}"),
                    });
                    continue;
                }
            },
            None => GivingMethod::Other,
        };

        rows.push(ContributionCsvRow {
            row: row_no,
            member_email,
            fund,
            amount,
            received_on,
            method,
            note: cols.get(&record, "note").map(str::to_string),
        });
    }

    Ok(ParsedImport {
        rows,
        errors,
        total_rows: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_members_with_optional_columns() {
        let csv = b"first_name,last_name,email,status,household\n\
            Ann,Smith,ann@example.com,active,Smith Family\n\
            Bob,Jones,,,\n";
        let parsed = parse_members(csv).unwrap();
        assert_eq!(parsed.total_rows, 2);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].household_name.as_deref(), Some("Smith Family"));
        assert_eq!(parsed.rows[1].email, None);
        assert_eq!(
            parsed.rows[1].participation_status,
            ParticipationStatus::Active
        );
    }

    #[test]
    fn missing_required_columns_is_a_file_error() {
        let csv = b"first,last\nAnn,Smith\n";
        match parse_members(csv) {
            Err(ImportFileError::MissingColumns(cols)) => {
                assert!(cols.contains("first_name"));
                assert!(cols.contains("last_name"));
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn row_errors_are_one_based_and_skip_the_header() {
        let csv = b"first_name,last_name,birthdate\n\
            Ann,Smith,1980-05-01\n\
            Bob,,\n\
            Cara,Lee,05/01/1980\n";
        let parsed = parse_members(csv).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].row, 2);
        assert_eq!(parsed.errors[1].row, 3);
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let csv = b"First_Name,LAST_NAME\nAnn,Smith\n";
        let parsed = parse_members(csv).unwrap();
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn parses_contributions_and_rounds_amounts() {
        let csv = b"member_email,fund,amount,received_on,method\n\
            ann@example.com,General Fund,125.005,2024-03-10,check\n";
        let parsed = parse_contributions(csv).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.amount, dec!(125.00));
        assert_eq!(row.method, GivingMethod::Check);
        assert_eq!(row.member_email, "ann@example.com");
    }

    #[test]
    fn rejects_nonpositive_amounts() {
        let csv = b"member_email,fund,amount,received_on\n\
            ann@example.com,General,0,2024-03-10\n\
            ann@example.com,General,-5,2024-03-11\n";
        let parsed = parse_contributions(csv).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 2);
        assert!(parsed.errors[0].message.contains("positive"));
    }

    #[test]
    fn oversized_files_are_rejected() {
        let big = vec![b'a'; MAX_IMPORT_BYTES + 1];
        assert!(matches!(
            parse_members(&big),
            Err(ImportFileError::TooLarge)
        ));
    }
}
