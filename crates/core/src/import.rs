//! Parsing for the federation's player master-data CSV.
//!
//! Expected header:
//!
//! ```text
//! player_name,jdl_id,participation_count,current_class,last_updated
//! ```
//!
//! Rows are parsed and validated independently; a bad row yields an
//! [`ImportError`] carrying its line number (the header is line 1) and never
//! aborts the remaining rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::class::PlayerClass;
use crate::error::CoreError;
use crate::types::Timestamp;
use crate::validation::{is_valid_external_id, MAX_NAME_LEN};

/// Columns every master file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "player_name",
    "jdl_id",
    "participation_count",
    "current_class",
    "last_updated",
];

#[derive(Debug, Deserialize)]
struct RawRow {
    player_name: String,
    jdl_id: String,
    participation_count: String,
    current_class: String,
    last_updated: String,
}

/// One validated master-data row.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterRecord {
    pub line: u64,
    pub name: String,
    pub external_id: String,
    pub participation_count: i32,
    pub current_class: PlayerClass,
    pub last_updated: Timestamp,
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    pub line: u64,
    pub message: String,
}

/// Rows split into importable records and per-line errors.
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub records: Vec<MasterRecord>,
    pub errors: Vec<ImportError>,
}

/// Outcome of applying a master file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub updated: u64,
    pub skipped: u64,
    pub errors: Vec<ImportError>,
}

/// Parse a master-data CSV document.
///
/// Fails as a whole only when the header is unreadable or lacks a required
/// column.
pub fn parse_master_csv(input: &str) -> Result<ParsedImport, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CoreError::Validation(format!("Unreadable CSV header: {e}")))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut parsed = ParsedImport::default();
    for (idx, result) in reader.records().enumerate() {
        let fallback_line = idx as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map_or(fallback_line, |p| p.line());
                parsed.errors.push(ImportError {
                    line,
                    message: format!("Malformed row: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map_or(fallback_line, |p| p.line());

        let row = match record.deserialize::<RawRow>(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                parsed.errors.push(ImportError {
                    line,
                    message: format!("Malformed row: {e}"),
                });
                continue;
            }
        };

        match validate_row(row, line) {
            Ok(rec) => parsed.records.push(rec),
            Err(message) => parsed.errors.push(ImportError { line, message }),
        }
    }

    Ok(parsed)
}

fn validate_row(row: RawRow, line: u64) -> Result<MasterRecord, String> {
    if row.player_name.is_empty() {
        return Err("player_name is required".into());
    }
    if row.player_name.chars().count() > MAX_NAME_LEN {
        return Err(format!("player_name must be at most {MAX_NAME_LEN} characters"));
    }
    if !is_valid_external_id(&row.jdl_id) {
        return Err(format!("Invalid jdl_id '{}'", row.jdl_id));
    }
    let participation_count = row
        .participation_count
        .parse::<i32>()
        .ok()
        .filter(|c| *c >= 0)
        .ok_or_else(|| {
            format!(
                "participation_count must be a non-negative integer, got '{}'",
                row.participation_count
            )
        })?;
    let current_class = row.current_class.parse::<PlayerClass>()?;
    let last_updated = parse_timestamp(&row.last_updated).ok_or_else(|| {
        format!(
            "last_updated must be an ISO 8601 timestamp, got '{}'",
            row.last_updated
        )
    })?;

    Ok(MasterRecord {
        line,
        name: row.player_name,
        external_id: row.jdl_id,
        participation_count,
        current_class,
        last_updated,
    })
}

/// Parse RFC 3339, or a zone-less ISO 8601 timestamp taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Whether a master record should overwrite a player last synced at
/// `last_synced_at`. Only strictly newer master data wins.
pub fn is_newer_than(record: &MasterRecord, last_synced_at: Option<Timestamp>) -> bool {
    last_synced_at.map_or(true, |synced| record.last_updated > synced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    const HEADER: &str = "player_name,jdl_id,participation_count,current_class,last_updated\n";

    #[test]
    fn parses_valid_rows() {
        let input = format!(
            "{HEADER}Sora Tanaka,JDL000101,12,B,2026-05-01T10:00:00Z\n\
             Ren Sato,JDL000102,0,E,2026-05-02 08:30:00\n"
        );
        let parsed = parse_master_csv(&input).unwrap();
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        assert_eq!(parsed.records.len(), 2);

        let first = &parsed.records[0];
        assert_eq!(first.line, 2);
        assert_eq!(first.external_id, "JDL000101");
        assert_eq!(first.current_class, PlayerClass::B);
        assert_eq!(
            first.last_updated,
            Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(parsed.records[1].line, 3);
    }

    #[test]
    fn bad_rows_are_reported_with_line_numbers() {
        let input = format!(
            "{HEADER}Good,JDL000101,1,A,2026-05-01T10:00:00Z\n\
             Bad Id,XYZ,1,A,2026-05-01T10:00:00Z\n\
             Bad Class,JDL000103,1,Z,2026-05-01T10:00:00Z\n\
             Bad Count,JDL000104,-1,A,2026-05-01T10:00:00Z\n\
             Bad Date,JDL000105,1,A,yesterday\n"
        );
        let parsed = parse_master_csv(&input).unwrap();
        assert_eq!(parsed.records.len(), 1);
        let lines: Vec<u64> = parsed.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 5, 6]);
        assert!(parsed.errors[0].message.contains("jdl_id"));
    }

    #[test]
    fn short_row_is_malformed() {
        let input = format!("{HEADER}Only Name,JDL000101\n");
        let parsed = parse_master_csv(&input).unwrap();
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line, 2);
    }

    #[test]
    fn missing_column_fails_whole_file() {
        let input = "player_name,jdl_id\nA,JDL000001\n";
        assert_matches!(
            parse_master_csv(input),
            Err(CoreError::Validation(msg)) if msg.contains("participation_count")
        );
    }

    #[test]
    fn only_strictly_newer_records_apply() {
        let record = MasterRecord {
            line: 2,
            name: "P".into(),
            external_id: "JDL000001".into(),
            participation_count: 1,
            current_class: PlayerClass::C,
            last_updated: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
        };
        assert!(is_newer_than(&record, None));
        assert!(!is_newer_than(&record, Some(record.last_updated)));
        assert!(is_newer_than(
            &record,
            Some(record.last_updated - chrono::Duration::seconds(1))
        ));
    }
}
