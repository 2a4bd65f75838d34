//! CSV export in the device's legacy column layout.

use serde::{Deserialize, Serialize};

use super::{ExportError, ExportResult};
use crate::models::{PassFail, SessionDate, SessionRecord, SessionTime};

/// Header row, in column order.
pub const CSV_HEADER: &str = "date,time,patient_id,patient_name,dialyzer_id,volume,prs";

/// Column names, in order.
pub const CSV_COLUMNS: [&str; 7] = [
    "date",
    "time",
    "patient_id",
    "patient_name",
    "dialyzer_id",
    "volume",
    "prs",
];

/// Suffix appended to the input stem to name the exported file.
pub const CSV_FILE_SUFFIX: &str = "_converted.csv";

/// How text fields are written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    /// Fields written verbatim; a comma or newline in a name shifts columns.
    /// Byte-for-byte what existing consumers of converted files expect.
    #[default]
    Legacy,
    /// Fields containing `,`, `"`, CR or LF are quoted, quotes doubled.
    Minimal,
}

/// A rendered CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    /// Suggested output file name
    pub file_name: String,
    /// Document text
    pub contents: String,
}

impl CsvDocument {
    /// Render `records` for the log loaded from `source_name`.
    pub fn new(source_name: &str, records: &[SessionRecord], quoting: CsvQuoting) -> Self {
        Self {
            file_name: csv_file_name(source_name),
            contents: to_csv(records, quoting),
        }
    }
}

/// Render records as CSV: header first, rows joined with `\n`, no trailing
/// newline.
pub fn to_csv(records: &[SessionRecord], quoting: CsvQuoting) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(records.iter().map(|record| csv_row(record, quoting)));
    lines.join("\n")
}

fn csv_row(record: &SessionRecord, quoting: CsvQuoting) -> String {
    let text = |value: &str| match quoting {
        CsvQuoting::Legacy => value.to_string(),
        CsvQuoting::Minimal => escape_csv(value),
    };

    [
        record.date_string(),
        record.time_string(),
        text(&record.patient_id),
        text(&record.patient_name),
        text(&record.dialyzer_id),
        record.volume.to_string(),
        record.pass_fail.as_csv_flag().to_string(),
    ]
    .join(",")
}

/// Output file name for an input file: final extension dropped, suffix added.
///
/// `log.dat` → `log_converted.csv`, `a.b.c` → `a.b_converted.csv`,
/// `noext` → `noext_converted.csv`.
pub fn csv_file_name(input_name: &str) -> String {
    let stem = match input_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => stem,
        _ => input_name,
    };
    format!("{}{}", stem, CSV_FILE_SUFFIX)
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// One data row as it appears in the file.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    time: String,
    patient_id: String,
    patient_name: String,
    dialyzer_id: String,
    volume: i32,
    prs: String,
}

/// Read a CSV document written by [`to_csv`] back into records.
pub fn parse_csv(text: &str, quoting: CsvQuoting) -> ExportResult<Vec<SessionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .quoting(quoting == CsvQuoting::Minimal)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for column in CSV_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ExportError::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        let line = index + 2;
        let invalid = |column: &str, value: &str| ExportError::InvalidField {
            line,
            column: column.to_string(),
            value: value.to_string(),
        };

        records.push(SessionRecord {
            date: SessionDate::parse(&row.date).ok_or_else(|| invalid("date", &row.date))?,
            time: SessionTime::parse(&row.time).ok_or_else(|| invalid("time", &row.time))?,
            pass_fail: PassFail::from_csv_flag(&row.prs).ok_or_else(|| invalid("prs", &row.prs))?,
            patient_id: row.patient_id,
            patient_name: row.patient_name,
            dialyzer_id: row.dialyzer_id,
            volume: row.volume,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(name: &str) -> SessionRecord {
        SessionRecord {
            date: SessionDate::new(2024, 3, 5),
            time: SessionTime::new(9, 7),
            patient_id: "42".to_string(),
            patient_name: name.to_string(),
            dialyzer_id: "DZ-1".to_string(),
            volume: -250,
            pass_fail: PassFail::Pass,
        }
    }

    #[test]
    fn test_header_only_for_empty_batch() {
        assert_eq!(to_csv(&[], CsvQuoting::Legacy), CSV_HEADER);
        assert_eq!(CSV_COLUMNS.join(","), CSV_HEADER);
    }

    #[test]
    fn test_rows_joined_without_trailing_newline() {
        let csv = to_csv(&[make_record("Jane Doe"), make_record("John")], CsvQuoting::Legacy);
        assert_eq!(
            csv,
            "date,time,patient_id,patient_name,dialyzer_id,volume,prs\n\
             2024-03-05,09:07,42,Jane Doe,DZ-1,-250,true\n\
             2024-03-05,09:07,42,John,DZ-1,-250,true"
        );
    }

    #[test]
    fn test_legacy_mode_does_not_escape() {
        let csv = to_csv(&[make_record("Doe, Jane")], CsvQuoting::Legacy);
        assert!(csv.ends_with("42,Doe, Jane,DZ-1,-250,true"));
    }

    #[test]
    fn test_minimal_mode_escapes() {
        let csv = to_csv(&[make_record("Doe, \"JJ\"")], CsvQuoting::Minimal);
        assert!(csv.ends_with("42,\"Doe, \"\"JJ\"\"\",DZ-1,-250,true"));
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_csv_file_name() {
        assert_eq!(csv_file_name("log.dat"), "log_converted.csv");
        assert_eq!(csv_file_name("a.b.c"), "a.b_converted.csv");
        assert_eq!(csv_file_name("noext"), "noext_converted.csv");
        assert_eq!(csv_file_name("trailing."), "trailing._converted.csv");
    }

    #[test]
    fn test_parse_round_trip() {
        let records = vec![make_record("Jane Doe"), make_record("")];
        let parsed = parse_csv(&to_csv(&records, CsvQuoting::Legacy), CsvQuoting::Legacy).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_parse_missing_column() {
        let result = parse_csv("date,time\n2024-03-05,09:07", CsvQuoting::Legacy);
        assert!(matches!(result, Err(ExportError::MissingColumn(c)) if c == "patient_id"));
    }

    #[test]
    fn test_parse_invalid_flag() {
        let text = format!("{}\n2024-03-05,09:07,1,A,B,3,yes", CSV_HEADER);
        let result = parse_csv(&text, CsvQuoting::Legacy);
        assert!(matches!(
            result,
            Err(ExportError::InvalidField { line: 2, ref column, .. }) if column == "prs"
        ));
    }
}
