//! Table presentation of decoded records.
//!
//! Builds a render-agnostic view model; UI layers draw it however they like,
//! and [`TableView::render_text`] gives a plain-text table for terminals.

use serde::{Deserialize, Serialize};

use crate::models::{PassFail, SessionRecord};

/// Column titles shown to users.
pub const TABLE_COLUMNS: [&str; 7] = [
    "Date",
    "Time",
    "Patient ID",
    "Patient Name",
    "Dialyzer ID",
    "Volume",
    "PRS",
];

/// Visual state of the pass/fail cell. Exactly two states exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PassFailBadge {
    Pass,
    Fail,
}

impl From<PassFail> for PassFailBadge {
    fn from(value: PassFail) -> Self {
        match value {
            PassFail::Pass => PassFailBadge::Pass,
            PassFail::Fail => PassFailBadge::Fail,
        }
    }
}

impl PassFailBadge {
    /// Text shown in the cell.
    pub fn symbol(self) -> &'static str {
        match self {
            PassFailBadge::Pass => "PASS",
            PassFailBadge::Fail => "FAIL",
        }
    }
}

/// One table row; cells hold display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableRow {
    /// Zero-based position in the source file
    pub index: usize,
    pub date: String,
    pub time: String,
    pub patient_id: String,
    pub patient_name: String,
    pub dialyzer_id: String,
    pub volume: String,
    pub badge: PassFailBadge,
}

impl TableRow {
    fn from_record(index: usize, record: &SessionRecord) -> Self {
        Self {
            index,
            date: record.date_string(),
            time: record.time_string(),
            patient_id: record.patient_id.clone(),
            patient_name: record.patient_name.clone(),
            dialyzer_id: record.dialyzer_id.clone(),
            volume: record.volume.to_string(),
            badge: record.pass_fail.into(),
        }
    }

    fn cells(&self) -> [&str; 7] {
        [
            self.date.as_str(),
            self.time.as_str(),
            self.patient_id.as_str(),
            self.patient_name.as_str(),
            self.dialyzer_id.as_str(),
            self.volume.as_str(),
            self.badge.symbol(),
        ]
    }
}

/// Table of records from one file, in file order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableView {
    /// Source file name, used as the table caption
    pub file_name: String,
    pub rows: Vec<TableRow>,
}

impl TableView {
    pub fn build(file_name: &str, records: &[SessionRecord]) -> Self {
        Self {
            file_name: file_name.to_string(),
            rows: records
                .iter()
                .enumerate()
                .map(|(index, record)| TableRow::from_record(index, record))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as an aligned plain-text table with a caption line.
    pub fn render_text(&self) -> String {
        let mut widths = TABLE_COLUMNS.map(|c| c.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let format_line = |cells: [&str; 7]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(widths)
                .map(|(cell, width)| {
                    let pad = width - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect();
            padded.join(" | ").trim_end().to_string()
        };

        let mut out = String::new();
        let noun = if self.rows.len() == 1 { "record" } else { "records" };
        out.push_str(&format!("{} ({} {})\n", self.file_name, self.rows.len(), noun));
        out.push_str(&format_line(TABLE_COLUMNS));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format_line(row.cells()));
            out.push('\n');
        }
        out
    }
}
