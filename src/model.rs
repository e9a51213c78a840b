// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the records shared by the tracker client, the report builder and the sheet writer
// role: model/types
// outputs: Tracker records (Project, Issue, RawLabelEvent), LabelEvent, TransitionResult, Cell, IssueRow, ReportTable
// invariants:
// - Timestamps are naive UTC instants (the tracker's trailing `Z` is stripped on parse)
// - Cell::Blank serializes as an empty string, never null
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::labels::StatusLabel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  pub id: String,
  /// Display name as reported by the tracker.
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
  /// Internal storage id.
  pub id: i64,
  /// Project-scoped number shown to users (`#123`).
  pub iid: i64,
}

/// A label event as received from the tracker, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLabelEvent {
  pub label_name: Option<String>,
  pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelEvent {
  pub label: StatusLabel,
  pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionResult {
  pub start: Option<NaiveDateTime>,
  pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Text(String),
  Number(f64),
  Integer(i64),
  Blank,
}

impl Cell {
  pub fn is_blank(&self) -> bool {
    matches!(self, Cell::Blank)
  }
}

impl Serialize for Cell {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Cell::Text(s) => serializer.serialize_str(s),
      Cell::Number(n) => serializer.serialize_f64(*n),
      Cell::Integer(i) => serializer.serialize_i64(*i),
      Cell::Blank => serializer.serialize_str(""),
    }
  }
}

/// One issue's report line: the iid followed by a (start, end, days) triple per transition.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueRow {
  pub issue_iid: i64,
  pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
  pub header: Vec<String>,
  pub rows: Vec<Vec<Cell>>,
}

impl ReportTable {
  /// Header plus rows, the rectangular block handed to the sheet.
  pub fn to_values(&self) -> Vec<Vec<Cell>> {
    let mut values = Vec::with_capacity(self.rows.len() + 1);
    values.push(self.header.iter().cloned().map(Cell::Text).collect());
    values.extend(self.rows.iter().cloned());

    values
  }
}
