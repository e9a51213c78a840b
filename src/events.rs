// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Normalize raw tracker label events into a time-ordered sequence of recognized status labels
// role: core/normalize
// inputs: RawLabelEvent records in any order
// outputs: Vec<LabelEvent> sorted ascending by timestamp
// invariants:
// - Events with a null or unrecognized label are dropped before their timestamp is read
// - A malformed timestamp on a kept event is an error, never skipped
// - Sorting is stable: equal timestamps keep arrival order
// errors: ReportError::MalformedTimestamp
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDateTime;

use crate::error::ReportError;
use crate::labels::StatusLabel;
use crate::model::{LabelEvent, RawLabelEvent};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a tracker timestamp such as `2022-02-02T13:39:28.926Z` into a naive UTC instant.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ReportError> {
  NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), TIMESTAMP_FORMAT).map_err(|source| {
    ReportError::MalformedTimestamp {
      raw: raw.to_string(),
      source,
    }
  })
}

pub fn normalize_events(raw_events: &[RawLabelEvent]) -> Result<Vec<LabelEvent>, ReportError> {
  let mut events = Vec::with_capacity(raw_events.len());

  for raw in raw_events {
    let Some(label) = raw.label_name.as_deref().and_then(StatusLabel::from_name) else {
      continue;
    };

    events.push(LabelEvent {
      label,
      timestamp: parse_timestamp(&raw.created_at)?,
    });
  }

  events.sort_by_key(|e| e.timestamp);

  Ok(events)
}
