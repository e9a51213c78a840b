// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Detect when an issue moved from one status label to another
// role: core/detect
// inputs: LabelEvent slice sorted ascending; one TransitionSpec
// outputs: TransitionResult with independently optional start/end
// invariants:
// - end is the first occurrence of the final label; the scan stops there
// - start is the latest starting-label occurrence seen before the scan stopped
// - events after the first final label never influence the result
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::labels::TransitionSpec;
use crate::model::{LabelEvent, TransitionResult};

/// Single pass over `events`; terminates early on the first `spec.final_label`.
///
/// Every `spec.starting` occurrence overwrites the start candidate, so the
/// result captures the last time work re-entered the starting state before
/// moving on. Without a final label the start is the latest one overall.
pub fn detect_transition(events: &[LabelEvent], spec: TransitionSpec) -> TransitionResult {
  let mut start = None;

  for event in events {
    if event.label == spec.final_label {
      return TransitionResult {
        start,
        end: Some(event.timestamp),
      };
    }

    if event.label == spec.starting {
      start = Some(event.timestamp);
    }
  }

  TransitionResult { start, end: None }
}
