// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build per-issue transition rows and assemble them per project into the final report table
// role: core/report
// inputs: IssueTracker collaborator, configured projects, ReportWindow
// outputs: IssueRow per issue with data; ReportTable with header and project-prefixed rows
// side_effects: Tracker calls (blocking); progress logging every PROGRESS_INTERVAL issues
// invariants:
// - One (start, end, days) triple per LABEL_TRANSITIONS entry, in declaration order
// - A triple is fully blank unless both start and end survived the window filter
// - Rows whose triples are all blank are never emitted
// - Projects in config order; issues in tracker arrival order
// errors: Tracker and timestamp errors propagate and abort the whole report
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::ProjectRef;
use crate::events::normalize_events;
use crate::gitlab::IssueTracker;
use crate::labels::LABEL_TRANSITIONS;
use crate::model::{Cell, Issue, IssueRow, Project, RawLabelEvent, ReportTable, TransitionResult};
use crate::transition::detect_transition;
use crate::util::{elapsed_days, format_for_sheet};
use crate::window::ReportWindow;

pub const PROGRESS_INTERVAL: usize = 100;

/// Column names, in the same order the rows are built.
pub fn report_header() -> Vec<String> {
  let mut header = vec!["Project".to_string(), "Issue #".to_string()];

  for spec in LABEL_TRANSITIONS {
    header.push(spec.starting.display_name().to_string());
    header.push(spec.final_label.display_name().to_string());
    header.push("Elapsed days".to_string());
  }

  header
}

fn transition_cells(result: TransitionResult) -> [Cell; 3] {
  match (result.start, result.end) {
    (Some(start), Some(end)) => [
      Cell::Text(format_for_sheet(start)),
      Cell::Text(format_for_sheet(end)),
      Cell::Number(elapsed_days(start, end)),
    ],
    _ => [Cell::Blank, Cell::Blank, Cell::Blank],
  }
}

/// Turn one issue's raw label events into a report row, or `None` when no transition has data.
pub fn issue_row_from_events(
  issue_iid: i64,
  raw_events: &[RawLabelEvent],
  window: &ReportWindow,
) -> Result<Option<IssueRow>> {
  let events = normalize_events(raw_events).with_context(|| format!("issue #{issue_iid}"))?;

  let mut cells = Vec::with_capacity(LABEL_TRANSITIONS.len() * 3);
  for spec in LABEL_TRANSITIONS {
    let result = detect_transition(&events, spec).within(window);
    cells.extend(transition_cells(result));
  }

  if cells.iter().all(Cell::is_blank) {
    return Ok(None);
  }

  Ok(Some(IssueRow { issue_iid, cells }))
}

pub fn build_issue_row(
  tracker: &dyn IssueTracker,
  project: &Project,
  issue: &Issue,
  window: &ReportWindow,
) -> Result<Option<IssueRow>> {
  debug!(issue_id = issue.id, iid = issue.iid, "fetching label events");
  let raw_events = tracker.list_label_events(&project.id, issue.iid)?;
  issue_row_from_events(issue.iid, &raw_events, window)
}

/// True for every non-zero multiple of `PROGRESS_INTERVAL`.
fn is_progress_tick(treated: usize) -> bool {
  treated > 0 && treated % PROGRESS_INTERVAL == 0
}

/// Rows for every issue of `project` that has at least one in-window transition.
pub fn build_project_rows(tracker: &dyn IssueTracker, project: &Project, window: &ReportWindow) -> Result<Vec<IssueRow>> {
  let issues = tracker.list_issues(&project.id)?;
  let mut rows = Vec::new();

  for (idx, issue) in issues.iter().enumerate() {
    if is_progress_tick(idx) {
      info!(project = %project.name, "Treated {} issues", idx);
    }

    if let Some(row) = build_issue_row(tracker, project, issue, window)? {
      rows.push(row);
    }
  }

  Ok(rows)
}

/// Walk all configured projects and build the complete table. Nothing is written here.
pub fn assemble_report(tracker: &dyn IssueTracker, projects: &[ProjectRef], window: &ReportWindow) -> Result<ReportTable> {
  let mut table = ReportTable {
    header: report_header(),
    rows: Vec::new(),
  };

  for project_ref in projects {
    info!("Looking at {}", project_ref.key);
    let project = tracker
      .get_project(&project_ref.id)
      .with_context(|| format!("loading project '{}'", project_ref.key))?;

    let issue_rows = build_project_rows(tracker, &project, window)
      .with_context(|| format!("building rows for project '{}'", project.name))?;

    info!(project = %project.name, rows = issue_rows.len(), "project done");

    for issue_row in issue_rows {
      let mut row = Vec::with_capacity(issue_row.cells.len() + 2);
      row.push(Cell::Text(project.name.clone()));
      row.push(Cell::Integer(issue_row.issue_iid));
      row.extend(issue_row.cells);
      table.rows.push(row);
    }
  }

  Ok(table)
}
