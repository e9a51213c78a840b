// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one label-report run: assemble the full table, then write it to the sheet once
// role: processing/orchestrator
// inputs: EffectiveConfig (window, tab), AppConfig, IssueTracker and SheetsApi collaborators
// outputs: One bulk write to the configured spreadsheet tab
// side_effects: Tracker HTTP reads; one sheet write (plus tab creation when missing)
// invariants:
// - Nothing is written unless every project was processed successfully
// - The spreadsheet id is resolved before any tracker call
// errors: Propagates config, tracker, timestamp and sheet errors with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::EffectiveConfig;
use crate::config::AppConfig;
use crate::gitlab::IssueTracker;
use crate::report::assemble_report;
use crate::sheets::{spreadsheet_id_from_url, write_table, SheetsApi};

pub fn run_label_report(
  cfg: &EffectiveConfig,
  app: &AppConfig,
  tracker: &dyn IssueTracker,
  sheets: &dyn SheetsApi,
) -> Result<()> {
  // Phase 1: resolve the destination up front so a bad URL fails before any fetching
  let spreadsheet_id = spreadsheet_id_from_url(&app.gsheets.spreadsheet_url)?;

  if app.projects.is_empty() {
    tracing::warn!("no projects configured; the report will only contain the header");
  }

  info!(
    start = %cfg.window.start.date(),
    end = %cfg.window.end.date(),
    projects = app.projects.len(),
    "generating label report"
  );

  // Phase 2: build the whole table in memory
  let table = assemble_report(tracker, &app.projects, &cfg.window)?;
  info!(rows = table.rows.len(), "report assembled");

  // Phase 3: single bulk write
  write_table(sheets, &spreadsheet_id, &cfg.tab_name, &table)
    .with_context(|| format!("writing report to tab '{}'", cfg.tab_name))
}
