// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for sheet-friendly timestamps, elapsed-day math, A1 column letters, logging setup and man page rendering
// role: utilities/helpers
// inputs: NaiveDateTime; column counts; clap CommandFactory; GLR_LOG / RUST_LOG
// outputs: Formatted timestamps, fractional day counts, column letters, man page text
// side_effects: init_tracing installs the global subscriber (first call wins)
// invariants:
// - format_for_sheet pattern is stable and locale-independent
// - column_letter only handles 1..=26 (single letter)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDateTime;
use clap::CommandFactory;
use tracing_subscriber::EnvFilter;

use crate::error::ReportError;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Render a timestamp the way Sheets parses date-times (`MM/DD/YYYY HH:MM:SS`).
pub fn format_for_sheet(dt: NaiveDateTime) -> String {
  dt.format("%m/%d/%Y %H:%M:%S").to_string()
}

/// Fractional number of 24-hour days from `start` to `end`, at microsecond precision.
pub fn elapsed_days(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
  let delta = end - start;

  let seconds = match delta.num_microseconds() {
    Some(micros) => micros as f64 / 1_000_000.0,
    // overflow only past ~290k years
    None => delta.num_milliseconds() as f64 / 1000.0,
  };

  seconds / SECONDS_PER_DAY
}

/// Letter for a 1-based column count (1 => A, 26 => Z).
pub fn column_letter(columns: usize) -> Result<char, ReportError> {
  if !(1..=26).contains(&columns) {
    return Err(ReportError::TooManyColumns { columns });
  }

  Ok((b'A' + (columns as u8 - 1)) as char)
}

/// Install the stderr `fmt` subscriber. Filter from `GLR_LOG`, then `RUST_LOG`, default `info`.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_env("GLR_LOG")
    .or_else(|_| EnvFilter::try_from_default_env())
    .unwrap_or_else(|_| EnvFilter::new("info"));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Render section-1 man pages for a clap `CommandFactory` implementor:
/// the top-level page followed by one page per subcommand.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let mut buf: Vec<u8> = Vec::new();

  clap_mangen::Man::new(cmd.clone()).render(&mut buf)?;

  for sub in cmd.get_subcommands().filter(|s| !s.is_hide_set()) {
    clap_mangen::Man::new(sub.clone()).render(&mut buf)?;
  }

  Ok(String::from_utf8_lossy(&buf).to_string())
}
