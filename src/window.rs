use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::TransitionResult;

// Reporting-window types live here to keep the report builder focused.

/// Days covered by the window when `--start-date` is omitted.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Half-open `[start, end)` range of naive UTC instants.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ReportWindow {
  pub start: NaiveDateTime,
  pub end: NaiveDateTime,
}

impl ReportWindow {
  /// Window from midnight of `start_date` up to (excluding) midnight of `end_date`.
  pub fn from_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
    if start_date >= end_date {
      bail!("--start-date ({start_date}) must be before --end-date ({end_date})");
    }

    Ok(Self {
      start: start_date.and_time(NaiveTime::MIN),
      end: end_date.and_time(NaiveTime::MIN),
    })
  }

  /// Resolve optional CLI dates: end defaults to `today`, start to 30 days before `today`.
  pub fn resolve(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>, today: NaiveDate) -> Result<Self> {
    let end = end_date.unwrap_or(today);
    let start = start_date.unwrap_or(today - Duration::days(DEFAULT_WINDOW_DAYS));
    Self::from_dates(start, end)
  }

  pub fn contains(&self, instant: NaiveDateTime) -> bool {
    self.start <= instant && instant < self.end
  }
}

impl TransitionResult {
  /// Null out both fields of a completed transition whose end lies outside `window`.
  ///
  /// Only `end` is compared; `start` may well precede the window. Incomplete
  /// results (either side absent) pass through untouched.
  pub fn within(self, window: &ReportWindow) -> TransitionResult {
    match (self.start, self.end) {
      (Some(_), Some(end)) if !window.contains(end) => TransitionResult::default(),
      _ => self,
    }
  }
}

/// Parse a `YYYY-MM-DD` calendar date (clap value parser).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}
