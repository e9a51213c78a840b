// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failure taxonomy for config, tracker, timestamp and sheet errors
// role: errors/types
// outputs: ReportError, wrapped by anyhow at the orchestration layer
// invariants: Every variant is fatal; nothing is retried
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
  /// Config file missing or unreadable.
  #[error("reading config {path}: {source}")]
  ConfigRead {
    path: String,
    #[source]
    source: std::io::Error,
  },

  /// Config file is not valid TOML or lacks required keys.
  #[error("parsing config {path}: {source}")]
  ConfigParse {
    path: String,
    #[source]
    source: toml::de::Error,
  },

  /// A config key parsed but holds an unusable value.
  #[error("invalid config value for '{field}': {reason}")]
  ConfigInvalid { field: String, reason: String },

  #[error("GitLab request {url} failed: {reason}")]
  Provider { url: String, reason: String },

  #[error("malformed timestamp '{raw}': {source}")]
  MalformedTimestamp {
    raw: String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("Sheets request {url} failed: {reason}")]
  Sink { url: String, reason: String },

  /// A1 ranges are computed with a single column letter.
  #[error("{columns} columns do not fit a single-letter A1 range (max 26)")]
  TooManyColumns { columns: usize },
}

impl ReportError {
  pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
    ReportError::ConfigInvalid {
      field: field.to_string(),
      reason: reason.into(),
    }
  }
}
