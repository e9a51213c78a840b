// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Load the static TOML configuration (tracker, sheet, projects) once at startup
// role: config/loader
// inputs: Path to a TOML file
// outputs: AppConfig with validated GitLab, Sheets and ordered project settings
// invariants:
// - Project order is file order (toml preserve_order)
// - Project ids are integers or non-empty strings (e.g. `group/project`)
// errors: ReportError::ConfigRead / ConfigParse / ConfigInvalid; all fatal
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use serde::Deserialize;

use crate::error::ReportError;

#[derive(Debug, Clone, Deserialize)]
pub struct GitlabConfig {
  pub url: String,
  pub api_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
  pub spreadsheet_url: String,
  #[serde(default)]
  pub access_token: Option<String>,
}

/// A configured project: the config key and the tracker id it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
  pub key: String,
  pub id: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
  gitlab: GitlabConfig,
  gsheets: SheetsConfig,
  #[serde(default)]
  projects: toml::Table,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub gitlab: GitlabConfig,
  pub gsheets: SheetsConfig,
  pub projects: Vec<ProjectRef>,
}

impl AppConfig {
  pub fn load(path: &Path) -> Result<Self, ReportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReportError::ConfigRead {
      path: path.display().to_string(),
      source,
    })?;

    Self::from_toml_str(&text, &path.display().to_string())
  }

  pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ReportError> {
    let raw: RawConfig = toml::from_str(text).map_err(|source| ReportError::ConfigParse {
      path: origin.to_string(),
      source,
    })?;

    if raw.gitlab.url.trim().is_empty() {
      return Err(ReportError::invalid("gitlab.url", "must not be empty"));
    }
    if raw.gitlab.api_token.trim().is_empty() {
      return Err(ReportError::invalid("gitlab.api_token", "must not be empty"));
    }
    if raw.gsheets.spreadsheet_url.trim().is_empty() {
      return Err(ReportError::invalid("gsheets.spreadsheet_url", "must not be empty"));
    }

    let mut projects = Vec::with_capacity(raw.projects.len());
    for (key, value) in raw.projects {
      let id = match value {
        toml::Value::Integer(n) => n.to_string(),
        toml::Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        other => {
          return Err(ReportError::invalid(
            &format!("projects.{key}"),
            format!("expected a project id (integer or path), got {}", other.type_str()),
          ))
        }
      };
      projects.push(ProjectRef { key, id });
    }

    Ok(AppConfig {
      gitlab: GitlabConfig {
        url: raw.gitlab.url.trim().trim_end_matches('/').to_string(),
        api_token: raw.gitlab.api_token,
      },
      gsheets: raw.gsheets,
      projects,
    })
  }
}
