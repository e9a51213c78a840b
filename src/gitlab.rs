// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Issue-tracker seam and its GitLab REST v4 implementation (projects, issues, resource label events)
// role: provider/gitlab
// inputs: GitlabConfig (url, api_token); env GLR_TEST_GITLAB_JSON for the fixture-backed tracker
// outputs: Project, Issue and RawLabelEvent records
// side_effects: Blocking HTTP calls to the configured GitLab instance
// invariants:
// - Paginated listings follow `x-next-page` until it is empty
// - Any non-2xx status or transport error is fatal (ReportError::Provider); no retries
// - Project paths are percent-encoded (`group/project` => `group%2Fproject`)
// errors: ReportError::Provider naming the request URL
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use crate::config::GitlabConfig;
use crate::error::ReportError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{Issue, Project, RawLabelEvent};

const PER_PAGE: u32 = 100;
const FIXTURE_ENV: &str = "GLR_TEST_GITLAB_JSON";

// --- Trait seam for the issue tracker ---
pub trait IssueTracker {
  fn get_project(&self, project_id: &str) -> Result<Project>;
  /// All issues of a project, in the order the tracker returns them.
  fn list_issues(&self, project_id: &str) -> Result<Vec<Issue>>;
  fn list_label_events(&self, project_id: &str, issue_iid: i64) -> Result<Vec<RawLabelEvent>>;
}

fn provider_error(url: &str, reason: impl Into<String>) -> anyhow::Error {
  ReportError::Provider {
    url: url.to_string(),
    reason: reason.into(),
  }
  .into()
}

fn encode_project_id(id: &str) -> String {
  urlencoding::encode(id).into_owned()
}

fn project_from_json(origin: &str, project_id: &str, v: &serde_json::Value) -> Result<Project> {
  let Some(name) = v.fetch("name").to::<String>() else {
    return Err(provider_error(origin, "project record without a name"));
  };

  Ok(Project {
    id: project_id.to_string(),
    name,
  })
}

fn issue_from_json(origin: &str, v: &serde_json::Value) -> Result<Issue> {
  let Some(iid) = v.fetch("iid").to::<i64>() else {
    return Err(provider_error(origin, "issue record without an iid"));
  };

  Ok(Issue {
    id: v.fetch("id").to_or_default::<i64>(),
    iid,
  })
}

fn label_event_from_json(v: &serde_json::Value) -> RawLabelEvent {
  RawLabelEvent {
    label_name: v.fetch("label.name").to::<String>(),
    created_at: v.fetch("created_at").to_or_default::<String>(),
  }
}

pub struct GitlabHttpApi {
  base_url: String,
  token: String,
  agent: ureq::Agent,
}

impl GitlabHttpApi {
  pub fn new(base_url: &str, token: &str) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout(Duration::from_secs(60))
      .user_agent("gitlab-label-report")
      .build();

    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      token: token.to_string(),
      agent,
    }
  }

  fn api_url(&self, path: &str) -> String {
    format!("{}/api/v4/{}", self.base_url, path)
  }

  /// GET a JSON document; also returns the `x-next-page` header when non-empty.
  fn get_json(&self, url: &str) -> Result<(serde_json::Value, Option<String>)> {
    debug!(url, "GET");

    let resp = match self.agent.get(url).set("PRIVATE-TOKEN", &self.token).call() {
      Ok(r) => r,
      Err(ureq::Error::Status(code, r)) => {
        return Err(provider_error(url, format!("HTTP {} {}", code, r.status_text())));
      }
      Err(e) => return Err(provider_error(url, e.to_string())),
    };

    let next_page = resp
      .header("x-next-page")
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string);

    let body = resp
      .into_json::<serde_json::Value>()
      .map_err(|e| provider_error(url, format!("invalid JSON body: {e}")))?;

    Ok((body, next_page))
  }

  fn get_paginated(&self, url: &str) -> Result<Vec<serde_json::Value>> {
    let mut out = Vec::new();
    let mut page = "1".to_string();

    loop {
      let page_url = format!("{url}?per_page={PER_PAGE}&page={page}");
      let (body, next_page) = self.get_json(&page_url)?;

      let Some(items) = body.as_array() else {
        return Err(provider_error(&page_url, "expected a JSON array"));
      };
      out.extend(items.iter().cloned());

      match next_page {
        Some(next) => {
          debug!(url, next = %next, "following next page");
          page = next;
        }
        None => break,
      }
    }

    Ok(out)
  }
}

impl IssueTracker for GitlabHttpApi {
  fn get_project(&self, project_id: &str) -> Result<Project> {
    let url = self.api_url(&format!("projects/{}", encode_project_id(project_id)));
    let (body, _) = self.get_json(&url)?;
    project_from_json(&url, project_id, &body)
  }

  fn list_issues(&self, project_id: &str) -> Result<Vec<Issue>> {
    let url = self.api_url(&format!("projects/{}/issues", encode_project_id(project_id)));
    let items = self.get_paginated(&url)?;
    items.iter().map(|v| issue_from_json(&url, v)).collect()
  }

  fn list_label_events(&self, project_id: &str, issue_iid: i64) -> Result<Vec<RawLabelEvent>> {
    let url = self.api_url(&format!(
      "projects/{}/issues/{}/resource_label_events",
      encode_project_id(project_id),
      issue_iid
    ));
    let items = self.get_paginated(&url)?;
    Ok(items.iter().map(label_event_from_json).collect())
  }
}

/// Tracker backed by a JSON document in `GLR_TEST_GITLAB_JSON`:
/// `{"projects": {"<id>": {"name": .., "issues": [{"id", "iid", "label_events": [..]}]}}}`.
struct GitlabEnvApi {
  fixture: serde_json::Value,
}

impl GitlabEnvApi {
  fn from_env() -> Result<Option<Self>> {
    let Ok(raw) = std::env::var(FIXTURE_ENV) else {
      return Ok(None);
    };
    let fixture = serde_json::from_str::<serde_json::Value>(&raw)
      .map_err(|e| provider_error(&format!("env://{FIXTURE_ENV}"), format!("invalid fixture JSON: {e}")))?;

    Ok(Some(Self { fixture }))
  }

  fn project(&self, project_id: &str) -> Result<&serde_json::Value> {
    self
      .fixture
      .get("projects")
      .and_then(|p| p.get(project_id))
      .ok_or_else(|| provider_error(&format!("env://projects/{project_id}"), "404 Not Found"))
  }

  fn issues(&self, project_id: &str) -> Result<&[serde_json::Value]> {
    Ok(
      self
        .project(project_id)?
        .get("issues")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default(),
    )
  }
}

impl IssueTracker for GitlabEnvApi {
  fn get_project(&self, project_id: &str) -> Result<Project> {
    let origin = format!("env://projects/{project_id}");
    project_from_json(&origin, project_id, self.project(project_id)?)
  }

  fn list_issues(&self, project_id: &str) -> Result<Vec<Issue>> {
    let origin = format!("env://projects/{project_id}/issues");
    self.issues(project_id)?.iter().map(|v| issue_from_json(&origin, v)).collect()
  }

  fn list_label_events(&self, project_id: &str, issue_iid: i64) -> Result<Vec<RawLabelEvent>> {
    let issue = self
      .issues(project_id)?
      .iter()
      .find(|v| v.fetch("iid").to::<i64>() == Some(issue_iid))
      .ok_or_else(|| provider_error(&format!("env://projects/{project_id}/issues/{issue_iid}"), "404 Not Found"))?;

    let events = issue.fetch("label_events").to::<Vec<serde_json::Value>>().unwrap_or_default();
    Ok(events.iter().map(label_event_from_json).collect())
  }
}

/// Select the tracker: the env fixture when present, otherwise GitLab over HTTP.
pub fn build_tracker(cfg: &GitlabConfig) -> Result<Box<dyn IssueTracker>> {
  if let Some(api) = GitlabEnvApi::from_env()? {
    return Ok(Box::new(api));
  }

  Ok(Box::new(GitlabHttpApi::new(&cfg.url, &cfg.api_token)))
}
