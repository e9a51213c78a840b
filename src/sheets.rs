// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Spreadsheet sink seam, its Google Sheets v4 implementation, and the single bulk write of the report
// role: sink/sheets
// inputs: SheetsConfig; bearer token from GOOGLE_OAUTH_ACCESS_TOKEN, config, or `gcloud`; env GLR_TEST_SHEET_OUT for the file-backed sink
// outputs: One tab holding header + rows, anchored at A1
// side_effects: Blocking HTTP calls to sheets.googleapis.com; may create a tab
// invariants:
// - Values are written exactly once, after the whole table is assembled
// - A missing tab is created with the table's rows x cols; an existing tab is reused
// - The end column is a single letter; more than 26 columns fails before any sheet call
// errors: ReportError::Sink for HTTP failures; ReportError::TooManyColumns
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use tracing::{debug, info};

use crate::config::SheetsConfig;
use crate::error::ReportError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{Cell, ReportTable};
use crate::util::column_letter;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
const SHEET_OUT_ENV: &str = "GLR_TEST_SHEET_OUT";

// --- Trait seam for the spreadsheet service ---
pub trait SheetsApi {
  fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>>;
  fn add_worksheet(&self, spreadsheet_id: &str, title: &str, rows: usize, cols: usize) -> Result<()>;
  /// Overwrite `range` (A1 notation, tab-qualified) with `values`.
  fn update_values(&self, spreadsheet_id: &str, range: &str, values: &[Vec<Cell>]) -> Result<()>;
}

/// Extract the spreadsheet id from a `.../spreadsheets/d/<id>/...` URL; bare ids pass through.
pub fn spreadsheet_id_from_url(url: &str) -> Result<String> {
  static RE_SHEET_URL: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").unwrap());
  static RE_BARE_ID: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

  let url = url.trim();

  if let Some(id) = RE_SHEET_URL.captures(url).and_then(|c| c.get(1)) {
    return Ok(id.as_str().to_string());
  }

  if RE_BARE_ID.is_match(url) {
    return Ok(url.to_string());
  }

  Err(ReportError::invalid("gsheets.spreadsheet_url", format!("no spreadsheet id in '{url}'")).into())
}

/// Tab-qualified A1 prefix: `'Tab name'!` with embedded quotes doubled.
fn quote_title(title: &str) -> String {
  format!("'{}'", title.replace('\'', "''"))
}

/// Write header + rows into `tab_name`, creating the tab first if it does not exist.
pub fn write_table(api: &dyn SheetsApi, spreadsheet_id: &str, tab_name: &str, table: &ReportTable) -> Result<()> {
  let values = table.to_values();
  let nb_rows = values.len();
  let nb_cols = values.first().map(Vec::len).unwrap_or(0);

  // Known limitation: single-letter end column only.
  let last_col = column_letter(nb_cols)?;

  let titles = api.worksheet_titles(spreadsheet_id)?;

  if !titles.iter().any(|t| t == tab_name) {
    info!(tab = tab_name, rows = nb_rows, cols = nb_cols, "creating missing tab");
    api.add_worksheet(spreadsheet_id, tab_name, nb_rows, nb_cols)?;
  }

  let range = format!("{}!A1:{}{}", quote_title(tab_name), last_col, nb_rows);
  api.update_values(spreadsheet_id, &range, &values)?;
  info!(tab = tab_name, range = %range, "report written");

  Ok(())
}

/// Discover a bearer token: env var first, then config, then `gcloud auth print-access-token`.
pub fn get_google_token(config_token: Option<&str>) -> Option<String> {
  if let Ok(t) = std::env::var(TOKEN_ENV) {
    if !t.trim().is_empty() {
      return Some(t.trim().to_string());
    }
  }

  if let Some(t) = config_token {
    if !t.trim().is_empty() {
      return Some(t.trim().to_string());
    }
  }

  if let Ok(output) = std::process::Command::new("gcloud")
    .args(["auth", "print-access-token"])
    .output()
  {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

fn sink_error(url: &str, reason: impl Into<String>) -> anyhow::Error {
  ReportError::Sink {
    url: url.to_string(),
    reason: reason.into(),
  }
  .into()
}

fn check(url: &str, resp: std::result::Result<ureq::Response, ureq::Error>) -> Result<ureq::Response> {
  match resp {
    Ok(r) => Ok(r),
    Err(ureq::Error::Status(code, r)) => {
      let status = r.status_text().to_string();
      let body = r.into_string().unwrap_or_default();
      Err(sink_error(url, format!("HTTP {code} {status}: {}", body.trim())))
    }
    Err(e) => Err(sink_error(url, e.to_string())),
  }
}

pub struct GoogleSheetsApi {
  base_url: String,
  token: String,
  agent: ureq::Agent,
}

impl GoogleSheetsApi {
  pub fn new(token: String) -> Self {
    Self::with_base_url(SHEETS_API, token)
  }

  fn with_base_url(base_url: &str, token: String) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout(Duration::from_secs(60))
      .user_agent("gitlab-label-report")
      .build();

    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      token,
      agent,
    }
  }

  fn bearer(&self) -> String {
    format!("Bearer {}", self.token)
  }
}

impl SheetsApi for GoogleSheetsApi {
  fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
    let url = format!("{}/{}?fields=sheets.properties.title", self.base_url, spreadsheet_id);
    debug!(url = %url, "GET");

    let resp = check(&url, self.agent.get(&url).set("Authorization", &self.bearer()).call())?;
    let body = resp
      .into_json::<serde_json::Value>()
      .map_err(|e| sink_error(&url, format!("invalid JSON body: {e}")))?;

    let sheets = body.fetch("sheets").to::<Vec<serde_json::Value>>().unwrap_or_default();

    Ok(
      sheets
        .iter()
        .filter_map(|s| s.fetch("properties.title").to::<String>())
        .collect(),
    )
  }

  fn add_worksheet(&self, spreadsheet_id: &str, title: &str, rows: usize, cols: usize) -> Result<()> {
    let url = format!("{}/{}:batchUpdate", self.base_url, spreadsheet_id);
    debug!(url = %url, title, "POST addSheet");

    let body = serde_json::json!({
      "requests": [{
        "addSheet": {
          "properties": {
            "title": title,
            "gridProperties": { "rowCount": rows, "columnCount": cols }
          }
        }
      }]
    });

    check(&url, self.agent.post(&url).set("Authorization", &self.bearer()).send_json(body))?;
    Ok(())
  }

  fn update_values(&self, spreadsheet_id: &str, range: &str, values: &[Vec<Cell>]) -> Result<()> {
    let url = format!(
      "{}/{}/values/{}?valueInputOption=USER_ENTERED",
      self.base_url,
      spreadsheet_id,
      urlencoding::encode(range)
    );
    debug!(url = %url, rows = values.len(), "PUT values");

    let body = serde_json::json!({
      "range": range,
      "majorDimension": "ROWS",
      "values": values,
    });

    check(&url, self.agent.put(&url).set("Authorization", &self.bearer()).send_json(body))?;
    Ok(())
  }
}

/// Sink that records tabs and written values as JSON in the file named by `GLR_TEST_SHEET_OUT`:
/// `{"tabs": {"<title>": {"rows", "cols", "created", "range", "values"}}}`.
struct SheetsFileApi {
  path: PathBuf,
}

impl SheetsFileApi {
  fn load(&self) -> Result<serde_json::Value> {
    if !self.path.exists() {
      return Ok(serde_json::json!({ "tabs": {} }));
    }
    let text = std::fs::read_to_string(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", self.path.display()))
  }

  fn save(&self, doc: &serde_json::Value) -> Result<()> {
    std::fs::write(&self.path, serde_json::to_vec_pretty(doc)?).with_context(|| format!("writing {}", self.path.display()))
  }

  fn tabs_mut(doc: &mut serde_json::Value) -> Result<&mut serde_json::Map<String, serde_json::Value>> {
    doc
      .get_mut("tabs")
      .and_then(|t| t.as_object_mut())
      .context("sheet file has no 'tabs' object")
  }
}

impl SheetsApi for SheetsFileApi {
  fn worksheet_titles(&self, _spreadsheet_id: &str) -> Result<Vec<String>> {
    let mut doc = self.load()?;
    let tabs = Self::tabs_mut(&mut doc)?;
    Ok(tabs.keys().cloned().collect())
  }

  fn add_worksheet(&self, _spreadsheet_id: &str, title: &str, rows: usize, cols: usize) -> Result<()> {
    let mut doc = self.load()?;
    Self::tabs_mut(&mut doc)?.insert(
      title.to_string(),
      serde_json::json!({ "rows": rows, "cols": cols, "created": true }),
    );
    self.save(&doc)
  }

  fn update_values(&self, _spreadsheet_id: &str, range: &str, values: &[Vec<Cell>]) -> Result<()> {
    let mut doc = self.load()?;
    let title = range
      .split_once("'!")
      .map(|(t, _)| t.trim_start_matches('\'').replace("''", "'"))
      .context("range is not tab-qualified")?;

    let tabs = Self::tabs_mut(&mut doc)?;
    let tab = tabs
      .get_mut(&title)
      .and_then(|t| t.as_object_mut())
      .with_context(|| format!("tab '{title}' does not exist"))?;
    tab.insert("range".into(), serde_json::Value::String(range.to_string()));
    tab.insert("values".into(), serde_json::to_value(values)?);

    self.save(&doc)
  }
}

/// Select the sink: the file-backed one when `GLR_TEST_SHEET_OUT` is set, otherwise Google Sheets.
pub fn build_sheets(cfg: &SheetsConfig) -> Result<Box<dyn SheetsApi>> {
  if let Ok(path) = std::env::var(SHEET_OUT_ENV) {
    if !path.trim().is_empty() {
      return Ok(Box::new(SheetsFileApi { path: PathBuf::from(path) }));
    }
  }

  let token = get_google_token(cfg.access_token.as_deref()).ok_or_else(|| {
    ReportError::invalid(
      "gsheets.access_token",
      format!("no Google token; set {TOKEN_ENV}, gsheets.access_token, or run: gcloud auth login"),
    )
  })?;

  Ok(Box::new(GoogleSheetsApi::new(token)))
}
