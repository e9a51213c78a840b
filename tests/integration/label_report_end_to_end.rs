use predicates::prelude::*;
use serde_json::{json, Value};

const BIN: &str = "gitlab-label-report";

fn report_cmd(config: &std::path::Path, sheet_out: &std::path::Path, gitlab_json: &str) -> assert_cmd::Command {
  let mut cmd = test_support::cmd_bin(BIN);
  cmd
    .args([
      "generate-label-report",
      "--start-date",
      "2025-07-01",
      "--end-date",
      "2025-08-01",
      "--tab-name",
      "July",
      "--config",
    ])
    .arg(config)
    .env("GLR_TEST_GITLAB_JSON", gitlab_json)
    .env("GLR_TEST_SHEET_OUT", sheet_out);
  cmd
}

fn run_report(config: &std::path::Path, sheet_out: &std::path::Path, gitlab_json: &str) -> assert_cmd::assert::Assert {
  report_cmd(config, sheet_out, gitlab_json).assert()
}

fn read_sheet(path: &std::path::Path) -> Value {
  serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[test]
fn writes_filtered_rows_for_every_project() {
  let td = test_support::tempdir();
  let config = test_support::write_config(td.path(), &[("web", "42"), ("api", "group/api")]);
  let sheet_out = td.path().join("sheet.json");
  let fixture = test_support::read_fixture_string("gitlab_projects.json");

  report_cmd(&config, &sheet_out, &fixture)
    .env("GLR_LOG", "info")
    .assert()
    .success()
    .stderr(predicate::str::contains("Looking at web").and(predicate::str::contains("Looking at api")));

  let sheet = read_sheet(&sheet_out);
  let tab = &sheet["tabs"]["July"];
  assert_eq!(tab["created"], true);
  assert_eq!(tab["rows"], 3);
  assert_eq!(tab["cols"], 17);
  assert_eq!(tab["range"], "'July'!A1:Q3");

  let values = tab["values"].as_array().unwrap();
  insta::assert_json_snapshot!(values[0], @r###"
  [
    "Project",
    "Issue #",
    "Doing",
    "Review",
    "Elapsed days",
    "Review",
    "QA",
    "Elapsed days",
    "QA",
    "Waiting for Prod",
    "Elapsed days",
    "Waiting for Prod",
    "Released",
    "Elapsed days",
    "Doing",
    "Released",
    "Elapsed days"
  ]
  "###);

  // Issue 2 (never left Doing), 3 (finished before the window) and 4 (finished on the
  // exclusive end date) carry no in-window transition and are omitted.
  assert_eq!(
    values[1],
    json!([
      "Web App", 1,
      "07/01/2025 09:00:00", "07/02/2025 21:00:00", 1.5,
      "07/02/2025 21:00:00", "07/03/2025 09:00:00", 0.5,
      "07/03/2025 09:00:00", "07/04/2025 09:00:00", 1.0,
      "07/04/2025 09:00:00", "07/05/2025 09:00:00", 1.0,
      "07/01/2025 09:00:00", "07/05/2025 09:00:00", 4.0
    ])
  );
  assert_eq!(
    values[2],
    json!([
      "API", 7,
      "", "", "",
      "", "", "",
      "", "", "",
      "07/30/2025 12:00:00", "07/31/2025 00:00:00", 0.5,
      "", "", ""
    ])
  );
}

#[test]
fn existing_tab_is_overwritten_not_recreated() {
  let td = test_support::tempdir();
  let config = test_support::write_config(td.path(), &[("api", "group/api")]);
  let sheet_out = td.path().join("sheet.json");
  std::fs::write(&sheet_out, json!({ "tabs": { "July": { "rows": 1000, "cols": 26 } } }).to_string()).unwrap();
  let fixture: Value = test_support::read_fixture_json("gitlab_projects.json");

  run_report(&config, &sheet_out, &fixture.to_string()).success();

  let tab = &read_sheet(&sheet_out)["tabs"]["July"];
  assert!(tab.get("created").is_none());
  assert_eq!(tab["rows"], 1000);
  assert_eq!(tab["range"], "'July'!A1:Q2");
  assert_eq!(tab["values"].as_array().unwrap().len(), 2);
}

#[test]
fn malformed_timestamp_aborts_without_writing() {
  let td = test_support::tempdir();
  let config = test_support::write_config(td.path(), &[("web", "1")]);
  let sheet_out = td.path().join("sheet.json");
  let fixture = json!({
    "projects": {
      "1": {
        "name": "Web",
        "issues": [
          { "id": 10, "iid": 1, "label_events": [
            { "label": { "name": "status::Doing" }, "created_at": "2025-07-01T00:00:00Z" },
            { "label": { "name": "status::Review" }, "created_at": "02/07/2025" }
          ]}
        ]
      }
    }
  });

  run_report(&config, &sheet_out, &fixture.to_string())
    .failure()
    .stderr(predicate::str::contains("malformed timestamp").and(predicate::str::contains("02/07/2025")));

  assert!(!sheet_out.exists());
}

#[test]
fn unknown_project_aborts_without_writing() {
  let td = test_support::tempdir();
  let config = test_support::write_config(td.path(), &[("web", "42"), ("ghost", "404")]);
  let sheet_out = td.path().join("sheet.json");
  let fixture = test_support::read_fixture_string("gitlab_projects.json");

  run_report(&config, &sheet_out, &fixture)
    .failure()
    .stderr(predicate::str::contains("loading project 'ghost'"));

  assert!(!sheet_out.exists());
}

#[test]
fn no_matching_issues_still_writes_header() {
  let td = test_support::tempdir();
  let config = test_support::write_config(td.path(), &[("empty", "5")]);
  let sheet_out = td.path().join("sheet.json");
  let fixture = json!({ "projects": { "5": { "name": "Empty", "issues": [] } } });

  run_report(&config, &sheet_out, &fixture.to_string()).success();

  let tab = &read_sheet(&sheet_out)["tabs"]["July"];
  assert_eq!(tab["range"], "'July'!A1:Q1");
  assert_eq!(tab["values"].as_array().unwrap().len(), 1);
}
