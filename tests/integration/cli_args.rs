use predicates::prelude::*;

#[test]
fn missing_config_file_fails_naming_the_path() {
  let td = test_support::tempdir();
  let missing = td.path().join("absent.toml");

  test_support::cmd_bin("gitlab-label-report")
    .args(["generate-label-report", "--tab-name", "T", "--config"])
    .arg(&missing)
    .assert()
    .failure()
    .stderr(predicate::str::contains("reading config").and(predicate::str::contains("absent.toml")));
}

#[test]
fn inverted_window_is_rejected_before_loading_config() {
  test_support::cmd_bin("gitlab-label-report")
    .args([
      "generate-label-report",
      "--tab-name",
      "T",
      "--start-date",
      "2025-08-01",
      "--end-date",
      "2025-07-01",
      "--config",
      "/definitely/not/here.toml",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("must be before"));
}

#[test]
fn malformed_date_is_a_usage_error() {
  test_support::cmd_bin("gitlab-label-report")
    .args(["generate-label-report", "--tab-name", "T", "--end-date", "tomorrow"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn missing_subcommand_prints_help_and_fails() {
  test_support::cmd_bin("gitlab-label-report")
    .assert()
    .failure()
    .stdout(predicate::str::contains("generate-label-report"));
}

#[test]
fn bad_project_id_type_is_a_config_error() {
  let td = test_support::tempdir();
  let cfg = test_support::write_config(td.path(), &[]);
  let mut text = std::fs::read_to_string(&cfg).unwrap();
  text.push_str("\"Broken\" = 1.5\n");
  std::fs::write(&cfg, text).unwrap();

  test_support::cmd_bin("gitlab-label-report")
    .args(["generate-label-report", "--tab-name", "T", "--config"])
    .arg(&cfg)
    .env("GLR_TEST_SHEET_OUT", td.path().join("sheet.json"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("projects.Broken"));
}
