#[test]
fn cli_generates_man_page() {
  let mut cmd = test_support::cmd_bin("gitlab-label-report");
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits roff with hyphens escaped as `\-`
  assert!(s.contains(".TH"));
  assert!(s.contains("gitlab\\-label\\-report"));
  // the subcommand gets its own page, so its flags are documented
  assert!(s.contains("generate\\-label\\-report"));
  assert!(s.contains("tab\\-name"));
  assert!(s.contains("start\\-date"));
  assert!(s.contains("end\\-date"));
}
