use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::window::{parse_date, ReportWindow};

#[derive(Parser, Debug)]
#[command(
    name = "gitlab-label-report",
    version,
    about = "Report time spent between GitLab status labels into a Google Sheet",
    long_about = None
)]
pub struct Cli {
  /// Path to the TOML configuration file (GitLab, Google Sheets, projects)
  #[arg(long, global = true, default_value = "config.toml")]
  pub config: PathBuf,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  #[command(subcommand)]
  pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Compute stats for label changes
  GenerateLabelReport(LabelReportArgs),
}

#[derive(Args, Debug)]
pub struct LabelReportArgs {
  /// First day of the reporting window, inclusive (default: 30 days before today)
  #[arg(long, value_parser = parse_date)]
  pub start_date: Option<NaiveDate>,

  /// Day the reporting window ends, exclusive (default: today)
  #[arg(long, value_parser = parse_date)]
  pub end_date: Option<NaiveDate>,

  /// Spreadsheet tab to write into; created when missing
  #[arg(long)]
  pub tab_name: String,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub config_path: PathBuf,
  pub window: ReportWindow,
  pub tab_name: String,
}

pub fn normalize(config_path: PathBuf, args: LabelReportArgs, today: NaiveDate) -> Result<EffectiveConfig> {
  let window = ReportWindow::resolve(args.start_date, args.end_date, today)?;

  let tab_name = args.tab_name.trim().to_string();
  if tab_name.is_empty() {
    anyhow::bail!("--tab-name must not be empty");
  }

  Ok(EffectiveConfig {
    config_path,
    window,
    tab_name,
  })
}
