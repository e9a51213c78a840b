use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

mod cli;
mod config;
mod error;
mod events;
mod ext;
mod gitlab;
mod labels;
mod model;
mod report;
mod runner;
mod sheets;
mod transition;
mod util;
mod window;

use crate::cli::{normalize, Cli, Command};
use crate::config::AppConfig;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  let Some(command) = cli.command else {
    Cli::command().print_help()?;
    std::process::exit(2);
  };

  util::init_tracing();

  match command {
    Command::GenerateLabelReport(args) => {
      // Phase 1: normalize CLI against today's date
      let today = chrono::Local::now().date_naive();
      let cfg = normalize(cli.config, args, today)?;

      // Phase 2: load config and build collaborators once for the whole run
      let app = AppConfig::load(&cfg.config_path)?;
      let tracker = gitlab::build_tracker(&app.gitlab).context("setting up GitLab client")?;
      let sheets = sheets::build_sheets(&app.gsheets).context("setting up Google Sheets client")?;

      // Phase 3: fetch, build, write
      runner::run_label_report(&cfg, &app, tracker.as_ref(), sheets.as_ref())
    }
  }
}
