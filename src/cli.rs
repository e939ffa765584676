use clap::Parser;
use std::path::PathBuf;

use crate::app::RunOptions;
use crate::config::Overrides;

/// Email a summary of your recently accepted Rally stories.
///
/// Credentials come from the environment (or a `.env` file) and an optional
/// TOML config file. Meant to be run from cron or another scheduler.
#[derive(Parser, Debug)]
#[command(name = "accepted-report", version)]
pub struct Args {
    /// Read configuration from this TOML file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Look back this many days instead of the configured window
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,
    /// Fetch and render the report but do not send email
    #[arg(long)]
    pub dry_run: bool,
    /// Also write the rendered HTML report to this file
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            days_back: self.days,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            output: self.output.clone(),
        }
    }
}
