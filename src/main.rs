mod app;
mod cli;
mod config;
mod digest;
mod error;
mod model;
mod notify;
mod providers;
mod render;
mod telemetry;
mod util;

use anyhow::Result;
use chrono::Local;
use clap::Parser;

use config::AppConfig;
use notify::smtp::SmtpNotifier;
use providers::rally::RallyProvider;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // Configuration problems are reported before any network activity, and
    // before logging is set up.
    let config = match load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args, &config).await {
        telemetry::log_fatal(&err);
        std::process::exit(1);
    }
}

fn load(args: &cli::Args) -> Result<AppConfig> {
    let config = AppConfig::load(&args.overrides())?;
    telemetry::init(&config.log_level)?;
    Ok(config)
}

async fn run(args: &cli::Args, config: &AppConfig) -> Result<()> {
    let tracker = RallyProvider::new(&config.rally);
    let notifier = SmtpNotifier::new(&config.mail)?;
    let now = Local::now().naive_local();

    app::run(config, &tracker, &notifier, now, &args.run_options()).await?;
    Ok(())
}
