use anyhow::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::Path;
use vdraft::app::{run_devices_command, run_draft_command, run_topics_command};
use vdraft::cli::{Cli, Commands};
use vdraft::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    log::debug!("vdraft {}", vdraft::version_string());

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.server.as_deref())?;

    let outcome = match &cli.command {
        Commands::Topics => run_topics_command(&config).await,
        Commands::Draft { topic, device } => {
            run_draft_command(&config, topic, device.as_deref(), cli.quiet).await
        }
        Commands::Devices => run_devices_command(),
    };

    if let Err(e) = outcome {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Load configuration, applying env and CLI overrides in that order.
fn load_config(path: Option<&Path>, server: Option<&str>) -> Result<Config> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    let mut config = Config::load_or_default(&config_path)?.with_env_overrides();

    if let Some(url) = server {
        config.server.base_url = url.to_string();
    }

    Ok(config)
}
