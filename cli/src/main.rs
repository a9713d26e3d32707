use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

use app::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = taskboard_core::api::load_default()?;

    if cfg.logging.enabled {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(cfg.logging.level.clone()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Command::Show(args) => commands::show(&cfg, args).await,
        Command::Move(args) => commands::move_task(&cfg, args).await,
        Command::Toggle(args) => commands::toggle(&cfg, args).await,
        Command::Config => commands::show_config(&cfg),
    }
}
