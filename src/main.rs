// src/main.rs
mod app;
mod cli;
mod commands;
mod display;
mod logging;

use clap::Parser;
use cli::{Args, is_config_update};
use matchday_feed::config::Config;
use matchday_feed::error::AppError;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    commands::validate_args(&args)?;

    let (log_file_path, _guard) = logging::setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.list_config {
        return commands::handle_list_config_command().await;
    }

    if is_config_update(&args) {
        return commands::handle_config_update_command(&args).await;
    }

    // Fail early on a broken config or bad filters
    let config = Config::load().await?;
    let query = commands::build_query(&args)?;

    if args.watch {
        app::run_watch(&args, config, query).await
    } else {
        commands::handle_once_command(&args, &config, &query).await
    }
}
