use crate::cli::Args;
use crate::display;
use matchday_feed::config::Config;
use matchday_feed::data_fetcher::{MatchQuery, MatchRepository};
use matchday_feed::error::AppError;
use std::path::Path;
use tracing::info;

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if !args.subscribe.is_empty() && !args.watch {
        return Err(AppError::config_error(
            "--subscribe only has an effect together with --watch",
        ));
    }
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use --set-log-file and --clear-log-file together",
        ));
    }
    Ok(())
}

/// Builds the listing query from the filter arguments.
pub fn build_query(args: &Args) -> Result<MatchQuery, AppError> {
    let mut query =
        MatchQuery::today().with_dates(args.date_from.as_deref(), args.date_to.as_deref())?;
    if let Some(status) = &args.status {
        query = query.with_status(status)?;
    }
    Ok(query)
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--config, --set-api-key,
/// --set-log-file, --clear-log-file).
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    update_config_file(args, &Config::get_config_path()).await?;
    println!("Config updated successfully!");
    Ok(())
}

/// Applies the requested edits to the config file at `path`.
///
/// Starts from the file contents alone so `MATCHDAY_*` environment
/// overrides are never written to disk.
async fn update_config_file(args: &Args, path: &str) -> Result<Config, AppError> {
    let mut config = if Path::new(path).exists() {
        Config::load_from_path(path).await?
    } else {
        Config::default()
    };

    if let Some(new_domain) = &args.new_api_domain {
        config.api_domain = new_domain.clone();
    }

    if let Some(new_key) = &args.new_api_key {
        config.api_key = Some(new_key.trim().to_string()).filter(|k| !k.is_empty());
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save_to_path(path).await?;
    Ok(config)
}

/// Fetches the listing once through the fallback chain, prints it and exits.
pub async fn handle_once_command(
    args: &Args,
    config: &Config,
    query: &MatchQuery,
) -> Result<(), AppError> {
    let repository = MatchRepository::from_config(config)?;
    let listing = repository.load(query).await;
    info!(
        "Loaded {} matches from {}",
        listing.matches.len(),
        listing.source
    );

    if args.json {
        display::print_listing_json(&listing)
    } else {
        display::print_listing(&listing)
    }
}
