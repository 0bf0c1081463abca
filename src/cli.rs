use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// True when the invocation only edits the stored configuration
pub fn is_config_update(args: &Args) -> bool {
    args.new_api_domain.is_some()
        || args.new_api_key.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// Football match listings in your terminal
///
/// By default prints today's matches once and exits. Data comes from the
/// upstream API when possible; otherwise a cached copy, the local backup
/// file or built-in sample data is shown, and the header says which.
///
/// With --watch the listing refreshes periodically and, when a live server
/// is configured, applies pushed score updates until Ctrl-C.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Keep refreshing and listen for live updates until Ctrl-C
    #[arg(short, long)]
    pub watch: bool,

    /// Print listings as JSON instead of formatted text
    #[arg(short, long, help_heading = "Display Options")]
    pub json: bool,

    /// Only show matches with this upstream status (e.g. LIVE, FINISHED, SCHEDULED)
    #[arg(long, help_heading = "Filters")]
    pub status: Option<String>,

    /// First day of the listing in YYYY-MM-DD format
    #[arg(long = "date-from", help_heading = "Filters")]
    pub date_from: Option<String>,

    /// Last day of the listing in YYYY-MM-DD format
    #[arg(long = "date-to", help_heading = "Filters")]
    pub date_to: Option<String>,

    /// Subscribe to live updates for a match id. Can be repeated. Requires --watch.
    #[arg(long = "subscribe", value_name = "MATCH_ID", help_heading = "Live Updates")]
    pub subscribe: Vec<String>,

    /// Live channel name used for subscriptions
    #[arg(long, default_value = "match", help_heading = "Live Updates")]
    pub channel: String,

    /// Update API domain in config
    #[arg(long = "config", help_heading = "Configuration", value_name = "API_DOMAIN")]
    pub new_api_domain: Option<String>,

    /// Store the upstream API key in config
    #[arg(long = "set-api-key", help_heading = "Configuration", value_name = "KEY")]
    pub new_api_key: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Mirror log output to the terminal in addition to the log file
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
