//! Football match data with offline fallbacks and live updates
//!
//! This library fetches match listings from a football data API and keeps
//! them usable when the upstream is slow, rate limited or unreachable:
//!
//! - [`data_fetcher::cache`]: in-memory TTL cache
//! - [`data_fetcher::rate_limiter`]: advisory outbound call limiter
//! - [`data_fetcher::api`]: upstream fetcher and normalizer
//! - [`data_fetcher::repository`]: cache, network, backup file, sample data
//! - [`live`]: WebSocket push channel with exponential reconnect backoff
//! - [`data_fetcher::board`]: merges refreshes and pushes
//!
//! # Examples
//!
//! ```rust,no_run
//! use matchday_feed::config::Config;
//! use matchday_feed::data_fetcher::{MatchQuery, MatchRepository};
//! use matchday_feed::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let repository = MatchRepository::from_config(&config)?;
//!
//!     let listing = repository.load(&MatchQuery::today()).await;
//!     println!("{} matches from {}", listing.matches.len(), listing.source);
//!
//!     for m in &listing.matches {
//!         println!("{} {}-{} {}", m.home_team, m.score.home, m.score.away, m.away_team);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod live;

// Re-export commonly used types for convenience
pub use config::Config;
pub use data_fetcher::{
    DataSource, Match, MatchListing, MatchQuery, MatchRepository, MatchStatus, Score,
};
pub use error::AppError;
pub use live::{ConnectionState, DataUpdated, LiveChannel};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
