pub mod api;
pub mod backup;
pub mod board;
pub mod cache;
pub mod models;
pub mod processors;
pub mod rate_limiter;
pub mod repository;
pub mod sample;

pub use api::{FetchOutcome, MatchFetcher, MatchSource, UnavailableReason};
pub use board::{MatchBoard, RefreshTicket};
pub use models::{Match, MatchQuery, MatchStatus, Score};
pub use repository::{DataSource, MatchListing, MatchRepository};
