pub mod core;
pub mod fetch_utils;
pub mod http_client;
pub mod urls;

pub use core::{FetchOutcome, MatchFetcher, MatchSource, UnavailableReason};
pub use http_client::create_http_client_with_timeout;
pub use urls::build_matches_url;
