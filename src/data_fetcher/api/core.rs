use reqwest::Client;
use std::future::Future;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use super::fetch_utils::fetch;
use super::http_client::create_http_client_with_timeout;
use super::urls::build_matches_url;
use crate::config::Config;
use crate::data_fetcher::models::{Match, MatchQuery, UpstreamPayload};
use crate::data_fetcher::processors::normalize_payload;
use crate::data_fetcher::rate_limiter::{RateLimitPolicy, RateLimiter};
use crate::error::AppError;

/// Why a fetch produced no data. None of these is fatal; the fallback chain
/// treats every variant the same way.
#[derive(Debug)]
pub enum UnavailableReason {
    /// The limiter refused the call, no request was made
    RateLimited,
    /// No API key is configured, no request was made
    MissingApiKey,
    Upstream(AppError),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::RateLimited => f.write_str("rate limited"),
            UnavailableReason::MissingApiKey => f.write_str("no API key configured"),
            UnavailableReason::Upstream(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Vec<Match>),
    Unavailable(UnavailableReason),
}

impl FetchOutcome {
    pub fn into_matches(self) -> Option<Vec<Match>> {
        match self {
            FetchOutcome::Fetched(matches) => Some(matches),
            FetchOutcome::Unavailable(_) => None,
        }
    }
}

/// Anything that can produce a fresh match listing.
pub trait MatchSource: Send + Sync {
    fn fetch_matches(&self, query: &MatchQuery) -> impl Future<Output = FetchOutcome> + Send;
}

/// Fetches and normalizes match listings from the upstream API, gated by
/// the outbound rate limiter.
#[derive(Debug)]
pub struct MatchFetcher {
    client: Client,
    api_domain: String,
    api_key: Option<String>,
    limiter: Mutex<RateLimiter>,
}

impl MatchFetcher {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_domain: config.api_domain.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
            limiter: Mutex::new(RateLimiter::new(RateLimitPolicy::from(config))),
        }
    }

    /// Number of calls counted against the current rate window
    pub async fn calls_in_window(&self) -> usize {
        self.limiter.lock().await.call_count()
    }

    #[instrument(skip(self), fields(key = %query.cache_key()))]
    async fn fetch_from_upstream(&self, query: &MatchQuery) -> FetchOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("No API key configured, skipping upstream fetch");
            return FetchOutcome::Unavailable(UnavailableReason::MissingApiKey);
        };

        {
            let mut limiter = self.limiter.lock().await;
            if !limiter.can_call() {
                info!("Upstream call refused by rate limiter");
                return FetchOutcome::Unavailable(UnavailableReason::RateLimited);
            }
            // Counted as soon as it is attempted, whatever the outcome
            limiter.record_call();
        }

        let url = build_matches_url(&self.api_domain, query);
        match fetch::<UpstreamPayload>(&self.client, &url, api_key).await {
            Ok(payload) => {
                let matches = normalize_payload(payload);
                info!("Fetched {} matches from upstream", matches.len());
                FetchOutcome::Fetched(matches)
            }
            Err(e) => {
                if e.is_transient() {
                    warn!("Upstream fetch failed: {}", e);
                } else {
                    error!("Upstream fetch failed: {}", e);
                }
                FetchOutcome::Unavailable(UnavailableReason::Upstream(e))
            }
        }
    }
}

impl MatchSource for MatchFetcher {
    fn fetch_matches(&self, query: &MatchQuery) -> impl Future<Output = FetchOutcome> + Send {
        self.fetch_from_upstream(query)
    }
}
