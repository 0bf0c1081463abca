//! Fallback chain in front of the match fetcher.
//!
//! A listing is resolved by trying, strictly in order:
//! 1. the TTL cache
//! 2. the upstream fetcher (result cached on success)
//! 3. the local backup file
//! 4. the hardcoded sample
//!
//! The chain never fails. The caller learns which stage answered through
//! [`MatchListing::source`] and when the data was observed through
//! [`MatchListing::fetched_at`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::data_fetcher::api::{FetchOutcome, MatchFetcher, MatchSource};
use crate::data_fetcher::backup::BackupStore;
use crate::data_fetcher::cache::{CacheStats, TtlCache};
use crate::data_fetcher::models::{Match, MatchQuery};
use crate::data_fetcher::sample::sample_matches;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    Cache,
    Network,
    LocalBackup,
    Sample,
}

impl DataSource {
    /// True when the listing did not come from the upstream, directly or via cache
    pub fn is_offline(&self) -> bool {
        matches!(self, DataSource::LocalBackup | DataSource::Sample)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DataSource::Cache => "cache",
            DataSource::Network => "network",
            DataSource::LocalBackup => "local backup",
            DataSource::Sample => "sample data",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListing {
    pub matches: Vec<Match>,
    pub source: DataSource,
    /// When the records were observed upstream. A cache hit carries the time
    /// of the original fetch and a backup carries the file's modification
    /// time. `None` for sample data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl MatchListing {
    /// Observation time for merging with newer data. Listings of unknown age
    /// rank older than anything else.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.fetched_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[derive(Debug, Clone)]
struct CachedListing {
    fetched_at: DateTime<Utc>,
    matches: Vec<Match>,
}

pub struct MatchRepository<S = MatchFetcher> {
    source: S,
    cache: RwLock<TtlCache<CachedListing>>,
    backup: BackupStore,
    refresh_backup: bool,
}

impl MatchRepository<MatchFetcher> {
    /// Builds the production chain: HTTP fetcher, cache and backup file
    /// all configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Ok(Self::new(MatchFetcher::new(config)?, config))
    }
}

impl<S: MatchSource> MatchRepository<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self::with_parts(
            source,
            config.cache_ttl(),
            BackupStore::new(config.backup_path()),
            config.refresh_backup,
        )
    }

    pub fn with_parts(
        source: S,
        cache_ttl: Duration,
        backup: BackupStore,
        refresh_backup: bool,
    ) -> Self {
        Self {
            source,
            cache: RwLock::new(TtlCache::new(cache_ttl)),
            backup,
            refresh_backup,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Today's matches from whichever stage answers first.
    pub async fn get_matches(&self) -> Vec<Match> {
        self.load(&MatchQuery::today()).await.matches
    }

    #[instrument(skip(self), fields(key = %query.cache_key()))]
    pub async fn load(&self, query: &MatchQuery) -> MatchListing {
        let key = query.cache_key();

        if let Some(cached) = self.cache.write().await.get(&key) {
            debug!("Serving {} matches from cache", cached.matches.len());
            return MatchListing {
                matches: cached.matches,
                source: DataSource::Cache,
                fetched_at: Some(cached.fetched_at),
            };
        }

        match self.source.fetch_matches(query).await {
            FetchOutcome::Fetched(matches) => {
                let fetched_at = Utc::now();
                self.cache.write().await.set(
                    key,
                    CachedListing {
                        fetched_at,
                        matches: matches.clone(),
                    },
                    None,
                );
                if self.refresh_backup {
                    self.write_back(&matches).await;
                }
                return MatchListing {
                    matches,
                    source: DataSource::Network,
                    fetched_at: Some(fetched_at),
                };
            }
            FetchOutcome::Unavailable(reason) => {
                info!("Upstream unavailable ({}), trying local backup", reason);
            }
        }

        match self.backup.load().await {
            Ok(mut matches) => {
                let total = matches.len();
                matches.retain(|m| query.accepts(m));
                if !matches.is_empty() {
                    info!(
                        "Serving {} of {} matches from local backup",
                        matches.len(),
                        total
                    );
                    return MatchListing {
                        matches,
                        source: DataSource::LocalBackup,
                        fetched_at: self.backup.modified_at().await,
                    };
                }
                warn!(
                    "Local backup has no matches for this query ({} stored), using sample data",
                    total
                );
            }
            Err(e) => warn!("{}, using sample data", e),
        }

        MatchListing {
            matches: sample_matches(),
            source: DataSource::Sample,
            fetched_at: None,
        }
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    async fn write_back(&self, matches: &[Match]) {
        if let Err(e) = self.backup.save(matches).await {
            warn!("Failed to refresh local backup: {}", e);
        }
    }
}
