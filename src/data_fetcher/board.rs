//! Merged view of periodic snapshots and live push updates.
//!
//! Snapshots decide which matches exist. Push updates can only change the
//! status and score of a match already on the board. When both describe the
//! same match, the observation with the newer timestamp wins.
//!
//! Refreshes may overlap. Each one takes a [`RefreshTicket`] up front and a
//! snapshot carrying a ticket older than the last applied one is dropped.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::data_fetcher::models::{Match, Score};
use crate::data_fetcher::models::matches::string_or_number;
use crate::data_fetcher::processors::normalize_status;
use crate::live::{DataUpdated, UpdateKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone)]
struct BoardEntry {
    item: Match,
    observed_at: DateTime<Utc>,
}

/// Fields a `matchUpdate` push may carry
#[derive(Debug, Deserialize)]
struct MatchPatch {
    #[serde(alias = "matchId", deserialize_with = "string_or_number")]
    id: String,
    status: Option<String>,
    score: Option<Score>,
}

#[derive(Debug, Default)]
pub struct MatchBoard {
    entries: Vec<BoardEntry>,
    issued: u64,
    applied: Option<RefreshTicket>,
}

impl MatchBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the ticket for a refresh that is about to start
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket(self.issued)
    }

    /// Applies a snapshot. Returns false when it was superseded by a
    /// snapshot from a later refresh.
    pub fn apply_snapshot(
        &mut self,
        ticket: RefreshTicket,
        matches: Vec<Match>,
        observed_at: DateTime<Utc>,
    ) -> bool {
        if self.applied.is_some_and(|applied| ticket < applied) {
            debug!(
                "Discarding late snapshot {:?}, already applied {:?}",
                ticket, self.applied
            );
            return false;
        }

        let previous = std::mem::take(&mut self.entries);
        self.entries = matches
            .into_iter()
            .map(|item| {
                match previous
                    .iter()
                    .find(|entry| entry.item.id == item.id && entry.observed_at > observed_at)
                {
                    Some(newer) => newer.clone(),
                    None => BoardEntry { item, observed_at },
                }
            })
            .collect();
        self.applied = Some(ticket);
        true
    }

    /// Applies a push update. Returns true when the board changed.
    pub fn apply_push(&mut self, update: &DataUpdated) -> bool {
        if update.kind != UpdateKind::MatchUpdate {
            return false;
        }

        let patch: MatchPatch = match serde_json::from_value(update.data.clone()) {
            Ok(patch) => patch,
            Err(e) => {
                debug!("Ignoring malformed match update: {}", e);
                return false;
            }
        };

        let Some(entry) = self.entries.iter_mut().find(|e| e.item.id == patch.id) else {
            debug!("Ignoring update for unknown match {}", patch.id);
            return false;
        };

        if entry.observed_at > update.timestamp {
            debug!("Ignoring stale update for match {}", patch.id);
            return false;
        }

        if let Some(status) = patch.status.as_deref() {
            entry.item.status = normalize_status(status);
        }
        if let Some(score) = patch.score {
            entry.item.score = score;
        }
        entry.observed_at = update.timestamp;
        true
    }

    pub fn matches(&self) -> Vec<Match> {
        self.entries.iter().map(|entry| entry.item.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
