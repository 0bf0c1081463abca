use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Canonical match status, independent of upstream vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
            MatchStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Score {
    #[serde(default)]
    pub home: u32,
    #[serde(default)]
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }
}

/// Canonical match record shared by every data source.
///
/// Records loaded from the backup file go through the same serde defaults,
/// so a partially filled record still satisfies the score and status invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "homeTeam")]
    pub home_team: String,
    #[serde(rename = "awayTeam")]
    pub away_team: String,
    #[serde(default = "unknown_competition")]
    pub competition: String,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(alias = "time", default = "Utc::now")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub score: Score,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }
}

pub(crate) fn unknown_competition() -> String {
    "Unknown competition".to_string()
}

/// Upstream ids are numeric, synthesized ids are strings; accept both.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
