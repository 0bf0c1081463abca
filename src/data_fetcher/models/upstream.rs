//! Wire models for the upstream match providers.
//!
//! Two shapes are understood: the football-data.org v4 `/matches` response
//! and the OpenFootball season files. Every field the normalizer can default
//! is optional here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamTeam {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamCompetition {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScorePair {
    #[serde(default)]
    pub home: Option<i64>,
    #[serde(default)]
    pub away: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamScore {
    #[serde(rename = "fullTime", default)]
    pub full_time: Option<ScorePair>,
}

/// One match in the football-data.org response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamMatch {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(rename = "homeTeam")]
    pub home_team: UpstreamTeam,
    #[serde(rename = "awayTeam")]
    pub away_team: UpstreamTeam,
    #[serde(default)]
    pub competition: Option<UpstreamCompetition>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "utcDate", default)]
    pub utc_date: Option<String>,
    #[serde(default)]
    pub score: Option<UpstreamScore>,
    #[serde(default)]
    pub venue: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<UpstreamMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OpenFootballScore {
    /// Full-time result as `[home, away]`
    #[serde(default)]
    pub ft: Option<Vec<i64>>,
}

/// One match in an OpenFootball season file. These carry no ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFootballMatch {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    pub team1: String,
    pub team2: String,
    #[serde(default)]
    pub score: Option<OpenFootballScore>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenFootballResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub matches: Vec<OpenFootballMatch>,
}

/// Any payload the fetcher knows how to normalize.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamPayload {
    FootballData(MatchesResponse),
    OpenFootball(OpenFootballResponse),
}
