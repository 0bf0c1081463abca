use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::match_status::normalize_optional_status;
use crate::data_fetcher::models::matches::unknown_competition;
use crate::data_fetcher::models::upstream::{OpenFootballMatch, UpstreamMatch};
use crate::data_fetcher::models::{Match, Score, UpstreamPayload};

const UNKNOWN_TEAM: &str = "Unknown team";

/// Normalizes any supported upstream payload into canonical matches.
pub fn normalize_payload(payload: UpstreamPayload) -> Vec<Match> {
    match payload {
        UpstreamPayload::FootballData(response) => response
            .matches
            .into_iter()
            .map(normalize_football_data_match)
            .collect(),
        UpstreamPayload::OpenFootball(response) => {
            let competition = response.name.unwrap_or_else(unknown_competition);
            response
                .matches
                .into_iter()
                .map(|m| normalize_open_football_match(m, &competition))
                .collect()
        }
    }
}

/// Maps one football-data.org record onto the canonical shape.
pub fn normalize_football_data_match(upstream: UpstreamMatch) -> Match {
    let home_team = team_name(upstream.home_team.name, upstream.home_team.short_name);
    let away_team = team_name(upstream.away_team.name, upstream.away_team.short_name);
    let date = parse_kickoff(upstream.utc_date.as_deref(), None);

    let full_time = upstream.score.and_then(|s| s.full_time).unwrap_or_default();
    let score = Score::new(clamp_goals(full_time.home), clamp_goals(full_time.away));

    let id = match upstream.id {
        Some(id) => id.to_string(),
        None => synthesize_id(&date.format("%Y-%m-%d").to_string(), &home_team, &away_team),
    };

    Match {
        id,
        home_team,
        away_team,
        competition: upstream
            .competition
            .and_then(|c| c.name)
            .unwrap_or_else(unknown_competition),
        status: normalize_optional_status(upstream.status.as_deref()),
        date,
        score,
        venue: upstream.venue.filter(|v| !v.trim().is_empty()),
    }
}

/// Maps one OpenFootball record onto the canonical shape. These records have
/// no ids, so one is synthesized from kickoff date and team names.
pub fn normalize_open_football_match(upstream: OpenFootballMatch, competition: &str) -> Match {
    let date = parse_kickoff(upstream.date.as_deref(), upstream.time.as_deref());
    let score = upstream
        .score
        .and_then(|s| s.ft)
        .map(|ft| {
            Score::new(
                clamp_goals(ft.first().copied()),
                clamp_goals(ft.get(1).copied()),
            )
        })
        .unwrap_or_default();

    // Id uses the raw date string when present so it stays stable across runs
    let id_date = upstream
        .date
        .clone()
        .unwrap_or_else(|| date.format("%Y-%m-%d").to_string());
    let id = synthesize_id(&id_date, &upstream.team1, &upstream.team2);

    Match {
        id,
        home_team: upstream.team1,
        away_team: upstream.team2,
        competition: competition.to_string(),
        status: normalize_optional_status(upstream.status.as_deref()),
        date,
        score,
        venue: upstream.venue,
    }
}

/// Parses an upstream kickoff timestamp.
///
/// Accepts RFC 3339 timestamps, or a `YYYY-MM-DD` date with an optional
/// `HH:MM` time (interpreted as UTC). Falls back to the current time when
/// nothing usable is supplied.
pub fn parse_kickoff(date: Option<&str>, time: Option<&str>) -> DateTime<Utc> {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return Utc::now();
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return parsed.with_timezone(&Utc);
    }

    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => {
            let clock = time
                .and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok())
                .unwrap_or(NaiveTime::MIN);
            NaiveDateTime::new(day, clock).and_utc()
        }
        Err(e) => {
            tracing::warn!("Unparseable kickoff '{date}': {e}, defaulting to now");
            Utc::now()
        }
    }
}

/// Builds `open_{date}_{home}_{away}` with whitespace runs replaced by `_`.
fn synthesize_id(date: &str, home: &str, away: &str) -> String {
    format!("open_{date}_{home}_{away}")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn team_name(name: Option<String>, short_name: Option<String>) -> String {
    name.or(short_name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string())
}

fn clamp_goals(goals: Option<i64>) -> u32 {
    goals
        .and_then(|g| u32::try_from(g).ok())
        .unwrap_or(0)
}
