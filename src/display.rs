//! Terminal rendering of match listings and live channel state

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use matchday_feed::data_fetcher::{DataSource, Match, MatchListing, MatchStatus};
use matchday_feed::error::AppError;
use matchday_feed::live::{ConnectionState, DataUpdated};
use std::io::{Write, stdout};

fn status_color(status: MatchStatus) -> Color {
    match status {
        MatchStatus::Live => Color::Green,
        MatchStatus::Finished => Color::White,
        MatchStatus::Upcoming => Color::Cyan,
        MatchStatus::Cancelled => Color::DarkGrey,
    }
}

fn source_color(source: DataSource) -> Color {
    match source {
        DataSource::Network | DataSource::Cache => Color::Green,
        DataSource::LocalBackup => Color::Yellow,
        DataSource::Sample => Color::Red,
    }
}

/// One listing row: kickoff, teams, score or status, competition
pub fn format_match_line(m: &Match) -> String {
    let result = match m.status {
        MatchStatus::Upcoming => "  -  ".to_string(),
        MatchStatus::Cancelled => "canc.".to_string(),
        _ => format!("{:>2}-{:<2}", m.score.home, m.score.away),
    };
    let live_marker = if m.is_live() { " *" } else { "" };

    format!(
        "{} {:<22} {:>5} {:<22} {}{}",
        m.date.format("%d.%m %H:%M"),
        m.home_team,
        result,
        m.away_team,
        m.competition,
        live_marker
    )
}

pub fn format_source_banner(source: DataSource) -> String {
    match source {
        DataSource::Network => "Source: network".to_string(),
        DataSource::Cache => "Showing cached data".to_string(),
        _ => format!("Offline: showing {source}"),
    }
}

pub fn print_listing(listing: &MatchListing) -> Result<(), AppError> {
    let mut out = stdout();

    queue!(
        out,
        SetForegroundColor(source_color(listing.source)),
        Print(format_source_banner(listing.source)),
        ResetColor,
        Print("\n")
    )?;

    if listing.matches.is_empty() {
        queue!(out, Print("No matches.\n"))?;
    }

    for m in &listing.matches {
        queue!(
            out,
            SetForegroundColor(status_color(m.status)),
            Print(format_match_line(m)),
            ResetColor,
            Print("\n")
        )?;
    }

    out.flush()?;
    Ok(())
}

pub fn print_listing_json(listing: &MatchListing) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(listing)?);
    Ok(())
}

pub fn print_update_json(update: &DataUpdated) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(update)?);
    Ok(())
}

pub fn print_connection_state(state: ConnectionState) -> Result<(), AppError> {
    let color = match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting | ConnectionState::Disconnected => Color::Yellow,
        ConnectionState::Stopped => Color::Red,
    };
    let label = if state.is_offline() {
        "Live updates offline".to_string()
    } else {
        format!("Live updates: {state}")
    };

    let mut out = stdout();
    queue!(
        out,
        SetForegroundColor(color),
        Print(label),
        ResetColor,
        Print("\n")
    )?;
    out.flush()?;
    Ok(())
}
