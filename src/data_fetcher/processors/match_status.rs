use crate::data_fetcher::models::MatchStatus;

/// Maps an upstream status string onto the canonical [`MatchStatus`].
///
/// Both the football-data vocabulary (`SCHEDULED`, `IN_PLAY`, ...) and the
/// canonical lowercase names are accepted, case-insensitively. Anything
/// unrecognised is treated as upcoming.
///
/// # Examples
///
/// ```
/// use matchday_feed::data_fetcher::models::MatchStatus;
/// use matchday_feed::data_fetcher::processors::normalize_status;
///
/// assert_eq!(normalize_status("IN_PLAY"), MatchStatus::Live);
/// assert_eq!(normalize_status("POSTPONED"), MatchStatus::Cancelled);
/// assert_eq!(normalize_status("AWARDED"), MatchStatus::Upcoming);
/// ```
pub fn normalize_status(raw: &str) -> MatchStatus {
    match raw.trim().to_ascii_uppercase().as_str() {
        "SCHEDULED" | "TIMED" => MatchStatus::Upcoming,
        "LIVE" | "IN_PLAY" | "PAUSED" => MatchStatus::Live,
        "FINISHED" => MatchStatus::Finished,
        "POSTPONED" | "SUSPENDED" | "CANCELLED" => MatchStatus::Cancelled,
        other => {
            if !other.is_empty() && other != "UPCOMING" {
                tracing::debug!("Unmapped upstream status '{raw}', defaulting to upcoming");
            }
            MatchStatus::Upcoming
        }
    }
}

/// Like [`normalize_status`], treating a missing status as upcoming.
pub fn normalize_optional_status(raw: Option<&str>) -> MatchStatus {
    raw.map(normalize_status).unwrap_or_default()
}
