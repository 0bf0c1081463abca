//! URL building utilities for API endpoints

use crate::data_fetcher::models::MatchQuery;

/// Builds the match listing URL for a query.
///
/// # Example
/// ```
/// use matchday_feed::data_fetcher::api::build_matches_url;
/// use matchday_feed::data_fetcher::models::MatchQuery;
///
/// let url = build_matches_url("https://api.example.com/v4/", &MatchQuery::today());
/// assert_eq!(url, "https://api.example.com/v4/matches");
///
/// let live = MatchQuery::today().with_status("LIVE").unwrap();
/// let url = build_matches_url("https://api.example.com/v4", &live);
/// assert_eq!(url, "https://api.example.com/v4/matches?status=LIVE");
/// ```
pub fn build_matches_url(api_domain: &str, query: &MatchQuery) -> String {
    let base = format!("{}/matches", api_domain.trim_end_matches('/'));
    let params = query.params();
    if params.is_empty() {
        return base;
    }

    let query_string = params
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query_string}")
}
