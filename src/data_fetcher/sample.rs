use chrono::{Duration, Utc};

use crate::data_fetcher::models::{Match, MatchStatus, Score};

/// Last-resort listing served when neither the upstream nor the backup
/// file can provide data. Always contains exactly one well-formed match.
pub fn sample_matches() -> Vec<Match> {
    vec![Match {
        id: "fallback_1".to_string(),
        home_team: "Manchester United".to_string(),
        away_team: "Liverpool".to_string(),
        competition: "Premier League".to_string(),
        status: MatchStatus::Upcoming,
        date: Utc::now() + Duration::hours(2),
        score: Score::default(),
        venue: Some("Old Trafford".to_string()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_single_upcoming_match() {
        let sample = sample_matches();
        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0].id, "fallback_1");
        assert_eq!(sample[0].status, MatchStatus::Upcoming);
        assert!(sample[0].date > Utc::now());
    }
}
