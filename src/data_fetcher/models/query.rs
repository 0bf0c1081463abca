use chrono::NaiveDate;

use crate::constants::MATCHES_TODAY_KEY;
use crate::data_fetcher::models::Match;
use crate::data_fetcher::processors::normalize_status;
use crate::error::AppError;

/// A logical match listing request.
///
/// The default query asks the upstream for today's matches and is cached
/// under [`MATCHES_TODAY_KEY`]. Every other combination gets its own key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MatchQuery {
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl MatchQuery {
    pub fn today() -> Self {
        Self::default()
    }

    /// Restricts the listing to an upstream status token such as `LIVE`.
    pub fn with_status(mut self, status: &str) -> Result<Self, AppError> {
        let status = status.trim().to_ascii_uppercase();
        if status.is_empty()
            || !status
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AppError::config_error(format!(
                "Invalid status filter '{status}'"
            )));
        }
        self.status = Some(status);
        Ok(self)
    }

    /// Restricts the listing to a date range given as `YYYY-MM-DD` strings.
    /// Either bound may be omitted.
    pub fn with_dates(mut self, from: Option<&str>, to: Option<&str>) -> Result<Self, AppError> {
        self.date_from = from.map(parse_date).transpose()?;
        self.date_to = to.map(parse_date).transpose()?;

        if let (Some(from), Some(to)) = (self.date_from, self.date_to)
            && from > to
        {
            return Err(AppError::datetime_parse_error(format!(
                "dateFrom {from} is after dateTo {to}"
            )));
        }
        Ok(self)
    }

    pub fn is_today(&self) -> bool {
        self == &Self::default()
    }

    /// True when `record` satisfies the status and date filters.
    ///
    /// The upstream applies these filters itself. Records that did not come
    /// straight from it, such as the local backup, are checked here. The
    /// status token is compared in its normalized form, so `IN_PLAY` and
    /// `LIVE` select the same records.
    pub fn accepts(&self, record: &Match) -> bool {
        if let Some(status) = &self.status
            && normalize_status(status) != record.status
        {
            return false;
        }
        let day = record.date.date_naive();
        self.date_from.is_none_or(|from| day >= from) && self.date_to.is_none_or(|to| day <= to)
    }

    /// Upstream query parameters in a stable order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = &self.status {
            params.push(("status", status.clone()));
        }
        if let Some(from) = self.date_from {
            params.push(("dateFrom", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.date_to {
            params.push(("dateTo", to.format("%Y-%m-%d").to_string()));
        }
        params
    }

    pub fn cache_key(&self) -> String {
        if self.is_today() {
            return MATCHES_TODAY_KEY.to_string();
        }
        let params = self
            .params()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("matches?{params}")
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::datetime_parse_error(format!("Invalid date '{raw}': {e}")))
}
