pub mod matches;
pub mod query;
pub mod upstream;

pub use matches::{Match, MatchStatus, Score};
pub use query::MatchQuery;
pub use upstream::{
    MatchesResponse, OpenFootballMatch, OpenFootballResponse, UpstreamMatch, UpstreamPayload,
};
