pub mod match_status;
pub mod normalize;

pub use match_status::{normalize_optional_status, normalize_status};
pub use normalize::{
    normalize_football_data_match, normalize_open_football_match, normalize_payload,
    parse_kickoff,
};
