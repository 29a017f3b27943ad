//! Client and best-match resolver for the KHS heritage open API.
//!
//! The list endpoint returns loosely matching candidates for a name and
//! region; [`Resolver`] ranks them by name similarity, fetches details for the
//! most promising few, and picks the one closest to where the user clicked.

pub mod client;
pub mod error;
pub mod geo;
pub mod normalize;
pub mod parse;
pub mod resolver;
pub mod types;

pub use client::KhsClient;
pub use error::{KhsError, ResolveError};
pub use geo::{distance_bonus, haversine_km, GeoPoint, EARTH_RADIUS_KM};
pub use normalize::{name_score, normalize_name};
pub use parse::{parse_detail, parse_list_items};
pub use resolver::{
    score_detail, HeritageSource, Resolver, DEFAULT_LIST_PAGE_SIZE, DEFAULT_TOP_N,
};
pub use types::{
    Candidate, DetailKey, DetailRecord, ListItem, ListQuery, ResolveRequest, ScoredCandidate,
};
