//! Layout engines: date classification, segment granularity, track
//! assignment, canvas sizing, and filtering.

pub mod dates;
pub mod filter;
pub mod segments;
pub mod sizing;
pub mod tracks;
