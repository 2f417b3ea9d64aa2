//! Episode identity: canonical codes, record types and chronological ordering.

mod code;
mod types;

pub use code::{EpisodeCode, EpisodeCodeError};
pub use types::{Episode, EpisodeIdentity, EpisodeType, Movie, Show};
