//! Types for media library lookups.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::episode::{Episode, EpisodeIdentity};

/// Lookup key for a single episode of a show.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeKey {
    pub show_id: u64,
    pub season: u32,
    pub number: u32,
    pub is_special: bool,
}

impl EpisodeKey {
    pub fn new(show_id: u64, identity: EpisodeIdentity) -> Self {
        Self {
            show_id,
            season: identity.season,
            number: identity.number,
            is_special: identity.is_special,
        }
    }

    /// Key of a loaded episode record.
    pub fn of(episode: &Episode) -> Self {
        Self::new(episode.show_id, EpisodeIdentity::of(episode))
    }

    /// Whether a loaded record is the episode this key points at.
    pub fn matches(&self, episode: &Episode) -> bool {
        *self == Self::of(episode)
    }
}

/// Errors for library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::EpisodeType;

    #[test]
    fn test_key_matches_special_kinds() {
        let mut episode = Episode {
            id: 10,
            show_id: 3,
            season: 2,
            number: 1,
            episode_type: EpisodeType::SignificantSpecial,
            airdate: None,
            name: None,
        };

        let key = EpisodeKey::new(3, EpisodeIdentity::special(2, 1));
        assert!(key.matches(&episode));

        episode.episode_type = EpisodeType::Regular;
        assert!(!key.matches(&episode));
    }
}
