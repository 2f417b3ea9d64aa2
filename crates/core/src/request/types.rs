//! Types for grouped request display.

use serde::{Deserialize, Serialize};

use crate::episode::{Episode, Movie, Show};

/// A resolved cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestItem {
    Movie(Movie),
    Episode(Episode),
}

/// Selected episodes of one season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonGroup {
    pub season: u32,
    /// Every known episode of the season is selected.
    pub is_full: bool,
    /// Chronologically consecutive stretches of the selection.
    pub runs: Vec<Vec<Episode>>,
    /// The selected episodes of this season, in chronological order.
    pub episodes: Vec<Episode>,
}

/// Selected episodes of one show, by season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowGroup {
    pub show: Show,
    pub seasons: Vec<SeasonGroup>,
}

impl ShowGroup {
    /// Number of selected episodes across all seasons.
    pub fn episode_count(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }
}

/// A cart's contents organized for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupedRequest {
    pub movies: Vec<Movie>,
    pub shows: Vec<ShowGroup>,
}

impl GroupedRequest {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.shows.is_empty()
    }
}
