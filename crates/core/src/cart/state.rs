//! Cart state as persisted in the session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::episode::{Episode, EpisodeIdentity, Movie};

/// A selected episode: the show and the canonical episode code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartEpisode {
    pub show_id: u64,
    pub code: String,
}

impl CartEpisode {
    pub fn new(show_id: u64, identity: EpisodeIdentity) -> Self {
        Self {
            show_id,
            code: identity.code(),
        }
    }
}

/// The selection held for one session.
///
/// Both collections are sets, so a movie id or a `(show_id, code)` pair can
/// appear at most once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartState {
    #[serde(default)]
    pub movies: BTreeSet<u64>,
    #[serde(default)]
    pub episodes: BTreeSet<CartEpisode>,
}

impl CartState {
    pub fn len(&self) -> usize {
        self.movies.len() + self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.episodes.is_empty()
    }

    /// Flip a movie's membership and return whether it is now selected.
    pub fn toggle_movie(&mut self, movie_id: u64) -> bool {
        if self.movies.remove(&movie_id) {
            false
        } else {
            self.movies.insert(movie_id);
            true
        }
    }

    /// Flip an episode's membership and return whether it is now selected.
    pub fn toggle_episode(&mut self, episode: CartEpisode) -> bool {
        if self.episodes.remove(&episode) {
            false
        } else {
            self.episodes.insert(episode);
            true
        }
    }

    /// Replace every episode of `show_id` with `episodes`.
    pub fn replace_show_episodes(
        &mut self,
        show_id: u64,
        episodes: impl IntoIterator<Item = CartEpisode>,
    ) {
        self.episodes.retain(|e| e.show_id != show_id);
        self.episodes
            .extend(episodes.into_iter().filter(|e| e.show_id == show_id));
    }

    /// Codes currently selected for one show.
    pub fn show_codes(&self, show_id: u64) -> Vec<String> {
        self.episodes
            .iter()
            .filter(|e| e.show_id == show_id)
            .map(|e| e.code.clone())
            .collect()
    }
}

/// Something a user can put in the cart, resolved at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selectable {
    Movie(u64),
    Episode {
        show_id: u64,
        identity: EpisodeIdentity,
    },
}

impl Selectable {
    pub fn episode(show_id: u64, season: u32, number: u32, is_special: bool) -> Self {
        Selectable::Episode {
            show_id,
            identity: EpisodeIdentity::new(season, number, is_special),
        }
    }
}

impl From<&Movie> for Selectable {
    fn from(movie: &Movie) -> Self {
        Selectable::Movie(movie.id)
    }
}

impl From<&Episode> for Selectable {
    fn from(episode: &Episode) -> Self {
        Selectable::Episode {
            show_id: episode.show_id,
            identity: EpisodeIdentity::of(episode),
        }
    }
}
