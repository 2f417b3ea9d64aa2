//! Mock media library for testing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::RwLock;

use crate::episode::{Episode, Movie, Show};
use crate::library::{EpisodeKey, LibraryError, MediaLibrary};

/// A recorded library query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedLibraryQuery {
    FindMovies { ids: Vec<u64> },
    FindEpisodes { keys: Vec<EpisodeKey> },
    FindAllEpisodes { show_ids: Vec<u64> },
    FindShows { ids: Vec<u64> },
}

/// Mock implementation of the MediaLibrary trait.
///
/// Provides controllable behavior for testing:
/// - Serve configurable shows, movies and episodes
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use lundflix_core::testing::{fixtures, MockLibrary};
///
/// let library = MockLibrary::new();
/// library.add_show(fixtures::show(1, "Alpha"));
/// library.add_episode(fixtures::episode(10, 1, 1, 1));
///
/// let by_show = library.find_all_episodes_for_shows(&[1])?;
/// assert_eq!(by_show[&1].len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockLibrary {
    shows: RwLock<BTreeMap<u64, Show>>,
    movies: RwLock<BTreeMap<u64, Movie>>,
    episodes: RwLock<BTreeMap<u64, Episode>>,
    queries: RwLock<Vec<RecordedLibraryQuery>>,
    /// If set, the next operation will fail with this message.
    next_error: RwLock<Option<String>>,
}

impl MockLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_show(&self, show: Show) {
        self.shows.write().unwrap().insert(show.id, show);
    }

    pub fn add_movie(&self, movie: Movie) {
        self.movies.write().unwrap().insert(movie.id, movie);
    }

    pub fn add_episode(&self, episode: Episode) {
        self.episodes.write().unwrap().insert(episode.id, episode);
    }

    /// Add several episodes at once.
    pub fn add_episodes(&self, episodes: impl IntoIterator<Item = Episode>) {
        let mut map = self.episodes.write().unwrap();
        for episode in episodes {
            map.insert(episode.id, episode);
        }
    }

    /// Remove an episode, simulating an upstream deletion.
    pub fn remove_episode(&self, id: u64) {
        self.episodes.write().unwrap().remove(&id);
    }

    pub fn remove_movie(&self, id: u64) {
        self.movies.write().unwrap().remove(&id);
    }

    /// Make the next lookup fail with a database error.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.next_error.write().unwrap() = Some(message.into());
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<RecordedLibraryQuery> {
        self.queries.read().unwrap().clone()
    }

    pub fn clear_queries(&self) {
        self.queries.write().unwrap().clear();
    }

    fn record(&self, query: RecordedLibraryQuery) -> Result<(), LibraryError> {
        self.queries.write().unwrap().push(query);
        match self.next_error.write().unwrap().take() {
            Some(message) => Err(LibraryError::Database(message)),
            None => Ok(()),
        }
    }
}

impl MediaLibrary for MockLibrary {
    fn find_movies_by_ids(&self, ids: &[u64]) -> Result<Vec<Movie>, LibraryError> {
        self.record(RecordedLibraryQuery::FindMovies { ids: ids.to_vec() })?;

        let movies = self.movies.read().unwrap();
        Ok(ids.iter().filter_map(|id| movies.get(id).cloned()).collect())
    }

    fn find_episodes_by_keys(&self, keys: &[EpisodeKey]) -> Result<Vec<Episode>, LibraryError> {
        self.record(RecordedLibraryQuery::FindEpisodes {
            keys: keys.to_vec(),
        })?;

        let episodes = self.episodes.read().unwrap();
        let mut matched: Vec<Episode> = episodes
            .values()
            .filter(|e| keys.iter().any(|key| key.matches(e)))
            .cloned()
            .collect();
        matched.sort_by_key(|e| (!e.is_significant(), e.id));

        let mut resolved = HashSet::new();
        matched.retain(|e| resolved.insert(EpisodeKey::of(e)));
        Ok(matched)
    }

    fn find_all_episodes_for_shows(
        &self,
        show_ids: &[u64],
    ) -> Result<HashMap<u64, Vec<Episode>>, LibraryError> {
        self.record(RecordedLibraryQuery::FindAllEpisodes {
            show_ids: show_ids.to_vec(),
        })?;

        let episodes = self.episodes.read().unwrap();
        let mut by_show: HashMap<u64, Vec<Episode>> = HashMap::new();
        for episode in episodes.values() {
            if show_ids.contains(&episode.show_id) && episode.is_significant() {
                by_show
                    .entry(episode.show_id)
                    .or_default()
                    .push(episode.clone());
            }
        }
        Ok(by_show)
    }

    fn find_shows_by_ids(&self, ids: &[u64]) -> Result<Vec<Show>, LibraryError> {
        self.record(RecordedLibraryQuery::FindShows { ids: ids.to_vec() })?;

        let shows = self.shows.read().unwrap();
        Ok(ids.iter().filter_map(|id| shows.get(id).cloned()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episode::{EpisodeIdentity, EpisodeType};
    use crate::testing::fixtures;

    #[test]
    fn test_records_queries() {
        let library = MockLibrary::new();
        library.find_movies_by_ids(&[1, 2]).unwrap();
        library.find_shows_by_ids(&[3]).unwrap();

        assert_eq!(
            library.queries(),
            vec![
                RecordedLibraryQuery::FindMovies { ids: vec![1, 2] },
                RecordedLibraryQuery::FindShows { ids: vec![3] },
            ]
        );

        library.clear_queries();
        assert!(library.queries().is_empty());
    }

    #[test]
    fn test_fail_next_only_fails_once() {
        let library = MockLibrary::new();
        library.fail_next("boom");

        assert!(library.find_movies_by_ids(&[1]).is_err());
        assert!(library.find_movies_by_ids(&[1]).is_ok());
    }

    #[test]
    fn test_find_all_excludes_insignificant_specials() {
        let library = MockLibrary::new();
        library.add_episodes(vec![
            fixtures::episode(1, 1, 1, 1),
            fixtures::typed_episode(2, 1, 1, 1, EpisodeType::InsignificantSpecial),
            fixtures::typed_episode(3, 1, 1, 2, EpisodeType::SignificantSpecial),
            fixtures::episode(4, 2, 1, 1),
        ]);

        let by_show = library.find_all_episodes_for_shows(&[1]).unwrap();
        let ids: Vec<u64> = by_show[&1].iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!by_show.contains_key(&2));
    }

    #[test]
    fn test_find_episodes_by_keys_after_removal() {
        let library = MockLibrary::new();
        library.add_episode(fixtures::episode(1, 1, 1, 1));
        let key = EpisodeKey::new(1, EpisodeIdentity::regular(1, 1));

        assert_eq!(library.find_episodes_by_keys(&[key]).unwrap().len(), 1);
        library.remove_episode(1);
        assert!(library.find_episodes_by_keys(&[key]).unwrap().is_empty());
    }
}
