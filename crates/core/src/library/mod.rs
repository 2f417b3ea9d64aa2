//! Media library - read access to the shows, movies and episodes written by
//! the metadata sync jobs.

mod sqlite;
mod types;

pub use sqlite::SqliteLibrary;
pub use types::*;

use std::collections::HashMap;

use crate::episode::{Episode, Movie, Show};

/// Trait for media library backends.
///
/// Lookups return only the records that exist; ids that no longer resolve
/// are simply absent from the result.
pub trait MediaLibrary: Send + Sync {
    /// Fetch movies by id in a single batch.
    fn find_movies_by_ids(&self, ids: &[u64]) -> Result<Vec<Movie>, LibraryError>;

    /// Fetch episodes matching any of the given keys in a single batch.
    ///
    /// At most one episode is returned per key. When a significant and an
    /// insignificant special share a season and number, the significant one
    /// is returned.
    fn find_episodes_by_keys(&self, keys: &[EpisodeKey]) -> Result<Vec<Episode>, LibraryError>;

    /// Fetch every episode of the given shows, excluding insignificant
    /// specials, grouped by show id.
    fn find_all_episodes_for_shows(
        &self,
        show_ids: &[u64],
    ) -> Result<HashMap<u64, Vec<Episode>>, LibraryError>;

    /// Fetch shows by id.
    fn find_shows_by_ids(&self, ids: &[u64]) -> Result<Vec<Show>, LibraryError>;
}
