//! Testing utilities and mock implementations.
//!
//! This module provides a mock media library and record builders, allowing
//! cart and grouping tests without a database.
//!
//! # Example
//!
//! ```rust,ignore
//! use lundflix_core::testing::{fixtures, MockLibrary};
//!
//! let library = MockLibrary::new();
//! library.add_show(fixtures::show(1, "Alpha"));
//! library.add_episodes(fixtures::weekly_season(1, 1, 100, 10, "2024-01-01"));
//! ```

mod mock_library;

pub use mock_library::{MockLibrary, RecordedLibraryQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{Duration, NaiveDate};

    use crate::episode::{Episode, EpisodeType, Movie, Show};

    /// Create a show.
    pub fn show(id: u64, name: &str) -> Show {
        Show {
            id,
            name: name.to_string(),
        }
    }

    /// Create a movie.
    pub fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year: None,
        }
    }

    /// Create a regular episode without an air date.
    pub fn episode(id: u64, show_id: u64, season: u32, number: u32) -> Episode {
        typed_episode(id, show_id, season, number, EpisodeType::Regular)
    }

    /// Create an undated episode of the given type.
    pub fn typed_episode(
        id: u64,
        show_id: u64,
        season: u32,
        number: u32,
        episode_type: EpisodeType,
    ) -> Episode {
        Episode {
            id,
            show_id,
            season,
            number,
            episode_type,
            airdate: None,
            name: Some(format!("Episode {}", number)),
        }
    }

    /// Create a regular episode with an air date (`YYYY-MM-DD`).
    ///
    /// Panics on a malformed date.
    pub fn dated_episode(id: u64, show_id: u64, season: u32, number: u32, airdate: &str) -> Episode {
        let mut episode = episode(id, show_id, season, number);
        episode.airdate = Some(
            NaiveDate::parse_from_str(airdate, "%Y-%m-%d").expect("fixture airdate is valid"),
        );
        episode
    }

    /// Create a season of regular episodes airing weekly from `first_airdate`.
    ///
    /// Episode ids start at `first_id` and increase with the episode number.
    pub fn weekly_season(
        show_id: u64,
        season: u32,
        first_id: u64,
        count: u32,
        first_airdate: &str,
    ) -> Vec<Episode> {
        let start =
            NaiveDate::parse_from_str(first_airdate, "%Y-%m-%d").expect("fixture airdate is valid");
        (1..=count)
            .map(|number| {
                let mut episode =
                    episode(first_id + u64::from(number) - 1, show_id, season, number);
                episode.airdate = Some(start + Duration::weeks(i64::from(number) - 1));
                episode
            })
            .collect()
    }
}
