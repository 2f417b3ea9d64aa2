//! Human-readable labels for episode runs and seasons.

use crate::episode::Episode;

/// Formats cart contents for display.
pub struct CartItemFormatter;

impl CartItemFormatter {
    /// Label a single episode: `S01E05` or `S02S03` for specials.
    pub fn format_episode(episode: &Episode) -> String {
        format!("S{:02}{}", episode.season, Self::segment(episode))
    }

    /// Label a chronologically ordered, contiguous run of episodes.
    ///
    /// The end of a multi-episode run drops the season when it matches the
    /// start (`S01E01-E03`) but always keeps its own segment letter, so a run
    /// ending on a special reads `S01E07-S01`.
    pub fn format_run(episodes: &[Episode]) -> String {
        let (first, last) = match (episodes.first(), episodes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return String::new(),
        };

        if episodes.len() == 1 {
            return Self::format_episode(first);
        }

        let end = if last.season == first.season {
            Self::segment(last)
        } else {
            Self::format_episode(last)
        };

        format!("{}-{}", Self::format_episode(first), end)
    }

    /// Season heading without padding, e.g. `Season 1`.
    pub fn format_season(season: u32) -> String {
        format!("Season {}", season)
    }

    fn segment(episode: &Episode) -> String {
        let letter = if episode.is_special() { 'S' } else { 'E' };
        format!("{}{:02}", letter, episode.number)
    }
}
