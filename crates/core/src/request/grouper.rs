//! Groups resolved cart items into shows, seasons and consecutive runs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{GroupedRequest, RequestItem, SeasonGroup, ShowGroup};
use crate::episode::{Episode, EpisodeCode, Movie, Show};
use crate::library::{LibraryError, MediaLibrary};

/// Builds the display tree for a request.
///
/// Completeness and runs are judged against every known episode of a show,
/// fetched from the library, not just against the selection.
pub struct RequestItemGrouper {
    library: Arc<dyn MediaLibrary>,
}

impl RequestItemGrouper {
    pub fn new(library: Arc<dyn MediaLibrary>) -> Self {
        Self { library }
    }

    /// Group resolved items into movies and per-show season groups.
    ///
    /// Shows are ordered by name, seasons ascending, runs chronologically.
    pub fn group(&self, items: Vec<RequestItem>) -> Result<GroupedRequest, LibraryError> {
        let (movies, episodes) = partition_items(items);
        if episodes.is_empty() {
            return Ok(GroupedRequest {
                movies,
                shows: Vec::new(),
            });
        }

        let selected_by_show = group_by_show(episodes);
        let show_ids: Vec<u64> = selected_by_show.keys().copied().collect();

        let mut reference_by_show = self.library.find_all_episodes_for_shows(&show_ids)?;
        let mut shows: HashMap<u64, Show> = self
            .library
            .find_shows_by_ids(&show_ids)?
            .into_iter()
            .map(|show| (show.id, show))
            .collect();

        let mut groups = Vec::with_capacity(selected_by_show.len());
        for (show_id, selected) in selected_by_show {
            let show = shows.remove(&show_id).unwrap_or_else(|| {
                warn!(
                    "Show {} no longer resolves, listing {} selected episodes under a placeholder",
                    show_id,
                    selected.len()
                );
                Show::placeholder(show_id)
            });

            let reference = reference_by_show.remove(&show_id).unwrap_or_default();
            groups.push(ShowGroup {
                show,
                seasons: group_seasons(selected, reference),
            });
        }

        groups.sort_by(|a, b| {
            a.show
                .name
                .cmp(&b.show.name)
                .then_with(|| a.show.id.cmp(&b.show.id))
        });

        debug!(
            "Grouped request: {} movies, {} shows",
            movies.len(),
            groups.len()
        );

        Ok(GroupedRequest {
            movies,
            shows: groups,
        })
    }
}

/// Split resolved items into movies and episodes, keeping input order.
pub fn partition_items(items: Vec<RequestItem>) -> (Vec<Movie>, Vec<Episode>) {
    let mut movies = Vec::new();
    let mut episodes = Vec::new();
    for item in items {
        match item {
            RequestItem::Movie(movie) => movies.push(movie),
            RequestItem::Episode(episode) => episodes.push(episode),
        }
    }
    (movies, episodes)
}

/// Episodes keyed by show id.
pub fn group_by_show(episodes: Vec<Episode>) -> BTreeMap<u64, Vec<Episode>> {
    let mut by_show: BTreeMap<u64, Vec<Episode>> = BTreeMap::new();
    for episode in episodes {
        by_show.entry(episode.show_id).or_default().push(episode);
    }
    by_show
}

/// Episodes keyed by season number.
pub fn group_by_season(episodes: Vec<Episode>) -> BTreeMap<u32, Vec<Episode>> {
    let mut by_season: BTreeMap<u32, Vec<Episode>> = BTreeMap::new();
    for episode in episodes {
        by_season.entry(episode.season).or_default().push(episode);
    }
    by_season
}

/// Build the season groups of one show.
///
/// Only seasons with at least one selected episode produce a group.
pub fn group_seasons(selected: Vec<Episode>, reference: Vec<Episode>) -> Vec<SeasonGroup> {
    let mut reference_by_season = group_by_season(reference);

    group_by_season(selected)
        .into_iter()
        .map(|(season, mut episodes)| {
            let reference = reference_by_season.remove(&season).unwrap_or_default();
            EpisodeCode::sort(&mut episodes);

            SeasonGroup {
                season,
                is_full: is_full_season(&reference, &episodes),
                runs: build_runs(&reference, &episodes),
                episodes,
            }
        })
        .collect()
}

/// Whether the selection covers exactly the known episodes of a season.
///
/// Insignificant specials are ignored on both sides. A season with no known
/// episodes is never full.
pub fn is_full_season(reference: &[Episode], selected: &[Episode]) -> bool {
    let mut reference_ids: Vec<u64> = reference
        .iter()
        .filter(|e| e.is_significant())
        .map(|e| e.id)
        .collect();
    if reference_ids.is_empty() {
        return false;
    }

    let mut selected_ids: Vec<u64> = selected
        .iter()
        .filter(|e| e.is_significant())
        .map(|e| e.id)
        .collect();

    reference_ids.sort_unstable();
    reference_ids.dedup();
    selected_ids.sort_unstable();
    selected_ids.dedup();

    reference_ids == selected_ids
}

/// Partition a season's selection into maximal chronological runs.
///
/// The reference episodes are walked in [`EpisodeCode::compare_for_sorting`]
/// order; every unselected reference episode ends the current run. When the
/// season has no reference episodes the selection itself is the ordering.
/// Selected episodes absent from a non-empty reference are appended as
/// single-episode runs.
pub fn build_runs(reference: &[Episode], selected: &[Episode]) -> Vec<Vec<Episode>> {
    let selected_ids: HashSet<u64> = selected.iter().map(|e| e.id).collect();

    let mut ordering: Vec<Episode> = reference
        .iter()
        .filter(|e| e.is_significant())
        .cloned()
        .collect();
    if ordering.is_empty() {
        ordering = selected.to_vec();
    }
    EpisodeCode::sort(&mut ordering);

    let mut runs = Vec::new();
    let mut current: Vec<Episode> = Vec::new();
    for episode in &ordering {
        if selected_ids.contains(&episode.id) {
            current.push(episode.clone());
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    let ordered_ids: HashSet<u64> = ordering.iter().map(|e| e.id).collect();
    let mut orphans: Vec<Episode> = selected
        .iter()
        .filter(|e| !ordered_ids.contains(&e.id))
        .cloned()
        .collect();
    EpisodeCode::sort(&mut orphans);
    runs.extend(orphans.into_iter().map(|e| vec![e]));

    runs
}
