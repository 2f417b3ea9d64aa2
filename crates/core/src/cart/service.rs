//! Session-backed cart service.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CartEpisode, CartError, CartState, Selectable};
use crate::episode::{EpisodeCode, EpisodeIdentity};
use crate::library::{EpisodeKey, MediaLibrary};
use crate::request::RequestItem;
use crate::session::{SessionError, SessionStore};

/// Session key the cart is stored under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// The pending request of one session: selected movies and episodes.
///
/// Every operation reads the state from the session store and writes it back,
/// so two services built for the same session id see the same cart.
pub struct CartService {
    session: Arc<dyn SessionStore>,
    library: Arc<dyn MediaLibrary>,
    session_id: String,
    key: String,
}

impl CartService {
    pub fn new(
        session: Arc<dyn SessionStore>,
        library: Arc<dyn MediaLibrary>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            session,
            library,
            session_id: session_id.into(),
            key: DEFAULT_CART_KEY.to_string(),
        }
    }

    /// Store the cart under a different session key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn load(&self) -> Result<CartState, CartError> {
        let Some(value) = self.session.get(&self.session_id, &self.key)? else {
            return Ok(CartState::default());
        };

        match serde_json::from_value(value) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(
                    "Discarding undecodable cart for session {}: {}",
                    self.session_id, e
                );
                Ok(CartState::default())
            }
        }
    }

    fn save(&self, state: &CartState) -> Result<(), CartError> {
        let value = serde_json::to_value(state)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;
        self.session.put(&self.session_id, &self.key, value)?;
        Ok(())
    }

    /// Flip a movie's membership. Returns `true` if it is now in the cart.
    pub fn toggle_movie(&self, movie_id: u64) -> Result<bool, CartError> {
        let mut state = self.load()?;
        let selected = state.toggle_movie(movie_id);
        self.save(&state)?;

        debug!(
            "Movie {} {} cart for session {}",
            movie_id,
            if selected { "added to" } else { "removed from" },
            self.session_id
        );
        Ok(selected)
    }

    /// Flip a single episode's membership. Returns `true` if it is now in the cart.
    pub fn toggle_episode(
        &self,
        show_id: u64,
        identity: EpisodeIdentity,
    ) -> Result<bool, CartError> {
        let mut state = self.load()?;
        let selected = state.toggle_episode(CartEpisode::new(show_id, identity));
        self.save(&state)?;
        Ok(selected)
    }

    /// Whether a movie or episode is currently selected.
    pub fn has(&self, item: &Selectable) -> Result<bool, CartError> {
        let state = self.load()?;
        Ok(match item {
            Selectable::Movie(id) => state.movies.contains(id),
            Selectable::Episode { show_id, identity } => state
                .episodes
                .contains(&CartEpisode::new(*show_id, *identity)),
        })
    }

    /// Replace all selected episodes of `show_id` with exactly `codes`.
    ///
    /// Every code is parsed before anything is written; one malformed code
    /// fails the call and leaves the cart untouched. An empty list deselects
    /// the whole show.
    pub fn sync_show_episodes<S: AsRef<str>>(
        &self,
        show_id: u64,
        codes: &[S],
    ) -> Result<(), CartError> {
        let episodes = codes
            .iter()
            .map(|code| {
                EpisodeCode::parse(code.as_ref()).map(|id| CartEpisode::new(show_id, id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.load()?;
        state.replace_show_episodes(show_id, episodes);
        self.save(&state)?;

        info!(
            "Synced show {} for session {}: {} episodes selected",
            show_id,
            self.session_id,
            state.show_codes(show_id).len()
        );
        Ok(())
    }

    /// Codes currently selected for one show.
    pub fn show_episode_codes(&self, show_id: u64) -> Result<Vec<String>, CartError> {
        Ok(self.load()?.show_codes(show_id))
    }

    /// Total number of selected movies and episodes.
    pub fn count(&self) -> Result<usize, CartError> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, CartError> {
        Ok(self.load()?.is_empty())
    }

    /// Empty the cart.
    pub fn clear(&self) -> Result<(), CartError> {
        self.session.forget(&self.session_id, &self.key)?;
        debug!("Cleared cart for session {}", self.session_id);
        Ok(())
    }

    /// Selected movie ids, in no meaningful order.
    pub fn movies(&self) -> Result<Vec<u64>, CartError> {
        Ok(self.load()?.movies.into_iter().collect())
    }

    /// Selected episodes, in no meaningful order.
    pub fn episodes(&self) -> Result<Vec<CartEpisode>, CartError> {
        Ok(self.load()?.episodes.into_iter().collect())
    }

    /// Resolve the selection against the library.
    ///
    /// Uses one batched lookup for movies and one for episodes. Selections
    /// that no longer resolve are left out instead of failing the load.
    pub fn load_items(&self) -> Result<Vec<RequestItem>, CartError> {
        let state = self.load()?;
        let mut items = Vec::with_capacity(state.len());

        if !state.movies.is_empty() {
            let ids: Vec<u64> = state.movies.iter().copied().collect();
            let movies = self.library.find_movies_by_ids(&ids)?;
            if movies.len() < ids.len() {
                debug!(
                    "{} selected movies no longer resolve for session {}",
                    ids.len() - movies.len(),
                    self.session_id
                );
            }
            items.extend(movies.into_iter().map(RequestItem::Movie));
        }

        let keys: Vec<EpisodeKey> = state
            .episodes
            .iter()
            .filter_map(|e| match EpisodeCode::parse(&e.code) {
                Ok(identity) => Some(EpisodeKey::new(e.show_id, identity)),
                Err(err) => {
                    warn!("Skipping stored cart entry for show {}: {}", e.show_id, err);
                    None
                }
            })
            .collect();

        if !keys.is_empty() {
            let episodes = self.library.find_episodes_by_keys(&keys)?;
            if episodes.len() < keys.len() {
                debug!(
                    "{} selected episodes no longer resolve for session {}",
                    keys.len() - episodes.len(),
                    self.session_id
                );
            }
            items.extend(episodes.into_iter().map(RequestItem::Episode));
        }

        Ok(items)
    }
}
