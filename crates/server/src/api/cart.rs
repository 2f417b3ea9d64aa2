//! Cart API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use lundflix_core::{
    CartEpisode, CartError, CartItemFormatter, Episode, EpisodeCode, GroupedRequest, Movie,
    RequestItem, SeasonGroup, Show, ShowGroup,
};

use super::{api_error, ApiError, SessionId};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Raw cart contents
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub movies: Vec<u64>,
    pub episodes: Vec<CartEpisode>,
    pub count: usize,
}

/// Result of flipping one selection
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub selected: bool,
    pub count: usize,
}

/// Request body for replacing a show's selection
#[derive(Debug, Deserialize)]
pub struct SyncEpisodesBody {
    pub codes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ShowEpisodesResponse {
    pub show_id: u64,
    pub codes: Vec<String>,
}

/// Resolved cart entries
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<RequestItem>,
}

/// One consecutive stretch of episodes with its display label
#[derive(Debug, Serialize)]
pub struct RunView {
    pub label: String,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Serialize)]
pub struct SeasonView {
    pub season: u32,
    pub label: String,
    pub is_full: bool,
    pub runs: Vec<RunView>,
}

#[derive(Debug, Serialize)]
pub struct ShowView {
    pub show: Show,
    pub episode_count: usize,
    pub seasons: Vec<SeasonView>,
}

/// Grouped request as shown on the checkout screen
#[derive(Debug, Serialize)]
pub struct GroupedResponse {
    pub movies: Vec<Movie>,
    pub shows: Vec<ShowView>,
}

impl From<SeasonGroup> for SeasonView {
    fn from(group: SeasonGroup) -> Self {
        Self {
            season: group.season,
            label: CartItemFormatter::format_season(group.season),
            is_full: group.is_full,
            runs: group
                .runs
                .into_iter()
                .map(|run| RunView {
                    label: CartItemFormatter::format_run(&run),
                    episodes: run,
                })
                .collect(),
        }
    }
}

impl From<ShowGroup> for ShowView {
    fn from(group: ShowGroup) -> Self {
        Self {
            episode_count: group.episode_count(),
            show: group.show,
            seasons: group.seasons.into_iter().map(SeasonView::from).collect(),
        }
    }
}

impl From<GroupedRequest> for GroupedResponse {
    fn from(grouped: GroupedRequest) -> Self {
        Self {
            movies: grouped.movies,
            shows: grouped.shows.into_iter().map(ShowView::from).collect(),
        }
    }
}

fn cart_error(err: CartError) -> ApiError {
    match err {
        CartError::InvalidCode(_) => api_error(StatusCode::UNPROCESSABLE_ENTITY, err),
        _ => {
            error!("Cart operation failed: {}", err);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, err)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Raw selection for the session
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state.cart(&session_id);
    let movies = cart.movies().map_err(cart_error)?;
    let episodes = cart.episodes().map_err(cart_error)?;

    Ok(Json(CartResponse {
        count: movies.len() + episodes.len(),
        movies,
        episodes,
    }))
}

/// Empty the cart
pub async fn clear_cart(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
) -> Result<StatusCode, ApiError> {
    state.cart(&session_id).clear().map_err(cart_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_movie(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Path(id): Path<u64>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let cart = state.cart(&session_id);
    let selected = cart.toggle_movie(id).map_err(cart_error)?;
    let count = cart.count().map_err(cart_error)?;
    Ok(Json(ToggleResponse { selected, count }))
}

pub async fn toggle_episode(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Path((show_id, code)): Path<(u64, String)>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let identity = EpisodeCode::parse(&code).map_err(|e| cart_error(e.into()))?;

    let cart = state.cart(&session_id);
    let selected = cart.toggle_episode(show_id, identity).map_err(cart_error)?;
    let count = cart.count().map_err(cart_error)?;
    Ok(Json(ToggleResponse { selected, count }))
}

/// Codes selected for one show
pub async fn get_show_episodes(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Path(show_id): Path<u64>,
) -> Result<Json<ShowEpisodesResponse>, ApiError> {
    let codes = state
        .cart(&session_id)
        .show_episode_codes(show_id)
        .map_err(cart_error)?;
    Ok(Json(ShowEpisodesResponse { show_id, codes }))
}

/// Replace the show's selection with exactly the given codes
pub async fn sync_show_episodes(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
    Path(show_id): Path<u64>,
    Json(body): Json<SyncEpisodesBody>,
) -> Result<Json<ShowEpisodesResponse>, ApiError> {
    let cart = state.cart(&session_id);
    cart.sync_show_episodes(show_id, body.codes.as_slice())
        .map_err(cart_error)?;
    let codes = cart.show_episode_codes(show_id).map_err(cart_error)?;
    Ok(Json(ShowEpisodesResponse { show_id, codes }))
}

/// Selection resolved against the library
pub async fn get_items(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state
        .cart(&session_id)
        .load_items()
        .map_err(cart_error)?;
    Ok(Json(ItemsResponse { items }))
}

/// Group the cart for the request summary and empty it
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    SessionId(session_id): SessionId,
) -> Result<Json<GroupedResponse>, ApiError> {
    let cart = state.cart(&session_id);
    let items = cart.load_items().map_err(cart_error)?;
    if items.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Cart has nothing to request",
        ));
    }

    let grouped = state.grouper().group(items).map_err(|e| {
        error!("Grouping request failed: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;
    cart.clear().map_err(cart_error)?;

    info!(
        "Session {} checked out {} movies and {} shows",
        session_id,
        grouped.movies.len(),
        grouped.shows.len()
    );
    Ok(Json(GroupedResponse::from(grouped)))
}
