//! Request cart - the movies and episodes a user is about to request.

mod service;
mod state;

pub use service::{CartService, DEFAULT_CART_KEY};
pub use state::{CartEpisode, CartState, Selectable};

use thiserror::Error;

use crate::episode::EpisodeCodeError;
use crate::library::LibraryError;
use crate::session::SessionError;

/// Errors for cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    InvalidCode(#[from] EpisodeCodeError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Library(#[from] LibraryError),
}
