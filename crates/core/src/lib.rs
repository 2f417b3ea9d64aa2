pub mod cart;
pub mod config;
pub mod episode;
pub mod library;
pub mod request;
pub mod session;
pub mod testing;

pub use cart::{CartEpisode, CartError, CartService, CartState, Selectable, DEFAULT_CART_KEY};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    SanitizedConfig, ServerConfig, SessionConfig,
};
pub use episode::{Episode, EpisodeCode, EpisodeCodeError, EpisodeIdentity, EpisodeType, Movie, Show};
pub use library::{EpisodeKey, LibraryError, MediaLibrary, SqliteLibrary};
pub use request::{
    CartItemFormatter, GroupedRequest, RequestItem, RequestItemGrouper, SeasonGroup, ShowGroup,
};
pub use session::{
    MemorySessionStore, SessionError, SessionStore, DEFAULT_SESSION_TTL_SECS, MAX_SESSION_TTL_SECS,
};
