use std::sync::Arc;

use lundflix_core::{
    CartService, Config, MediaLibrary, RequestItemGrouper, SanitizedConfig, SessionStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    sessions: Arc<dyn SessionStore>,
    library: Arc<dyn MediaLibrary>,
}

impl AppState {
    pub fn new(
        config: Config,
        sessions: Arc<dyn SessionStore>,
        library: Arc<dyn MediaLibrary>,
    ) -> Self {
        Self {
            config,
            sessions,
            library,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Cart bound to one session.
    pub fn cart(&self, session_id: &str) -> CartService {
        CartService::new(
            Arc::clone(&self.sessions),
            Arc::clone(&self.library),
            session_id,
        )
        .with_key(self.config.session.cart_key.clone())
    }

    pub fn grouper(&self) -> RequestItemGrouper {
        RequestItemGrouper::new(Arc::clone(&self.library))
    }
}
