use super::{types::Config, ConfigError};
use crate::session::MAX_SESSION_TTL_SECS;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Cart session key is not blank
/// - Session TTL is positive and at most one year
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.session.cart_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "session.cart_key cannot be empty".to_string(),
        ));
    }

    if config.session.ttl_secs == 0 || config.session.ttl_secs > MAX_SESSION_TTL_SECS {
        return Err(ConfigError::ValidationError(format!(
            "session.ttl_secs must be between 1 and {}",
            MAX_SESSION_TTL_SECS
        )));
    }

    Ok(())
}
