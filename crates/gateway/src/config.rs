use crate::error::{GatewayError, Result};

/// Environment variable holding the public gateway key.
pub const KEY_ID_VAR: &str = "GATEWAY_KEY_ID";
/// Environment variable holding the signing secret.
pub const KEY_SECRET_VAR: &str = "GATEWAY_KEY_SECRET";

/// Gateway credentials.
///
/// Both values are required at startup; running with a missing secret would
/// silently accept forged payment callbacks, so absence is a fatal error.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: String,
}

impl GatewayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }

    /// Loads credentials from the environment.
    pub fn from_env() -> Result<Self> {
        let key_id = std::env::var(KEY_ID_VAR)
            .map_err(|_| GatewayError::MissingCredentials(KEY_ID_VAR))?;
        let key_secret = std::env::var(KEY_SECRET_VAR)
            .map_err(|_| GatewayError::MissingCredentials(KEY_SECRET_VAR))?;
        Ok(Self { key_id, key_secret })
    }
}
