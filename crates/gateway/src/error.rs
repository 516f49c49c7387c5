use thiserror::Error;

/// Errors from the payment gateway boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway credentials not configured: {0}")]
    MissingCredentials(&'static str),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;
