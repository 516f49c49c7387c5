//! Payment gateway boundary: intent creation, refunds, and callback
//! signature verification.

pub mod client;
pub mod config;
pub mod error;
pub mod signature;

pub use client::{GatewayIntent, GatewayRefund, InMemoryGateway, PaymentGateway};
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use signature::{CallbackPayload, SignatureVerifier, Verification};
