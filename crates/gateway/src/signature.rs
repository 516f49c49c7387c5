//! Callback signature verification.
//!
//! The gateway signs each payment callback with HMAC-SHA256 over
//! `"{gateway_order_id}|{gateway_payment_id}"` using the merchant's key
//! secret, hex-encoded. Verification is constant-time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::GatewayConfig;

type HmacSha256 = Hmac<Sha256>;

/// The fields a payment callback carries back from the gateway.
#[derive(Debug, Clone)]
pub struct CallbackPayload {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
}

/// Outcome of checking a callback signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Mismatch,
}

/// Verifies gateway callback signatures against the merchant secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Builds a verifier from the configured gateway credentials.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.key_secret.clone())
    }

    /// Checks the payload's signature.
    ///
    /// A malformed (non-hex) signature is a mismatch, not an error; callers
    /// treat both the same way.
    pub fn verify(&self, payload: &CallbackPayload) -> Verification {
        let message = format!(
            "{}|{}",
            payload.gateway_order_id, payload.gateway_payment_id
        );

        let Ok(sig_bytes) = hex::decode(&payload.signature) else {
            return Verification::Mismatch;
        };

        // new_from_slice only fails for zero-length keys in some backends;
        // any key length is valid for HMAC.
        let Ok(mut mac) = HmacSha256::new_from_slice(self.secret.as_bytes()) else {
            return Verification::Mismatch;
        };
        mac.update(message.as_bytes());

        match mac.verify_slice(&sig_bytes) {
            Ok(()) => Verification::Verified,
            Err(_) => Verification::Mismatch,
        }
    }

    /// Signs a message the way the gateway does. Test helper.
    pub fn sign(&self, gateway_order_id: &str, gateway_payment_id: &str) -> String {
        let message = format!("{gateway_order_id}|{gateway_payment_id}");
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(message.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
