//! Payment gateway trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderRef;
use domain::Money;

use crate::error::{GatewayError, Result};

/// A payment intent registered with the gateway.
#[derive(Debug, Clone)]
pub struct GatewayIntent {
    /// The order ID assigned by the gateway.
    pub gateway_order_id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
}

/// A refund accepted by the gateway.
#[derive(Debug, Clone)]
pub struct GatewayRefund {
    /// The refund ID assigned by the gateway.
    pub refund_id: String,
}

/// Trait for payment gateway operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers a payment intent for an order.
    async fn create_intent(&self, receipt: &OrderRef, amount: Money) -> Result<GatewayIntent>;

    /// Requests a refund for a captured payment.
    async fn refund(&self, payment_id: &str, amount: Money) -> Result<GatewayRefund>;
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    intents: HashMap<String, (String, i64)>,
    refunds: HashMap<String, (String, i64)>,
    next_id: u32,
    fail_on_create: bool,
    fail_on_refund: bool,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryGateway {
    /// Creates a new in-memory gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail on the next create_intent call.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Configures the gateway to fail on the next refund call.
    pub fn set_fail_on_refund(&self, fail: bool) {
        self.state.write().unwrap().fail_on_refund = fail;
    }

    /// Returns the number of registered intents.
    pub fn intent_count(&self) -> usize {
        self.state.read().unwrap().intents.len()
    }

    /// Returns the number of accepted refunds.
    pub fn refund_count(&self) -> usize {
        self.state.read().unwrap().refunds.len()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryGateway {
    async fn create_intent(&self, receipt: &OrderRef, amount: Money) -> Result<GatewayIntent> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(GatewayError::Unavailable(
                "intent creation declined".to_string(),
            ));
        }

        state.next_id += 1;
        let gateway_order_id = format!("gw_order_{:04}", state.next_id);
        state
            .intents
            .insert(gateway_order_id.clone(), (receipt.to_string(), amount.paise()));

        Ok(GatewayIntent {
            gateway_order_id,
            amount: amount.paise(),
            currency: domain::CURRENCY.to_string(),
        })
    }

    async fn refund(&self, payment_id: &str, amount: Money) -> Result<GatewayRefund> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_refund {
            return Err(GatewayError::Unavailable("refund declined".to_string()));
        }

        state.next_id += 1;
        let refund_id = format!("gw_rfnd_{:04}", state.next_id);
        state
            .refunds
            .insert(refund_id.clone(), (payment_id.to_string(), amount.paise()));

        Ok(GatewayRefund { refund_id })
    }
}
