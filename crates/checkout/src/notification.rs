//! Notification dispatcher: email side effects with per-order idempotency
//! flags.
//!
//! Notification delivery is strictly best-effort. The core state transition
//! is persisted before dispatch, a failed send only records `last_error` on
//! the order's flag, and a flag that is already `sent` suppresses the
//! dispatch entirely.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{NotificationKind, Order, OrderSummary};

/// Where a notification goes. Taken from the order's address snapshot, never
/// from the live user record.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub name: String,
    pub email: Option<String>,
}

impl Recipient {
    /// Builds the recipient from an order's shipping-address snapshot.
    pub fn from_order(order: &Order) -> Self {
        Self {
            name: order.address().name.clone(),
            email: order.address().email.clone(),
        }
    }
}

/// Outcome of one delivery attempt.
#[derive(Debug, Clone)]
pub struct NotifyResult {
    pub success: bool,
    pub error: Option<String>,
}

impl NotifyResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Trait for sending customer-facing notifications.
///
/// Implementations never return an error; delivery problems are reported in
/// the [`NotifyResult`] so the caller can record them without unwinding.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        kind: NotificationKind,
        summary: &OrderSummary,
        recipient: &Recipient,
    ) -> NotifyResult;
}

/// Attempts delivery of `kind` for `order` and records the outcome on the
/// order's notification flag.
///
/// Skips silently when the flag is already `sent`. A recipient without an
/// email address is recorded as a failed attempt, not an error.
pub async fn dispatch<N: Notifier>(
    notifier: &N,
    kind: NotificationKind,
    order: &mut Order,
    now: DateTime<Utc>,
) {
    if order.notifications().flag(kind).sent {
        return;
    }

    let recipient = Recipient::from_order(order);
    if recipient.email.is_none() {
        tracing::warn!(
            order_ref = %order.order_ref(),
            notification = %kind,
            "no recipient email on order"
        );
        order
            .notifications_mut()
            .flag_mut(kind)
            .mark_failed("no recipient email");
        metrics::counter!("notifications_failed_total").increment(1);
        return;
    }

    let summary = OrderSummary::project(order);
    let result = notifier.send(kind, &summary, &recipient).await;

    if result.success {
        order.notifications_mut().flag_mut(kind).mark_sent(now);
        metrics::counter!("notifications_sent_total").increment(1);
    } else {
        let error = result.error.unwrap_or_else(|| "send failed".to_string());
        tracing::warn!(
            order_ref = %order.order_ref(),
            notification = %kind,
            error = %error,
            "notification delivery failed"
        );
        order.notifications_mut().flag_mut(kind).mark_failed(error);
        metrics::counter!("notifications_failed_total").increment(1);
    }
}

mod mailer {
    use std::sync::{Arc, RwLock};

    use super::*;

    #[derive(Debug, Default)]
    struct InMemoryMailerState {
        deliveries: Vec<(NotificationKind, String, String)>,
        fail_on_send: bool,
    }

    /// In-memory mailer for testing.
    #[derive(Debug, Clone, Default)]
    pub struct InMemoryMailer {
        state: Arc<RwLock<InMemoryMailerState>>,
    }

    impl InMemoryMailer {
        /// Creates a new in-memory mailer.
        pub fn new() -> Self {
            Self::default()
        }

        /// Configures the mailer to fail on the next send call.
        pub fn set_fail_on_send(&self, fail: bool) {
            self.state.write().unwrap().fail_on_send = fail;
        }

        /// Returns the number of delivered notifications.
        pub fn delivery_count(&self) -> usize {
            self.state.read().unwrap().deliveries.len()
        }

        /// Returns the number of deliveries of one kind.
        pub fn count_of(&self, kind: NotificationKind) -> usize {
            self.state
                .read()
                .unwrap()
                .deliveries
                .iter()
                .filter(|(k, _, _)| *k == kind)
                .count()
        }
    }

    #[async_trait]
    impl Notifier for InMemoryMailer {
        async fn send(
            &self,
            kind: NotificationKind,
            summary: &OrderSummary,
            recipient: &Recipient,
        ) -> NotifyResult {
            let mut state = self.state.write().unwrap();

            if state.fail_on_send {
                return NotifyResult::failed("SMTP connection refused");
            }

            let email = match &recipient.email {
                Some(email) => email.clone(),
                None => return NotifyResult::failed("no recipient email"),
            };
            state
                .deliveries
                .push((kind, summary.order_ref.to_string(), email));
            NotifyResult::ok()
        }
    }
}

pub use mailer::InMemoryMailer;
