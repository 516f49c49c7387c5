//! External representation of an order.

use chrono::{DateTime, Utc};
use common::OrderRef;
use serde::{Deserialize, Serialize};

use super::{
    Address, Money, Order, OrderItem, OrderStatus, PaymentMethod, PaymentRecord, PaymentStatus,
    RefundStatus, TrackingInfo, pricing,
};

/// Pure projection from the [`Order`] aggregate to its external shape.
///
/// The single source for both API responses and notification payloads, so
/// the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_ref: OrderRef,
    pub items: Vec<OrderItem>,
    pub address: Address,

    /// Base price excluding GST (display-facing, rounded).
    pub base_price: Money,

    /// GST amount (display-facing, rounded).
    pub tax_amount: Money,

    /// GST-inclusive total; this is what gets charged.
    pub total_amount: Money,

    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub refund_status: RefundStatus,
    pub refund_id: Option<String>,
    pub payment_history: Vec<PaymentRecord>,

    pub tracking: Option<TrackingInfo>,
    pub delivery_note: String,

    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl OrderSummary {
    /// Projects an order into its external representation.
    ///
    /// The GST split is recomputed from the item snapshots; the gross total
    /// is the order's fixed `total_amount`.
    pub fn project(order: &Order) -> Self {
        let breakdown = pricing::compute_totals(order.items());

        Self {
            order_ref: order.order_ref().clone(),
            items: order.items().to_vec(),
            address: order.address().clone(),
            base_price: breakdown.base_price,
            tax_amount: breakdown.tax_amount,
            total_amount: order.total_amount(),
            status: order.status(),
            payment_method: order.payment_method(),
            payment_status: order.payment_status(),
            refund_status: order.refund_status(),
            refund_id: order.refund_id().map(str::to_string),
            payment_history: order.payment_history().to_vec(),
            tracking: order.tracking().cloned(),
            delivery_note: order.delivery_note().to_string(),
            created_at: order.created_at(),
            confirmed_at: order.confirmed_at(),
            shipped_at: order.shipped_at(),
            delivered_at: order.delivered_at(),
        }
    }
}
