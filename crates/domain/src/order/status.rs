//! Status enums for the order lifecycle, payment, refund, and tracking.

use serde::{Deserialize, Serialize};

use super::OrderError;

/// The coarse state of an order in its lifecycle.
///
/// Transitions:
/// ```text
/// Pending ──► Confirmed ──► Shipped ──► Delivered
///    │            │
///    └────────────┴──► Cancelled
/// ```
///
/// `Delivered` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, payment not yet confirmed.
    #[default]
    Pending,

    /// Payment confirmed (COD acknowledged or gateway verified).
    Confirmed,

    /// Picked up by the courier.
    Shipped,

    /// Delivered to the customer (terminal state).
    Delivered,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Confirmed" => Ok(OrderStatus::Confirmed),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(OrderError::InvalidStatusValue {
                value: other.to_string(),
            }),
        }
    }
}

/// How the customer pays for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Payment collected on delivery.
    #[default]
    CashOnDelivery,

    /// Prepaid through the payment gateway.
    Gateway,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::Gateway => "Gateway",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the order has been paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Refund state for prepaid orders.
///
/// `Refunded` is reachable only from `Pending`, and only while the order is
/// cancelled, gateway-paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RefundStatus {
    /// Order was never gateway-paid, so there is nothing to refund.
    #[default]
    NotApplicable,

    /// Cancellation of a gateway-paid order; refund awaited.
    Pending,

    /// Refund issued at the gateway.
    Refunded,

    /// The gateway rejected the refund attempt.
    Failed,
}

impl RefundStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefundStatus::NotApplicable => "NotApplicable",
            RefundStatus::Pending => "Pending",
            RefundStatus::Refunded => "Refunded",
            RefundStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Courier-facing tracking status, as entered by an admin.
///
/// Distinct from [`OrderStatus`]: this is the descriptive courier state, and
/// it maps one-directionally onto the order's coarse status via
/// [`TrackingStatus::order_status_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TrackingStatus {
    #[default]
    #[serde(rename = "Order Confirmed")]
    OrderConfirmed,
    #[serde(rename = "Picked by Courier")]
    PickedByCourier,
    #[serde(rename = "On the Way")]
    OnTheWay,
    #[serde(rename = "Ready for Pickup")]
    ReadyForPickup,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl TrackingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackingStatus::OrderConfirmed => "Order Confirmed",
            TrackingStatus::PickedByCourier => "Picked by Courier",
            TrackingStatus::OnTheWay => "On the Way",
            TrackingStatus::ReadyForPickup => "Ready for Pickup",
            TrackingStatus::Delivered => "Delivered",
        }
    }

    /// Maps this tracking status onto the order's coarse status.
    ///
    /// Returns `None` when the tracking status carries no order-status
    /// meaning (`On the Way`, `Ready for Pickup`). The mapping is
    /// one-directional and idempotent: replaying the same tracking status
    /// yields the same order status.
    pub fn order_status_for(&self, current: OrderStatus) -> Option<OrderStatus> {
        match self {
            TrackingStatus::OrderConfirmed => {
                if current == OrderStatus::Pending {
                    Some(OrderStatus::Pending)
                } else {
                    Some(OrderStatus::Confirmed)
                }
            }
            TrackingStatus::PickedByCourier => Some(OrderStatus::Shipped),
            TrackingStatus::Delivered => Some(OrderStatus::Delivered),
            TrackingStatus::OnTheWay | TrackingStatus::ReadyForPickup => None,
        }
    }
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TrackingStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Order Confirmed" => Ok(TrackingStatus::OrderConfirmed),
            "Picked by Courier" => Ok(TrackingStatus::PickedByCourier),
            "On the Way" => Ok(TrackingStatus::OnTheWay),
            "Ready for Pickup" => Ok(TrackingStatus::ReadyForPickup),
            "Delivered" => Ok(TrackingStatus::Delivered),
            other => Err(OrderError::InvalidStatusValue {
                value: other.to_string(),
            }),
        }
    }
}
