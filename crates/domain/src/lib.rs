//! Domain layer for the order/payment core.
//!
//! This crate provides:
//! - the `Order` aggregate with its status/payment/refund state machine
//! - value objects (money, items, address and tracking snapshots)
//! - the GST pricing engine
//! - the `OrderSummary` projection shared by responses and notifications

pub mod order;

pub use order::{
    Address, CURRENCY, Money, NotificationFlag, NotificationKind, NotificationLog, Order,
    OrderError, OrderItem, OrderStatus, OrderSummary, PaymentEntryStatus, PaymentFailureOutcome,
    PaymentMethod, PaymentRecord, PaymentStatus, PriceBreakdown, ProductId, RefundStatus,
    TrackingInfo, TrackingStatus, compute_totals,
};
