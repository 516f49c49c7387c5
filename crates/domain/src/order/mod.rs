//! Order aggregate and related types.

mod aggregate;
pub mod pricing;
mod status;
mod summary;
mod value_objects;

pub use aggregate::{CURRENCY, Order, PaymentFailureOutcome};
pub use pricing::{PriceBreakdown, compute_totals};
pub use status::{OrderStatus, PaymentMethod, PaymentStatus, RefundStatus, TrackingStatus};
pub use summary::OrderSummary;
pub use value_objects::{
    Address, Money, NotificationFlag, NotificationKind, NotificationLog, OrderItem,
    PaymentEntryStatus, PaymentRecord, ProductId, TrackingInfo,
};

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order is not in the expected state for the requested transition.
    #[error("Invalid state transition: cannot {action} from {current_status} state")]
    InvalidStateTransition {
        current_status: OrderStatus,
        action: &'static str,
    },

    /// Cancellation blocked because a courier has already been assigned.
    #[error("Order cannot be cancelled once tracking details are assigned")]
    TrackingAlreadyAssigned,

    /// Refund requested for an order that was never gateway-paid.
    #[error("Refund not applicable for this order")]
    RefundNotApplicable,

    /// Refund requested but no gateway payment reference is stored.
    #[error("Payment reference not found for refund")]
    MissingPaymentReference,

    /// Unknown status value supplied on the wire.
    #[error("Invalid status value: {value}")]
    InvalidStatusValue { value: String },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Invalid price.
    #[error("Invalid price: {price} (must be greater than 0)")]
    InvalidPrice { price: i64 },

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,
}
