//! Checkout orchestration: order placement, payment verification, tracking,
//! refunds, and notification side effects, wired across the store and
//! gateway boundaries.

pub mod auth;
pub mod error;
pub mod notification;
pub mod service;
pub mod snapshot;

pub use auth::{Principal, Role};
pub use error::{CheckoutError, Result};
pub use notification::{InMemoryMailer, Notifier, NotifyResult, Recipient};
pub use service::{
    AddressSelection, CheckoutService, CreateOrderRequest, PaymentFailureRequest,
    PaymentVerification, RefundOutcome, TrackingUpdate, UpdateStatusRequest,
};
