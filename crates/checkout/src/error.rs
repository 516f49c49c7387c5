use domain::{OrderError, ProductId};
use gateway::GatewayError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line references a product the catalog does not know.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// A cart line asks for more units than the catalog has.
    #[error("Insufficient stock for {product}: {available} available")]
    InsufficientStock { product: ProductId, available: u32 },

    /// The saved-address id does not exist or belongs to another user.
    #[error("Address not found")]
    AddressNotFound,

    /// The order does not exist, or is not visible to the caller.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// The caller lacks the admin role.
    #[error("Admin privileges required")]
    AdminRequired,

    /// A tracking update is missing a required field.
    #[error("Invalid tracking update: {0}")]
    InvalidTracking(&'static str),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
