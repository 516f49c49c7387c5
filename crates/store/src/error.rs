use common::OrderId;
use thiserror::Error;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update raced with another writer: the expected version did not
    /// match the stored version.
    #[error(
        "Version conflict for order {order_id}: expected version {expected}, found {actual}"
    )]
    VersionConflict {
        order_id: OrderId,
        expected: u64,
        actual: u64,
    },

    /// The order was not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// An order with the same reference already exists.
    #[error("Duplicate order reference: {0}")]
    DuplicateOrderRef(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
