use async_trait::async_trait;
use common::{OrderId, OrderRef, UserId};
use domain::{Order, OrderStatus};

use crate::Result;

/// Persistence boundary for order documents.
///
/// Mutations are whole-document read-modify-write: callers load an order,
/// apply transitions, and hand the modified copy back to [`OrderStore::update`],
/// which rejects the write when another writer got there first
/// (optimistic concurrency via [`Order::version`]).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a freshly created order.
    ///
    /// Fails with `DuplicateOrderRef` when the human-facing reference is
    /// already taken. Returns the stored order with its initial version.
    async fn insert(&self, order: Order) -> Result<Order>;

    /// Fetches an order by its internal id.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Fetches an order by its human-facing reference, regardless of owner.
    async fn find_by_ref(&self, order_ref: &OrderRef) -> Result<Option<Order>>;

    /// Fetches an order by reference, scoped to its owner.
    ///
    /// Returns `None` both when the order does not exist and when it is
    /// owned by someone else; callers cannot distinguish the two.
    async fn find_for_user(&self, order_ref: &OrderRef, user_id: UserId)
    -> Result<Option<Order>>;

    /// Lists a user's orders, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Lists orders in a given status, newest first.
    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>>;

    /// Writes back a modified order.
    ///
    /// The order's version must equal the stored version; on success the
    /// version is bumped and the stored copy returned. A mismatch fails
    /// with `VersionConflict` and leaves the stored document untouched.
    async fn update(&self, order: Order) -> Result<Order>;
}
