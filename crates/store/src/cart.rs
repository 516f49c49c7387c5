use async_trait::async_trait;
use common::UserId;
use domain::ProductId;
use serde::{Deserialize, Serialize};

use crate::Result;

/// One line in a user's cart: a product reference and a quantity.
///
/// Carts hold no price; prices are resolved from the catalog when the cart
/// is materialized into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: UserId,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Persistence boundary for carts.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetches a user's cart, if any.
    async fn get(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Inserts or replaces a user's cart.
    async fn save(&self, cart: Cart) -> Result<()>;

    /// Empties a user's cart.
    ///
    /// Called only after the order derived from the cart has been durably
    /// inserted, so a failed order write never loses cart contents.
    async fn clear(&self, user_id: UserId) -> Result<()>;
}
