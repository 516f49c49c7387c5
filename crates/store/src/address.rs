use async_trait::async_trait;
use common::{AddressId, UserId};
use domain::Address;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A saved address in a user's address book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAddress {
    pub id: AddressId,
    pub user_id: UserId,
    pub address: Address,
}

/// Persistence boundary for saved addresses.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Fetches a saved address by id, scoped to its owner.
    async fn find_for_user(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<SavedAddress>>;

    /// Inserts or replaces a saved address.
    async fn upsert(&self, address: SavedAddress) -> Result<()>;
}
