use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{AddressId, OrderId, OrderRef, UserId};
use domain::{Order, OrderStatus, ProductId};
use tokio::sync::RwLock;

use crate::{
    Cart, CartStore, OrderStore, ProductRecord, ProductStore, Result, SavedAddress, StoreError,
    address::AddressStore,
};

/// In-memory order store for testing.
///
/// Provides the same optimistic-concurrency semantics as a real document
/// store with per-document atomic writes.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, mut order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;

        if orders
            .values()
            .any(|existing| existing.order_ref() == order.order_ref())
        {
            return Err(StoreError::DuplicateOrderRef(
                order.order_ref().to_string(),
            ));
        }

        order.set_version(1);
        orders.insert(order.id(), order.clone());
        Ok(order)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_by_ref(&self, order_ref: &OrderRef) -> Result<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|order| order.order_ref() == order_ref)
            .cloned())
    }

    async fn find_for_user(
        &self,
        order_ref: &OrderRef,
        user_id: UserId,
    ) -> Result<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|order| order.order_ref() == order_ref && order.user_id() == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders
            .values()
            .filter(|order| order.user_id() == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn list_by_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<_> = orders
            .values()
            .filter(|order| order.status() == status)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn update(&self, mut order: Order) -> Result<Order> {
        let mut orders = self.orders.write().await;

        let stored = orders
            .get(&order.id())
            .ok_or_else(|| StoreError::OrderNotFound(order.order_ref().to_string()))?;

        if stored.version() != order.version() {
            return Err(StoreError::VersionConflict {
                order_id: order.id(),
                expected: order.version(),
                actual: stored.version(),
            });
        }

        order.set_version(order.version() + 1);
        orders.insert(order.id(), order.clone());
        Ok(order)
    }
}

/// In-memory product catalog for testing.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<ProductId, ProductRecord>>>,
}

impl InMemoryProductStore {
    /// Creates a new empty in-memory product store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn upsert(&self, product: ProductRecord) -> Result<()> {
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
        Ok(())
    }
}

/// In-memory cart store for testing.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn get(&self, user_id: UserId) -> Result<Option<Cart>> {
        Ok(self.carts.read().await.get(&user_id).cloned())
    }

    async fn save(&self, cart: Cart) -> Result<()> {
        self.carts.write().await.insert(cart.user_id, cart);
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<()> {
        let mut carts = self.carts.write().await;
        if let Some(cart) = carts.get_mut(&user_id) {
            cart.lines.clear();
        }
        Ok(())
    }
}

/// In-memory address book for testing.
#[derive(Clone, Default)]
pub struct InMemoryAddressStore {
    addresses: Arc<RwLock<HashMap<AddressId, SavedAddress>>>,
}

impl InMemoryAddressStore {
    /// Creates a new empty in-memory address store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressStore for InMemoryAddressStore {
    async fn find_for_user(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<SavedAddress>> {
        Ok(self
            .addresses
            .read()
            .await
            .get(&id)
            .filter(|saved| saved.user_id == user_id)
            .cloned())
    }

    async fn upsert(&self, address: SavedAddress) -> Result<()> {
        self.addresses.write().await.insert(address.id, address);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{Address, Money, OrderItem, PaymentMethod};

    fn address() -> Address {
        Address {
            name: "Asha Rao".to_string(),
            mobile: "9000000000".to_string(),
            email: None,
            line: "12 MG Road".to_string(),
            area: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal: "560001".to_string(),
        }
    }

    fn order(user_id: UserId) -> Order {
        Order::create(
            user_id,
            OrderRef::generate(),
            vec![OrderItem::new("SKU-001", "Widget", 1, Money::from_paise(11800))],
            address(),
            PaymentMethod::CashOnDelivery,
            "",
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryOrderStore::new();
        let order = order(UserId::new());
        let id = order.id();

        let stored = store.insert(order).await.unwrap();
        assert_eq!(stored.version(), 1);

        let fetched = store.get(id).await.unwrap();
        assert!(fetched.is_some());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ref() {
        let store = InMemoryOrderStore::new();
        let first = order(UserId::new());
        let order_ref = first.order_ref().clone();
        store.insert(first).await.unwrap();

        // Second order with a colliding reference.
        let second = Order::create(
            UserId::new(),
            order_ref,
            vec![OrderItem::new("SKU-002", "Gadget", 1, Money::from_paise(5900))],
            address(),
            PaymentMethod::CashOnDelivery,
            "",
            Utc::now(),
        )
        .unwrap();

        let result = store.insert(second).await;
        assert!(matches!(result, Err(StoreError::DuplicateOrderRef(_))));
    }

    #[tokio::test]
    async fn find_for_user_hides_other_users_orders() {
        let store = InMemoryOrderStore::new();
        let owner = UserId::new();
        let order = order(owner);
        let order_ref = order.order_ref().clone();
        store.insert(order).await.unwrap();

        let found = store.find_for_user(&order_ref, owner).await.unwrap();
        assert!(found.is_some());

        let other = store.find_for_user(&order_ref, UserId::new()).await.unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn update_bumps_version() {
        let store = InMemoryOrderStore::new();
        let stored = store.insert(order(UserId::new())).await.unwrap();

        let mut loaded = store.get(stored.id()).await.unwrap().unwrap();
        loaded.apply_status(domain::OrderStatus::Confirmed, Utc::now());
        let updated = store.update(loaded).await.unwrap();
        assert_eq!(updated.version(), 2);
    }

    #[tokio::test]
    async fn stale_update_is_rejected() {
        let store = InMemoryOrderStore::new();
        let stored = store.insert(order(UserId::new())).await.unwrap();

        let stale = store.get(stored.id()).await.unwrap().unwrap();
        let mut fresh = store.get(stored.id()).await.unwrap().unwrap();

        fresh.apply_status(domain::OrderStatus::Confirmed, Utc::now());
        store.update(fresh).await.unwrap();

        let result = store.update(stale).await;
        assert!(matches!(result, Err(StoreError::VersionConflict { .. })));
    }

    #[tokio::test]
    async fn list_for_user_newest_first() {
        let store = InMemoryOrderStore::new();
        let user = UserId::new();
        store.insert(order(user)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        store.insert(order(user)).await.unwrap();
        store.insert(order(UserId::new())).await.unwrap();

        let orders = store.list_for_user(user).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].created_at() >= orders[1].created_at());
    }

    #[tokio::test]
    async fn list_by_status_filters() {
        let store = InMemoryOrderStore::new();
        let stored = store.insert(order(UserId::new())).await.unwrap();
        store.insert(order(UserId::new())).await.unwrap();

        let mut confirmed = store.get(stored.id()).await.unwrap().unwrap();
        confirmed.apply_status(domain::OrderStatus::Confirmed, Utc::now());
        store.update(confirmed).await.unwrap();

        let pending = store.list_by_status(domain::OrderStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        let confirmed = store
            .list_by_status(domain::OrderStatus::Confirmed)
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
    }

    #[tokio::test]
    async fn cart_save_get_clear() {
        let store = InMemoryCartStore::new();
        let user = UserId::new();

        let cart = Cart {
            user_id: user,
            lines: vec![crate::CartLine {
                product_id: ProductId::new("SKU-001"),
                quantity: 2,
            }],
        };
        store.save(cart).await.unwrap();

        let loaded = store.get(user).await.unwrap().unwrap();
        assert_eq!(loaded.lines.len(), 1);

        store.clear(user).await.unwrap();
        let cleared = store.get(user).await.unwrap().unwrap();
        assert!(cleared.is_empty());
    }

    #[tokio::test]
    async fn address_lookup_is_owner_scoped() {
        let store = InMemoryAddressStore::new();
        let owner = UserId::new();
        let saved = SavedAddress {
            id: AddressId::new(),
            user_id: owner,
            address: address(),
        };
        let id = saved.id;
        store.upsert(saved).await.unwrap();

        assert!(store.find_for_user(id, owner).await.unwrap().is_some());
        assert!(store.find_for_user(id, UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn product_upsert_and_get() {
        let store = InMemoryProductStore::new();
        let product = ProductRecord {
            id: ProductId::new("SKU-001"),
            name: "Widget".to_string(),
            price: Money::from_paise(11800),
            availability: 5,
        };
        store.upsert(product.clone()).await.unwrap();

        let fetched = store.get(&ProductId::new("SKU-001")).await.unwrap();
        assert_eq!(fetched, Some(product));
    }
}
