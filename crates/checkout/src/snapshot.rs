//! Cart materialization: turning cart lines into order-item snapshots.

use domain::OrderItem;
use store::{Cart, ProductStore};

use crate::error::{CheckoutError, Result};

/// Resolves a cart against the catalog into order-item snapshots.
///
/// Prices and names come from the catalog at this instant, not from the cart;
/// later catalog edits never touch a placed order. Fails fast on the first
/// missing product or stock shortfall, before anything is written.
pub async fn materialize_order_items<P: ProductStore>(
    cart: &Cart,
    products: &P,
) -> Result<Vec<OrderItem>> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut items = Vec::with_capacity(cart.lines.len());
    for line in &cart.lines {
        let product = products
            .get(&line.product_id)
            .await?
            .ok_or_else(|| CheckoutError::ProductNotFound(line.product_id.clone()))?;

        if line.quantity > product.availability {
            return Err(CheckoutError::InsufficientStock {
                product: product.id,
                available: product.availability,
            });
        }

        items.push(OrderItem::new(
            product.id,
            product.name,
            line.quantity,
            product.price,
        ));
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;
    use domain::{Money, ProductId};
    use store::{CartLine, InMemoryProductStore, ProductRecord};

    async fn catalog() -> InMemoryProductStore {
        let products = InMemoryProductStore::new();
        products
            .upsert(ProductRecord {
                id: ProductId::new("SKU-001"),
                name: "Widget".to_string(),
                price: Money::from_paise(11800),
                availability: 3,
            })
            .await
            .unwrap();
        products
    }

    fn cart(lines: Vec<CartLine>) -> Cart {
        Cart {
            user_id: UserId::new(),
            lines,
        }
    }

    #[tokio::test]
    async fn snapshots_price_and_name_from_catalog() {
        let products = catalog().await;
        let cart = cart(vec![CartLine {
            product_id: ProductId::new("SKU-001"),
            quantity: 2,
        }]);

        let items = materialize_order_items(&cart, &products).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Widget");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price, Money::from_paise(11800));
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() {
        let products = catalog().await;
        let result = materialize_order_items(&cart(Vec::new()), &products).await;
        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() {
        let products = catalog().await;
        let cart = cart(vec![CartLine {
            product_id: ProductId::new("SKU-MISSING"),
            quantity: 1,
        }]);

        let result = materialize_order_items(&cart, &products).await;
        assert!(matches!(result, Err(CheckoutError::ProductNotFound(_))));
    }

    #[tokio::test]
    async fn over_quantity_is_rejected_with_availability() {
        let products = catalog().await;
        let cart = cart(vec![CartLine {
            product_id: ProductId::new("SKU-001"),
            quantity: 5,
        }]);

        let result = materialize_order_items(&cart, &products).await;
        match result {
            Err(CheckoutError::InsufficientStock { available, .. }) => {
                assert_eq!(available, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }
}
