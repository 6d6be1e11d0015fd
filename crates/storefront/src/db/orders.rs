//! Order repository scoped to one shopper.

use drip_bloom_core::{OrderId, Price, UserId};

use super::{RepositoryError, Store};
use crate::models::{NewOrder, Order, OrderItem};

/// Order operations for a single user.
pub struct OrderRepository<'a> {
    store: &'a dyn Store,
    user: UserId,
}

impl<'a> OrderRepository<'a> {
    /// Create an order repository for `user`.
    #[must_use]
    pub const fn new(store: &'a dyn Store, user: UserId) -> Self {
        Self { store, user }
    }

    /// Place an order. The user's cart is emptied in the same step.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn place(
        &self,
        items: Vec<OrderItem>,
        total_amount: Price,
        shipping_amount: Price,
        telegram_order_id: Option<String>,
    ) -> Result<Order, RepositoryError> {
        let order = self.store.create_order(NewOrder {
            user_id: self.user,
            items,
            total_amount,
            shipping_amount,
            telegram_order_id,
        })?;

        tracing::info!(
            order_id = %order.id,
            user_id = %self.user,
            items = order.items.len(),
            total = %order.total_amount,
            shipping = %order.shipping_amount,
            status = %order.status,
            "Order placed"
        );
        Ok(order)
    }

    /// Get one of this user's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store is unusable.
    pub fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .store
            .order(id)?
            .filter(|order| order.user_id == self.user))
    }
}

#[cfg(test)]
mod tests {
    use drip_bloom_core::{OrderStatus, ProductId, Quantity};

    use super::*;
    use crate::catalog::Catalog;
    use crate::db::{CartRepository, MemoryStore};

    fn line(product: &str, size: &str, quantity: i64, price: &str) -> OrderItem {
        OrderItem {
            product_id: ProductId::from(product),
            product_name: product.to_string(),
            size: size.to_string(),
            quantity: Quantity::new(quantity).expect("quantity"),
            price: Price::parse(price).expect("price"),
        }
    }

    #[test]
    fn test_place_clears_cart() {
        let store = MemoryStore::new();
        let catalog = Catalog::bundled().expect("catalog");
        let user = UserId::generate();
        let cart = CartRepository::new(&store, &catalog, user);
        cart.add(ProductId::from("prod-1"), "M".to_string(), Quantity::ONE)
            .expect("add");
        cart.add(ProductId::from("prod-2"), "L".to_string(), Quantity::ONE)
            .expect("add");

        let orders = OrderRepository::new(&store, user);
        let order = orders
            .place(
                vec![
                    line("prod-1", "M", 1, "45.00"),
                    line("prod-2", "L", 1, "52.00"),
                ],
                Price::parse("97.00").expect("price"),
                Price::parse("300").expect("price"),
                Some("tg-1".to_string()),
            )
            .expect("place");

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(
            order.grand_total().map(|p| p.to_string()).as_deref(),
            Some("397.00")
        );
        assert_eq!(cart.count().expect("count"), 0);
        assert_eq!(orders.get(order.id).expect("get"), Some(order));
    }

    #[test]
    fn test_other_users_orders_are_hidden() {
        let store = MemoryStore::new();
        let owner = OrderRepository::new(&store, UserId::generate());
        let stranger = OrderRepository::new(&store, UserId::generate());

        let order = owner
            .place(
                vec![line("prod-1", "S", 2, "45.00")],
                Price::parse("90.00").expect("price"),
                Price::ZERO,
                None,
            )
            .expect("place");

        assert!(stranger.get(order.id).expect("get").is_none());
        assert!(owner.get(OrderId::generate()).expect("get").is_none());
    }
}
