//! In-process [`Store`] backed by hash maps behind one lock.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use drip_bloom_core::{
    CartItemId, FavoriteId, OrderId, OrderStatus, ProductId, Quantity, TelegramUserId, UserId,
};

use super::{RepositoryError, Store};
use crate::models::{CartItem, Favorite, NewCartItem, NewOrder, NewUser, Order, User};

type CartKey = (UserId, ProductId, String);
type FavoriteKey = (UserId, ProductId);

/// Store that keeps everything in process memory.
///
/// All collections sit behind a single `RwLock`. Reads share the lock;
/// every mutation, including its uniqueness check, runs inside one write
/// section.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    users_by_telegram_id: HashMap<TelegramUserId, UserId>,

    cart_items: HashMap<CartItemId, CartItem>,
    cart_keys: HashMap<CartKey, CartItemId>,
    carts: HashMap<UserId, Vec<CartItemId>>,

    favorites: HashMap<FavoriteId, Favorite>,
    favorite_keys: HashMap<FavoriteKey, FavoriteId>,
    user_favorites: HashMap<UserId, Vec<FavoriteId>>,

    orders: HashMap<OrderId, Order>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables
            .read()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables
            .write()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
    }
}

impl Tables {
    fn insert_user(&mut self, new: NewUser) -> User {
        let user = User {
            id: UserId::generate(),
            telegram_id: new.telegram_id,
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            created_at: Utc::now(),
        };

        if let Some(telegram_id) = user.telegram_id {
            self.users_by_telegram_id.insert(telegram_id, user.id);
        }
        self.users.insert(user.id, user.clone());
        user
    }

    fn owned_cart_item_mut(&mut self, user: UserId, id: CartItemId) -> Option<&mut CartItem> {
        self.cart_items
            .get_mut(&id)
            .filter(|item| item.user_id == user)
    }

    fn delete_cart_item(&mut self, user: UserId, id: CartItemId) -> bool {
        if self.owned_cart_item_mut(user, id).is_none() {
            return false;
        }
        let Some(item) = self.cart_items.remove(&id) else {
            return false;
        };

        self.cart_keys
            .remove(&(item.user_id, item.product_id, item.size));
        if let Some(ids) = self.carts.get_mut(&user) {
            ids.retain(|existing| *existing != id);
        }
        true
    }

    fn delete_cart(&mut self, user: UserId) -> usize {
        let ids = self.carts.remove(&user).unwrap_or_default();
        for id in &ids {
            if let Some(item) = self.cart_items.remove(id) {
                self.cart_keys
                    .remove(&(item.user_id, item.product_id, item.size));
            }
        }
        ids.len()
    }

    fn insert_favorite(&mut self, user: UserId, product: &ProductId) -> Favorite {
        let favorite = Favorite {
            id: FavoriteId::generate(),
            user_id: user,
            product_id: product.clone(),
            created_at: Utc::now(),
        };

        self.favorite_keys
            .insert((user, product.clone()), favorite.id);
        self.user_favorites
            .entry(user)
            .or_default()
            .push(favorite.id);
        self.favorites.insert(favorite.id, favorite.clone());
        favorite
    }

    fn delete_favorite(&mut self, user: UserId, product: &ProductId) -> bool {
        let Some(id) = self.favorite_keys.remove(&(user, product.clone())) else {
            return false;
        };

        self.favorites.remove(&id);
        if let Some(ids) = self.user_favorites.get_mut(&user) {
            ids.retain(|existing| *existing != id);
        }
        true
    }
}

impl Store for MemoryStore {
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn user_by_telegram_id(
        &self,
        telegram_id: TelegramUserId,
    ) -> Result<Option<User>, RepositoryError> {
        let tables = self.read()?;
        Ok(tables
            .users_by_telegram_id
            .get(&telegram_id)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    fn create_user(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.write()?;

        if let Some(telegram_id) = new.telegram_id
            && let Some(existing) = tables.users_by_telegram_id.get(&telegram_id)
        {
            return tables.users.get(existing).cloned().ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "telegram id {telegram_id} indexes a missing user"
                ))
            });
        }

        Ok(tables.insert_user(new))
    }

    fn cart_items(&self, user: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let tables = self.read()?;
        let Some(ids) = tables.carts.get(&user) else {
            return Ok(Vec::new());
        };

        ids.iter()
            .map(|id| {
                tables.cart_items.get(id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!("cart index lists missing item {id}"))
                })
            })
            .collect()
    }

    fn upsert_cart_item(&self, new: NewCartItem) -> Result<CartItem, RepositoryError> {
        let mut tables = self.write()?;
        let key = (new.user_id, new.product_id.clone(), new.size.clone());

        if let Some(&id) = tables.cart_keys.get(&key) {
            let item = tables.cart_items.get_mut(&id).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("cart key points at missing item {id}"))
            })?;
            item.quantity = item.quantity.saturating_add(new.quantity);
            return Ok(item.clone());
        }

        let item = CartItem {
            id: CartItemId::generate(),
            user_id: new.user_id,
            product_id: new.product_id,
            size: new.size,
            quantity: new.quantity,
            created_at: Utc::now(),
        };

        tables.cart_keys.insert(key, item.id);
        tables.carts.entry(item.user_id).or_default().push(item.id);
        tables.cart_items.insert(item.id, item.clone());
        Ok(item)
    }

    fn update_cart_item(
        &self,
        user: UserId,
        id: CartItemId,
        quantity: Quantity,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut tables = self.write()?;
        Ok(tables.owned_cart_item_mut(user, id).map(|item| {
            item.quantity = quantity;
            item.clone()
        }))
    }

    fn remove_cart_item(&self, user: UserId, id: CartItemId) -> Result<bool, RepositoryError> {
        Ok(self.write()?.delete_cart_item(user, id))
    }

    fn clear_cart(&self, user: UserId) -> Result<usize, RepositoryError> {
        Ok(self.write()?.delete_cart(user))
    }

    fn favorites(&self, user: UserId) -> Result<Vec<Favorite>, RepositoryError> {
        let tables = self.read()?;
        let Some(ids) = tables.user_favorites.get(&user) else {
            return Ok(Vec::new());
        };

        ids.iter()
            .map(|id| {
                tables.favorites.get(id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "favorite index lists missing favorite {id}"
                    ))
                })
            })
            .collect()
    }

    fn upsert_favorite(
        &self,
        user: UserId,
        product: &ProductId,
    ) -> Result<Favorite, RepositoryError> {
        let mut tables = self.write()?;

        if let Some(id) = tables.favorite_keys.get(&(user, product.clone())) {
            return tables.favorites.get(id).cloned().ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "favorite key points at missing favorite {id}"
                ))
            });
        }

        Ok(tables.insert_favorite(user, product))
    }

    fn remove_favorite(&self, user: UserId, product: &ProductId) -> Result<bool, RepositoryError> {
        Ok(self.write()?.delete_favorite(user, product))
    }

    fn toggle_favorite(&self, user: UserId, product: &ProductId) -> Result<bool, RepositoryError> {
        let mut tables = self.write()?;

        if tables.delete_favorite(user, product) {
            return Ok(false);
        }
        tables.insert_favorite(user, product);
        Ok(true)
    }

    fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.write()?;

        let order = Order {
            id: OrderId::generate(),
            user_id: new.user_id,
            items: new.items,
            total_amount: new.total_amount,
            shipping_amount: new.shipping_amount,
            status: OrderStatus::Pending,
            telegram_order_id: new.telegram_order_id,
            created_at: Utc::now(),
        };

        tables.orders.insert(order.id, order.clone());
        tables.delete_cart(order.user_id);
        Ok(order)
    }

    fn order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.read()?.orders.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use drip_bloom_core::Price;

    use super::*;
    use crate::models::OrderItem;

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).expect("valid quantity")
    }

    fn add(store: &MemoryStore, user: UserId, product: &str, size: &str, n: i64) -> CartItem {
        store
            .upsert_cart_item(NewCartItem {
                user_id: user,
                product_id: ProductId::from(product),
                size: size.to_string(),
                quantity: qty(n),
            })
            .expect("upsert")
    }

    #[test]
    fn test_create_user_is_unique_per_telegram_id() {
        let store = MemoryStore::new();
        let first = store
            .create_user(NewUser::telegram(TelegramUserId::new(42)))
            .expect("create");
        let second = store
            .create_user(NewUser::telegram(TelegramUserId::new(42)))
            .expect("create");

        assert_eq!(first.id, second.id);
        assert_eq!(
            store
                .user_by_telegram_id(TelegramUserId::new(42))
                .expect("lookup")
                .map(|u| u.id),
            Some(first.id)
        );
    }

    #[test]
    fn test_guest_users_are_distinct() {
        let store = MemoryStore::new();
        let a = store.create_user(NewUser::guest()).expect("create");
        let b = store.create_user(NewUser::guest()).expect("create");
        assert_ne!(a.id, b.id);
        assert_eq!(store.user(a.id).expect("lookup"), Some(a));
    }

    #[test]
    fn test_upsert_merges_same_product_and_size() {
        let store = MemoryStore::new();
        let user = UserId::generate();

        let first = add(&store, user, "prod-1", "M", 1);
        let second = add(&store, user, "prod-1", "M", 2);

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity.get(), 3);
        assert_eq!(store.cart_items(user).expect("list").len(), 1);
    }

    #[test]
    fn test_upsert_keeps_sizes_apart() {
        let store = MemoryStore::new();
        let user = UserId::generate();

        add(&store, user, "prod-1", "M", 1);
        add(&store, user, "prod-1", "L", 1);

        let items = store.cart_items(user).expect("list");
        let sizes: Vec<_> = items.iter().map(|i| i.size.as_str()).collect();
        assert_eq!(sizes, ["M", "L"]);
    }

    #[test]
    fn test_update_and_remove_are_owner_scoped() {
        let store = MemoryStore::new();
        let owner = UserId::generate();
        let other = UserId::generate();
        let item = add(&store, owner, "prod-1", "M", 1);

        assert!(
            store
                .update_cart_item(other, item.id, qty(5))
                .expect("update")
                .is_none()
        );
        assert!(!store.remove_cart_item(other, item.id).expect("remove"));

        let updated = store
            .update_cart_item(owner, item.id, qty(5))
            .expect("update")
            .expect("owned row");
        assert_eq!(updated.quantity.get(), 5);
    }

    #[test]
    fn test_remove_is_idempotent_and_frees_key() {
        let store = MemoryStore::new();
        let user = UserId::generate();
        let item = add(&store, user, "prod-1", "M", 2);

        assert!(store.remove_cart_item(user, item.id).expect("remove"));
        assert!(!store.remove_cart_item(user, item.id).expect("remove"));

        let again = add(&store, user, "prod-1", "M", 1);
        assert_ne!(again.id, item.id);
        assert_eq!(again.quantity.get(), 1);
    }

    #[test]
    fn test_clear_cart_leaves_other_users() {
        let store = MemoryStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        add(&store, alice, "prod-1", "M", 1);
        add(&store, alice, "prod-2", "S", 1);
        add(&store, bob, "prod-1", "M", 1);

        assert_eq!(store.clear_cart(alice).expect("clear"), 2);
        assert!(store.cart_items(alice).expect("list").is_empty());
        assert_eq!(store.cart_items(bob).expect("list").len(), 1);
    }

    #[test]
    fn test_favorites_upsert_and_toggle() {
        let store = MemoryStore::new();
        let user = UserId::generate();
        let product = ProductId::from("prod-1");

        let first = store.upsert_favorite(user, &product).expect("add");
        let second = store.upsert_favorite(user, &product).expect("add");
        assert_eq!(first.id, second.id);
        assert_eq!(store.favorites(user).expect("list").len(), 1);

        assert!(!store.toggle_favorite(user, &product).expect("toggle"));
        assert!(store.favorites(user).expect("list").is_empty());
        assert!(store.toggle_favorite(user, &product).expect("toggle"));
        assert_eq!(store.favorites(user).expect("list").len(), 1);

        assert!(store.remove_favorite(user, &product).expect("remove"));
        assert!(!store.remove_favorite(user, &product).expect("remove"));
    }

    #[test]
    fn test_create_order_clears_only_that_cart() {
        let store = MemoryStore::new();
        let alice = UserId::generate();
        let bob = UserId::generate();
        add(&store, alice, "prod-1", "M", 2);
        add(&store, bob, "prod-2", "S", 1);

        let order = store
            .create_order(NewOrder {
                user_id: alice,
                items: vec![OrderItem {
                    product_id: ProductId::from("prod-1"),
                    product_name: "Crystal Clear Ring".to_string(),
                    size: "M".to_string(),
                    quantity: qty(2),
                    price: Price::parse("45.00").expect("price"),
                }],
                total_amount: Price::parse("90.00").expect("price"),
                shipping_amount: Price::ZERO,
                telegram_order_id: None,
            })
            .expect("create");

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(store.cart_items(alice).expect("list").is_empty());
        assert_eq!(store.cart_items(bob).expect("list").len(), 1);
        assert_eq!(store.order(order.id).expect("get"), Some(order));
    }

    #[test]
    fn test_concurrent_adds_create_one_row() {
        let store = Arc::new(MemoryStore::new());
        let user = UserId::generate();

        std::thread::scope(|scope| {
            for _ in 0..16 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..25 {
                        add(&store, user, "prod-1", "M", 1);
                    }
                });
            }
        });

        let items = store.cart_items(user).expect("list");
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().map(|i| i.quantity.get()), Some(400));
    }
}
