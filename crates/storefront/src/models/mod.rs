//! Domain models for the storefront.
//!
//! Store rows (`CartItem`, `Favorite`, `Order`, `User`) hold only IDs for
//! catalog products. The `*Line`/`*Entry` types are read results joined
//! with the product they reference.

pub mod cart;
pub mod favorite;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{CartItem, CartLine, NewCartItem};
pub use favorite::{Favorite, FavoriteEntry};
pub use order::{NewOrder, Order, OrderItem};
pub use product::{Category, Product};
pub use user::{NewUser, User};
