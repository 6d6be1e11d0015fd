//! Drip Bloom Core - Shared domain types.
//!
//! This crate provides the value types used by the storefront service:
//! - Typed identifiers for users, cart items, favorites, and orders
//! - Catalog references (`ProductId`) and Telegram identities
//! - Decimal prices, cart quantities, and order statuses
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP
//! clients. Invariants that can be expressed in a type (non-negative
//! prices, quantities of at least one) are enforced at construction so
//! the store never has to re-check them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

#[doc(hidden)]
pub use uuid::Uuid;
