//! Drip Bloom storefront library.
//!
//! JSON backend for the Drip Bloom Telegram WebApp: a static product
//! catalog, per-shopper carts and favorites, and checkout with a seller
//! notification over the Telegram Bot API.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
