//! ShopMart storefront library.
//!
//! This crate provides the storefront as a library so the HTTP surface and
//! the per-session shops can be driven from tests.
//!
//! # Layers
//!
//! - [`stores`]: session-scoped filter and cart state
//! - [`components`]: catalog view and sidebars reading the stores
//! - [`shop`]: per-session composition and the registry of live shops
//! - [`routes`]: axum handlers and askama templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod components;
pub mod config;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod shop;
pub mod state;
pub mod stores;
