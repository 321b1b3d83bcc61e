//! ShopMart Core - Storefront domain library.
//!
//! This crate provides the domain model shared by the storefront components:
//! - Catalog products and their identifiers
//! - Filter criteria and the catalog predicate
//! - Cart lines and cart arithmetic
//! - The filtered, paginated catalog view
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no shared state. Stores and components that own and share these
//! values live in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, products, prices and load status
//! - [`filter`] - [`FilterCriteria`] and its predicate
//! - [`cart`] - [`Cart`] and [`CartLine`]
//! - [`pagination`] - [`derive_view`] and [`CatalogPage`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod pagination;
pub mod types;

pub use cart::{Cart, CartLine};
pub use filter::FilterCriteria;
pub use pagination::{CatalogPage, PAGE_SIZE, derive_view};
pub use types::*;
