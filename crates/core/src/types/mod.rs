//! Core types for ShopMart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use price::{PriceRange, UnknownPriceRange, format_price, parse_price_input};
pub use product::{CatalogResponse, Product, distinct_categories};
pub use status::LoadStatus;
