//! Shop extractor.
//!
//! Resolves the visitor's [`Shop`] from the session, mounting a new one on
//! the first request of a session or after the previous one went idle.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use tracing::Span;

use crate::error::AppError;
use crate::shop::{Shop, ShopKey};
use crate::state::AppState;
use crate::stores::StoreError;

/// Session key holding the visitor's [`ShopKey`].
pub const SHOP_KEY: &str = "shop_key";

/// Extractor for the current visitor's shop.
///
/// Rejects with [`StoreError::MissingProvider`] if the route is not behind
/// the session layer.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentShop(shop): CurrentShop) -> Result<impl IntoResponse> {
///     let snapshot = shop.snapshot().await?;
///     Ok(format!("{} items in cart", snapshot.cart.total_items()))
/// }
/// ```
pub struct CurrentShop(pub Arc<Shop>);

impl FromRequestParts<AppState> for CurrentShop {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(StoreError::MissingProvider { store: "Shop" })?;

        let key = match session.get::<ShopKey>(SHOP_KEY).await? {
            Some(key) => key,
            None => {
                let key = ShopKey::generate();
                session.insert(SHOP_KEY, key).await?;
                key
            }
        };

        Span::current().record("shop", tracing::field::display(key));
        sentry::configure_scope(|scope| {
            scope.set_tag("shop", key);
        });

        let shop = state.shops().get_or_mount(key).await?;
        Ok(Self(shop))
    }
}
