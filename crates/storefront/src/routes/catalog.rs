//! Catalog reload and mobile drawer handlers.

use axum::{http::HeaderMap, response::Response};
use tracing::instrument;

use super::respond;
use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentShop;
use crate::shop::ShopEvent;

/// Fetch the catalog again. A fetch already in flight is not duplicated.
#[instrument(skip(shop, headers))]
pub async fn reload(CurrentShop(shop): CurrentShop, headers: HeaderMap) -> Result<Response> {
    add_breadcrumb("catalog", "reload_catalog", None);
    shop.apply(ShopEvent::ReloadCatalog).await?;
    respond(&shop, &headers, None).await
}

/// Open or close the mobile filter drawer.
#[instrument(skip(shop, headers))]
pub async fn toggle_mobile(CurrentShop(shop): CurrentShop, headers: HeaderMap) -> Result<Response> {
    shop.apply(ShopEvent::ToggleMobileSidebar).await?;
    respond(&shop, &headers, None).await
}

/// Close the mobile filter drawer.
#[instrument(skip(shop, headers))]
pub async fn close_mobile(CurrentShop(shop): CurrentShop, headers: HeaderMap) -> Result<Response> {
    shop.apply(ShopEvent::CloseMobileSidebar).await?;
    respond(&shop, &headers, None).await
}
