//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page
//! GET  /?page=N                - Catalog page N
//! GET  /health                 - Health check
//!
//! # Filters
//! GET  /filters                - Current criteria and page (JSON)
//! POST /filters                - Search / min / max / category
//! POST /filters/keyword        - Set or toggle the keyword
//! POST /filters/price-range    - Apply a price preset
//! POST /filters/reset          - Clear every criterion
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart panel (fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add to cart (triggers cart-updated)
//! POST /cart/increase          - +1 (triggers cart-updated)
//! POST /cart/decrease          - -1, floored at 1 (triggers cart-updated)
//! POST /cart/remove            - Remove line (triggers cart-updated)
//! POST /cart/clear             - Empty the cart (triggers cart-updated)
//!
//! # Catalog
//! POST /catalog/reload         - Retry the catalog fetch
//! POST /mobile/toggle          - Open/close the mobile drawer
//! POST /mobile/close           - Close the mobile drawer
//! ```
//!
//! Mutating routes answer HTMX requests with the `#shop` fragment and
//! everything else with a 303 redirect to `/`.

pub mod cart;
pub mod catalog;
pub mod filter;
pub mod home;

use axum::{
    Router,
    extract::Request,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::middleware::{create_session_layer, request_id_middleware};
use crate::shop::Shop;
use crate::state::AppState;

/// `HX-Trigger` event sent after every cart mutation.
pub const CART_UPDATED: &str = "cart-updated";

/// Whether the request was issued by HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Answer a mutating request: the `#shop` fragment for HTMX, a redirect to
/// the catalog page otherwise.
async fn respond(shop: &Shop, headers: &HeaderMap, trigger: Option<&'static str>) -> Result<Response> {
    if !is_htmx(headers) {
        return Ok(Redirect::to("/").into_response());
    }

    let snapshot = shop.snapshot().await?;
    let fragment = home::ShopFragmentTemplate {
        shop: home::ShopView::from(&snapshot),
    };

    Ok(match trigger {
        Some(event) => (AppendHeaders([("HX-Trigger", event)]), fragment).into_response(),
        None => fragment.into_response(),
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog API.
async fn health() -> &'static str {
    "ok"
}

/// Create the filter routes router.
pub fn filter_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(filter::current).post(filter::apply))
        .route("/keyword", post(filter::keyword))
        .route("/price-range", post(filter::price_range))
        .route("/reset", post(filter::reset))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog page
        .route("/", get(home::home))
        .nest("/filters", filter_routes())
        .nest("/cart", cart_routes())
        .route("/catalog/reload", post(catalog::reload))
        .route("/mobile/toggle", post(catalog::toggle_mobile))
        .route("/mobile/close", post(catalog::close_mobile))
}

/// Build the full application: routes, sessions, request IDs and tracing.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                shop = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));

        headers.insert("HX-Request", HeaderValue::from_static("false"));
        assert!(!is_htmx(&headers));
    }
}
