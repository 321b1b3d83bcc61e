//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Without HTMX every mutation redirects back to the catalog page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, http::HeaderMap, response::Response};
use serde::Deserialize;
use shopmart_core::{Cart, CartLine, ProductId, format_price};
use tracing::instrument;

use super::{CART_UPDATED, respond};
use crate::error::{Result, add_breadcrumb};
use crate::middleware::CurrentShop;
use crate::shop::ShopEvent;

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    /// Whether the decrease button is enabled (quantity never drops below 1).
    pub can_decrease: bool,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id().to_string(),
            title: line.product.title.clone(),
            thumbnail: line.product.thumbnail.clone(),
            quantity: line.quantity,
            price: format_price(line.product.price),
            line_price: line.formatted_total(),
            can_decrease: line.quantity > 1,
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: &'static str,
    pub total: String,
    pub item_count: u32,
    /// e.g. "3 items".
    pub item_label: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = format_price(cart.total_price());
        let item_count = cart.total_items();
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            total: subtotal.clone(),
            subtotal,
            shipping: "Free",
            item_count,
            item_label: if item_count == 1 {
                "1 item".to_string()
            } else {
                format!("{item_count} items")
            },
        }
    }
}

/// Form identifying one product.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: ProductId,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add one unit of a catalog product.
#[instrument(skip(shop, headers))]
pub async fn add(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = form.product_id.to_string();
    add_breadcrumb("cart", "add_to_cart", Some(&[("product_id", id.as_str())]));
    shop.apply(ShopEvent::AddToCart(form.product_id)).await?;
    respond(&shop, &headers, Some(CART_UPDATED)).await
}

/// Add one unit to an existing line.
#[instrument(skip(shop, headers))]
pub async fn increase(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    shop.apply(ShopEvent::IncreaseQuantity(form.product_id))
        .await?;
    respond(&shop, &headers, Some(CART_UPDATED)).await
}

/// Remove one unit from an existing line, never below 1.
#[instrument(skip(shop, headers))]
pub async fn decrease(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    shop.apply(ShopEvent::DecreaseQuantity(form.product_id))
        .await?;
    respond(&shop, &headers, Some(CART_UPDATED)).await
}

/// Remove a line.
#[instrument(skip(shop, headers))]
pub async fn remove(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = form.product_id.to_string();
    add_breadcrumb("cart", "remove_from_cart", Some(&[("product_id", id.as_str())]));
    shop.apply(ShopEvent::RemoveFromCart(form.product_id))
        .await?;
    respond(&shop, &headers, Some(CART_UPDATED)).await
}

/// Empty the cart.
#[instrument(skip(shop, headers))]
pub async fn clear(CurrentShop(shop): CurrentShop, headers: HeaderMap) -> Result<Response> {
    add_breadcrumb("cart", "clear_cart", None);
    shop.apply(ShopEvent::ClearCart).await?;
    respond(&shop, &headers, Some(CART_UPDATED)).await
}

/// Cart panel fragment.
#[instrument(skip(shop))]
pub async fn show(CurrentShop(shop): CurrentShop) -> Result<CartPanelTemplate> {
    let cart = shop.cart().snapshot()?;
    Ok(CartPanelTemplate {
        cart: CartView::from(&cart),
    })
}

/// Cart count badge fragment.
#[instrument(skip(shop))]
pub async fn count(CurrentShop(shop): CurrentShop) -> Result<CartCountTemplate> {
    Ok(CartCountTemplate {
        count: shop.cart().total_items()?,
    })
}

#[cfg(test)]
mod tests {
    use shopmart_core::Product;

    use super::*;

    fn product(id: u32, price: f64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            price,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 1,
            brand: String::new(),
            category: "misc".to_string(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add(&product(1, 10.0));
        cart.add(&product(1, 10.0));
        cart.add(&product(2, 2.5));

        let view = CartView::from(&cart);
        assert_eq!(view.item_count, 3);
        assert_eq!(view.item_label, "3 items");
        assert_eq!(view.subtotal, "$22.50");
        assert_eq!(view.total, "$22.50");
        assert_eq!(view.shipping, "Free");

        let first = &view.items[0];
        assert_eq!(first.quantity, 2);
        assert_eq!(first.price, "$10.00");
        assert_eq!(first.line_price, "$20.00");
        assert!(first.can_decrease);
        assert!(!view.items[1].can_decrease);
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "$0.00");
    }

    #[test]
    fn test_count_badge_renders() {
        let html = CartCountTemplate { count: 3 }.render().expect("render");
        assert!(html.contains('3'));
    }
}
