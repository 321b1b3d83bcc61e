//! Filter route handlers.
//!
//! Every submitted field becomes one setter call on the shop's filter store,
//! even when the value is unchanged, so any filter submission returns the
//! catalog to page 1. A form's setters are applied as one step.

use axum::{Form, http::HeaderMap, response::Response};
use serde::Deserialize;
use shopmart_core::{PriceRange, parse_price_input};
use tracing::instrument;

use super::respond;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CurrentShop;
use crate::shop::{ShopEvent, ShopSnapshot};

/// Search and price form. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct FilterForm {
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub category: Option<String>,
}

impl FilterForm {
    /// Events for the submitted fields, in form order.
    ///
    /// Price text that is empty, not a number or negative clears the bound.
    #[must_use]
    pub fn into_events(self) -> Vec<ShopEvent> {
        let mut events = Vec::new();
        if let Some(search) = self.search {
            events.push(ShopEvent::SetSearchQuery(search));
        }
        if let Some(min) = self.min_price {
            events.push(ShopEvent::SetMinPrice(parse_price_input(&min)));
        }
        if let Some(max) = self.max_price {
            events.push(ShopEvent::SetMaxPrice(parse_price_input(&max)));
        }
        if let Some(category) = self.category {
            events.push(ShopEvent::SetCategory(category));
        }
        events
    }
}

/// How a keyword chip applies its keyword.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMode {
    /// Clicking the active keyword clears it.
    #[default]
    Toggle,
    /// Always sets the keyword.
    Set,
}

/// Keyword chip form.
#[derive(Debug, Deserialize)]
pub struct KeywordForm {
    pub keyword: String,
    #[serde(default)]
    pub mode: KeywordMode,
}

/// Price preset form.
#[derive(Debug, Deserialize)]
pub struct PriceRangeForm {
    pub range: String,
}

/// Apply search, price and category fields.
#[instrument(skip(shop, headers))]
pub async fn apply(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<FilterForm>,
) -> Result<Response> {
    shop.apply_all(form.into_events()).await?;
    respond(&shop, &headers, None).await
}

/// Set or toggle the active keyword.
#[instrument(skip(shop, headers))]
pub async fn keyword(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<KeywordForm>,
) -> Result<Response> {
    let event = match form.mode {
        KeywordMode::Toggle => ShopEvent::ToggleKeyword(form.keyword),
        KeywordMode::Set => ShopEvent::SetKeyword(form.keyword),
    };
    shop.apply(event).await?;
    respond(&shop, &headers, None).await
}

/// Apply a price preset.
#[instrument(skip(shop, headers))]
pub async fn price_range(
    CurrentShop(shop): CurrentShop,
    headers: HeaderMap,
    Form(form): Form<PriceRangeForm>,
) -> Result<Response> {
    let range: PriceRange = form
        .range
        .parse()
        .map_err(|e: shopmart_core::UnknownPriceRange| AppError::BadRequest(e.to_string()))?;
    shop.apply(ShopEvent::ApplyPriceRange(range)).await?;
    respond(&shop, &headers, None).await
}

/// Clear every criterion.
#[instrument(skip(shop, headers))]
pub async fn reset(CurrentShop(shop): CurrentShop, headers: HeaderMap) -> Result<Response> {
    add_breadcrumb("filters", "reset_filters", None);
    shop.apply(ShopEvent::ResetFilters).await?;
    respond(&shop, &headers, None).await
}

/// Current criteria, page and load status as JSON.
#[instrument(skip(shop))]
pub async fn current(CurrentShop(shop): CurrentShop) -> Result<axum::Json<serde_json::Value>> {
    let ShopSnapshot {
        criteria,
        page,
        status,
        cart,
        ..
    } = shop.snapshot().await?;

    Ok(axum::Json(serde_json::json!({
        "criteria": criteria,
        "status": status,
        "current_page": page.current_page,
        "total_pages": page.total_pages,
        "filtered_count": page.filtered_count,
        "product_ids": page.items.iter().map(|p| p.id).collect::<Vec<_>>(),
        "cart_items": cart.total_items(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_form_events() {
        let form = FilterForm {
            search: Some("phone".to_string()),
            min_price: Some("abc".to_string()),
            max_price: Some(" 250 ".to_string()),
            category: None,
        };
        assert_eq!(
            form.into_events(),
            vec![
                ShopEvent::SetSearchQuery("phone".to_string()),
                ShopEvent::SetMinPrice(None),
                ShopEvent::SetMaxPrice(Some(250.0)),
            ]
        );
    }

    #[test]
    fn test_empty_form_changes_nothing() {
        assert!(FilterForm::default().into_events().is_empty());
    }

    #[test]
    fn test_keyword_form_defaults_to_toggle() {
        let form: KeywordForm = serde_json::from_str(r#"{"keyword":"laptop"}"#).expect("parse");
        assert_eq!(form.mode, KeywordMode::Toggle);

        let form: KeywordForm =
            serde_json::from_str(r#"{"keyword":"apple","mode":"set"}"#).expect("parse");
        assert_eq!(form.mode, KeywordMode::Set);
    }
}
