//! Catalog page route handler.
//!
//! The page is rendered from one [`ShopSnapshot`]. View types below hold
//! preformatted strings and flags so templates stay free of logic.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::Query;
use serde::Deserialize;
use shopmart_core::{CatalogPage, FilterCriteria, LoadStatus, PriceRange, Product, format_price};
use tracing::instrument;

use super::cart::{CartCountTemplate, CartPanelTemplate, CartView};
use crate::components::SidebarView;
use crate::error::Result;
use crate::filters;
use crate::middleware::CurrentShop;
use crate::shop::{ShopEvent, ShopSnapshot};

// =============================================================================
// View Types
// =============================================================================

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: String,
    pub rating: String,
    pub thumbnail: String,
    /// e.g. "-12%", absent when there is no discount.
    pub discount: Option<String>,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: format_price(product.price),
            rating: format!("{:.1}", product.rating),
            thumbnail: product.thumbnail.clone(),
            discount: (product.discount_percentage > 0.0)
                .then(|| format!("-{:.0}%", product.discount_percentage)),
            in_stock: product.stock > 0,
        }
    }
}

/// A selectable chip: category, keyword or price preset.
#[derive(Debug, Clone)]
pub struct ChipView {
    pub value: String,
    pub label: String,
    pub hint: String,
    pub active: bool,
}

impl ChipView {
    fn new(value: &str, active: bool) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
            hint: String::new(),
            active,
        }
    }

    fn preset(range: PriceRange, criteria: &FilterCriteria) -> Self {
        Self {
            value: range.as_str().to_string(),
            label: range.label().to_string(),
            hint: range.hint().to_string(),
            active: range.bounds() == (criteria.min_price, criteria.max_price),
        }
    }
}

/// Current filter values as form input text.
#[derive(Debug, Clone, Default)]
pub struct FilterInputsView {
    pub search_query: String,
    pub min_price: String,
    pub max_price: String,
    pub category: String,
    pub keyword: String,
}

impl From<&FilterCriteria> for FilterInputsView {
    fn from(criteria: &FilterCriteria) -> Self {
        Self {
            search_query: criteria.search_query.clone(),
            min_price: criteria.min_price.map(|p| p.to_string()).unwrap_or_default(),
            max_price: criteria.max_price.map(|p| p.to_string()).unwrap_or_default(),
            category: criteria.category.clone(),
            keyword: criteria.keyword.clone(),
        }
    }
}

/// A numbered pager link.
#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub number: usize,
    pub current: bool,
}

/// Pager display data, present only when there is more than one page.
#[derive(Debug, Clone)]
pub struct PagerView {
    pub has_previous: bool,
    pub has_next: bool,
    pub previous: usize,
    pub next: usize,
    pub links: Vec<PageLinkView>,
}

impl PagerView {
    fn from_page(page: &CatalogPage) -> Option<Self> {
        if !page.is_paginated() {
            return None;
        }
        Some(Self {
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            previous: page.current_page.saturating_sub(1).max(1),
            next: (page.current_page + 1).min(page.total_pages),
            links: page
                .page_numbers()
                .into_iter()
                .map(|number| PageLinkView {
                    number,
                    current: number == page.current_page,
                })
                .collect(),
        })
    }
}

/// Filter sidebar fragment. Rendered once for desktop and once for mobile.
#[derive(Template, WebTemplate)]
#[template(path = "partials/sidebar.html")]
pub struct SidebarTemplate {
    /// Prefix for element ids, so both sidebars can share a page.
    pub prefix: &'static str,
    pub is_mobile: bool,
    pub open: bool,
    pub inputs: FilterInputsView,
    pub categories: Vec<ChipView>,
    pub keywords: Vec<ChipView>,
    pub presets: Vec<ChipView>,
    pub cart_count: u32,
}

impl SidebarTemplate {
    fn build(view: &SidebarView, prefix: &'static str, is_mobile: bool, open: bool) -> Self {
        let criteria = &view.criteria;
        Self {
            prefix,
            is_mobile,
            open,
            inputs: FilterInputsView::from(criteria),
            categories: view
                .categories
                .iter()
                .map(|c| ChipView::new(c, *c == criteria.category))
                .collect(),
            keywords: view
                .keywords
                .iter()
                .map(|k| ChipView::new(k, *k == criteria.keyword))
                .collect(),
            presets: PriceRange::ALL
                .into_iter()
                .map(|range| ChipView::preset(range, criteria))
                .collect(),
            cart_count: view.cart_count,
        }
    }
}

/// Everything inside the page's `#shop` region.
pub struct ShopView {
    pub products: Vec<ProductCardView>,
    pub result_label: String,
    pub is_loading: bool,
    pub load_error: Option<String>,
    /// No product matches the criteria (and nothing is loading or failing).
    pub show_empty: bool,
    pub has_active_filters: bool,
    pub inputs: FilterInputsView,
    pub popular_keywords: Vec<ChipView>,
    pub pager: Option<PagerView>,
    pub cart_badge: CartCountTemplate,
    pub cart_panel: CartPanelTemplate,
    pub sidebar: SidebarTemplate,
    pub mobile_sidebar: SidebarTemplate,
}

impl From<&ShopSnapshot> for ShopView {
    fn from(snapshot: &ShopSnapshot) -> Self {
        let page = &snapshot.page;
        let is_loading = snapshot.status.is_loading();
        let load_error = match &snapshot.status {
            LoadStatus::Failed(message) => Some(message.clone()),
            _ => None,
        };

        Self {
            products: page.items.iter().map(ProductCardView::from).collect(),
            result_label: result_label(page.filtered_count),
            show_empty: page.filtered_count == 0 && !is_loading && load_error.is_none(),
            is_loading,
            load_error,
            has_active_filters: !snapshot.criteria.is_empty(),
            inputs: FilterInputsView::from(&snapshot.criteria),
            popular_keywords: snapshot
                .popular_keywords
                .iter()
                .map(|k| ChipView::new(k, *k == snapshot.criteria.keyword))
                .collect(),
            pager: PagerView::from_page(page),
            cart_badge: CartCountTemplate {
                count: snapshot.cart.total_items(),
            },
            cart_panel: CartPanelTemplate {
                cart: CartView::from(&snapshot.cart),
            },
            sidebar: SidebarTemplate::build(&snapshot.sidebar, "desktop", false, true),
            mobile_sidebar: SidebarTemplate::build(
                &snapshot.mobile_sidebar.sidebar,
                "mobile",
                true,
                snapshot.mobile_sidebar.open,
            ),
        }
    }
}

fn result_label(count: usize) -> String {
    if count == 1 {
        "1 Product Found".to_string()
    } else {
        format!("{count} Products Found")
    }
}

// =============================================================================
// Templates and Handlers
// =============================================================================

/// Full catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub shop: ShopView,
}

/// `#shop` region fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/shop.html")]
pub struct ShopFragmentTemplate {
    pub shop: ShopView,
}

/// Catalog page query parameters.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub page: Option<usize>,
}

/// Display the catalog page, optionally selecting a page first.
#[instrument(skip(shop))]
pub async fn home(
    CurrentShop(shop): CurrentShop,
    Query(query): Query<HomeQuery>,
) -> Result<IndexTemplate> {
    if let Some(page) = query.page {
        shop.apply(ShopEvent::SetPage(page)).await?;
    }

    let snapshot = shop.snapshot().await?;
    Ok(IndexTemplate {
        shop: ShopView::from(&snapshot),
    })
}
