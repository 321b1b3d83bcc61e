//! A shop: one visitor's storefront.
//!
//! # Architecture
//!
//! A [`Shop`] is the root composition for one session. It creates the
//! [`StoreScope`], exactly one [`FilterStore`] and one [`CartStore`], and the
//! components that read them:
//!
//! ```text
//! Shop
//! ├── FilterStore ─┬── CatalogView ── ProductFeed ─┬── Sidebar
//! ├── CartStore ───┘                               └── MobileSidebar
//! └── StoreScope (closed on teardown)
//! ```
//!
//! Every user action is a [`ShopEvent`]. Events run one at a time per shop;
//! all reads and renders observe the state left by the last completed event.

pub mod registry;

use std::sync::Arc;

use shopmart_core::{Cart, CatalogPage, FilterCriteria, LoadStatus, PriceRange, Product, ProductId};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::catalog::CatalogClient;
use crate::components::{
    CatalogView, MobileSidebar, MobileSidebarView, POPULAR_KEYWORDS, Sidebar, SidebarView,
};
use crate::stores::{CartStore, FilterStore, StoreError, StoreScope};

pub use registry::{ShopKey, ShopRegistry};

/// Errors from applying a [`ShopEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The product is not part of the loaded catalog.
    #[error("Product {0} is not in the catalog")]
    UnknownProduct(ProductId),
}

/// A user action against a shop.
#[derive(Debug, Clone, PartialEq)]
pub enum ShopEvent {
    SetSearchQuery(String),
    SetMinPrice(Option<f64>),
    SetMaxPrice(Option<f64>),
    SetCategory(String),
    /// Set the keyword (sidebar chips).
    SetKeyword(String),
    /// Toggle the keyword (catalog chips).
    ToggleKeyword(String),
    ApplyPriceRange(PriceRange),
    ResetFilters,
    AddToCart(ProductId),
    RemoveFromCart(ProductId),
    IncreaseQuantity(ProductId),
    DecreaseQuantity(ProductId),
    ClearCart,
    SetPage(usize),
    NextPage,
    PreviousPage,
    ReloadCatalog,
    ToggleMobileSidebar,
    CloseMobileSidebar,
}

impl ShopEvent {
    /// Short name used in logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetSearchQuery(_) => "set_search_query",
            Self::SetMinPrice(_) => "set_min_price",
            Self::SetMaxPrice(_) => "set_max_price",
            Self::SetCategory(_) => "set_category",
            Self::SetKeyword(_) => "set_keyword",
            Self::ToggleKeyword(_) => "toggle_keyword",
            Self::ApplyPriceRange(_) => "apply_price_range",
            Self::ResetFilters => "reset_filters",
            Self::AddToCart(_) => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::IncreaseQuantity(_) => "increase_quantity",
            Self::DecreaseQuantity(_) => "decrease_quantity",
            Self::ClearCart => "clear_cart",
            Self::SetPage(_) => "set_page",
            Self::NextPage => "next_page",
            Self::PreviousPage => "previous_page",
            Self::ReloadCatalog => "reload_catalog",
            Self::ToggleMobileSidebar => "toggle_mobile_sidebar",
            Self::CloseMobileSidebar => "close_mobile_sidebar",
        }
    }
}

/// Everything the storefront page renders, taken at one instant.
#[derive(Debug, Clone)]
pub struct ShopSnapshot {
    pub page: CatalogPage,
    pub status: LoadStatus,
    pub criteria: FilterCriteria,
    pub cart: Cart,
    pub sidebar: SidebarView,
    pub mobile_sidebar: MobileSidebarView,
    pub popular_keywords: &'static [&'static str],
}

/// One visitor's storefront.
pub struct Shop {
    scope: StoreScope,
    filters: FilterStore,
    cart: CartStore,
    catalog: CatalogView,
    sidebar: Sidebar,
    mobile_sidebar: MobileSidebar,
    client: CatalogClient,
    events: Mutex<()>,
}

impl Shop {
    /// Build the stores and components and start fetching the catalog.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the fresh scope is unexpectedly closed.
    pub fn mount(client: CatalogClient) -> Result<Self, StoreError> {
        let scope = StoreScope::new();
        let filters = FilterStore::new(scope.clone());
        let cart = CartStore::new(scope.clone());

        let catalog = CatalogView::new(filters.clone(), cart.clone(), scope.clone())?;
        let sidebar = Sidebar::new(filters.clone(), cart.clone(), catalog.feed());
        let mobile_sidebar =
            MobileSidebar::new(Sidebar::new(filters.clone(), cart.clone(), catalog.feed()));

        catalog.load(client.clone())?;
        debug!(endpoint = %client.endpoint(), "Shop mounted");

        Ok(Self {
            scope,
            filters,
            cart,
            catalog,
            sidebar,
            mobile_sidebar,
            client,
            events: Mutex::new(()),
        })
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterStore {
        &self.filters
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogView {
        &self.catalog
    }

    /// Whether the shop has not been torn down.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.scope.is_open()
    }

    /// Apply one event. Events on the same shop never interleave.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Store`] once the shop is torn down and
    /// [`ShopError::UnknownProduct`] when adding a product the catalog does
    /// not contain.
    #[instrument(skip(self), fields(event = event.name()))]
    pub async fn apply(&self, event: ShopEvent) -> Result<(), ShopError> {
        let _guard = self.events.lock().await;
        self.dispatch(event)
    }

    /// Apply several events as one step: no snapshot sees only some of them.
    ///
    /// Stops at the first failing event; the ones before it stay applied.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    #[instrument(skip_all, fields(events = events.len()))]
    pub async fn apply_all(&self, events: Vec<ShopEvent>) -> Result<(), ShopError> {
        let _guard = self.events.lock().await;
        for event in events {
            debug!(event = event.name(), "Applying event");
            self.dispatch(event)?;
        }
        Ok(())
    }

    fn dispatch(&self, event: ShopEvent) -> Result<(), ShopError> {
        match event {
            ShopEvent::SetSearchQuery(query) => self.filters.set_search_query(query)?,
            ShopEvent::SetMinPrice(price) => self.filters.set_min_price(price)?,
            ShopEvent::SetMaxPrice(price) => self.filters.set_max_price(price)?,
            ShopEvent::SetCategory(category) => self.filters.set_category(category)?,
            ShopEvent::SetKeyword(keyword) => self.filters.set_keyword(keyword)?,
            ShopEvent::ToggleKeyword(keyword) => self.filters.toggle_keyword(&keyword)?,
            ShopEvent::ApplyPriceRange(range) => self.filters.apply_price_range(range)?,
            ShopEvent::ResetFilters => self.filters.reset()?,
            ShopEvent::AddToCart(id) => {
                self.catalog
                    .add_to_cart(id)?
                    .ok_or(ShopError::UnknownProduct(id))?;
            }
            ShopEvent::RemoveFromCart(id) => {
                self.cart.remove_from_cart(id)?;
            }
            ShopEvent::IncreaseQuantity(id) => {
                self.cart.increase_quantity(id)?;
            }
            ShopEvent::DecreaseQuantity(id) => {
                self.cart.decrease_quantity(id)?;
            }
            ShopEvent::ClearCart => self.cart.clear_cart()?,
            ShopEvent::SetPage(page) => self.catalog.set_page(page)?,
            ShopEvent::NextPage => self.catalog.next_page()?,
            ShopEvent::PreviousPage => self.catalog.previous_page()?,
            ShopEvent::ReloadCatalog => {
                self.catalog.load(self.client.clone())?;
            }
            ShopEvent::ToggleMobileSidebar => {
                self.scope.ensure_open("MobileSidebar")?;
                self.mobile_sidebar.toggle();
            }
            ShopEvent::CloseMobileSidebar => {
                self.scope.ensure_open("MobileSidebar")?;
                self.mobile_sidebar.close();
            }
        }

        Ok(())
    }

    /// Render the whole page state.
    ///
    /// Waits for any in-progress event so the snapshot never shows half of
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the shop is torn down.
    pub async fn snapshot(&self) -> Result<ShopSnapshot, StoreError> {
        let _guard = self.events.lock().await;

        Ok(ShopSnapshot {
            page: self.catalog.view()?,
            status: self.catalog.status(),
            criteria: self.filters.criteria()?,
            cart: self.cart.snapshot()?,
            sidebar: self.sidebar.view()?,
            mobile_sidebar: self.mobile_sidebar.view()?,
            popular_keywords: &POPULAR_KEYWORDS,
        })
    }

    /// The loaded product list.
    #[must_use]
    pub fn products(&self) -> Arc<[Product]> {
        self.catalog.products()
    }

    /// Close the scope. Every store handle fails from now on and an
    /// in-flight catalog fetch is abandoned. Idempotent.
    pub fn teardown(&self) {
        if self.scope.is_open() {
            self.scope.close();
            info!("Shop torn down");
        }
    }
}

impl Drop for Shop {
    fn drop(&mut self) {
        self.scope.close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::*;
    use crate::config::CatalogConfig;

    /// A client pointing at a port nothing listens on.
    fn unreachable_client() -> CatalogClient {
        let url = Url::parse("http://127.0.0.1:9/products").expect("valid url");
        let mut config = CatalogConfig::new(url);
        config.timeout = Duration::from_millis(200);
        CatalogClient::new(&config).expect("client")
    }

    fn product(id: u32, title: &str, price: f64, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            description: String::new(),
            price,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 1,
            brand: String::new(),
            category: category.to_string(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    async fn mounted() -> Shop {
        let shop = Shop::mount(unreachable_client()).expect("mount");
        shop.catalog.settled().await;
        shop.catalog.replace_products(vec![
            product(1, "Phone X", 799.0, "smartphones"),
            product(2, "Lamp", 30.0, "home"),
            product(3, "Phone Case", 15.0, "accessories"),
        ]);
        shop
    }

    #[tokio::test]
    async fn test_failed_load_keeps_products_and_reports_failure() {
        let shop = Shop::mount(unreachable_client()).expect("mount");
        shop.catalog.settled().await;

        assert!(shop.catalog.status().is_failed());
        assert!(shop.products().is_empty());
        let snapshot = shop.snapshot().await.expect("live");
        assert!(snapshot.page.items.is_empty());
    }

    #[tokio::test]
    async fn test_events_flow_through_shared_stores() {
        let shop = mounted().await;

        shop.apply(ShopEvent::SetSearchQuery("phone".into()))
            .await
            .expect("live");
        let snapshot = shop.snapshot().await.expect("live");
        assert_eq!(snapshot.page.filtered_count, 2);
        assert_eq!(snapshot.sidebar.criteria.search_query, "phone");
        assert_eq!(snapshot.mobile_sidebar.sidebar.criteria.search_query, "phone");

        shop.apply(ShopEvent::AddToCart(ProductId::new(2)))
            .await
            .expect("live");
        shop.apply(ShopEvent::AddToCart(ProductId::new(2)))
            .await
            .expect("live");
        let snapshot = shop.snapshot().await.expect("live");
        assert_eq!(snapshot.cart.total_items(), 2);
        assert_eq!(snapshot.sidebar.cart_count, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_apply_all_is_seen_whole_or_not_at_all() {
        let shop = Arc::new(mounted().await);

        let writer = {
            let shop = Arc::clone(&shop);
            tokio::spawn(async move {
                for round in 0..200 {
                    let (query, category) = if round % 2 == 0 {
                        ("phone", "smartphones")
                    } else {
                        ("", "")
                    };
                    shop.apply_all(vec![
                        ShopEvent::SetSearchQuery(query.into()),
                        ShopEvent::SetMinPrice(None),
                        ShopEvent::SetCategory(category.into()),
                    ])
                    .await
                    .expect("live");
                }
            })
        };

        while !writer.is_finished() {
            let criteria = shop.snapshot().await.expect("live").criteria;
            assert_eq!(
                criteria.search_query.is_empty(),
                criteria.category.is_empty(),
                "partial form in snapshot: {criteria:?}"
            );
            tokio::task::yield_now().await;
        }
        writer.await.expect("writer");

        let snapshot = shop.snapshot().await.expect("live");
        assert!(snapshot.criteria.is_empty());
    }

    #[tokio::test]
    async fn test_apply_all_stops_at_first_error() {
        let shop = mounted().await;
        let err = shop
            .apply_all(vec![
                ShopEvent::AddToCart(ProductId::new(2)),
                ShopEvent::AddToCart(ProductId::new(42)),
                ShopEvent::AddToCart(ProductId::new(3)),
            ])
            .await
            .expect_err("unknown product");

        assert_eq!(err, ShopError::UnknownProduct(ProductId::new(42)));
        let cart = shop.snapshot().await.expect("live").cart;
        assert_eq!(cart.total_items(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let shop = mounted().await;
        let err = shop
            .apply(ShopEvent::AddToCart(ProductId::new(42)))
            .await
            .expect_err("unknown product");
        assert_eq!(err, ShopError::UnknownProduct(ProductId::new(42)));
    }

    #[tokio::test]
    async fn test_mobile_sidebar_toggle_event() {
        let shop = mounted().await;
        shop.apply(ShopEvent::ToggleMobileSidebar).await.expect("live");
        assert!(shop.snapshot().await.expect("live").mobile_sidebar.open);
        shop.apply(ShopEvent::CloseMobileSidebar).await.expect("live");
        assert!(!shop.snapshot().await.expect("live").mobile_sidebar.open);
    }

    #[tokio::test]
    async fn test_teardown_closes_every_store() {
        let shop = mounted().await;
        let cart = shop.cart().clone();
        shop.teardown();
        shop.teardown();

        assert!(!shop.is_live());
        assert!(cart.total_items().is_err());
        assert!(shop.snapshot().await.is_err());
        assert_eq!(
            shop.apply(ShopEvent::ResetFilters).await,
            Err(ShopError::Store(StoreError::ScopeClosed {
                store: "FilterStore"
            }))
        );
    }
}
