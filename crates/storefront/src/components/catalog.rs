//! Catalog view: owns the fetched product list and the current page.
//!
//! The filtered page is never cached. Every read runs
//! [`derive_view`](shopmart_core::derive_view) over the current products,
//! the current criteria and the current page. Before each read or page change
//! the view checks whether the criteria or the product list changed since it
//! last looked, and if so goes back to page 1.

use std::sync::{Arc, Mutex, PoisonError};

use shopmart_core::{CatalogPage, FilterCriteria, LoadStatus, Product, ProductId, derive_view};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::CatalogClient;
use crate::stores::{CartStore, FilterStore, StoreError, StoreScope};

/// Keyword chips offered above the product grid.
pub const POPULAR_KEYWORDS: [&str; 6] = [
    "smartphone",
    "laptop",
    "fragrance",
    "skincare",
    "groceries",
    "furniture",
];

/// Read-only access to the product list a catalog view owns.
pub type ProductFeed = watch::Receiver<Arc<[Product]>>;

/// The catalog view of one shop.
pub struct CatalogView {
    filters: FilterStore,
    cart: CartStore,
    products: Arc<watch::Sender<Arc<[Product]>>>,
    status: Arc<watch::Sender<LoadStatus>>,
    cursor: Mutex<PageCursor>,
    scope: StoreScope,
}

/// Current page plus the change markers it was computed against.
struct PageCursor {
    page: usize,
    criteria: watch::Receiver<FilterCriteria>,
    products: watch::Receiver<Arc<[Product]>>,
}

impl PageCursor {
    /// Go back to page 1 if the criteria or the product list changed.
    fn sync(&mut self) {
        let criteria_changed = self.criteria.has_changed().unwrap_or(false);
        let products_changed = self.products.has_changed().unwrap_or(false);
        if criteria_changed || products_changed {
            self.criteria.mark_unchanged();
            self.products.mark_unchanged();
            self.page = 1;
        }
    }
}

impl CatalogView {
    /// Create an empty catalog view reading `filters` and writing `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] if `scope` is already closed.
    pub fn new(filters: FilterStore, cart: CartStore, scope: StoreScope) -> Result<Self, StoreError> {
        let (products, products_rx) = watch::channel::<Arc<[Product]>>(Arc::from(Vec::new()));
        let (status, _) = watch::channel(LoadStatus::Idle);
        let cursor = PageCursor {
            page: 1,
            criteria: filters.subscribe()?,
            products: products_rx,
        };

        Ok(Self {
            filters,
            cart,
            products: Arc::new(products),
            status: Arc::new(status),
            cursor: Mutex::new(cursor),
            scope,
        })
    }

    /// A read-only handle to the product list, for sibling components.
    #[must_use]
    pub fn feed(&self) -> ProductFeed {
        self.products.subscribe()
    }

    /// The current product list.
    #[must_use]
    pub fn products(&self) -> Arc<[Product]> {
        Arc::clone(&*self.products.borrow())
    }

    /// Load state of the catalog.
    #[must_use]
    pub fn status(&self) -> LoadStatus {
        self.status.borrow().clone()
    }

    /// Resolves once no fetch is in flight.
    pub async fn settled(&self) {
        let mut rx = self.status.subscribe();
        let _ = rx.wait_for(|status| !status.is_loading()).await;
    }

    /// The filtered page currently shown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn view(&self) -> Result<CatalogPage, StoreError> {
        let mut cursor = self.lock_cursor();
        cursor.sync();

        let criteria = self.filters.criteria()?;
        let products = self.products();
        let page = derive_view(&products, &criteria, cursor.page);
        cursor.page = page.current_page;
        Ok(page)
    }

    /// Select a page. Out-of-range pages are clamped when the view is read.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn set_page(&self, page: usize) -> Result<(), StoreError> {
        self.scope.ensure_open("CatalogView")?;
        let mut cursor = self.lock_cursor();
        cursor.sync();
        cursor.page = page.max(1);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn next_page(&self) -> Result<(), StoreError> {
        let current = self.view()?;
        if current.has_next() {
            self.set_page(current.current_page + 1)?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn previous_page(&self) -> Result<(), StoreError> {
        let current = self.view()?;
        if current.has_previous() {
            self.set_page(current.current_page - 1)?;
        }
        Ok(())
    }

    /// Add the catalog product `product_id` to the cart.
    ///
    /// Returns the new line quantity, or `None` if the product is not in the
    /// fetched catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn add_to_cart(&self, product_id: ProductId) -> Result<Option<u32>, StoreError> {
        let products = self.products();
        let Some(product) = products.iter().find(|p| p.id == product_id) else {
            return Ok(None);
        };
        self.cart.add_to_cart(product).map(Some)
    }

    /// Start fetching the catalog in the background.
    ///
    /// Does nothing if a fetch is already in flight. While the fetch runs the
    /// previous product list stays visible. The result is discarded if the
    /// scope closes before it arrives; a failure is logged and leaves the
    /// product list untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn load(&self, client: CatalogClient) -> Result<Option<JoinHandle<()>>, StoreError> {
        self.scope.ensure_open("CatalogView")?;

        let started = self.status.send_if_modified(|status| {
            if status.is_loading() {
                false
            } else {
                *status = LoadStatus::Loading;
                true
            }
        });
        if !started {
            debug!("Catalog fetch already in flight");
            return Ok(None);
        }

        let products = Arc::clone(&self.products);
        let status = Arc::clone(&self.status);
        let scope = self.scope.clone();

        Ok(Some(tokio::spawn(async move {
            tokio::select! {
                () = scope.closed() => {
                    debug!("Shop torn down, abandoning catalog fetch");
                }
                result = client.fetch_products() => {
                    if !scope.is_open() {
                        debug!("Shop torn down, discarding catalog");
                        return;
                    }
                    match result {
                        Ok(list) => {
                            info!(count = list.len(), "Catalog loaded");
                            products.send_replace(Arc::from(list));
                            status.send_replace(LoadStatus::Loaded);
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to fetch catalog");
                            status.send_replace(LoadStatus::Failed(e.to_string()));
                        }
                    }
                }
            }
        })))
    }

    fn lock_cursor(&self) -> std::sync::MutexGuard<'_, PageCursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn replace_products(&self, products: Vec<Product>) {
        self.products.send_replace(Arc::from(products));
        self.status.send_replace(LoadStatus::Loaded);
    }
}
