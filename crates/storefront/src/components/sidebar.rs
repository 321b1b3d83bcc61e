//! Desktop and mobile filter sidebars.
//!
//! Both sidebars are read models over the shop's [`FilterStore`] and
//! [`CartStore`]. Writes go through the stores directly, so a change made
//! from either sidebar is visible to the catalog and the other sidebar.

use std::sync::atomic::{AtomicBool, Ordering};

use shopmart_core::{FilterCriteria, distinct_categories};

use super::ProductFeed;
use crate::stores::{CartStore, FilterStore, StoreError};

/// Keywords offered in the sidebar.
pub const SIDEBAR_KEYWORDS: [&str; 6] = ["apple", "watch", "fashion", "trend", "shoes", "shirt"];

/// What a sidebar shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SidebarView {
    pub criteria: FilterCriteria,
    /// Distinct categories of the loaded catalog, in first-seen order.
    pub categories: Vec<String>,
    pub keywords: &'static [&'static str],
    pub cart_count: u32,
}

/// Filter sidebar.
pub struct Sidebar {
    filters: FilterStore,
    cart: CartStore,
    products: ProductFeed,
}

impl Sidebar {
    #[must_use]
    pub const fn new(filters: FilterStore, cart: CartStore, products: ProductFeed) -> Self {
        Self {
            filters,
            cart,
            products,
        }
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn view(&self) -> Result<SidebarView, StoreError> {
        let categories = distinct_categories(&self.products.borrow());
        Ok(SidebarView {
            criteria: self.filters.criteria()?,
            categories,
            keywords: &SIDEBAR_KEYWORDS,
            cart_count: self.cart.total_items()?,
        })
    }
}

/// What the mobile sidebar shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MobileSidebarView {
    pub sidebar: SidebarView,
    pub open: bool,
}

/// The sidebar as an off-canvas drawer.
pub struct MobileSidebar {
    sidebar: Sidebar,
    open: AtomicBool,
}

impl MobileSidebar {
    /// Create a closed drawer.
    #[must_use]
    pub const fn new(sidebar: Sidebar) -> Self {
        Self {
            sidebar,
            open: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Relaxed)
    }

    /// Flip the drawer. Returns the new state.
    pub fn toggle(&self) -> bool {
        !self.open.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Relaxed);
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn view(&self) -> Result<MobileSidebarView, StoreError> {
        Ok(MobileSidebarView {
            sidebar: self.sidebar.view()?,
            open: self.is_open(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shopmart_core::{Product, ProductId};
    use tokio::sync::watch;

    use super::*;
    use crate::stores::StoreScope;

    fn product(id: u32, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            price: 10.0,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 1,
            brand: String::new(),
            category: category.to_string(),
            thumbnail: String::new(),
            images: Vec::new(),
        }
    }

    #[test]
    fn test_sidebars_share_one_state() {
        let scope = StoreScope::new();
        let filters = FilterStore::new(scope.clone());
        let cart = CartStore::new(scope);
        let (feed_tx, feed) = watch::channel::<Arc<[Product]>>(Arc::from(Vec::new()));

        let desktop = Sidebar::new(filters.clone(), cart.clone(), feed.clone());
        let mobile = MobileSidebar::new(Sidebar::new(filters.clone(), cart.clone(), feed));

        filters.set_category("beauty").expect("open");
        cart.add_to_cart(&product(1, "beauty")).expect("open");
        feed_tx.send_replace(Arc::from(vec![
            product(1, "beauty"),
            product(2, "laptops"),
            product(3, "beauty"),
        ]));

        let desktop_view = desktop.view().expect("open");
        let mobile_view = mobile.view().expect("open");
        assert_eq!(desktop_view, mobile_view.sidebar);
        assert_eq!(desktop_view.criteria.category, "beauty");
        assert_eq!(desktop_view.categories, vec!["beauty", "laptops"]);
        assert_eq!(desktop_view.cart_count, 1);
    }

    #[test]
    fn test_mobile_toggle() {
        let scope = StoreScope::new();
        let (_feed_tx, feed) = watch::channel::<Arc<[Product]>>(Arc::from(Vec::new()));
        let mobile = MobileSidebar::new(Sidebar::new(
            FilterStore::new(scope.clone()),
            CartStore::new(scope),
            feed,
        ));

        assert!(!mobile.is_open());
        assert!(mobile.toggle());
        assert!(mobile.is_open());
        assert!(!mobile.toggle());
        mobile.toggle();
        mobile.close();
        assert!(!mobile.is_open());
    }
}
