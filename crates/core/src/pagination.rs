//! The filtered, paginated catalog view.
//!
//! [`derive_view`] is a pure function of the product list, the filter criteria
//! and the requested page. Callers recompute it whenever any input changes
//! instead of caching intermediate results.

use serde::Serialize;

use crate::filter::FilterCriteria;
use crate::types::Product;

/// Number of products shown per catalog page.
pub const PAGE_SIZE: usize = 12;

/// One page of the filtered catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogPage {
    /// Products on the current page, in catalog order.
    pub items: Vec<Product>,
    /// 1-based page number actually shown.
    pub current_page: usize,
    /// `ceil(filtered_count / PAGE_SIZE)`; zero when nothing matches.
    pub total_pages: usize,
    /// Number of products matching the criteria across all pages.
    pub filtered_count: usize,
}

impl CatalogPage {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Whether a pager should be shown at all.
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }

    /// All page numbers, 1-based.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }
}

/// Number of pages needed for `count` items.
#[must_use]
pub const fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Filter `products` by `criteria` and slice out `page`.
///
/// `page` is 1-based. Values below 1 select the first page and values past
/// the end select the last page, so the result never lands out of range.
#[must_use]
pub fn derive_view(products: &[Product], criteria: &FilterCriteria, page: usize) -> CatalogPage {
    let filtered = criteria.apply(products);
    let filtered_count = filtered.len();
    let total_pages = total_pages(filtered_count);
    let current_page = page.clamp(1, total_pages.max(1));

    let items = filtered
        .into_iter()
        .skip((current_page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    CatalogPage {
        items,
        current_page,
        total_pages,
        filtered_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::product::fixtures::product;

    fn catalog(count: u32) -> Vec<Product> {
        (1..=count)
            .map(|id| product(id, &format!("Product {id}"), f64::from(id), "misc"))
            .collect()
    }

    #[test]
    fn test_fourteen_products_make_two_pages() {
        let products = catalog(14);
        let criteria = FilterCriteria::default();

        let first = derive_view(&products, &criteria, 1);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), PAGE_SIZE);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = derive_view(&products, &criteria, 2);
        assert_eq!(second.items.len(), 2);
        let ids: Vec<u32> = second.items.iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(ids, vec![13, 14]);
        assert!(!second.has_next());
        assert!(second.has_previous());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(12), 1);
        assert_eq!(total_pages(13), 2);
        assert_eq!(total_pages(24), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn test_page_is_clamped_into_range() {
        let products = catalog(14);
        let criteria = FilterCriteria::default();

        assert_eq!(derive_view(&products, &criteria, 0).current_page, 1);
        let past_end = derive_view(&products, &criteria, 9);
        assert_eq!(past_end.current_page, 2);
        assert_eq!(past_end.items.len(), 2);
    }

    #[test]
    fn test_empty_result() {
        let products = catalog(5);
        let criteria = FilterCriteria {
            search_query: "nothing matches this".to_string(),
            ..FilterCriteria::default()
        };

        let page = derive_view(&products, &criteria, 3);
        assert_eq!(page.filtered_count, 0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
        assert!(!page.is_paginated());
        assert!(page.page_numbers().is_empty());
    }

    #[test]
    fn test_pagination_applies_to_filtered_list() {
        let products = catalog(40);
        let criteria = FilterCriteria {
            min_price: Some(21.0),
            ..FilterCriteria::default()
        };

        let page = derive_view(&products, &criteria, 2);
        assert_eq!(page.filtered_count, 20);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_numbers(), vec![1, 2]);
        assert_eq!(page.items.first().map(|p| p.id.as_u32()), Some(33));
    }
}
