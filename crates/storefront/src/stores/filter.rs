//! Shared filter criteria.

use std::sync::Arc;

use shopmart_core::{FilterCriteria, PriceRange};
use tokio::sync::watch;
use tracing::debug;

use super::{StoreError, StoreScope};

/// Handle to the filter criteria of one shop.
///
/// Every setter notifies subscribers, even when the new value equals the old
/// one: any setter call counts as a criteria change.
#[derive(Debug, Clone)]
pub struct FilterStore {
    criteria: Arc<watch::Sender<FilterCriteria>>,
    scope: StoreScope,
}

impl FilterStore {
    const NAME: &'static str = "FilterStore";

    /// Create a store with empty criteria, bound to `scope`.
    #[must_use]
    pub fn new(scope: StoreScope) -> Self {
        let (criteria, _) = watch::channel(FilterCriteria::default());
        Self {
            criteria: Arc::new(criteria),
            scope,
        }
    }

    /// Snapshot of the current criteria.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn criteria(&self) -> Result<FilterCriteria, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        Ok(self.criteria.borrow().clone())
    }

    /// Receiver notified on every setter call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn subscribe(&self) -> Result<watch::Receiver<FilterCriteria>, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        Ok(self.criteria.subscribe())
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn set_search_query(&self, query: impl Into<String>) -> Result<(), StoreError> {
        let query = query.into();
        self.update(|criteria| criteria.search_query = query)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn set_min_price(&self, price: Option<f64>) -> Result<(), StoreError> {
        self.update(|criteria| criteria.min_price = price)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn set_max_price(&self, price: Option<f64>) -> Result<(), StoreError> {
        self.update(|criteria| criteria.max_price = price)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn set_category(&self, category: impl Into<String>) -> Result<(), StoreError> {
        let category = category.into();
        self.update(|criteria| criteria.category = category)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn set_keyword(&self, keyword: impl Into<String>) -> Result<(), StoreError> {
        let keyword = keyword.into();
        self.update(|criteria| criteria.keyword = keyword)
    }

    /// Set `keyword` as the active keyword, or clear it if it already is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn toggle_keyword(&self, keyword: &str) -> Result<(), StoreError> {
        self.update(|criteria| {
            if criteria.keyword == keyword {
                criteria.keyword.clear();
            } else {
                keyword.clone_into(&mut criteria.keyword);
            }
        })
    }

    /// Apply both bounds of a preset in one change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn apply_price_range(&self, range: PriceRange) -> Result<(), StoreError> {
        let (min, max) = range.bounds();
        self.update(|criteria| {
            criteria.min_price = min;
            criteria.max_price = max;
        })
    }

    /// Clear every criterion in one change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.update(|criteria| *criteria = FilterCriteria::default())
    }

    fn update(&self, modify: impl FnOnce(&mut FilterCriteria)) -> Result<(), StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        self.criteria.send_modify(modify);
        debug!(criteria = ?*self.criteria.borrow(), "Filter criteria updated");
        Ok(())
    }
}
