//! Shared shopping cart.

use std::sync::Arc;

use shopmart_core::{Cart, Product, ProductId};
use tokio::sync::watch;
use tracing::debug;

use super::{StoreError, StoreScope};

/// Handle to the cart of one shop.
///
/// Mutations that change nothing (removing or adjusting a product that is not
/// in the cart) do not notify subscribers.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<watch::Sender<Cart>>,
    scope: StoreScope,
}

impl CartStore {
    const NAME: &'static str = "CartStore";

    /// Create an empty cart bound to `scope`.
    #[must_use]
    pub fn new(scope: StoreScope) -> Self {
        let (cart, _) = watch::channel(Cart::new());
        Self {
            cart: Arc::new(cart),
            scope,
        }
    }

    /// Snapshot of the current cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn snapshot(&self) -> Result<Cart, StoreError> {
        self.read(Cart::clone)
    }

    /// Receiver notified on every change to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        Ok(self.cart.subscribe())
    }

    /// Sum of quantities across all lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn total_items(&self) -> Result<u32, StoreError> {
        self.read(Cart::total_items)
    }

    /// Sum of unit price times quantity, unrounded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn total_price(&self) -> Result<f64, StoreError> {
        self.read(Cart::total_price)
    }

    /// Add one unit of `product`. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn add_to_cart(&self, product: &Product) -> Result<u32, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        let mut quantity = 0;
        self.cart.send_modify(|cart| quantity = cart.add(product));
        debug!(product_id = %product.id, quantity, "Added to cart");
        Ok(quantity)
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn remove_from_cart(&self, product_id: ProductId) -> Result<bool, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        let removed = self.cart.send_if_modified(|cart| cart.remove(product_id));
        debug!(%product_id, removed, "Removed from cart");
        Ok(removed)
    }

    /// Add one unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn increase_quantity(&self, product_id: ProductId) -> Result<Option<u32>, StoreError> {
        self.adjust(product_id, Cart::increase)
    }

    /// Remove one unit from an existing line, never going below 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn decrease_quantity(&self, product_id: ProductId) -> Result<Option<u32>, StoreError> {
        self.adjust(product_id, Cart::decrease)
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ScopeClosed`] once the owning shop is torn down.
    pub fn clear_cart(&self) -> Result<(), StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        self.cart.send_modify(Cart::clear);
        debug!("Cart cleared");
        Ok(())
    }

    fn adjust(
        &self,
        product_id: ProductId,
        op: fn(&mut Cart, ProductId) -> Option<u32>,
    ) -> Result<Option<u32>, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        let mut quantity = None;
        self.cart.send_if_modified(|cart| {
            quantity = op(cart, product_id);
            quantity.is_some()
        });
        debug!(%product_id, ?quantity, "Cart quantity adjusted");
        Ok(quantity)
    }

    fn read<T>(&self, f: impl FnOnce(&Cart) -> T) -> Result<T, StoreError> {
        self.scope.ensure_open(Self::NAME)?;
        let cart = self.cart.borrow();
        Ok(f(&*cart))
    }
}
