//! Shopping cart contents and the arithmetic derived from them.
//!
//! A [`Cart`] holds at most one [`CartLine`] per product. Quantities never
//! drop below one: the only ways to make a line disappear are
//! [`Cart::remove`] and [`Cart::clear`].

use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId, format_price};

/// One cart entry pairing a product with a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Snapshot of the product at the time it was added.
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Identifier of the product on this line.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }

    /// Formatted line total (e.g., "$39.98").
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_price(self.line_total())
    }
}

/// Ordered cart lines, keyed by product identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line for the product or appends a new line
    /// with quantity 1. Returns the line's new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return line.quantity;
        }
        self.lines.push(CartLine {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id() != product_id);
        self.lines.len() != before
    }

    /// Add one unit to an existing line. Returns the new quantity, or `None`
    /// if the product is not in the cart.
    pub fn increase(&mut self, product_id: ProductId) -> Option<u32> {
        let line = self.line_mut(product_id)?;
        line.quantity = line.quantity.saturating_add(1);
        Some(line.quantity)
    }

    /// Remove one unit from an existing line, never going below 1.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    pub fn decrease(&mut self, product_id: ProductId) -> Option<u32> {
        let line = self.line_mut(product_id)?;
        if line.quantity > 1 {
            line.quantity -= 1;
        }
        Some(line.quantity)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of unit price times quantity across all lines, unrounded.
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.lines
            .iter()
            .fold(0.0, |total, line| total + line.line_total())
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }
}
