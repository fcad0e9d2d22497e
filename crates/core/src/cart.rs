use serde::{Deserialize, Serialize};

use crate::product::{Product, ProductId};

/// One cart entry: a product and how many units of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.product.price * self.quantity as f64
    }
}

/// Insertion-ordered shopping cart.
///
/// Line identity is the product id: at most one line exists per product.
/// Quantities are always >= 1; any operation that would drop a quantity
/// to zero or below removes the line instead of storing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not units; see [`Cart::unit_count`]).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line if the product is already in the cart,
    /// otherwise appends a new line with quantity 1.
    pub fn add(&mut self, product: Product) {
        match self.lines.iter_mut().find(|line| line.product.id == product.id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                product,
                quantity: 1,
            }),
        }
    }

    /// Remove the line for `id`. Silently does nothing if absent.
    pub fn remove(&mut self, id: ProductId) {
        self.lines.retain(|line| line.product.id != id);
    }

    /// Set the quantity of the line for `id`.
    ///
    /// A quantity of zero or below behaves as [`Cart::remove`]. If no line
    /// matches `id` this does nothing.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|line| line.product.id == id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over all lines; 0 for an empty cart.
    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total units across all lines (not the number of lines).
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
