//! Ranked suggestion container.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// How many suggestions are highlighted as best matches by default.
pub const DEFAULT_TOP_N: usize = 2;

/// Ranked products, highest score first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    /// Every catalog product, ranked.
    pub items: Vec<Product>,
}

impl Suggestions {
    /// Wrap an already ranked list.
    pub fn new(items: Vec<Product>) -> Self {
        Self { items }
    }

    /// The best `n` matches (fewer if the catalog is smaller).
    pub fn top(&self, n: usize) -> &[Product] {
        &self.items[..n.min(self.items.len())]
    }

    /// Everything after the best `n` matches.
    pub fn more(&self, n: usize) -> &[Product] {
        &self.items[n.min(self.items.len())..]
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of ranked products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Consume and return the ranked products.
    pub fn into_inner(self) -> Vec<Product> {
        self.items
    }
}
