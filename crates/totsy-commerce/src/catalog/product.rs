//! Product and catalog types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Free-form category (e.g. "Stroller").
    pub category: String,
    /// Price, currency agnostic.
    pub price: f64,
    /// Relevance score. Catalog-defined base score until ranked.
    pub score: f64,
    /// Optional external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Product {
    /// Create a product without a link.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        score: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            price,
            score,
            url: None,
        }
    }

    /// Attach an external link.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    fn validate(&self) -> Result<(), CommerceError> {
        let invalid = |reason: &str| CommerceError::InvalidProduct {
            id: self.id.to_string(),
            reason: reason.to_string(),
        };

        if self.id.as_str().trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid("price must be a non-negative number"));
        }
        if !self.score.is_finite() {
            return Err(invalid("score must be a finite number"));
        }
        Ok(())
    }
}

/// A fixed, read-only sequence of products.
///
/// Order matters: it is the tie-break order when ranking.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and invalid numbers.
    pub fn new(products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut seen = HashSet::new();
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id.as_str()) {
                return Err(CommerceError::DuplicateProduct(product.id.to_string()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// The built-in baby gear catalog.
    pub fn builtin() -> Self {
        let products = vec![
            Product::new("stroller-uppa", "UPPAbaby Vista V2", "UPPAbaby", "Stroller", 999.0, 0.9)
                .with_url("#"),
            Product::new(
                "stroller-city",
                "Baby Jogger City Mini GT2",
                "Baby Jogger",
                "Stroller",
                399.0,
                0.84,
            )
            .with_url("#"),
            Product::new("monitor-nanit", "Nanit Pro Smart Monitor", "Nanit", "Monitor", 299.0, 0.88),
            Product::new("monitor-vava", "VAVA Video Baby Monitor", "VAVA", "Monitor", 159.0, 0.75),
            Product::new("carrier-ergo", "Ergobaby Omni Breeze", "Ergobaby", "Carrier", 199.0, 0.82),
            Product::new(
                "bottle-comotomo",
                "Comotomo Bottle 8oz (2pk)",
                "Comotomo",
                "Feeding",
                25.0,
                0.7,
            ),
            Product::new("pump-s1", "Spectra S1 Plus", "Spectra", "Pump", 225.0, 0.8),
            Product::new("crib-snuz", "SnuzPod4 Bedside Crib", "Snuz", "Sleep", 279.0, 0.73),
            Product::new("sound-hatch", "Hatch Rest", "Hatch", "Sleep", 69.0, 0.77),
            Product::new("seat-nuna", "Nuna PIPA RX", "Nuna", "Car Seat", 399.0, 0.86),
        ];
        Self { products }
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        assert_eq!(builtin.len(), 10);
        let rebuilt = Catalog::new(builtin.products().to_vec()).unwrap();
        assert_eq!(rebuilt, builtin);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::builtin();
        let nanit = catalog.get(&ProductId::new("monitor-nanit")).unwrap();
        assert_eq!(nanit.brand, "Nanit");
        assert!(catalog.get(&ProductId::new("missing")).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let products = vec![
            Product::new("a", "A", "Brand", "Cat", 1.0, 0.5),
            Product::new("a", "A again", "Brand", "Cat", 1.0, 0.5),
        ];
        assert!(matches!(
            Catalog::new(products),
            Err(CommerceError::DuplicateProduct(id)) if id == "a"
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        let products = vec![Product::new("a", "A", "Brand", "Cat", -1.0, 0.5)];
        assert!(matches!(
            Catalog::new(products),
            Err(CommerceError::InvalidProduct { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": "a", "name": "Alpha", "brand": "B", "category": "C", "price": 10, "score": 0.5},
            {"id": "b", "name": "Beta", "brand": "B", "category": "C", "price": 12.5, "score": 0.9, "url": "https://example.com/b"}
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[1].url.as_deref(), Some("https://example.com/b"));
        assert!(Catalog::from_json("{}").is_err());
    }
}
