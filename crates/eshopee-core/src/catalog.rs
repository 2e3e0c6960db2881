//! # Catalog
//!
//! The static product catalog: every product and category the storefront
//! knows about, loaded once at startup and never mutated.
//!
//! ## Lookups
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product page for id "42"                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  catalog.find("42") ← linear scan in catalog order                     │
//! │       │                                                                 │
//! │       ├── Ok(product)  → render page + catalog.related(product, 4)     │
//! │       │                                                                 │
//! │       └── Err(ProductNotFound) → "Product not found" page              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Badge, Category, Product};

/// Catalog seed embedded at compile time.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// The immutable product catalog.
///
/// Product order is significant: it is the "featured" order of the listing
/// page and the tie-breaker for every sort.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from already-loaded records.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Catalog {
            categories,
            products,
        }
    }

    /// Parses the catalog shipped with the crate.
    pub fn builtin() -> CoreResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parses a catalog from its JSON representation.
    ///
    /// ## Rules
    /// - Product ids must be unique
    /// - Prices must be non-negative
    /// - Ratings must be within 0-5
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> CoreResult<()> {
        for (index, product) in self.products.iter().enumerate() {
            if self.products[..index].iter().any(|p| p.id == product.id) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate product id '{}'",
                    product.id
                )));
            }
            if product.price.is_negative() {
                return Err(CoreError::InvalidCatalog(format!(
                    "product '{}' has a negative price",
                    product.id
                )));
            }
            if !(0.0..=5.0).contains(&product.rating) {
                return Err(CoreError::InvalidCatalog(format!(
                    "product '{}' has rating {} outside 0-5",
                    product.id, product.rating
                )));
            }
        }
        Ok(())
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by key.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Looks up a product by id.
    ///
    /// ## Returns
    /// * `Ok(&Product)` - Product found
    /// * `Err(CoreError::ProductNotFound)` - Unknown id; the UI shows its
    ///   "not found" page
    pub fn find(&self, id: &str) -> CoreResult<&Product> {
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Looks up a product by id without treating absence as an error.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in the same category as `product`, excluding it, in catalog
    /// order, at most `limit` of them.
    pub fn related(&self, product: &Product, limit: usize) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .collect()
    }

    /// Bestseller-badged products, shown as "featured" on the home page.
    pub fn featured(&self) -> Vec<&Product> {
        self.with_badge(Badge::Bestseller)
    }

    /// New-badged products.
    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.with_badge(Badge::New)
    }

    fn with_badge(&self, badge: Badge) -> Vec<&Product> {
        self.products.iter().filter(|p| p.has_badge(badge)).collect()
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
