//! # Catalog Filter & Sort
//!
//! Derives the product listing from the catalog and the shopper's filter
//! selection. Pure and cheap: the listing page recomputes it on every
//! input change.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog order                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  category ∈ selected set      (skipped when the set is empty)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  min ≤ price ≤ max            (inclusive)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rating ≥ min_rating          (skipped when unset)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sale-only / new-only badges  (skipped when off)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stable sort by SortKey       (ties keep catalog order)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use eshopee_core::{Catalog, FilterSelection, SortKey};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let selection = FilterSelection {
//!     sort: SortKey::PriceLow,
//!     ..FilterSelection::default()
//! }
//! .toggle_category("electronics");
//!
//! let listing = selection.apply(catalog.products());
//! assert!(listing.iter().all(|p| p.category == "electronics"));
//! assert!(listing.windows(2).all(|w| w[0].price <= w[1].price));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Badge, Product};
use crate::PRICE_RANGE_MAX;

// =============================================================================
// Sort Key
// =============================================================================

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Featured,
    /// Catalog order (the catalog is already curated newest-first).
    Newest,
    /// Price ascending.
    PriceLow,
    /// Price descending.
    PriceHigh,
    /// Rating descending.
    Rating,
}

impl SortKey {
    /// All sort keys in the order the dropdown lists them.
    pub const ALL: [SortKey; 5] = [
        SortKey::Featured,
        SortKey::Newest,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Rating,
    ];

    /// The kebab-case key used in URLs and persisted selections.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
        }
    }

    /// Label shown in the sort dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Featured => "Featured",
            SortKey::Newest => "Newest",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Rating => "Highest Rated",
        }
    }

    /// Sorts `products` in place. The sort is stable.
    pub fn sort(&self, products: &mut [&Product]) {
        match self {
            SortKey::Featured | SortKey::Newest => {}
            SortKey::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortKey::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: SortKey::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Price Range
// =============================================================================

/// Inclusive price bounds from the listing's price slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    pub fn new(min: Money, max: Money) -> Self {
        PriceRange { min, max }
    }

    /// Checks `min <= price <= max`.
    #[inline]
    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    /// `$0.00` to [`PRICE_RANGE_MAX`].
    fn default() -> Self {
        PriceRange {
            min: Money::zero(),
            max: PRICE_RANGE_MAX,
        }
    }
}

// =============================================================================
// Filter Selection
// =============================================================================

/// The shopper's current listing filters. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    /// Selected category keys. Empty means "all categories".
    pub categories: BTreeSet<String>,

    pub price_range: PriceRange,

    /// Minimum rating (e.g. 4.0 for "4 stars & up").
    pub min_rating: Option<f32>,

    /// Only products with the sale badge.
    pub sale_only: bool,

    /// Only products with the new badge.
    pub new_only: bool,

    pub sort: SortKey,
}

impl FilterSelection {
    /// Checks a single product against every filter (sorting aside).
    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        if !self.price_range.contains(product.price) {
            return false;
        }

        if let Some(min_rating) = self.min_rating {
            if product.rating < min_rating {
                return false;
            }
        }

        if self.sale_only && !product.has_badge(Badge::Sale) {
            return false;
        }

        if self.new_only && !product.has_badge(Badge::New) {
            return false;
        }

        true
    }

    /// Filters and sorts `products`, keeping catalog order for ties.
    ///
    /// An empty result is a normal outcome ("No products found").
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut listing: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        self.sort.sort(&mut listing);
        listing
    }

    /// Adds `category` to the selection, or removes it if already selected.
    pub fn toggle_category(mut self, category: &str) -> Self {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
        self
    }

    /// Resets every filter. The sort order is kept.
    pub fn clear(self) -> Self {
        FilterSelection {
            sort: self.sort,
            ..FilterSelection::default()
        }
    }

    /// Whether any filter narrows the listing (drives the "Clear all" link).
    pub fn has_active_filters(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Number of active filters, for the badge on the mobile filter button.
    pub fn active_filter_count(&self) -> usize {
        self.categories.len()
            + usize::from(self.price_range != PriceRange::default())
            + usize::from(self.min_rating.is_some())
            + usize::from(self.sale_only)
            + usize::from(self.new_only)
    }

    /// Builds a selection from listing-page query parameters.
    ///
    /// ## Recognized Parameters
    /// - `category=<id>`: preselects a category (may repeat)
    /// - `sale=true`: sale-only
    /// - `filter=new`: new-only
    /// - `sort=<key>`: sort key; unknown keys fall back to featured
    ///
    /// Anything else is ignored.
    pub fn from_query_params<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut selection = FilterSelection::default();

        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "category" if !value.is_empty() => {
                    selection.categories.insert(value.to_string());
                }
                "sale" => selection.sale_only = value == "true",
                "filter" => selection.new_only = value == "new",
                "sort" => selection.sort = value.parse().unwrap_or_default(),
                _ => {}
            }
        }

        selection
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::types::tests::product;

    fn sample() -> Vec<Product> {
        let mut a = product("a", 3000);
        a.rating = 4.5;
        a.badge = Some(Badge::Sale);

        let mut b = product("b", 1000);
        b.category = "books".into();
        b.rating = 3.0;
        b.badge = Some(Badge::New);

        let mut c = product("c", 2000);
        c.rating = 4.5;

        let mut d = product("d", 300_000);
        d.rating = 5.0;

        vec![a, b, c, d]
    }

    fn ids<'a>(products: &[&'a Product]) -> Vec<&'a str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_catalog_order_within_price_range() {
        let products = sample();
        let listing = FilterSelection::default().apply(&products);
        // "d" is above the default $2,500 ceiling
        assert_eq!(ids(&listing), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_category_filter() {
        let products = sample();
        let selection = FilterSelection::default().toggle_category("books");
        assert_eq!(ids(&selection.apply(&products)), vec!["b"]);

        let none = FilterSelection::default().toggle_category("garden");
        assert!(none.apply(&products).is_empty());
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let products = sample();
        let selection = FilterSelection {
            price_range: PriceRange::new(Money::from_cents(1000), Money::from_cents(2000)),
            ..FilterSelection::default()
        };
        assert_eq!(ids(&selection.apply(&products)), vec!["b", "c"]);
    }

    #[test]
    fn test_min_rating_and_badges() {
        let products = sample();

        let rated = FilterSelection {
            min_rating: Some(4.0),
            ..FilterSelection::default()
        };
        assert_eq!(ids(&rated.apply(&products)), vec!["a", "c"]);

        let sale = FilterSelection {
            sale_only: true,
            ..FilterSelection::default()
        };
        assert_eq!(ids(&sale.apply(&products)), vec!["a"]);

        let new = FilterSelection {
            new_only: true,
            ..FilterSelection::default()
        };
        assert_eq!(ids(&new.apply(&products)), vec!["b"]);
    }

    #[test]
    fn test_sorts() {
        let products = sample();
        let with_sort = |sort: SortKey| FilterSelection {
            sort,
            ..FilterSelection::default()
        };

        assert_eq!(ids(&with_sort(SortKey::PriceLow).apply(&products)), vec!["b", "c", "a"]);
        assert_eq!(ids(&with_sort(SortKey::PriceHigh).apply(&products)), vec!["a", "c", "b"]);
        assert_eq!(ids(&with_sort(SortKey::Newest).apply(&products)), vec!["a", "b", "c"]);
        // a and c tie at 4.5 and keep catalog order
        assert_eq!(ids(&with_sort(SortKey::Rating).apply(&products)), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_price_low_and_high_are_reversed() {
        let catalog = Catalog::builtin().unwrap();
        let low = FilterSelection {
            sort: SortKey::PriceLow,
            ..FilterSelection::default()
        }
        .apply(catalog.products());
        let mut high = FilterSelection {
            sort: SortKey::PriceHigh,
            ..FilterSelection::default()
        }
        .apply(catalog.products());

        high.reverse();
        assert_eq!(ids(&low), ids(&high));
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("price-high".parse::<SortKey>().unwrap(), SortKey::PriceHigh);
        assert_eq!(SortKey::PriceLow.to_string(), "price-low");
        assert!(matches!(
            "cheapest".parse::<SortKey>(),
            Err(ValidationError::NotAllowed { .. })
        ));

        let json = serde_json::to_string(&SortKey::PriceLow).unwrap();
        assert_eq!(json, "\"price-low\"");
    }

    #[test]
    fn test_toggle_clear_and_active_count() {
        let selection = FilterSelection {
            sort: SortKey::Rating,
            min_rating: Some(3.0),
            ..FilterSelection::default()
        }
        .toggle_category("home")
        .toggle_category("books");
        assert_eq!(selection.active_filter_count(), 3);

        let selection = selection.toggle_category("home");
        assert_eq!(selection.categories.len(), 1);

        let cleared = selection.clear();
        assert!(!cleared.has_active_filters());
        assert_eq!(cleared.sort, SortKey::Rating);
    }

    #[test]
    fn test_from_query_params() {
        let selection = FilterSelection::from_query_params([
            ("category", "fashion"),
            ("sale", "true"),
            ("filter", "new"),
            ("sort", "rating"),
            ("utm_source", "mail"),
        ]);
        assert!(selection.categories.contains("fashion"));
        assert!(selection.sale_only);
        assert!(selection.new_only);
        assert_eq!(selection.sort, SortKey::Rating);

        let fallback = FilterSelection::from_query_params([("sort", "bogus")]);
        assert_eq!(fallback.sort, SortKey::Featured);
    }
}
