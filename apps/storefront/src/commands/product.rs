//! # Product Commands
//!
//! Commands for browsing the catalog: the filtered listing page, the
//! product page and the home page rows.
//!
//! ## Listing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Listing Flow                                 │
//! │                                                                         │
//! │  URL /products?category=electronics&sort=price-low                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  FilterSelection::from_query_params(..)                                │
//! │       │                                                                 │
//! │       ▼   sidebar edits: toggle_category, price range, rating, badges  │
//! │  list_products(catalog, &filter)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  filter (category, price, rating, badge)  │                         │
//! │  │  stable sort (ties keep catalog order)    │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductListResponse { products, count, activeFilters, sort }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use eshopee_core::{Catalog, Category, FilterSelection, Product, SortKey, RELATED_PRODUCTS_LIMIT};
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

use crate::error::ApiError;

/// Listing page response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,

    /// "Showing N products"
    pub count: usize,

    /// Number of active filters (0 hides the "Clear all" link).
    pub active_filters: usize,

    pub sort: SortKey,
}

/// Product page response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,

    /// Breadcrumb category, if the product's category is known.
    pub category: Option<Category>,

    /// Whole-percent discount (0 when not on sale).
    pub discount_percent: u32,

    /// Gallery images, falling back to the primary image.
    pub images: Vec<String>,

    /// "You may also like": same category, at most four.
    pub related: Vec<Product>,
}

/// Sort choice for the listing page dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortOption {
    pub key: SortKey,
    pub label: &'static str,
}

/// Lists products matching `filter`, sorted by its sort key.
///
/// An empty listing is a normal result.
pub fn list_products(catalog: &Catalog, filter: &FilterSelection) -> ProductListResponse {
    let start = Instant::now();

    let products: Vec<Product> = filter
        .apply(catalog.products())
        .into_iter()
        .cloned()
        .collect();

    debug!(
        count = products.len(),
        active_filters = filter.active_filter_count(),
        sort = %filter.sort,
        elapsed = ?start.elapsed(),
        "list_products command"
    );

    ProductListResponse {
        count: products.len(),
        active_filters: filter.active_filter_count(),
        sort: filter.sort,
        products,
    }
}

/// Gets one product with its page extras.
///
/// ## Errors
/// * `NOT_FOUND` - no product with this id
pub fn get_product(catalog: &Catalog, id: &str) -> Result<ProductDetail, ApiError> {
    debug!(id = %id, "get_product command");

    let product = catalog.find(id)?;

    Ok(ProductDetail {
        category: catalog.category(&product.category).cloned(),
        discount_percent: product.discount_percent(),
        images: product.gallery().into_iter().map(str::to_string).collect(),
        related: catalog
            .related(product, RELATED_PRODUCTS_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
        product: product.clone(),
    })
}

pub fn list_categories(catalog: &Catalog) -> Vec<Category> {
    catalog.categories().to_vec()
}

/// Home page "Featured" row (bestsellers).
pub fn featured_products(catalog: &Catalog) -> Vec<Product> {
    catalog.featured().into_iter().cloned().collect()
}

/// Home page "New Arrivals" row.
pub fn new_arrivals(catalog: &Catalog) -> Vec<Product> {
    catalog.new_arrivals().into_iter().cloned().collect()
}

/// Entries for the sort dropdown, in display order.
pub fn sort_options() -> Vec<SortOption> {
    SortKey::ALL
        .iter()
        .map(|&key| SortOption {
            key,
            label: key.label(),
        })
        .collect()
}
