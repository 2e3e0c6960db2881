//! # Domain Types
//!
//! Core catalog types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Category     │   │     Badge       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (key)       │   │  Sale           │       │
//! │  │  name           │   │  name           │   │  New            │       │
//! │  │  price          │   │  icon           │   │  Bestseller     │       │
//! │  │  category ──────┼──►│  image          │   └─────────────────┘       │
//! │  │  badge?         │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │   800 bps = 8% (checkout tax)                      │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable: they are loaded once from the catalog seed and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (the storefront's flat checkout tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Badge
// =============================================================================

/// Merchandising badge shown on a product card.
///
/// A product without a badge has `badge: None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    /// Discounted product (usually has an `original_price`).
    Sale,
    /// Recently added to the catalog.
    New,
    /// Top seller, surfaced as "featured" on the home page.
    Bestseller,
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Badge::Sale => write!(f, "sale"),
            Badge::New => write!(f, "new"),
            Badge::Bestseller => write!(f, "bestseller"),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category (the key products refer to via `Product::category`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category key, e.g. `"electronics"`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Emoji icon shown next to the name in filter lists.
    pub icon: String,

    /// Hero image for the category tile.
    pub image: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current price.
    pub price: Money,

    /// Price before discount, shown struck through on sale items.
    #[serde(default)]
    pub original_price: Option<Money>,

    /// Category key (see [`Category::id`]).
    pub category: String,

    /// Average review rating, 0.0 to 5.0.
    pub rating: f32,

    /// Number of reviews.
    pub reviews: u32,

    /// Primary image.
    pub image: String,

    /// Gallery images for the product page.
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub badge: Option<Badge>,

    pub in_stock: bool,

    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Whole-percent discount relative to `original_price` (0 when none).
    pub fn discount_percent(&self) -> u32 {
        self.original_price
            .map(|original| self.price.percent_off(original))
            .unwrap_or(0)
    }

    /// Images for the product page gallery, falling back to the primary image.
    pub fn gallery(&self) -> Vec<&str> {
        if self.images.is_empty() {
            vec![self.image.as_str()]
        } else {
            self.images.iter().map(String::as_str).collect()
        }
    }

    /// Checks whether the product carries the given badge.
    #[inline]
    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badge == Some(badge)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
