//! # Cart
//!
//! The shopping cart as a pure value: every mutation consumes the current
//! cart and returns the next one. The app-side `CartStore` owns the live
//! instance, swaps it under a lock and tells observers when it changed.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Transitions                               │
//! │                                                                         │
//! │  UI Action                 Method                  Next State           │
//! │  ─────────                 ──────                  ──────────           │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_item(p) ─────────► qty += 1 or push     │
//! │                                                                         │
//! │  Quantity stepper ───────► update_quantity(id,n) ► qty = n (n ≤ 0 →    │
//! │                                                    item removed)        │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_item(id) ─────► item removed         │
//! │                                                                         │
//! │  Order placed ───────────► clear() ─────────────► no items             │
//! │                                                                         │
//! │  Cart icon / backdrop ───► open() / close() ────► sidebar flag only    │
//! │                                                                         │
//! │  Unknown product ids are silent no-ops: the next state equals the      │
//! │  current one.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use eshopee_core::{Cart, Catalog};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let product = catalog.find("1").unwrap();
//!
//! let cart = Cart::new()
//!     .add_item(product)
//!     .add_item(product)
//!     .update_quantity(&product.id, 5);
//! assert_eq!(cart.total_items(), 5);
//!
//! let cart = cart.update_quantity(&product.id, 0);
//! assert!(cart.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart: a product plus how many of it.
///
/// ## Invariants
/// - `quantity` is at least 1 (a line reduced to 0 is removed)
/// - At most one line per product id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    fn new(product: &Product, quantity: u32) -> Self {
        CartItem {
            product: product.clone(),
            quantity,
        }
    }

    /// Id of the product on this line.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.product.id
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart: line items in insertion order plus the sidebar flag.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
    is_open: bool,
}

impl Cart {
    /// Creates an empty, closed cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Product already in cart: its quantity goes up by one
    /// - Product not in cart: a new line with quantity 1 is appended
    ///
    /// There is no cap and no error path.
    pub fn add_item(self, product: &Product) -> Self {
        self.add_item_quantity(product, 1)
    }

    /// Adds `quantity` units of `product` in one step.
    ///
    /// Same result as calling [`Cart::add_item`] `quantity` times. A zero
    /// quantity leaves the cart unchanged.
    pub fn add_item_quantity(mut self, product: &Product, quantity: u32) -> Self {
        if quantity == 0 {
            return self;
        }

        match self.position(&product.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity = item.quantity.saturating_add(quantity);
            }
            None => self.items.push(CartItem::new(product, quantity)),
        }
        self
    }

    /// Sets the quantity of a line (absolute, not a delta).
    ///
    /// ## Behavior
    /// - `quantity <= 0`: the line is removed
    /// - Product not in cart: no-op
    pub fn update_quantity(mut self, product_id: &str, quantity: i64) -> Self {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        if let Some(index) = self.position(product_id) {
            self.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self
    }

    /// Removes the line for `product_id`, if present.
    pub fn remove_item(mut self, product_id: &str) -> Self {
        self.items.retain(|item| item.product_id() != product_id);
        self
    }

    /// Empties the cart. The sidebar flag is left as it was.
    pub fn clear(mut self) -> Self {
        self.items.clear();
        self
    }

    /// Shows the cart sidebar.
    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    /// Hides the cart sidebar.
    pub fn close(mut self) -> Self {
        self.is_open = false;
        self
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id() == product_id)
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// Sum of all quantities (the badge on the cart icon).
    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of price × quantity over all lines. Excludes shipping and tax.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line for `product_id`, if present.
    pub fn item(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    /// Number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the cart sidebar is shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The persisted form of this cart: `{productId, quantity}` per line.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self
                .items
                .iter()
                .map(|item| CartSnapshotEntry {
                    product_id: item.product.id.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    /// Rebuilds a cart from its persisted form.
    ///
    /// ## Returns
    /// The rebuilt cart (closed) and the ids that are no longer in the
    /// catalog. Entries with quantity 0 are skipped; repeated ids are merged.
    pub fn rehydrate(snapshot: &CartSnapshot, catalog: &Catalog) -> (Cart, Vec<String>) {
        let mut missing = Vec::new();
        let mut cart = Cart::new();

        for entry in &snapshot.items {
            match catalog.get(&entry.product_id) {
                Some(product) => cart = cart.add_item_quantity(product, entry.quantity),
                None => missing.push(entry.product_id.clone()),
            }
        }

        (cart, missing)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Persisted cart record stored under [`crate::CART_STORAGE_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    #[serde(default)]
    pub items: Vec<CartSnapshotEntry>,
}

/// One persisted cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshotEntry {
    pub product_id: String,
    pub quantity: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::product;

    #[test]
    fn test_add_same_product_counts_calls() {
        let p = product("1", 999);
        let mut cart = Cart::new();
        for _ in 0..7 {
            cart = cart.add_item(&p);
        }

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 7);
        assert_eq!(cart.total_price(), Money::from_cents(6993));
    }

    #[test]
    fn test_totals_scenario() {
        let a = product("a", 2000);
        let b = product("b", 1500);
        let cart = Cart::new().add_item(&a).add_item(&a).add_item(&b);

        assert_eq!(cart.total_price(), Money::from_cents(5500));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert!(cart.total_price().is_zero());
        assert_eq!(cart.total_items(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let cart = Cart::new()
            .add_item(&product("b", 100))
            .add_item(&product("a", 100))
            .add_item(&product("b", 100));

        let ids: Vec<&str> = cart.items().iter().map(CartItem::product_id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let p = product("1", 1000);
        let cart = Cart::new().add_item(&p).update_quantity("1", 4);
        assert_eq!(cart.item("1").map(|i| i.quantity), Some(4));
        assert_eq!(cart.item("1").map(CartItem::line_total), Some(Money::from_cents(4000)));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let a = product("a", 1000);
        let b = product("b", 500);
        let cart = Cart::new()
            .add_item(&a)
            .add_item(&b)
            .update_quantity("a", 0);

        assert!(cart.item("a").is_none());
        assert_eq!(cart.total_items(), 1);

        let cart = cart.update_quantity("b", -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let cart = Cart::new().add_item(&product("1", 1000)).open();
        let before = cart.clone();

        assert_eq!(cart.clone().remove_item("missing"), before);
        assert_eq!(cart.clone().update_quantity("missing", 3), before);
        assert_eq!(cart.update_quantity("missing", 0), before);
    }

    #[test]
    fn test_add_item_quantity_matches_repeated_add() {
        let p = product("1", 250);
        let bulk = Cart::new().add_item_quantity(&p, 3);
        let repeated = Cart::new().add_item(&p).add_item(&p).add_item(&p);
        assert_eq!(bulk, repeated);

        assert_eq!(Cart::new().add_item_quantity(&p, 0), Cart::new());
    }

    #[test]
    fn test_open_close_and_clear() {
        let cart = Cart::new().add_item(&product("1", 100)).open();
        assert!(cart.is_open());

        let cart = cart.clear();
        assert!(cart.is_empty());
        assert!(cart.is_open());

        assert!(!cart.close().is_open());
    }

    #[test]
    fn test_snapshot_json_layout() {
        let cart = Cart::new().add_item_quantity(&product("7", 100), 2);
        let json = serde_json::to_value(cart.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "items": [{ "productId": "7", "quantity": 2 }] })
        );
    }

    #[test]
    fn test_rehydrate_drops_unknown_products() {
        let catalog = Catalog::new(Vec::new(), vec![product("1", 100), product("2", 200)]);
        let snapshot = CartSnapshot {
            items: vec![
                CartSnapshotEntry { product_id: "2".into(), quantity: 3 },
                CartSnapshotEntry { product_id: "gone".into(), quantity: 1 },
                CartSnapshotEntry { product_id: "1".into(), quantity: 0 },
            ],
        };

        let (cart, missing) = Cart::rehydrate(&snapshot, &catalog);
        assert_eq!(missing, vec!["gone".to_string()]);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 3);
        assert!(!cart.is_open());
    }
}
