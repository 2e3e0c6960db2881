//! # Cart Commands
//!
//! Commands for cart manipulation and the cart sidebar.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  Steps   │     │  Placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                                 │              │
//! │                   add_to_cart                       place_order         │
//! │                   update_cart_item                  (checkout.rs)       │
//! │                   remove_from_cart                       │              │
//! │                        │                                 │              │
//! │                        ▼                                 ▼              │
//! │                   clear_cart ─────────────────► (back to empty)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use eshopee_core::validation::validate_quantity;
use eshopee_core::{Cart, CartItem, Catalog, Money};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::CartStore;

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: Money,
    pub is_open: bool,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            is_open: cart.is_open(),
        }
    }
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        CartResponse::from(&cart)
    }
}

/// Gets the current cart contents.
///
/// ## Returns
/// Current cart with items, item count badge and total
pub fn get_cart(cart: &CartStore) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If product already in cart: quantity increases
/// - If product not in cart: appended as a new line
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  User clicks "Add to Cart" on a product card or product page           │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  add_to_cart(cart, catalog, "3", Some(2))                              │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  ┌────────────────────────────────────────────────────────────────┐    │
/// │  │  1. Validate quantity (>= 1)                                  │    │
/// │  │  2. Look up product in catalog (unknown id: NOT_FOUND)        │    │
/// │  │  3. Add or increase the line                                  │    │
/// │  │  4. Return updated cart                                       │    │
/// │  └────────────────────────────────────────────────────────────────┘    │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  Header badge shows the new item count                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Arguments
/// * `product_id` - Catalog id of the product
/// * `quantity` - Units to add (default: 1)
pub fn add_to_cart(
    cart: &CartStore,
    catalog: &Catalog,
    product_id: &str,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = validate_quantity(quantity.unwrap_or(1))?;
    debug!(product_id = %product_id, quantity, "add_to_cart command");

    let product = catalog.find(product_id)?;
    Ok(cart.add_item_quantity(product, quantity).into())
}

/// Sets the quantity of a cart line.
///
/// ## Behavior
/// - `quantity <= 0`: the line is removed
/// - Product not in cart: cart returned unchanged
pub fn update_cart_item(cart: &CartStore, product_id: &str, quantity: i64) -> CartResponse {
    debug!(product_id = %product_id, quantity, "update_cart_item command");
    cart.update_quantity(product_id, quantity).into()
}

/// Removes a line from the cart. Unknown ids are ignored.
pub fn remove_from_cart(cart: &CartStore, product_id: &str) -> CartResponse {
    debug!(product_id = %product_id, "remove_from_cart command");
    cart.remove_item(product_id).into()
}

/// Clears all items from the cart.
pub fn clear_cart(cart: &CartStore) -> CartResponse {
    debug!("clear_cart command");
    cart.clear().into()
}

/// Opens the cart sidebar.
pub fn open_cart(cart: &CartStore) -> CartResponse {
    cart.open().into()
}

/// Closes the cart sidebar.
pub fn close_cart(cart: &CartStore) -> CartResponse {
    cart.close().into()
}
