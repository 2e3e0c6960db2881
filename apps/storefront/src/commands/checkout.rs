//! # Checkout Commands
//!
//! Order summary for the cart page and checkout sidebar, the delivery
//! choices of step 2, and order placement.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Flow                                        │
//! │                                                                         │
//! │  start_checkout(cart) ──► CheckoutSession { step: Shipping }           │
//! │                               │                                         │
//! │         fill shipping form    │  session.advance()  (validates form)    │
//! │                               ▼                                         │
//! │                           Delivery ──► delivery_options(..)            │
//! │                               │  session.delivery = Express             │
//! │                               │  session.advance()                      │
//! │                               ▼                                         │
//! │                           Payment                                       │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  place_order(cart, policy, &session)                                   │
//! │     ├── confirmation built from the current cart                       │
//! │     └── cart cleared in the same locked step                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use eshopee_core::{
    CheckoutPolicy, CheckoutSession, DeliveryOption, Money, OrderConfirmation, OrderSummary,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartStore, StorefrontConfig};

/// Cart page / checkout sidebar summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    pub totals: OrderSummary,

    pub total_items: u32,

    /// "Add $X more for free shipping!" while standard shipping is charged.
    pub free_shipping_message: Option<String>,
}

/// One choice on the delivery step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOptionResponse {
    pub option: DeliveryOption,
    pub name: &'static str,
    pub estimate: &'static str,

    /// Price for the current cart (standard may be free).
    pub price: Money,
}

/// Summarizes the cart for the chosen delivery option (standard if none).
pub fn order_summary(
    cart: &CartStore,
    config: &StorefrontConfig,
    delivery: Option<DeliveryOption>,
) -> OrderSummaryResponse {
    let policy = config.checkout_policy();
    let delivery = delivery.unwrap_or_default();

    let (totals, total_items) =
        cart.with_cart(|c| (policy.summarize_cart(c, delivery), c.total_items()));

    debug!(
        subtotal = totals.subtotal.cents(),
        total = totals.total.cents(),
        delivery = ?delivery,
        "order_summary command"
    );

    OrderSummaryResponse {
        free_shipping_message: totals.amount_until_free_shipping.map(|remaining| {
            format!(
                "Add {} more for free shipping!",
                config.format_currency(remaining.cents())
            )
        }),
        totals,
        total_items,
    }
}

/// Delivery choices priced for the current cart.
pub fn delivery_options(cart: &CartStore, policy: &CheckoutPolicy) -> Vec<DeliveryOptionResponse> {
    let subtotal = cart.total_price();

    DeliveryOption::ALL
        .iter()
        .map(|&option| DeliveryOptionResponse {
            option,
            name: option.name(),
            estimate: option.estimate(),
            price: policy.shipping_for(subtotal, option),
        })
        .collect()
}

/// Opens a checkout session.
///
/// ## Errors
/// * `CART_ERROR` - the cart is empty
pub fn start_checkout(cart: &CartStore) -> Result<CheckoutSession, ApiError> {
    debug!("start_checkout command");
    Ok(cart.with_cart(CheckoutSession::start)?)
}

/// Places the order and empties the cart.
///
/// ## Errors
/// * `BUSINESS_LOGIC` - the session has not reached the payment step
/// * `CART_ERROR` - the cart is empty
pub fn place_order(
    cart: &CartStore,
    policy: &CheckoutPolicy,
    session: &CheckoutSession,
) -> Result<OrderConfirmation, ApiError> {
    let confirmation = cart.checkout(|c| session.place_order(c, policy))?;

    info!(
        order_id = %confirmation.order_id,
        total = confirmation.summary.total.cents(),
        lines = confirmation.items.len(),
        "Order placed"
    );

    Ok(confirmation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use eshopee_core::{Catalog, ShippingDetails};

    fn filled_shipping() -> ShippingDetails {
        ShippingDetails {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            address: "1 Analytical Way".into(),
            city: "London".into(),
            state: "LN".into(),
            zip: "12345".into(),
            ..ShippingDetails::default()
        }
    }

    fn cart_with(ids: &[(&str, u32)]) -> CartStore {
        let catalog = Catalog::builtin().unwrap();
        let cart = CartStore::default();
        for (id, qty) in ids {
            cart.add_item_quantity(catalog.find(id).unwrap(), *qty);
        }
        cart
    }

    #[test]
    fn test_summary_for_empty_cart() {
        let cart = CartStore::default();
        let response = order_summary(&cart, &StorefrontConfig::default(), None);

        assert_eq!(response.total_items, 0);
        assert_eq!(response.totals.subtotal, Money::zero());
        assert_eq!(response.totals.tax, Money::zero());
    }

    #[test]
    fn test_free_shipping_message() {
        let config = StorefrontConfig::default();
        let cart = CartStore::default();
        let mut product = Catalog::builtin().unwrap().find("1").unwrap().clone();
        product.price = Money::from_cents(3000);
        cart.add_item(&product);

        let response = order_summary(&cart, &config, None);
        assert_eq!(response.totals.shipping, Money::from_cents(999));
        assert_eq!(
            response.free_shipping_message.as_deref(),
            Some("Add $20.00 more for free shipping!")
        );

        cart.update_quantity("1", 2);
        let response = order_summary(&cart, &config, None);
        assert!(response.totals.is_free_shipping());
        assert!(response.free_shipping_message.is_none());
    }

    #[test]
    fn test_delivery_options_priced_for_cart() {
        let cart = cart_with(&[("1", 1)]);
        let policy = CheckoutPolicy::default();

        let options = delivery_options(&cart, &policy);
        assert_eq!(options.len(), 3);
        assert_eq!(options[1].price, Money::from_cents(1999));
        assert_eq!(options[2].price, Money::from_cents(2999));
    }

    #[test]
    fn test_start_checkout_requires_items() {
        let err = start_checkout(&CartStore::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[test]
    fn test_items_added_while_ordering_are_never_dropped() {
        let catalog = std::sync::Arc::new(Catalog::builtin().unwrap());
        let cart = cart_with(&[("1", 1)]);
        let policy = CheckoutPolicy::default();
        const ADDS: u32 = 2000;

        let mut session = start_checkout(&cart).unwrap();
        session.shipping = filled_shipping();
        session.advance().unwrap();
        session.advance().unwrap();

        let adder = {
            let cart = cart.clone();
            let catalog = catalog.clone();
            std::thread::spawn(move || {
                for _ in 0..ADDS {
                    cart.add_item(catalog.find("2").unwrap());
                }
            })
        };

        let mut ordered = 0;
        while !adder.is_finished() {
            if let Ok(confirmation) = place_order(&cart, &policy, &session) {
                ordered += confirmation.items.iter().map(|i| i.quantity).sum::<u32>();
            }
        }
        adder.join().unwrap();

        assert_eq!(ordered + cart.total_items(), ADDS + 1);
    }

    #[test]
    fn test_place_order_flow() {
        let cart = cart_with(&[("2", 2), ("5", 1)]);
        let policy = CheckoutPolicy::default();
        let expected = policy.summarize_cart(&cart.snapshot(), DeliveryOption::Express);

        let mut session = start_checkout(&cart).unwrap();

        // Cannot skip ahead to ordering
        let err = place_order(&cart, &policy, &session).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        // Shipping form must be filled first
        assert!(session.advance().is_err());
        session.shipping = filled_shipping();
        session.advance().unwrap();
        session.delivery = DeliveryOption::Express;
        session.advance().unwrap();

        let confirmation = place_order(&cart, &policy, &session).unwrap();
        assert_eq!(confirmation.summary, expected);
        assert_eq!(confirmation.items.len(), 2);
        assert_eq!(confirmation.message, "Order placed successfully!");
        assert!(cart.snapshot().is_empty());

        // The emptied cart cannot be ordered twice
        let err = place_order(&cart, &policy, &session).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }
}
