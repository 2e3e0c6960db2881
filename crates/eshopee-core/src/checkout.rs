//! # Checkout
//!
//! Order summary math, delivery options and the three-step checkout flow.
//!
//! ## Order Summary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal  = Σ price × quantity            (Cart::total_price)         │
//! │  shipping  = standard: 0 if subtotal > $50.00 else $9.99               │
//! │              express:  $19.99                                           │
//! │              overnight: $29.99                                          │
//! │  tax       = 8% of subtotal, half-up to the cent                       │
//! │  total     = subtotal + shipping + tax                                  │
//! │                                                                         │
//! │  Example: subtotal $55.00 → shipping Free, tax $4.40, total $59.40     │
//! │           subtotal $20.00 → shipping $9.99 ("Add $30.00 more for free  │
//! │                             shipping")                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Checkout Flow
//! ```text
//!   ┌──────────────┐  advance   ┌──────────────┐  advance   ┌──────────────┐
//!   │ 1. Shipping  │──────────► │ 2. Delivery  │──────────► │ 3. Payment   │
//!   │ (form valid?)│ ◄────────  │              │ ◄────────  │ place_order  │
//!   └──────────────┘   back     └──────────────┘   back     └──────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartSnapshotEntry};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;
use crate::validation::validate_shipping_details;

// =============================================================================
// Checkout Policy
// =============================================================================

/// Shipping and tax rules applied to every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPolicy {
    /// Standard shipping is free when the subtotal is strictly above this.
    pub free_shipping_threshold: Money,

    /// Flat standard shipping charge below the threshold.
    pub standard_shipping: Money,

    pub tax_rate: TaxRate,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        CheckoutPolicy {
            free_shipping_threshold: Money::from_cents(5000),
            standard_shipping: Money::from_cents(999),
            tax_rate: TaxRate::from_bps(800),
        }
    }
}

impl CheckoutPolicy {
    /// Checks whether standard shipping is free for `subtotal`.
    pub fn qualifies_for_free_shipping(&self, subtotal: Money) -> bool {
        subtotal > self.free_shipping_threshold
    }

    /// Shipping charge for the chosen delivery option.
    pub fn shipping_for(&self, subtotal: Money, delivery: DeliveryOption) -> Money {
        match delivery.fixed_price() {
            Some(price) => price,
            None if self.qualifies_for_free_shipping(subtotal) => Money::zero(),
            None => self.standard_shipping,
        }
    }

    /// Computes the order summary for a subtotal.
    pub fn summarize(&self, subtotal: Money, delivery: DeliveryOption) -> OrderSummary {
        let shipping = self.shipping_for(subtotal, delivery);
        let tax = subtotal.calculate_tax(self.tax_rate);

        let amount_until_free_shipping = if self.qualifies_for_free_shipping(subtotal) {
            None
        } else {
            Some(self.free_shipping_threshold - subtotal)
        };

        OrderSummary {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
            amount_until_free_shipping,
            delivery,
        }
    }

    /// Computes the order summary for a cart.
    pub fn summarize_cart(&self, cart: &Cart, delivery: DeliveryOption) -> OrderSummary {
        self.summarize(cart.total_price(), delivery)
    }
}

// =============================================================================
// Order Summary
// =============================================================================

/// The money lines shown in the cart page and checkout sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,

    /// How much more the shopper must add for free standard shipping.
    /// `None` once the subtotal qualifies.
    pub amount_until_free_shipping: Option<Money>,

    pub delivery: DeliveryOption,
}

impl OrderSummary {
    /// Whether the shipping line reads "Free".
    pub fn is_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

// =============================================================================
// Delivery Option
// =============================================================================

/// Delivery speed chosen in checkout step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOption {
    /// Policy shipping (free above the threshold), 5-7 business days.
    #[default]
    Standard,
    /// $19.99, 2-3 business days.
    Express,
    /// $29.99, next business day.
    Overnight,
}

impl DeliveryOption {
    pub const ALL: [DeliveryOption; 3] = [
        DeliveryOption::Standard,
        DeliveryOption::Express,
        DeliveryOption::Overnight,
    ];

    /// Price that does not depend on the subtotal. `None` for standard.
    pub fn fixed_price(&self) -> Option<Money> {
        match self {
            DeliveryOption::Standard => None,
            DeliveryOption::Express => Some(Money::from_cents(1999)),
            DeliveryOption::Overnight => Some(Money::from_cents(2999)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeliveryOption::Standard => "Standard Delivery",
            DeliveryOption::Express => "Express Delivery",
            DeliveryOption::Overnight => "Overnight Delivery",
        }
    }

    pub fn estimate(&self) -> &'static str {
        match self {
            DeliveryOption::Standard => "5-7 business days",
            DeliveryOption::Express => "2-3 business days",
            DeliveryOption::Overnight => "Next business day",
        }
    }
}

// =============================================================================
// Checkout Step
// =============================================================================

/// Where the shopper is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Delivery,
    Payment,
}

impl CheckoutStep {
    /// 1-based number shown in the step indicator.
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Delivery => 2,
            CheckoutStep::Payment => 3,
        }
    }

    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Shipping => Some(CheckoutStep::Delivery),
            CheckoutStep::Delivery => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => None,
        }
    }

    pub fn previous(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Shipping => None,
            CheckoutStep::Delivery => Some(CheckoutStep::Shipping),
            CheckoutStep::Payment => Some(CheckoutStep::Delivery),
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStep::Shipping => write!(f, "shipping"),
            CheckoutStep::Delivery => write!(f, "delivery"),
            CheckoutStep::Payment => write!(f, "payment"),
        }
    }
}

// =============================================================================
// Shipping Details
// =============================================================================

/// The shipping address form (checkout step 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Default for ShippingDetails {
    fn default() -> Self {
        ShippingDetails {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: "United States".to_string(),
        }
    }
}

// =============================================================================
// Checkout Session
// =============================================================================

/// One pass through the checkout pages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    step: CheckoutStep,
    pub shipping: ShippingDetails,
    pub delivery: DeliveryOption,
}

impl CheckoutSession {
    /// Starts checkout for `cart`.
    ///
    /// ## Errors
    /// * `CoreError::EmptyCart` - nothing to check out
    pub fn start(cart: &Cart) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        Ok(CheckoutSession::default())
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Moves to the next step.
    ///
    /// ## Rules
    /// - Leaving Shipping requires valid shipping details
    /// - Payment is the last step; placing the order is the way out
    pub fn advance(&mut self) -> CoreResult<CheckoutStep> {
        if self.step == CheckoutStep::Shipping {
            validate_shipping_details(&self.shipping)?;
        }

        let next = self.step.next().ok_or_else(|| CoreError::InvalidCheckoutStep {
            action: "continue".to_string(),
            step: self.step.to_string(),
        })?;
        self.step = next;
        Ok(next)
    }

    /// Moves to the previous step. No-op on Shipping.
    pub fn back(&mut self) -> CheckoutStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Summary for `cart` with the chosen delivery option.
    pub fn summary(&self, cart: &Cart, policy: &CheckoutPolicy) -> OrderSummary {
        policy.summarize_cart(cart, self.delivery)
    }

    /// Places the order.
    ///
    /// The caller clears the cart once this returns `Ok`.
    ///
    /// ## Errors
    /// * `CoreError::InvalidCheckoutStep` - not on the payment step
    /// * `CoreError::EmptyCart` - the cart was emptied mid-checkout
    pub fn place_order(&self, cart: &Cart, policy: &CheckoutPolicy) -> CoreResult<OrderConfirmation> {
        if self.step != CheckoutStep::Payment {
            return Err(CoreError::InvalidCheckoutStep {
                action: "place order".to_string(),
                step: self.step.to_string(),
            });
        }

        OrderConfirmation::for_cart(cart, policy, self.delivery, Some(self.shipping.clone()))
    }
}

// =============================================================================
// Order Confirmation
// =============================================================================

/// Receipt returned when an order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<CartSnapshotEntry>,
    pub summary: OrderSummary,
    pub shipping: Option<ShippingDetails>,
    pub message: String,
}

impl OrderConfirmation {
    /// Builds a confirmation for the current cart contents.
    ///
    /// ## Errors
    /// * `CoreError::EmptyCart` - nothing to order
    pub fn for_cart(
        cart: &Cart,
        policy: &CheckoutPolicy,
        delivery: DeliveryOption,
        shipping: Option<ShippingDetails>,
    ) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        Ok(OrderConfirmation {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            items: cart.snapshot().items,
            summary: policy.summarize_cart(cart, delivery),
            shipping,
            message: "Order placed successfully!".to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::tests::product;

    fn filled_details() -> ShippingDetails {
        ShippingDetails {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            phone: "555-0100".into(),
            address: "12 Analytical Way".into(),
            city: "London".into(),
            state: "LDN".into(),
            zip: "10001".into(),
            ..ShippingDetails::default()
        }
    }

    #[test]
    fn test_summary_with_free_shipping() {
        let summary = CheckoutPolicy::default()
            .summarize(Money::from_cents(5500), DeliveryOption::Standard);

        assert!(summary.is_free_shipping());
        assert_eq!(summary.tax, Money::from_cents(440));
        assert_eq!(summary.total, Money::from_cents(5940));
        assert_eq!(summary.amount_until_free_shipping, None);
    }

    #[test]
    fn test_summary_below_threshold() {
        let summary = CheckoutPolicy::default()
            .summarize(Money::from_cents(2000), DeliveryOption::Standard);

        assert_eq!(summary.shipping, Money::from_cents(999));
        assert_eq!(summary.amount_until_free_shipping, Some(Money::from_cents(3000)));
        assert_eq!(summary.tax, Money::from_cents(160));
        assert_eq!(summary.total, Money::from_cents(2000 + 999 + 160));
    }

    #[test]
    fn test_threshold_is_strict() {
        let policy = CheckoutPolicy::default();
        assert!(!policy.qualifies_for_free_shipping(Money::from_cents(5000)));
        assert!(policy.qualifies_for_free_shipping(Money::from_cents(5001)));
    }

    #[test]
    fn test_paid_delivery_replaces_standard() {
        let policy = CheckoutPolicy::default();
        let subtotal = Money::from_cents(10_000);

        assert!(policy.shipping_for(subtotal, DeliveryOption::Standard).is_zero());
        assert_eq!(
            policy.shipping_for(subtotal, DeliveryOption::Express),
            Money::from_cents(1999)
        );
        assert_eq!(
            policy.shipping_for(subtotal, DeliveryOption::Overnight),
            Money::from_cents(2999)
        );
    }

    #[test]
    fn test_start_requires_items() {
        assert!(matches!(
            CheckoutSession::start(&Cart::new()),
            Err(CoreError::EmptyCart)
        ));

        let cart = Cart::new().add_item(&product("1", 100));
        let session = CheckoutSession::start(&cart).unwrap();
        assert_eq!(session.step(), CheckoutStep::Shipping);
        assert_eq!(session.shipping.country, "United States");
    }

    #[test]
    fn test_advance_requires_valid_shipping() {
        let cart = Cart::new().add_item(&product("1", 100));
        let mut session = CheckoutSession::start(&cart).unwrap();

        let err = session.advance().unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Required { .. })));
        assert_eq!(session.step(), CheckoutStep::Shipping);

        session.shipping = filled_details();
        assert_eq!(session.advance().unwrap(), CheckoutStep::Delivery);
        assert_eq!(session.advance().unwrap(), CheckoutStep::Payment);
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_back_stops_at_shipping() {
        let mut session = CheckoutSession::default();
        assert_eq!(session.back(), CheckoutStep::Shipping);

        session.shipping = filled_details();
        session.advance().unwrap();
        assert_eq!(session.back(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_place_order_only_from_payment() {
        let cart = Cart::new().add_item_quantity(&product("1", 2500), 2);
        let policy = CheckoutPolicy::default();
        let mut session = CheckoutSession::start(&cart).unwrap();

        assert!(matches!(
            session.place_order(&cart, &policy),
            Err(CoreError::InvalidCheckoutStep { .. })
        ));

        session.shipping = filled_details();
        session.advance().unwrap();
        session.delivery = DeliveryOption::Express;
        session.advance().unwrap();

        let confirmation = session.place_order(&cart, &policy).unwrap();
        assert_eq!(confirmation.items.len(), 1);
        assert_eq!(confirmation.summary.shipping, Money::from_cents(1999));
        assert_eq!(confirmation.summary.subtotal, Money::from_cents(5000));

        assert!(matches!(
            session.place_order(&Cart::new(), &policy),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_step_numbers() {
        assert_eq!(CheckoutStep::Shipping.number(), 1);
        assert_eq!(CheckoutStep::Payment.number(), 3);
        assert_eq!(CheckoutStep::Delivery.to_string(), "delivery");
    }
}
