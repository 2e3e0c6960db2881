//! # Cart Store
//!
//! Owns the single shopping cart of a storefront session.
//!
//! ## Thread Safety
//! The cart lives behind `Arc<Mutex<Cart>>`: commands may run from several
//! tasks, and only one of them may swap the cart at a time. Each mutation
//! computes the next cart with the pure [`Cart`] functions and swaps it in
//! under the lock.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  UI Action                Command                 Cart Change           │
//! │  ─────────                ───────                 ───────────           │
//! │                                                                         │
//! │  Add to Cart ────────────► add_to_cart() ───────► add_item(product)    │
//! │                                                                         │
//! │  +/- Quantity ───────────► update_cart_item() ──► update_quantity(n)   │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_from_cart() ──► remove_item(id)      │
//! │                                                                         │
//! │  Place order ────────────► place_order() ───────► checkout(..)         │
//! │                                                                         │
//! │  Cart icon / overlay ────► open_cart() / close_cart()                  │
//! │                                                                         │
//! │  NOTE: a mutation that changes nothing does not notify observers.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use eshopee_core::{Cart, Money, Product};
use tracing::debug;

use super::observer::StateObserver;

/// The cart store.
///
/// Cloning is cheap and every clone shares the same cart.
#[derive(Clone)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    observers: Vec<Arc<dyn StateObserver>>,
}

impl CartStore {
    /// Creates a store seeded with `initial` (usually the rehydrated cart).
    pub fn new(initial: Cart, observers: Vec<Arc<dyn StateObserver>>) -> Self {
        CartStore {
            cart: Arc::new(Mutex::new(initial)),
            observers,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swaps in `f(current)` and notifies observers if anything changed.
    ///
    /// Observers run while the lock is held so notifications keep the
    /// order of the mutations.
    fn apply<F>(&self, action: &str, f: F) -> Cart
    where
        F: FnOnce(Cart) -> Cart,
    {
        let mut guard = self.lock();
        let next = f(guard.clone());
        self.commit(&mut guard, action, next);
        guard.clone()
    }

    /// Replaces `current` with `next`, notifying observers on change.
    ///
    /// Callers hold the lock for `current`.
    fn commit(&self, current: &mut Cart, action: &str, next: Cart) {
        if next == *current {
            return;
        }

        debug!(
            action,
            lines = next.line_count(),
            total_items = next.total_items(),
            is_open = next.is_open(),
            "Cart changed"
        );
        *current = next;
        for observer in &self.observers {
            observer.cart_changed(current);
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Runs `f` against the current cart without copying it.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> u32 {
        self.with_cart(Cart::total_items)
    }

    /// Sum of price × quantity over all lines.
    pub fn total_price(&self) -> Money {
        self.with_cart(Cart::total_price)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    pub fn add_item(&self, product: &Product) -> Cart {
        self.apply("add_item", |cart| cart.add_item(product))
    }

    /// Adds `quantity` units of `product`.
    pub fn add_item_quantity(&self, product: &Product, quantity: u32) -> Cart {
        self.apply("add_item", |cart| cart.add_item_quantity(product, quantity))
    }

    /// Sets a line's quantity; `<= 0` removes the line.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> Cart {
        self.apply("update_quantity", |cart| {
            cart.update_quantity(product_id, quantity)
        })
    }

    pub fn remove_item(&self, product_id: &str) -> Cart {
        self.apply("remove_item", |cart| cart.remove_item(product_id))
    }

    /// Empties the cart, leaving the sidebar flag alone.
    pub fn clear(&self) -> Cart {
        self.apply("clear", Cart::clear)
    }

    /// Runs `f` on the current cart and, if it succeeds, empties the cart
    /// in the same locked step.
    ///
    /// Nothing added while the order is being built can be cleared away
    /// without being part of it. On error the cart is left untouched.
    pub fn checkout<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&Cart) -> Result<R, E>,
    {
        let mut guard = self.lock();
        let order = f(&*guard)?;
        let next = guard.clone().clear();
        self.commit(&mut guard, "checkout", next);
        Ok(order)
    }

    pub fn open(&self) -> Cart {
        self.apply("open", Cart::open)
    }

    pub fn close(&self) -> Cart {
        self.apply("close", Cart::close)
    }
}

impl Default for CartStore {
    fn default() -> Self {
        CartStore::new(Cart::new(), Vec::new())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::observer::tests::RecordingObserver;
    use eshopee_core::Catalog;

    fn store_with_recorder() -> (CartStore, Arc<RecordingObserver>) {
        let recorder = Arc::new(RecordingObserver::default());
        let store = CartStore::new(Cart::new(), vec![recorder.clone() as Arc<dyn StateObserver>]);
        (store, recorder)
    }

    #[test]
    fn test_add_and_totals() {
        let catalog = Catalog::builtin().unwrap();
        let (store, recorder) = store_with_recorder();
        let first = catalog.find("1").unwrap();
        let second = catalog.find("2").unwrap();

        store.add_item(first);
        store.add_item(first);
        store.add_item(second);

        assert_eq!(store.total_items(), 3);
        assert_eq!(store.total_price(), first.price * 2 + second.price);
        assert_eq!(store.snapshot().line_count(), 2);
        assert_eq!(recorder.cart_count(), 3);
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let catalog = Catalog::builtin().unwrap();
        let (store, recorder) = store_with_recorder();

        store.update_quantity("missing", 4);
        store.remove_item("missing");
        store.clear();
        store.close();
        assert_eq!(recorder.cart_count(), 0);

        store.add_item(catalog.find("3").unwrap());
        store.update_quantity("3", 1);
        assert_eq!(recorder.cart_count(), 1);
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let catalog = Catalog::builtin().unwrap();
        let (store, _) = store_with_recorder();
        store.add_item_quantity(catalog.find("5").unwrap(), 3);

        let cart = store.update_quantity("5", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_open_close_is_independent_of_items() {
        let catalog = Catalog::builtin().unwrap();
        let (store, recorder) = store_with_recorder();

        assert!(store.open().is_open());
        store.add_item(catalog.find("1").unwrap());
        let cleared = store.clear();
        assert!(cleared.is_open());
        assert!(cleared.is_empty());
        assert!(!store.close().is_open());

        let last = recorder.carts.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last, store.snapshot());
    }

    #[test]
    fn test_clones_share_state() {
        let catalog = Catalog::builtin().unwrap();
        let store = CartStore::default();
        let other = store.clone();

        other.add_item(catalog.find("7").unwrap());
        assert_eq!(store.total_items(), 1);
    }

    #[test]
    fn test_checkout_clears_only_on_success() {
        let catalog = Catalog::builtin().unwrap();
        let (store, recorder) = store_with_recorder();
        store.add_item_quantity(catalog.find("4").unwrap(), 2);

        let err = store.checkout(|_| Err::<u32, &str>("declined")).unwrap_err();
        assert_eq!(err, "declined");
        assert_eq!(store.total_items(), 2);
        assert_eq!(recorder.cart_count(), 1);

        let ordered = store.checkout(|cart| Ok::<_, ()>(cart.total_items())).unwrap();
        assert_eq!(ordered, 2);
        assert!(store.snapshot().is_empty());
        assert_eq!(recorder.cart_count(), 2);
    }

    #[test]
    fn test_adds_during_checkout_are_ordered_or_kept() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let store = CartStore::default();
        const ADDS: u32 = 2000;

        let adder = {
            let store = store.clone();
            let catalog = catalog.clone();
            std::thread::spawn(move || {
                for _ in 0..ADDS {
                    store.add_item(catalog.find("2").unwrap());
                }
            })
        };

        let mut ordered = 0;
        while !adder.is_finished() {
            ordered += store.checkout(|cart| Ok::<_, ()>(cart.total_items())).unwrap();
        }
        adder.join().unwrap();

        assert_eq!(ordered + store.total_items(), ADDS);
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let (store, recorder) = store_with_recorder();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let catalog = catalog.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.add_item(catalog.find("9").unwrap());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.total_items(), 200);
        assert_eq!(recorder.cart_count(), 200);

        // Notifications arrive in mutation order
        let carts = recorder.carts.lock().unwrap();
        let counts: Vec<u32> = carts.iter().map(Cart::total_items).collect();
        assert!(counts.windows(2).all(|w| w[0] < w[1]));
    }
}
