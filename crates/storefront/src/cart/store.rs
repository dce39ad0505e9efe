//! In-memory cart state with a last-saved baseline.
//!
//! Every mutation is expressed as a [`CartAction`] and applied by
//! [`LocalCart::apply`]. The named methods are thin wrappers so callers can
//! use either form.
//!
//! # Invariants
//!
//! - At most one line per product ID.
//! - Every line has a quantity of at least 1. Updates that would drive a
//!   quantity to zero or below remove the line instead.

use mini_catalog_core::{CartLine, Price, Product, ProductId};

/// A cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add `quantity` units of `product`, merging with an existing line.
    Add { product: Product, quantity: u32 },
    /// Set the quantity of a line exactly. Zero or below removes the line.
    UpdateQuantity { product_id: ProductId, quantity: i64 },
    /// Remove a line if present.
    Remove { product_id: ProductId },
    /// Remove every line.
    Clear,
    /// Replace both the working state and the baseline.
    Load { lines: Vec<CartLine> },
}

/// Working cart lines plus the last state confirmed by the remote store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalCart {
    lines: Vec<CartLine>,
    last_saved: Vec<CartLine>,
    dirty: bool,
}

impl LocalCart {
    /// Create an empty, clean cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clean cart whose working state and baseline are `lines`.
    ///
    /// The caller is responsible for `lines` satisfying the cart invariants.
    #[must_use]
    pub fn from_saved(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        cart.apply(CartAction::Load { lines });
        cart
    }

    /// Apply a mutation.
    ///
    /// Every action except [`CartAction::Load`] marks the cart dirty, even
    /// when it leaves the lines unchanged (e.g. clearing an empty cart).
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add { product, quantity } => {
                if let Some(line) = self.line_mut(&product.id) {
                    line.quantity = line.quantity.saturating_add(quantity);
                } else if quantity > 0 {
                    self.lines.push(CartLine::new(product, quantity));
                }
                self.dirty = true;
            }
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => {
                if quantity <= 0 {
                    self.lines.retain(|line| line.product.id != product_id);
                } else if let Some(line) = self.line_mut(&product_id) {
                    line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
                self.dirty = true;
            }
            CartAction::Remove { product_id } => {
                self.lines.retain(|line| line.product.id != product_id);
                self.dirty = true;
            }
            CartAction::Clear => {
                self.lines.clear();
                self.dirty = true;
            }
            CartAction::Load { lines } => {
                self.last_saved.clone_from(&lines);
                self.lines = lines;
                self.dirty = false;
            }
        }
    }

    /// Add `quantity` units of `product`.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        self.apply(CartAction::Add { product, quantity });
    }

    /// Set a line's quantity. `quantity <= 0` removes the line.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        self.apply(CartAction::UpdateQuantity {
            product_id: product_id.clone(),
            quantity,
        });
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.apply(CartAction::Remove {
            product_id: product_id.clone(),
        });
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.apply(CartAction::Clear);
    }

    /// Adopt the current working state as the baseline.
    pub fn mark_saved(&mut self) {
        self.last_saved.clone_from(&self.lines);
        self.dirty = false;
    }

    /// Adopt `accepted` as the baseline.
    ///
    /// Used when a save completes: `accepted` is what the remote store
    /// confirmed, which may predate edits made while the save was in flight.
    /// Those edits stay in the working lines but the cart is clean.
    pub fn commit(&mut self, accepted: Vec<CartLine>) {
        self.last_saved = accepted;
        self.dirty = false;
    }

    /// Discard working changes and return to the baseline.
    pub fn reset_to_last_saved(&mut self) {
        self.lines.clone_from(&self.last_saved);
        self.dirty = false;
    }

    /// Working lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Baseline lines.
    #[must_use]
    pub fn last_saved(&self) -> &[CartLine] {
        &self.last_saved
    }

    /// Whether the working state has local changes since the last save or rollback.
    #[must_use]
    pub const fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `price * quantity` across all lines, in cents.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product::new(id, format!("Product {id}"), Price::from_cents(cents))
    }

    fn assert_invariants(cart: &LocalCart) {
        let mut seen = HashSet::new();
        for line in cart.lines() {
            assert!(line.quantity >= 1, "line {} has zero quantity", line.product.id);
            assert!(
                seen.insert(line.product.id.clone()),
                "duplicate line for {}",
                line.product.id
            );
        }
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = LocalCart::new();
        let a = product("a", 1000);

        cart.add_item(a.clone(), 1);
        cart.add_item(a, 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.subtotal(), Price::from_cents(2000));
        assert_eq!(cart.subtotal().display(), "$20.00");
        assert!(cart.has_unsaved_changes());
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = LocalCart::new();
        cart.add_item(product("b", 200), 1);
        cart.add_item(product("a", 100), 3);

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(cart.total_item_count(), 4);
        assert_eq!(cart.subtotal().cents(), 500);
    }

    #[test]
    fn test_add_zero_quantity_creates_no_line() {
        let mut cart = LocalCart::new();
        cart.add_item(product("a", 100), 0);
        assert!(cart.lines().is_empty());
        assert!(cart.has_unsaved_changes());
    }

    #[test]
    fn test_update_quantity_sets_exactly() {
        let mut cart = LocalCart::new();
        cart.add_item(product("a", 100), 2);
        cart.update_quantity(&ProductId::from("a"), 5);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        for quantity in [0, -1, -100] {
            let mut updated = LocalCart::new();
            updated.add_item(product("a", 100), 2);
            updated.add_item(product("b", 100), 1);
            updated.update_quantity(&ProductId::from("a"), quantity);

            let mut removed = LocalCart::new();
            removed.add_item(product("a", 100), 2);
            removed.add_item(product("b", 100), 1);
            removed.remove_item(&ProductId::from("a"));

            assert_eq!(updated, removed);
        }
    }

    #[test]
    fn test_update_quantity_absent_product_is_noop_but_dirty() {
        let mut cart = LocalCart::from_saved(vec![CartLine::new(product("a", 100), 1)]);
        cart.update_quantity(&ProductId::from("missing"), 3);
        assert_eq!(cart.lines(), cart.last_saved());
        assert!(cart.has_unsaved_changes());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = LocalCart::new();
        cart.add_item(product("a", 100), 1);
        cart.remove_item(&ProductId::from("zzz"));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_clear_empty_cart_marks_dirty() {
        let mut cart = LocalCart::new();
        assert!(!cart.has_unsaved_changes());
        cart.clear();
        assert!(cart.lines().is_empty());
        assert!(cart.has_unsaved_changes());
    }

    #[test]
    fn test_mark_saved_snapshot_is_independent() {
        let mut cart = LocalCart::new();
        cart.add_item(product("a", 100), 1);
        cart.mark_saved();
        assert!(!cart.has_unsaved_changes());

        cart.add_item(product("a", 100), 4);
        assert_eq!(cart.last_saved()[0].quantity, 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_reset_to_last_saved() {
        let mut cart = LocalCart::from_saved(vec![CartLine::new(product("a", 100), 1)]);
        cart.add_item(product("b", 300), 2);
        cart.remove_item(&ProductId::from("a"));

        cart.reset_to_last_saved();

        assert_eq!(cart.lines(), cart.last_saved());
        assert_eq!(cart.lines()[0].product.id.as_str(), "a");
        assert!(!cart.has_unsaved_changes());
    }

    #[test]
    fn test_commit_with_interleaved_edits_is_clean() {
        let mut cart = LocalCart::new();
        cart.add_item(product("a", 100), 1);
        let submitted = cart.lines().to_vec();

        cart.add_item(product("b", 100), 1);
        cart.commit(submitted.clone());

        assert_eq!(cart.last_saved(), submitted.as_slice());
        assert_eq!(cart.lines().len(), 2);
        assert!(!cart.has_unsaved_changes());

        cart.remove_item(&ProductId::from("b"));
        assert!(cart.has_unsaved_changes());
    }

    #[test]
    fn test_load_replaces_baseline_and_cleans() {
        let mut cart = LocalCart::new();
        cart.add_item(product("x", 1), 1);
        cart.apply(CartAction::Load {
            lines: vec![CartLine::new(product("a", 100), 2)],
        });
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.lines(), cart.last_saved());
        assert!(!cart.has_unsaved_changes());
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        // Deterministic pseudo-random walk over the mutation space.
        let ids = ["a", "b", "c", "d"];
        let mut cart = LocalCart::new();
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;

        for _ in 0..2_000 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            let id = ids[(state % 4) as usize];
            let amount = i64::try_from((state >> 8) % 7).unwrap() - 2;
            match (state >> 16) % 3 {
                0 => cart.add_item(product(id, 100), u32::try_from(amount.max(0)).unwrap()),
                1 => cart.update_quantity(&ProductId::from(id), amount),
                _ => cart.remove_item(&ProductId::from(id)),
            }
            assert_invariants(&cart);
        }
    }

    #[test]
    fn test_scenario_add_twice_then_zero() {
        let mut cart = LocalCart::new();
        let a = product("a", 1000);
        cart.add_item(a.clone(), 1);
        cart.add_item(a, 1);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.subtotal().cents(), 2000);

        cart.update_quantity(&ProductId::from("a"), 0);
        assert!(cart.lines().is_empty());
    }
}
