//! # Cart
//!
//! The line-item list behind the billing counter and the quotation builder.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Operations                                  │
//! │                                                                         │
//! │  Cashier Action           Operation               Cart Change           │
//! │  ──────────────           ─────────               ───────────           │
//! │                                                                         │
//! │  Pick product ──────────► add_or_merge() ───────► push / qty += n      │
//! │                                                   (or DuplicateItem)    │
//! │  Tick several ──────────► add_selection() ──────► push the new ones    │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ────► qty = max(n, 1)      │
//! │                                                                         │
//! │  Click remove ──────────► remove_item() ────────► retain (idempotent)  │
//! │                                                                         │
//! │  Any change ────────────► totals() ─────────────► recomputed, never    │
//! │                                                   stored               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Counters, Two Policies
//! Billing and quotations disagree on duplicates and rounding. Both
//! behaviours are kept and selected through [`CartPolicy`]:
//!
//! | Policy      | Duplicate add | Grand total        | Words | Stock gate |
//! |-------------|---------------|--------------------|-------|------------|
//! | `billing`   | increment     | rounded to rupee   | yes   | yes        |
//! | `quotation` | reject        | kept at 2 decimals | no    | no         |
//!
//! Every failing operation leaves the cart exactly as it was.
//!
//! A deserialized cart goes through the same rules: quantities are clamped
//! and repeated products are replayed through the duplicate policy.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{clamp_quantity, deserialize_quantity};
use crate::tax::{decompose_with, GstRate, TaxBreakdown};
use crate::totals::{aggregate, TaxableLine, Totals};
use crate::types::CatalogItem;

// =============================================================================
// Policy
// =============================================================================

/// What to do when a product already in the cart is added again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Add the requested quantity to the existing line.
    Increment,
    /// Refuse with [`CoreError::DuplicateItem`].
    Reject,
}

/// Behaviour switches that differ between billing and quotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartPolicy {
    pub on_duplicate: DuplicatePolicy,
    /// Round the grand total to the nearest rupee.
    pub round_grand_total: bool,
    /// Render the grand total in words.
    pub render_words: bool,
    /// Refuse products with no stock on hand.
    pub reject_out_of_stock: bool,
}

impl CartPolicy {
    /// The billing counter.
    pub const fn billing() -> Self {
        CartPolicy {
            on_duplicate: DuplicatePolicy::Increment,
            round_grand_total: true,
            render_words: true,
            reject_out_of_stock: true,
        }
    }

    /// The quotation builder.
    pub const fn quotation() -> Self {
        CartPolicy {
            on_duplicate: DuplicatePolicy::Reject,
            round_grand_total: false,
            render_words: false,
            reject_out_of_stock: false,
        }
    }
}

impl Default for CartPolicy {
    fn default() -> Self {
        CartPolicy::billing()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A catalog item in the cart with its quantity.
///
/// The catalog record is copied in when the line is created, so later
/// catalog edits do not change the price of a cart being rung up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub item: CatalogItem,
    /// Always at least 1.
    #[serde(deserialize_with = "deserialize_quantity")]
    quantity: u32,
}

impl LineItem {
    /// Creates a line, clamping the requested quantity to at least 1.
    pub fn new(item: CatalogItem, requested_qty: i64) -> Self {
        LineItem {
            item,
            quantity: clamp_quantity(requested_qty),
        }
    }

    #[inline]
    pub fn product_id(&self) -> i64 {
        self.item.id
    }

    #[inline]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Tax-inclusive price × quantity.
    pub fn line_total(&self) -> f64 {
        self.unit_price() * self.quantity as f64
    }

    /// Taxable value and tax for the whole line.
    pub fn breakdown(&self) -> TaxBreakdown {
        decompose_with(self.unit_price(), self.gst()).scale(self.quantity)
    }
}

impl TaxableLine for LineItem {
    fn unit_price(&self) -> f64 {
        self.item.effective_price()
    }

    fn gst(&self) -> GstRate {
        self.item.gst_percent
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An owned, ordered list of line items plus the policy governing it.
///
/// ## Invariants
/// - Lines are unique by product id
/// - Every quantity is at least 1
/// - Lines keep insertion order; quantity updates happen in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(try_from = "CartData")]
pub struct Cart {
    items: Vec<LineItem>,
    policy: CartPolicy,
}

/// Deserialized shape of a [`Cart`] before its invariants are checked.
#[derive(Deserialize)]
struct CartData {
    items: Vec<LineItem>,
    #[serde(default)]
    policy: CartPolicy,
}

impl TryFrom<CartData> for Cart {
    type Error = CoreError;

    /// Rebuilds the cart line by line. Repeats merge under the increment
    /// policy and fail with [`CoreError::DuplicateItem`] under reject.
    fn try_from(data: CartData) -> CoreResult<Self> {
        let mut cart = Cart::new(data.policy);
        for line in data.items {
            cart.merge_line(line)?;
        }
        Ok(cart)
    }
}

impl Cart {
    /// Creates an empty cart with the given policy.
    pub fn new(policy: CartPolicy) -> Self {
        Cart {
            items: Vec::new(),
            policy,
        }
    }

    /// An empty billing cart.
    pub fn billing() -> Self {
        Cart::new(CartPolicy::billing())
    }

    /// An empty quotation cart.
    pub fn quotation() -> Self {
        Cart::new(CartPolicy::quotation())
    }

    pub fn policy(&self) -> CartPolicy {
        self.policy
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line by product id.
    pub fn get(&self, product_id: i64) -> Option<&LineItem> {
        self.items.iter().find(|line| line.product_id() == product_id)
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.get(product_id).is_some()
    }

    /// Adds a catalog item, or merges it into an existing line.
    ///
    /// ## Behavior
    /// - Requested quantity is clamped to at least 1
    /// - Stock gate (billing): `stock_qty <= 0` → [`CoreError::OutOfStock`]
    /// - Already present, increment policy: quantity grows by the request
    /// - Already present, reject policy: [`CoreError::DuplicateItem`]
    ///
    /// ```rust
    /// use rupee_core::cart::Cart;
    /// use rupee_core::types::CatalogItem;
    ///
    /// let cable = CatalogItem::new(1, "Cable 2.5mm", 100.0, 18.0).with_stock(10);
    /// let mut cart = Cart::billing();
    /// cart.add_or_merge(&cable, 1).unwrap();
    /// cart.add_or_merge(&cable, 1).unwrap();
    /// assert_eq!(cart.items().len(), 1);
    /// assert_eq!(cart.items()[0].quantity(), 2);
    /// ```
    pub fn add_or_merge(&mut self, item: &CatalogItem, requested_qty: i64) -> CoreResult<()> {
        self.check_stock(item)?;
        self.merge_line(LineItem::new(item.clone(), requested_qty))
    }

    /// Adds several catalog items at once, each with its own quantity.
    ///
    /// Products already in the cart (or repeated in the selection) are
    /// skipped whatever the duplicate policy. The stock gate still applies,
    /// and a refusal leaves the cart untouched.
    ///
    /// ## Returns
    /// The number of lines added.
    ///
    /// ## Errors
    /// - [`CoreError::NothingToAdd`] for an empty selection
    /// - [`CoreError::NoNewItems`] when every product was already present
    pub fn add_selection<'a, I>(&mut self, selection: I) -> CoreResult<usize>
    where
        I: IntoIterator<Item = (&'a CatalogItem, i64)>,
    {
        let mut picked = 0usize;
        let mut fresh: Vec<LineItem> = Vec::new();

        for (item, requested_qty) in selection {
            picked += 1;
            if self.contains(item.id) || fresh.iter().any(|l| l.product_id() == item.id) {
                continue;
            }
            self.check_stock(item)?;
            fresh.push(LineItem::new(item.clone(), requested_qty));
        }

        if picked == 0 {
            return Err(CoreError::NothingToAdd);
        }
        if fresh.is_empty() {
            return Err(CoreError::NoNewItems);
        }

        let added = fresh.len();
        self.items.extend(fresh);
        Ok(added)
    }

    /// Sets a line's quantity in place, clamped to at least 1.
    ///
    /// Returns `false` (and changes nothing) when the product is not in the
    /// cart.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> bool {
        match self.items.iter_mut().find(|l| l.product_id() == product_id) {
            Some(line) => {
                line.quantity = clamp_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Steps a line's quantity up or down (the +/- buttons), never below 1.
    pub fn adjust_quantity(&mut self, product_id: i64, delta: i64) -> bool {
        match self.get(product_id) {
            Some(line) => {
                let next = i64::from(line.quantity).saturating_add(delta);
                self.update_quantity(product_id, next)
            }
            None => false,
        }
    }

    /// Removes a line. Removing a product that is not there is a no-op.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|l| l.product_id() != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|l| l.quantity as u64).sum()
    }

    /// Recomputes the totals under this cart's policy.
    pub fn totals(&self) -> Totals {
        aggregate(&self.items, &self.policy)
    }

    /// Pushes a line, or folds it into the existing line for the same
    /// product according to the duplicate policy.
    fn merge_line(&mut self, line: LineItem) -> CoreResult<()> {
        let product_id = line.product_id();
        let Some(existing) = self.items.iter_mut().find(|l| l.product_id() == product_id) else {
            self.items.push(line);
            return Ok(());
        };

        match self.policy.on_duplicate {
            DuplicatePolicy::Increment => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                Ok(())
            }
            DuplicatePolicy::Reject => Err(CoreError::DuplicateItem {
                product_id,
                name: line.item.name,
            }),
        }
    }

    fn check_stock(&self, item: &CatalogItem) -> CoreResult<()> {
        if self.policy.reject_out_of_stock && !item.in_stock() {
            return Err(CoreError::OutOfStock {
                product_id: item.id,
                name: item.name.clone(),
            });
        }
        Ok(())
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::billing()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
