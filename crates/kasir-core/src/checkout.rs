//! # Checkout Fold
//!
//! Turns an ordered list of checkout items into priced lines, checking each
//! line against the stock still available after the lines before it.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kasir-db checkout transaction                                          │
//! │                                                                         │
//! │  for item in request.items:                                            │
//! │      snapshot = SELECT id, name, price, stock ...   (I/O)              │
//! │      tally.add_line(&snapshot, item.quantity)       ◄── THIS MODULE    │
//! │                                                                         │
//! │  for (id, qty) in tally.stock_decrements():                            │
//! │      UPDATE products SET stock = stock - qty ...    (I/O)              │
//! │                                                                         │
//! │  INSERT transaction (tally.total()) + one detail per tally line        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Duplicate Product Ids
//! The same product may appear on several lines. Each line sees the stock
//! left after earlier lines claimed theirs:
//! ```text
//! stock 5, items [{A, 3}, {A, 3}]
//!   line 1: available 5, claims 3  ✓
//!   line 2: available 2, wants 3   ✗ InsufficientStock { available: 2 }
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// Product state read inside the checkout transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSnapshot {
    pub product_id: i64,
    pub name: String,
    pub unit_price: Money,
    pub stock: i64,
}

/// A priced, stock-checked line ready to be written as a detail row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
}

// =============================================================================
// Tally
// =============================================================================

/// Running state of a checkout: accepted lines, total, and per-product claims.
#[derive(Debug, Clone, Default)]
pub struct CheckoutTally {
    lines: Vec<CheckoutLine>,
    /// (product_id, claimed) in first-seen order.
    reserved: Vec<(i64, i64)>,
    total: Money,
}

impl CheckoutTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity of `product_id` already claimed by earlier lines.
    pub fn reserved(&self, product_id: i64) -> i64 {
        self.reserved
            .iter()
            .find(|(id, _)| *id == product_id)
            .map(|(_, qty)| *qty)
            .unwrap_or(0)
    }

    /// Checks one line against the snapshot and, if it fits, records it.
    ///
    /// On error the tally is left unchanged.
    pub fn add_line(
        &mut self,
        snapshot: &StockSnapshot,
        quantity: i64,
    ) -> CoreResult<&CheckoutLine> {
        let available = snapshot.stock - self.reserved(snapshot.product_id);
        if quantity > available {
            return Err(CoreError::InsufficientStock {
                product_id: snapshot.product_id,
                product_name: snapshot.name.clone(),
                requested: quantity,
                available: available.max(0),
            });
        }

        let overflow = || CoreError::AmountOverflow {
            product_id: snapshot.product_id,
        };
        let subtotal = snapshot
            .unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(overflow)?;
        let total = self.total.checked_add(subtotal).ok_or_else(overflow)?;

        match self
            .reserved
            .iter_mut()
            .find(|(id, _)| *id == snapshot.product_id)
        {
            Some((_, claimed)) => *claimed += quantity,
            None => self.reserved.push((snapshot.product_id, quantity)),
        }
        self.total = total;
        self.lines.push(CheckoutLine {
            product_id: snapshot.product_id,
            product_name: snapshot.name.clone(),
            unit_price: snapshot.unit_price,
            quantity,
            subtotal,
        });

        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Sum of every accepted line's subtotal.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn lines(&self) -> &[CheckoutLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// One `(product_id, quantity)` per distinct product, in first-seen order.
    pub fn stock_decrements(&self) -> &[(i64, i64)] {
        &self.reserved
    }

    /// Consumes the tally, returning its lines and total.
    pub fn into_parts(self) -> (Vec<CheckoutLine>, Money) {
        (self.lines, self.total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(product_id: i64, name: &str, price: i64, stock: i64) -> StockSnapshot {
        StockSnapshot {
            product_id,
            name: name.to_string(),
            unit_price: Money::new(price),
            stock,
        }
    }

    #[test]
    fn test_two_products() {
        let a = snapshot(1, "A", 10, 5);
        let b = snapshot(2, "B", 20, 2);

        let mut tally = CheckoutTally::new();
        tally.add_line(&a, 2).unwrap();
        tally.add_line(&b, 1).unwrap();

        assert_eq!(tally.total(), Money::new(40));
        assert_eq!(tally.stock_decrements(), &[(1, 2), (2, 1)]);

        let subtotals: Vec<i64> = tally.lines().iter().map(|l| l.subtotal.amount()).collect();
        assert_eq!(subtotals, vec![20, 20]);
    }

    #[test]
    fn test_insufficient_stock() {
        let b = snapshot(2, "B", 20, 1);
        let mut tally = CheckoutTally::new();

        let err = tally.add_line(&b, 3).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: 2,
                product_name: "B".to_string(),
                requested: 3,
                available: 1,
            }
        );
        assert!(tally.is_empty());
        assert!(tally.total().is_zero());
    }

    #[test]
    fn test_duplicate_ids_see_reduced_stock() {
        let a = snapshot(1, "A", 10, 5);
        let mut tally = CheckoutTally::new();

        tally.add_line(&a, 3).unwrap();
        let err = tally.add_line(&a, 3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                requested: 3,
                available: 2,
                ..
            }
        ));

        tally.add_line(&a, 2).unwrap();
        assert_eq!(tally.reserved(1), 5);
        assert_eq!(tally.stock_decrements(), &[(1, 5)]);
        assert_eq!(tally.lines().len(), 2);
        assert_eq!(tally.total(), Money::new(50));
    }

    #[test]
    fn test_exact_stock_is_allowed() {
        let a = snapshot(1, "A", 10, 5);
        let mut tally = CheckoutTally::new();
        let line = tally.add_line(&a, 5).unwrap();
        assert_eq!(line.subtotal, Money::new(50));
    }

    #[test]
    fn test_zero_stock() {
        let a = snapshot(1, "A", 10, 0);
        let mut tally = CheckoutTally::new();
        assert!(matches!(
            tally.add_line(&a, 1),
            Err(CoreError::InsufficientStock { available: 0, .. })
        ));
    }

    #[test]
    fn test_overflow_leaves_tally_unchanged() {
        let cheap = snapshot(1, "Cheap", 10, 10);
        let huge = snapshot(2, "Huge", i64::MAX / 2, 10);

        let mut tally = CheckoutTally::new();
        tally.add_line(&cheap, 1).unwrap();

        let err = tally.add_line(&huge, 3).unwrap_err();
        assert_eq!(err, CoreError::AmountOverflow { product_id: 2 });

        assert_eq!(tally.total(), Money::new(10));
        assert_eq!(tally.reserved(2), 0);
        assert_eq!(tally.lines().len(), 1);
    }

    #[test]
    fn test_line_order_is_request_order() {
        let a = snapshot(1, "A", 10, 10);
        let b = snapshot(2, "B", 5, 10);

        let mut tally = CheckoutTally::new();
        tally.add_line(&b, 1).unwrap();
        tally.add_line(&a, 1).unwrap();
        tally.add_line(&b, 2).unwrap();

        let (lines, total) = tally.into_parts();
        let ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![2, 1, 2]);
        assert_eq!(total, lines.iter().map(|l| l.subtotal).sum());
    }
}
