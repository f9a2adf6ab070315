//! Basket and line item types.
//!
//! A basket is one shopper's uncommitted cart for one calendar day. Line
//! items are keyed by `(basket, product, seller)`; the unit price is
//! captured when the item is added and never re-read from the catalog.

use crate::error::CommerceError;
use crate::ids::{BasketId, ProductId, SellerId, ShopperId};
use crate::money::Money;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A shopper's basket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Basket {
    /// Unique basket identifier.
    pub id: BasketId,
    /// Owning shopper.
    pub shopper_id: ShopperId,
    /// Creation timestamp; determines which calendar day the basket
    /// belongs to.
    pub created_at: NaiveDateTime,
}

/// One priced selection within a basket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasketLine {
    /// Owning basket.
    pub basket_id: BasketId,
    /// Product being purchased.
    pub product_id: ProductId,
    /// Seller the product is bought from.
    pub seller_id: SellerId,
    /// Quantity, always greater than zero.
    pub quantity: i64,
    /// Unit price captured at add-time.
    pub unit_price: Money,
}

impl BasketLine {
    /// Total for this line (`quantity * unit_price`).
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}

/// One row of the canonical basket view: a line item joined with its
/// product and seller display names and a computed line total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasketItemView {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Seller the product is bought from.
    pub seller_id: SellerId,
    /// Product description.
    pub product: String,
    /// Seller display name.
    pub seller: String,
    /// Quantity.
    pub quantity: i64,
    /// Unit price captured at add-time.
    pub unit_price: Money,
    /// `quantity * unit_price`.
    pub line_total: Money,
}

/// The canonical "view basket" read: every line in one consistent pass.
///
/// This is what the shopper reviews before update, removal, and checkout;
/// the checkout converter commits exactly this snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BasketView {
    /// Lines in display order.
    pub items: Vec<BasketItemView>,
}

impl BasketView {
    /// Check if the basket has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Basket total across all lines.
    pub fn total(&self) -> Result<Money, CommerceError> {
        Money::try_sum(self.items.iter().map(|i| &i.line_total)).ok_or(CommerceError::Overflow)
    }
}

/// Validate a requested quantity.
///
/// Callers upstream validate input syntactically; this is the
/// authoritative `quantity > 0` check every mutation goes through.
pub fn check_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_row(quantity: i64, pence: i64) -> BasketItemView {
        let unit_price = Money::from_pence(pence);
        BasketItemView {
            product_id: ProductId::new(1),
            seller_id: SellerId::new(1),
            product: "Test Product".into(),
            seller: "Test Seller".into(),
            quantity,
            unit_price,
            line_total: unit_price.try_multiply(quantity).unwrap(),
        }
    }

    #[test]
    fn test_line_total() {
        let line = BasketLine {
            basket_id: BasketId::new(1),
            product_id: ProductId::new(1),
            seller_id: SellerId::new(1),
            quantity: 3,
            unit_price: Money::from_pence(500),
        };
        assert_eq!(line.line_total().unwrap(), Money::from_pence(1500));
    }

    #[test]
    fn test_line_total_overflow() {
        let line = BasketLine {
            basket_id: BasketId::new(1),
            product_id: ProductId::new(1),
            seller_id: SellerId::new(1),
            quantity: i64::MAX,
            unit_price: Money::from_pence(2),
        };
        assert!(matches!(line.line_total(), Err(CommerceError::Overflow)));
    }

    #[test]
    fn test_view_total() {
        let view = BasketView {
            items: vec![view_row(2, 500), view_row(1, 1299)],
        };
        assert_eq!(view.total().unwrap(), Money::from_pence(2299));
        assert_eq!(view.len(), 2);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_empty_view() {
        let view = BasketView::default();
        assert!(view.is_empty());
        assert_eq!(view.total().unwrap(), Money::zero());
    }

    #[test]
    fn test_check_quantity() {
        assert!(check_quantity(1).is_ok());
        assert!(check_quantity(9999).is_ok());
        assert!(matches!(
            check_quantity(0),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(matches!(
            check_quantity(-3),
            Err(CommerceError::InvalidQuantity(-3))
        ));
    }
}
