//! Catalog types: categories, products, sellers, and seller offers.
//!
//! The catalog is read-only from this crate's point of view; offers are
//! looked up at add-time and the price is frozen into the basket line.

use crate::ids::{CategoryId, ProductId, SellerId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Category description.
    pub description: String,
}

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    /// Product is listed and can be added to baskets.
    #[default]
    Available,
    /// Product is withheld from browsing and ordering.
    Unavailable,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::Unavailable => "unavailable",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "available" => Some(ProductStatus::Available),
            "unavailable" => Some(ProductStatus::Unavailable),
            _ => None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Product description.
    pub description: String,
    /// Listing status.
    pub status: ProductStatus,
}

/// A seller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seller {
    /// Unique seller identifier.
    pub id: SellerId,
    /// Seller display name.
    pub name: String,
}

/// A seller's current price for a specific product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SellerOffer {
    /// Product being offered.
    pub product_id: ProductId,
    /// Seller making the offer.
    pub seller_id: SellerId,
    /// Seller display name (denormalized for pickers).
    pub seller_name: String,
    /// Current unit price.
    pub price: Money,
}

/// An ordered `(id, label)` pair for numbered pickers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice<I> {
    /// Underlying identifier.
    pub id: I,
    /// Label shown to the shopper.
    pub label: String,
}

impl<I> Choice<I> {
    pub fn new(id: I, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Map a 1-based menu position onto the underlying id.
///
/// Returns `None` when the position is 0 or past the end of the list;
/// re-prompting on `None` is the caller's concern.
pub fn pick<I: Copy>(choices: &[Choice<I>], position: usize) -> Option<I> {
    if position == 0 {
        return None;
    }
    choices.get(position - 1).map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Choice<ProductId>> {
        vec![
            Choice::new(ProductId::new(10), "The Silent Patient"),
            Choice::new(ProductId::new(20), "Wireless Mouse"),
        ]
    }

    #[test]
    fn test_pick_in_range() {
        let choices = sample();
        assert_eq!(pick(&choices, 1), Some(ProductId::new(10)));
        assert_eq!(pick(&choices, 2), Some(ProductId::new(20)));
    }

    #[test]
    fn test_pick_out_of_range() {
        let choices = sample();
        assert_eq!(pick(&choices, 0), None);
        assert_eq!(pick(&choices, 3), None);
        assert_eq!(pick::<ProductId>(&[], 1), None);
    }

    #[test]
    fn test_product_status_round_trip() {
        assert_eq!(
            ProductStatus::from_str("available"),
            Some(ProductStatus::Available)
        );
        assert_eq!(
            ProductStatus::from_str("Unavailable"),
            Some(ProductStatus::Unavailable)
        );
        assert_eq!(ProductStatus::from_str("discontinued"), None);
        assert_eq!(ProductStatus::Available.as_str(), "available");
    }
}
