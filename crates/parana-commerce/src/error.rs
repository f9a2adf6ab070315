//! Commerce error types.

use crate::ids::{ProductId, SellerId, ShopperId};
use std::fmt;
use thiserror::Error;

/// Errors that can occur in shopper basket and checkout operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Shopper identifier does not match a known shopper.
    #[error("Shopper not found: {0}")]
    ShopperNotFound(ShopperId),

    /// Quantity must be greater than zero.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// No current seller offer exists for the product/seller pair.
    #[error("No current offer for product {product_id} from seller {seller_id}")]
    PriceNotFound {
        product_id: ProductId,
        seller_id: SellerId,
    },

    /// Update/remove target does not exist in the basket.
    #[error("Item not in basket: product {product_id}, seller {seller_id}")]
    ItemNotFound {
        product_id: ProductId,
        seller_id: SellerId,
    },

    /// Basket has no line items; nothing to check out.
    #[error("Basket is empty")]
    EmptyBasket,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition {
        from: &'static str,
        to: &'static str,
    },

    /// Arithmetic overflow in a money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// A failure during the atomic checkout commit sequence. The
    /// transaction has been rolled back in full before this is raised.
    #[error("Checkout failed: {0}")]
    CheckoutFailed(String),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CommerceError {
    /// Wrap a storage-layer failure.
    pub fn storage(err: impl fmt::Display) -> Self {
        CommerceError::Storage(err.to_string())
    }

    /// Wrap a failure inside the checkout commit sequence.
    pub fn checkout(err: impl fmt::Display) -> Self {
        CommerceError::CheckoutFailed(err.to_string())
    }

    /// Whether the session can continue after this error.
    ///
    /// Only an unknown shopper at session start is fatal; everything else
    /// is reported and control returns to the caller with state intact.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CommerceError::ShopperNotFound(_))
    }
}
