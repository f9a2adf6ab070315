//! Shopper basket and order domain types for Parana.
//!
//! This crate provides the storage-agnostic core of the shopper workflow:
//!
//! - **Catalog**: categories, products, sellers, seller offers
//! - **Basket**: a shopper's per-day basket and its priced line items
//! - **Checkout**: orders, order lines, and the checkout state machine
//!
//! # Example
//!
//! ```rust,ignore
//! use parana_commerce::prelude::*;
//!
//! let line = BasketLine {
//!     basket_id: BasketId::new(1),
//!     product_id: ProductId::new(10),
//!     seller_id: SellerId::new(3),
//!     quantity: 2,
//!     unit_price: Money::from_pence(500),
//! };
//!
//! assert_eq!(line.line_total()?.to_string(), "£10.00");
//! ```

pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod ids;
pub mod money;
pub mod shopper;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{pick, Category, Choice, Product, ProductStatus, Seller, SellerOffer};

    // Shopper
    pub use crate::shopper::Shopper;

    // Basket
    pub use crate::basket::{check_quantity, Basket, BasketItemView, BasketLine, BasketView};

    // Checkout
    pub use crate::checkout::{CheckoutFlow, CheckoutState, Order, OrderLine, OrderStatus};
}
