//! SQLite persistence for the Parana shopper workflow.
//!
//! The [`Store`] owns the database connection and exposes the three
//! storage-facing components of the workflow:
//!
//! - **Catalog lookup**: read-only category/product/offer queries
//! - **Basket store**: the mutable per-day basket and its line items
//! - **Order converter**: the atomic basket-to-order checkout
//!
//! plus the [`Session`] context that carries the signed-in shopper and
//! their active basket id through a run.
//!
//! # Example
//!
//! ```rust,ignore
//! use parana_store::{Session, Store};
//! use parana_commerce::prelude::*;
//!
//! let mut store = Store::open("parana.db")?;
//! let mut session = Session::start(&store, ShopperId::new(1))?;
//!
//! let basket = store.add_item(
//!     session.basket(),
//!     session.shopper.id,
//!     ProductId::new(1),
//!     SellerId::new(1),
//!     2,
//! )?;
//! session.set_basket(basket);
//!
//! let snapshot = store.items(session.basket())?;
//! let placed = store.checkout(session.shopper.id, basket, &snapshot)?;
//! session.clear_basket();
//! ```

mod basket;
mod catalog;
mod db;
mod error;
mod orders;
mod schema;
mod session;

pub use db::Store;
pub use error::StoreError;
pub use orders::{OrderHistoryRow, PlacedOrder};
pub use session::Session;

#[cfg(test)]
pub(crate) mod testutil {
    use parana_commerce::{BasketId, ShopperId};
    use rusqlite::params;

    use crate::db::Store;

    pub const ALICE: ShopperId = ShopperId::new(1);

    /// In-memory store with the demo catalog loaded.
    pub fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.seed_demo().unwrap();
        store
    }

    /// Insert a basket row with an explicit creation timestamp.
    pub fn insert_basket_at(store: &Store, shopper: ShopperId, created: &str) -> BasketId {
        store
            .conn()
            .execute(
                "INSERT INTO shopper_baskets (shopper_id, basket_created_date_time)
                 VALUES (?1, ?2)",
                params![shopper.get(), created],
            )
            .unwrap();
        BasketId::new(store.conn().last_insert_rowid())
    }

    /// Row count of a table.
    pub fn table_count(store: &Store, table: &str) -> i64 {
        store
            .conn()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }
}
