//! Session context: the signed-in shopper and their active basket.
//!
//! An explicit value threaded through every caller, resolved once at
//! session start. Basket Store operations return the basket id they
//! acted on; the session records it here rather than in global state.

use rusqlite::OptionalExtension;
use tracing::info;

use parana_commerce::shopper::Shopper;
use parana_commerce::{BasketId, CommerceError, ShopperId};

use crate::db::Store;
use crate::error::StoreError;

/// One shopper's interactive session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The authenticated shopper.
    pub shopper: Shopper,
    basket: Option<BasketId>,
}

impl Session {
    /// Start a session for a shopper id.
    ///
    /// Fails with [`CommerceError::ShopperNotFound`] if the id does not
    /// match a known shopper; that failure is fatal to the session.
    /// Resolves today's basket, if any, as the active basket.
    pub fn start(store: &Store, shopper_id: ShopperId) -> Result<Self, CommerceError> {
        let shopper = store.shopper(shopper_id)?;
        let basket = store.current_basket(shopper.id)?;
        info!(shopper = %shopper.id, basket = ?basket, "session started");
        Ok(Self { shopper, basket })
    }

    /// The active basket id, if one is held.
    pub fn basket(&self) -> Option<BasketId> {
        self.basket
    }

    /// Record the basket id returned by a Basket Store mutation.
    pub fn set_basket(&mut self, basket: BasketId) {
        self.basket = Some(basket);
    }

    /// Drop the basket reference (after a successful checkout).
    pub fn clear_basket(&mut self) {
        self.basket = None;
    }

    /// Drop the basket reference if the stored basket has emptied.
    /// Called after removals so the session does not hold on to an
    /// exhausted basket.
    pub fn refresh(&mut self, store: &Store) -> Result<(), CommerceError> {
        if store.is_empty(self.basket)? {
            self.basket = None;
        }
        Ok(())
    }
}

impl Store {
    /// Look up a shopper by id.
    pub fn shopper(&self, id: ShopperId) -> Result<Shopper, CommerceError> {
        let row: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT shopper_first_name, shopper_surname
                 FROM shoppers
                 WHERE shopper_id = ?1",
                [id.get()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(StoreError::from)?;
        match row {
            Some((first_name, surname)) => Ok(Shopper {
                id,
                first_name,
                surname,
            }),
            None => Err(CommerceError::ShopperNotFound(id)),
        }
    }
}
