//! Basket store: the mutable per-day basket and its line items.

use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use parana_commerce::basket::{check_quantity, Basket, BasketItemView, BasketLine, BasketView};
use parana_commerce::{BasketId, CommerceError, Money, ProductId, SellerId, ShopperId};

use crate::db::Store;
use crate::error::StoreError;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Store {
    /// The shopper's current basket: the most recently created basket
    /// whose creation timestamp falls on today's calendar day.
    pub fn current_basket(&self, shopper: ShopperId) -> Result<Option<BasketId>, CommerceError> {
        self.current_basket_on(shopper, Local::now().date_naive())
    }

    /// Same as [`Store::current_basket`] for an explicit calendar day.
    /// If more than one basket exists for the day, the newest wins.
    pub fn current_basket_on(
        &self,
        shopper: ShopperId,
        day: NaiveDate,
    ) -> Result<Option<BasketId>, CommerceError> {
        let id: Option<i64> = self
            .conn()
            .query_row(
                "SELECT basket_id
                 FROM shopper_baskets
                 WHERE shopper_id = ?1
                   AND DATE(basket_created_date_time) = ?2
                 ORDER BY basket_created_date_time DESC, basket_id DESC
                 LIMIT 1",
                params![shopper.get(), day.to_string()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(id.map(BasketId::new))
    }

    /// Read a basket row.
    pub fn basket(&self, basket: BasketId) -> Result<Option<Basket>, CommerceError> {
        let row: Option<(i64, i64, String)> = self
            .conn()
            .query_row(
                "SELECT basket_id, shopper_id, basket_created_date_time
                 FROM shopper_baskets
                 WHERE basket_id = ?1",
                [basket.get()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(StoreError::from)?;

        match row {
            None => Ok(None),
            Some((id, shopper_id, created)) => {
                let created_at = NaiveDateTime::parse_from_str(&created, DATETIME_FORMAT)
                    .map_err(|e| {
                        StoreError::CorruptRow(format!("bad basket timestamp '{created}': {e}"))
                    })?;
                Ok(Some(Basket {
                    id: BasketId::new(id),
                    shopper_id: ShopperId::new(shopper_id),
                    created_at,
                }))
            }
        }
    }

    /// Add an item to the shopper's basket, creating the basket first if
    /// none is supplied.
    ///
    /// The unit price is resolved from the seller's current offer, never
    /// taken from the caller. Adding a `(product, seller)` pair already
    /// in the basket adds to its quantity and keeps the price captured
    /// at first add.
    ///
    /// Returns the basket id so the caller's session stays current.
    pub fn add_item(
        &self,
        basket: Option<BasketId>,
        shopper: ShopperId,
        product: ProductId,
        seller: SellerId,
        quantity: i64,
    ) -> Result<BasketId, CommerceError> {
        check_quantity(quantity)?;
        let price = self
            .offer_price(product, seller)?
            .ok_or(CommerceError::PriceNotFound {
                product_id: product,
                seller_id: seller,
            })?;

        let basket_id = match basket {
            Some(id) => id,
            None => self.create_basket(shopper)?,
        };

        self.conn()
            .execute(
                "INSERT INTO basket_contents (basket_id, product_id, seller_id, quantity, price)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (basket_id, product_id, seller_id)
                 DO UPDATE SET quantity = quantity + excluded.quantity",
                params![
                    basket_id.get(),
                    product.get(),
                    seller.get(),
                    quantity,
                    price.pence()
                ],
            )
            .map_err(StoreError::from)?;

        info!(
            basket = %basket_id,
            product = %product,
            seller = %seller,
            quantity,
            price = %price,
            "item added to basket"
        );
        Ok(basket_id)
    }

    fn create_basket(&self, shopper: ShopperId) -> Result<BasketId, CommerceError> {
        let created = Local::now().naive_local().format(DATETIME_FORMAT).to_string();
        self.conn()
            .execute(
                "INSERT INTO shopper_baskets (shopper_id, basket_created_date_time)
                 VALUES (?1, ?2)",
                params![shopper.get(), created],
            )
            .map_err(StoreError::from)?;
        let basket_id = BasketId::new(self.conn().last_insert_rowid());
        info!(basket = %basket_id, shopper = %shopper, "basket created");
        Ok(basket_id)
    }

    /// The canonical "view basket" read: every line with joined display
    /// names and computed line totals, in one consistent query.
    ///
    /// An absent basket id, or a basket with no lines, yields an empty
    /// view.
    pub fn items(&self, basket: Option<BasketId>) -> Result<BasketView, CommerceError> {
        let Some(basket) = basket else {
            return Ok(BasketView::default());
        };

        let mut stmt = self
            .conn()
            .prepare(
                "SELECT bc.product_id, bc.seller_id, p.product_description,
                        s.seller_name, bc.quantity, bc.price
                 FROM basket_contents bc
                 JOIN products p ON p.product_id = bc.product_id
                 JOIN sellers s ON s.seller_id = bc.seller_id
                 WHERE bc.basket_id = ?1
                 ORDER BY p.product_description, s.seller_name",
            )
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map([basket.get()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })
            .map_err(StoreError::from)?;

        let mut items = Vec::new();
        for row in rows {
            let (product_id, seller_id, product, seller, quantity, pence) =
                row.map_err(StoreError::from)?;
            let unit_price = Money::from_pence(pence);
            let line_total = unit_price
                .try_multiply(quantity)
                .ok_or(CommerceError::Overflow)?;
            items.push(BasketItemView {
                product_id: ProductId::new(product_id),
                seller_id: SellerId::new(seller_id),
                product,
                seller,
                quantity,
                unit_price,
                line_total,
            });
        }
        debug!(basket = %basket, lines = items.len(), "basket read");
        Ok(BasketView { items })
    }

    /// Read a single line by its identity key.
    pub fn line(
        &self,
        basket: BasketId,
        product: ProductId,
        seller: SellerId,
    ) -> Result<Option<BasketLine>, CommerceError> {
        let row: Option<(i64, i64)> = self
            .conn()
            .query_row(
                "SELECT quantity, price
                 FROM basket_contents
                 WHERE basket_id = ?1 AND product_id = ?2 AND seller_id = ?3",
                [basket.get(), product.get(), seller.get()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(row.map(|(quantity, pence)| BasketLine {
            basket_id: basket,
            product_id: product,
            seller_id: seller,
            quantity,
            unit_price: Money::from_pence(pence),
        }))
    }

    /// Overwrite a line's quantity. The captured unit price is untouched.
    pub fn update_quantity(
        &self,
        basket: BasketId,
        product: ProductId,
        seller: SellerId,
        new_quantity: i64,
    ) -> Result<(), CommerceError> {
        check_quantity(new_quantity)?;
        let changed = self
            .conn()
            .execute(
                "UPDATE basket_contents
                 SET quantity = ?4
                 WHERE basket_id = ?1 AND product_id = ?2 AND seller_id = ?3",
                params![basket.get(), product.get(), seller.get(), new_quantity],
            )
            .map_err(StoreError::from)?;
        if changed == 0 {
            return Err(CommerceError::ItemNotFound {
                product_id: product,
                seller_id: seller,
            });
        }
        info!(basket = %basket, product = %product, seller = %seller, new_quantity, "quantity updated");
        Ok(())
    }

    /// Delete a line. The caller gates this behind explicit confirmation.
    pub fn remove_item(
        &self,
        basket: BasketId,
        product: ProductId,
        seller: SellerId,
    ) -> Result<(), CommerceError> {
        let changed = self
            .conn()
            .execute(
                "DELETE FROM basket_contents
                 WHERE basket_id = ?1 AND product_id = ?2 AND seller_id = ?3",
                [basket.get(), product.get(), seller.get()],
            )
            .map_err(StoreError::from)?;
        if changed == 0 {
            return Err(CommerceError::ItemNotFound {
                product_id: product,
                seller_id: seller,
            });
        }
        info!(basket = %basket, product = %product, seller = %seller, "item removed");
        Ok(())
    }

    /// True when no basket id is held or the basket has zero lines.
    pub fn is_empty(&self, basket: Option<BasketId>) -> Result<bool, CommerceError> {
        let Some(basket) = basket else {
            return Ok(true);
        };
        let n: i64 = self
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM basket_contents WHERE basket_id = ?1",
                [basket.get()],
                |row| row.get(0),
            )
            .map_err(StoreError::from)?;
        Ok(n == 0)
    }
}
