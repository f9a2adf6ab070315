//! Order converter: the atomic basket-to-order checkout, plus order
//! history reads.

use chrono::{Local, NaiveDate};
use rusqlite::{params, Transaction};
use tracing::{error, info};

use parana_commerce::basket::BasketView;
use parana_commerce::checkout::{Order, OrderLine, OrderStatus};
use parana_commerce::{BasketId, CommerceError, Money, OrderId, ShopperId};

use crate::db::Store;
use crate::error::StoreError;

/// The result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// The order row as written.
    pub order: Order,
    /// One line per basket line in the converted snapshot.
    pub lines: Vec<OrderLine>,
    /// Order total, equal to the snapshot's basket total.
    pub total: Money,
}

/// One row of a shopper's order history, newest orders first.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHistoryRow {
    pub order_id: OrderId,
    pub order_date: NaiveDate,
    pub product: String,
    pub seller: String,
    pub price: Money,
    pub quantity: i64,
    pub status: OrderStatus,
}

impl Store {
    /// Convert the previewed basket snapshot into an order.
    ///
    /// The five writes (order insert, N line inserts, basket-line delete,
    /// basket delete) run as one transaction: either the order exists
    /// with all its lines and the basket is gone, or nothing changed.
    /// Prices are copied from the snapshot, not re-read from the catalog.
    pub fn checkout(
        &mut self,
        shopper: ShopperId,
        basket: BasketId,
        snapshot: &BasketView,
    ) -> Result<PlacedOrder, CommerceError> {
        if snapshot.is_empty() {
            return Err(CommerceError::EmptyBasket);
        }
        let total = snapshot.total()?;
        let order_date = Local::now().date_naive();

        let tx = self
            .conn_mut()
            .transaction()
            .map_err(CommerceError::checkout)?;
        let placed = match convert_basket(&tx, shopper, basket, order_date, snapshot) {
            Ok(placed) => placed,
            Err(e) => {
                // Dropping the uncommitted transaction rolls everything back.
                error!(basket = %basket, %e, "checkout failed, rolling back");
                return Err(CommerceError::checkout(e));
            }
        };
        tx.commit().map_err(CommerceError::checkout)?;

        info!(
            order = %placed.order.id,
            basket = %basket,
            lines = placed.lines.len(),
            total = %total,
            "order placed"
        );
        Ok(PlacedOrder {
            order: placed.order,
            lines: placed.lines,
            total,
        })
    }

    /// All orders ever placed by the shopper, one row per order line,
    /// newest orders first.
    pub fn history(&self, shopper: ShopperId) -> Result<Vec<OrderHistoryRow>, CommerceError> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT o.order_id, o.order_date, p.product_description, s.seller_name,
                        op.price, op.quantity, op.ordered_product_status
                 FROM shopper_orders o
                 JOIN ordered_products op ON op.order_id = o.order_id
                 JOIN products p ON p.product_id = op.product_id
                 JOIN sellers s ON s.seller_id = op.seller_id
                 WHERE o.shopper_id = ?1
                 ORDER BY o.order_date DESC, o.order_id DESC, p.product_description",
            )
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map([shopper.get()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })
            .map_err(StoreError::from)?;

        let mut history = Vec::new();
        for row in rows {
            let (order_id, date, product, seller, pence, quantity, status) =
                row.map_err(StoreError::from)?;
            let order_date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| {
                StoreError::CorruptRow(format!("bad order date '{date}': {e}"))
            })?;
            let status = OrderStatus::from_str(&status).ok_or_else(|| {
                StoreError::CorruptRow(format!("unknown order status '{status}'"))
            })?;
            history.push(OrderHistoryRow {
                order_id: OrderId::new(order_id),
                order_date,
                product,
                seller,
                price: Money::from_pence(pence),
                quantity,
                status,
            });
        }
        Ok(history)
    }
}

struct ConvertedBasket {
    order: Order,
    lines: Vec<OrderLine>,
}

/// The commit sequence. Runs entirely inside the caller's transaction;
/// a failure at any step leaves the transaction poised to roll back.
fn convert_basket(
    tx: &Transaction<'_>,
    shopper: ShopperId,
    basket: BasketId,
    order_date: NaiveDate,
    snapshot: &BasketView,
) -> rusqlite::Result<ConvertedBasket> {
    tx.execute(
        "INSERT INTO shopper_orders (shopper_id, order_date, order_status)
         VALUES (?1, ?2, ?3)",
        params![
            shopper.get(),
            order_date.to_string(),
            OrderStatus::Placed.as_str()
        ],
    )?;
    let order_id = OrderId::new(tx.last_insert_rowid());

    let mut lines = Vec::with_capacity(snapshot.len());
    {
        let mut stmt = tx.prepare(
            "INSERT INTO ordered_products
                 (order_id, product_id, seller_id, quantity, price, ordered_product_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for item in &snapshot.items {
            stmt.execute(params![
                order_id.get(),
                item.product_id.get(),
                item.seller_id.get(),
                item.quantity,
                item.unit_price.pence(),
                OrderStatus::Placed.as_str()
            ])?;
            lines.push(OrderLine {
                order_id,
                product_id: item.product_id,
                seller_id: item.seller_id,
                quantity: item.quantity,
                price: item.unit_price,
                status: OrderStatus::Placed,
            });
        }
    }

    tx.execute(
        "DELETE FROM basket_contents WHERE basket_id = ?1",
        [basket.get()],
    )?;
    tx.execute(
        "DELETE FROM shopper_baskets WHERE basket_id = ?1",
        [basket.get()],
    )?;

    Ok(ConvertedBasket {
        order: Order {
            id: order_id,
            shopper_id: shopper,
            order_date,
            status: OrderStatus::Placed,
        },
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seeded_store, table_count, ALICE};
    use parana_commerce::basket::BasketItemView;
    use parana_commerce::{ProductId, SellerId};

    fn filled_basket(store: &Store) -> BasketId {
        let basket = store
            .add_item(None, ALICE, ProductId::new(1), SellerId::new(1), 2)
            .unwrap();
        store
            .add_item(Some(basket), ALICE, ProductId::new(3), SellerId::new(2), 1)
            .unwrap();
        basket
    }

    #[test]
    fn test_checkout_converts_snapshot_exactly() {
        let mut store = seeded_store();
        let basket = filled_basket(&store);
        let snapshot = store.items(Some(basket)).unwrap();

        let placed = store.checkout(ALICE, basket, &snapshot).unwrap();

        assert_eq!(placed.order.shopper_id, ALICE);
        assert_eq!(placed.order.status, OrderStatus::Placed);
        assert_eq!(placed.lines.len(), 2);
        assert_eq!(placed.total, Money::from_pence(2 * 500 + 799));

        // Exactly one order, N lines, zero basket rows remain.
        assert_eq!(table_count(&store, "shopper_orders"), 1);
        assert_eq!(table_count(&store, "ordered_products"), 2);
        assert_eq!(table_count(&store, "basket_contents"), 0);
        assert_eq!(table_count(&store, "shopper_baskets"), 0);
        assert_eq!(store.current_basket(ALICE).unwrap(), None);

        // The line multiset equals the snapshot multiset.
        let mut expected: Vec<(i64, i64, i64, i64)> = snapshot
            .items
            .iter()
            .map(|i| {
                (
                    i.product_id.get(),
                    i.seller_id.get(),
                    i.quantity,
                    i.unit_price.pence(),
                )
            })
            .collect();
        let mut actual: Vec<(i64, i64, i64, i64)> = placed
            .lines
            .iter()
            .map(|l| (l.product_id.get(), l.seller_id.get(), l.quantity, l.price.pence()))
            .collect();
        expected.sort_unstable();
        actual.sort_unstable();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_checkout_empty_basket_writes_nothing() {
        let mut store = seeded_store();
        let err = store
            .checkout(ALICE, BasketId::new(42), &BasketView::default())
            .unwrap_err();
        assert!(matches!(err, CommerceError::EmptyBasket));
        assert_eq!(table_count(&store, "shopper_orders"), 0);
        assert_eq!(table_count(&store, "ordered_products"), 0);
    }

    #[test]
    fn test_checkout_rolls_back_on_line_failure() {
        let mut store = seeded_store();
        let basket = filled_basket(&store);
        let mut snapshot = store.items(Some(basket)).unwrap();

        // Poison the snapshot: a product id that violates the order-line
        // foreign key, failing the sequence after the order insert and
        // the first line insert.
        snapshot.items.push(BasketItemView {
            product_id: ProductId::new(9999),
            seller_id: SellerId::new(1),
            product: "Ghost".into(),
            seller: "Riverside Retail".into(),
            quantity: 1,
            unit_price: Money::from_pence(100),
            line_total: Money::from_pence(100),
        });

        let err = store.checkout(ALICE, basket, &snapshot).unwrap_err();
        assert!(matches!(err, CommerceError::CheckoutFailed(_)));

        // Post-failure state equals pre-attempt state exactly.
        assert_eq!(table_count(&store, "shopper_orders"), 0);
        assert_eq!(table_count(&store, "ordered_products"), 0);
        assert_eq!(table_count(&store, "basket_contents"), 2);
        assert_eq!(store.current_basket(ALICE).unwrap(), Some(basket));
        let after = store.items(Some(basket)).unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after.total().unwrap(), Money::from_pence(2 * 500 + 799));
    }

    #[test]
    fn test_uncommitted_conversion_rolls_back() {
        // Simulates a crash after every write in the sequence has run
        // but before the transaction commits.
        let mut store = seeded_store();
        let basket = filled_basket(&store);
        let snapshot = store.items(Some(basket)).unwrap();
        let date = chrono::Local::now().date_naive();

        {
            let tx = store.conn_mut().transaction().unwrap();
            let converted = convert_basket(&tx, ALICE, basket, date, &snapshot).unwrap();
            assert_eq!(converted.lines.len(), 2);

            // Inside the transaction the writes are visible.
            let n: i64 = tx
                .query_row("SELECT COUNT(*) FROM ordered_products", [], |row| row.get(0))
                .unwrap();
            assert_eq!(n, 2);
            // Dropped without commit.
        }

        assert_eq!(table_count(&store, "shopper_orders"), 0);
        assert_eq!(table_count(&store, "ordered_products"), 0);
        assert_eq!(table_count(&store, "basket_contents"), 2);
        assert_eq!(store.current_basket(ALICE).unwrap(), Some(basket));
    }

    #[test]
    fn test_checkout_then_retry_succeeds() {
        let mut store = seeded_store();
        let basket = filled_basket(&store);
        let snapshot = store.items(Some(basket)).unwrap();

        let mut poisoned = snapshot.clone();
        poisoned.items[0].product_id = ProductId::new(9999);
        assert!(store.checkout(ALICE, basket, &poisoned).is_err());

        // A fresh user-initiated attempt with the intact snapshot works.
        let placed = store.checkout(ALICE, basket, &snapshot).unwrap();
        assert_eq!(placed.lines.len(), 2);
        assert_eq!(table_count(&store, "shopper_orders"), 1);
    }

    #[test]
    fn test_history_newest_first() {
        let mut store = seeded_store();

        let first = filled_basket(&store);
        let snapshot = store.items(Some(first)).unwrap();
        let placed_first = store.checkout(ALICE, first, &snapshot).unwrap();

        let second = store
            .add_item(None, ALICE, ProductId::new(2), SellerId::new(1), 1)
            .unwrap();
        let snapshot = store.items(Some(second)).unwrap();
        let placed_second = store.checkout(ALICE, second, &snapshot).unwrap();

        let history = store.history(ALICE).unwrap();
        assert_eq!(history.len(), 3);
        // Same order date; the later order id sorts first.
        assert_eq!(history[0].order_id, placed_second.order.id);
        assert_eq!(history[0].product, "Pocket World Atlas");
        assert_eq!(history[0].price, Money::from_pence(1299));
        assert_eq!(history[0].status, OrderStatus::Placed);
        assert!(history[1..]
            .iter()
            .all(|row| row.order_id == placed_first.order.id));

        // Another shopper sees nothing.
        assert!(store.history(ShopperId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Add qty 2 @ £5.00, update to 3, checkout with confirmation.
        let mut store = seeded_store();
        let basket = store
            .add_item(None, ALICE, ProductId::new(1), SellerId::new(1), 2)
            .unwrap();
        assert_eq!(
            store.items(Some(basket)).unwrap().total().unwrap(),
            Money::from_pence(1000)
        );

        store
            .update_quantity(basket, ProductId::new(1), SellerId::new(1), 3)
            .unwrap();
        let snapshot = store.items(Some(basket)).unwrap();
        assert_eq!(snapshot.total().unwrap(), Money::from_pence(1500));

        let placed = store.checkout(ALICE, basket, &snapshot).unwrap();
        assert_eq!(placed.lines.len(), 1);
        let line = &placed.lines[0];
        assert_eq!(line.product_id, ProductId::new(1));
        assert_eq!(line.seller_id, SellerId::new(1));
        assert_eq!(line.quantity, 3);
        assert_eq!(line.price, Money::from_pence(500));
        assert_eq!(line.status, OrderStatus::Placed);

        // The basket for that day no longer exists.
        assert_eq!(store.current_basket(ALICE).unwrap(), None);
        assert!(store.basket(basket).unwrap().is_none());
    }
}
