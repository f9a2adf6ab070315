//! Database schema creation and demo fixtures.

use rusqlite::Connection;

use crate::error::StoreError;

/// Create all tables and indexes. Idempotent.
///
/// Prices are INTEGER pence throughout. Baskets own their contents
/// (cascade delete); order lines reference an existing order, product,
/// and seller.
pub fn create_tables(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS shoppers (
            shopper_id INTEGER PRIMARY KEY,
            shopper_first_name TEXT NOT NULL,
            shopper_surname TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            category_id INTEGER PRIMARY KEY,
            category_description TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS products (
            product_id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL REFERENCES categories (category_id),
            product_description TEXT NOT NULL,
            product_status TEXT NOT NULL DEFAULT 'available'
        );

        CREATE TABLE IF NOT EXISTS sellers (
            seller_id INTEGER PRIMARY KEY,
            seller_name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS product_sellers (
            product_id INTEGER NOT NULL REFERENCES products (product_id),
            seller_id INTEGER NOT NULL REFERENCES sellers (seller_id),
            price INTEGER NOT NULL,
            PRIMARY KEY (product_id, seller_id)
        );

        CREATE TABLE IF NOT EXISTS shopper_baskets (
            basket_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shopper_id INTEGER NOT NULL REFERENCES shoppers (shopper_id),
            basket_created_date_time TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS basket_contents (
            basket_id INTEGER NOT NULL
                REFERENCES shopper_baskets (basket_id) ON DELETE CASCADE,
            product_id INTEGER NOT NULL REFERENCES products (product_id),
            seller_id INTEGER NOT NULL REFERENCES sellers (seller_id),
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            price INTEGER NOT NULL,
            PRIMARY KEY (basket_id, product_id, seller_id)
        );

        CREATE TABLE IF NOT EXISTS shopper_orders (
            order_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shopper_id INTEGER NOT NULL REFERENCES shoppers (shopper_id),
            order_date TEXT NOT NULL,
            order_status TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS ordered_products (
            order_id INTEGER NOT NULL REFERENCES shopper_orders (order_id),
            product_id INTEGER NOT NULL REFERENCES products (product_id),
            seller_id INTEGER NOT NULL REFERENCES sellers (seller_id),
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            price INTEGER NOT NULL,
            ordered_product_status TEXT NOT NULL,
            PRIMARY KEY (order_id, product_id, seller_id)
        );

        CREATE INDEX IF NOT EXISTS idx_products_category
            ON products (category_id);
        CREATE INDEX IF NOT EXISTS idx_baskets_shopper_created
            ON shopper_baskets (shopper_id, basket_created_date_time DESC);
        CREATE INDEX IF NOT EXISTS idx_orders_shopper_date
            ON shopper_orders (shopper_id, order_date DESC);",
    )?;
    Ok(())
}

/// Seed a small demo catalog and two shoppers. Idempotent.
pub fn seed_demo(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "INSERT OR IGNORE INTO shoppers (shopper_id, shopper_first_name, shopper_surname) VALUES
            (1, 'Alice', 'Hargreaves'),
            (2, 'Ben', 'Okafor');

        INSERT OR IGNORE INTO categories (category_id, category_description) VALUES
            (1, 'Books'),
            (2, 'Electronics');

        INSERT OR IGNORE INTO products
            (product_id, category_id, product_description, product_status) VALUES
            (1, 1, 'The Silent Patient', 'available'),
            (2, 1, 'Pocket World Atlas', 'available'),
            (3, 2, 'Wireless Mouse', 'available'),
            (4, 2, 'VGA Webcam', 'unavailable');

        INSERT OR IGNORE INTO sellers (seller_id, seller_name) VALUES
            (1, 'Riverside Retail'),
            (2, 'Harbour Traders');

        INSERT OR IGNORE INTO product_sellers (product_id, seller_id, price) VALUES
            (1, 1, 500),
            (1, 2, 550),
            (2, 1, 1299),
            (3, 1, 849),
            (3, 2, 799);",
    )?;
    Ok(())
}
