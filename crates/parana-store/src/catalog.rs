//! Catalog lookup: read-only category, product, and offer queries.

use parana_commerce::catalog::{Category, Product, ProductStatus, SellerOffer};
use parana_commerce::{CategoryId, CommerceError, Money, ProductId, SellerId};

use crate::db::Store;
use crate::error::StoreError;

impl Store {
    /// All categories, ordered for display.
    pub fn categories(&self) -> Result<Vec<Category>, CommerceError> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT category_id, category_description
                 FROM categories
                 ORDER BY category_description",
            )
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: CategoryId::new(row.get(0)?),
                    description: row.get(1)?,
                })
            })
            .map_err(StoreError::from)?;
        let categories = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)?;
        Ok(categories)
    }

    /// Products in a category that are flagged available.
    pub fn available_products(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Product>, CommerceError> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT product_id, category_id, product_description, product_status
                 FROM products
                 WHERE category_id = ?1 AND product_status = 'available'
                 ORDER BY product_description",
            )
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map([category.get()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(StoreError::from)?;

        let mut products = Vec::new();
        for row in rows {
            let (id, category_id, description, status) = row.map_err(StoreError::from)?;
            let status = ProductStatus::from_str(&status).ok_or_else(|| {
                StoreError::CorruptRow(format!("unknown product status '{status}'"))
            })?;
            products.push(Product {
                id: ProductId::new(id),
                category_id: CategoryId::new(category_id),
                description,
                status,
            });
        }
        Ok(products)
    }

    /// Current seller offers for a product, with seller display names.
    pub fn seller_offers(&self, product: ProductId) -> Result<Vec<SellerOffer>, CommerceError> {
        let mut stmt = self
            .conn()
            .prepare(
                "SELECT ps.product_id, ps.seller_id, s.seller_name, ps.price
                 FROM product_sellers ps
                 JOIN sellers s ON s.seller_id = ps.seller_id
                 WHERE ps.product_id = ?1
                 ORDER BY s.seller_name",
            )
            .map_err(StoreError::from)?;
        let rows = stmt
            .query_map([product.get()], |row| {
                Ok(SellerOffer {
                    product_id: ProductId::new(row.get(0)?),
                    seller_id: SellerId::new(row.get(1)?),
                    seller_name: row.get(2)?,
                    price: Money::from_pence(row.get(3)?),
                })
            })
            .map_err(StoreError::from)?;
        let offers = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)?;
        Ok(offers)
    }

    /// The current price a seller asks for a product, if any offer exists.
    pub fn offer_price(
        &self,
        product: ProductId,
        seller: SellerId,
    ) -> Result<Option<Money>, CommerceError> {
        use rusqlite::OptionalExtension;

        let pence: Option<i64> = self
            .conn()
            .query_row(
                "SELECT price FROM product_sellers WHERE product_id = ?1 AND seller_id = ?2",
                [product.get(), seller.get()],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;
        Ok(pence.map(Money::from_pence))
    }
}
