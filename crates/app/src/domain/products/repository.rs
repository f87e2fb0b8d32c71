//! Products Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::{Db, StorageError, to_i64, try_get_u64},
    domain::products::{
        data::StockUpdate,
        records::{ProductRecord, ProductUuid},
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const UPDATE_PRODUCT_STOCK_SQL: &str = include_str!("sql/update_product_stock.sql");

#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Retrieve a single product.
    async fn get_by_id(&self, product: ProductUuid) -> Result<ProductRecord, StorageError>;

    /// Write a new stock level if the product is still at `expected_version`.
    ///
    /// Fails with [`StorageError::VersionConflict`] when another writer got
    /// there first.
    async fn update_stock(
        &self,
        product: ProductUuid,
        update: StockUpdate,
    ) -> Result<ProductRecord, StorageError>;
}

#[derive(Debug, Clone)]
pub struct PgProductsRepository {
    db: Db,
}

impl PgProductsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    async fn get_by_id(&self, product: ProductUuid) -> Result<ProductRecord, StorageError> {
        let record = query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(record)
    }

    async fn update_stock(
        &self,
        product: ProductUuid,
        update: StockUpdate,
    ) -> Result<ProductRecord, StorageError> {
        let stock = to_i64(update.stock, "stock")?;
        let expected_version = to_i64(update.expected_version, "version")?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(stock)
            .bind(expected_version)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            let exists = query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
                .bind(product.into_uuid())
                .fetch_optional(&mut *tx)
                .await?
                .is_some();

            return Err(if exists {
                StorageError::VersionConflict
            } else {
                StorageError::NotFound
            });
        };

        tx.commit().await?;

        Ok(updated)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            price: try_get_u64(row, "price")?,
            stock: try_get_u64(row, "stock")?,
            version: try_get_u64(row, "version")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
