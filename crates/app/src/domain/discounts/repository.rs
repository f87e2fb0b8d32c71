//! Discount Codes Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query_as};

use crate::{
    database::{Db, StorageError},
    domain::discounts::records::{DiscountCode, DiscountCodeUuid, DiscountKind, DiscountValue},
};

const GET_DISCOUNT_CODE_SQL: &str = include_str!("sql/get_discount_code.sql");
const CREATE_DISCOUNT_CODE_SQL: &str = include_str!("sql/create_discount_code.sql");
const SET_DISCOUNT_CODE_ACTIVE_SQL: &str = include_str!("sql/set_discount_code_active.sql");

#[automock]
#[async_trait]
pub trait DiscountCodesRepository: Send + Sync {
    /// Look a discount code up by its unique code string.
    async fn get_by_code(&self, code: &str) -> Result<DiscountCode, StorageError>;

    async fn create(&self, code: DiscountCode) -> Result<DiscountCode, StorageError>;

    /// Switch a code on or off without touching its other fields.
    async fn set_active(&self, code: &str, active: bool) -> Result<DiscountCode, StorageError>;
}

#[derive(Debug, Clone)]
pub struct PgDiscountCodesRepository {
    db: Db,
}

impl PgDiscountCodesRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DiscountCodesRepository for PgDiscountCodesRepository {
    async fn get_by_code(&self, code: &str) -> Result<DiscountCode, StorageError> {
        let record = query_as::<Postgres, DiscountCode>(GET_DISCOUNT_CODE_SQL)
            .bind(code)
            .fetch_one(self.db.pool())
            .await?;

        Ok(record)
    }

    async fn create(&self, code: DiscountCode) -> Result<DiscountCode, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = query_as::<Postgres, DiscountCode>(CREATE_DISCOUNT_CODE_SQL)
            .bind(code.uuid.into_uuid())
            .bind(&code.code)
            .bind(code.kind().as_str())
            .bind(code.value.as_decimal())
            .bind(SqlxTimestamp::from(code.expiration_date))
            .bind(code.is_active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<DiscountCode, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = query_as::<Postgres, DiscountCode>(SET_DISCOUNT_CODE_ACTIVE_SQL)
            .bind(code)
            .bind(active)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

impl<'r> FromRow<'r, PgRow> for DiscountCode {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;
        let value: Decimal = row.try_get("value")?;

        let value = kind
            .parse::<DiscountKind>()
            .and_then(|kind| DiscountValue::new(kind, value))
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "value".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: DiscountCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            value,
            expiration_date: row
                .try_get::<SqlxTimestamp, _>("expiration_date")?
                .to_jiff(),
            is_active: row.try_get("is_active")?,
        })
    }
}
