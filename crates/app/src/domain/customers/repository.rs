//! Customers Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};

use crate::{
    database::{Db, StorageError},
    domain::customers::records::{CustomerRecord, CustomerUuid},
};

const GET_CUSTOMER_SQL: &str = include_str!("sql/get_customer.sql");
const CREATE_CUSTOMER_SQL: &str = include_str!("sql/create_customer.sql");
const DELETE_CUSTOMER_SQL: &str = include_str!("sql/delete_customer.sql");

#[automock]
#[async_trait]
pub trait CustomersRepository: Send + Sync {
    async fn get_by_email(&self, email: &str) -> Result<CustomerRecord, StorageError>;

    async fn create(&self, customer: &CustomerRecord) -> Result<CustomerRecord, StorageError>;

    async fn delete(&self, email: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct PgCustomersRepository {
    db: Db,
}

impl PgCustomersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomersRepository for PgCustomersRepository {
    async fn get_by_email(&self, email: &str) -> Result<CustomerRecord, StorageError> {
        let record = query_as::<Postgres, CustomerRecord>(GET_CUSTOMER_SQL)
            .bind(email)
            .fetch_one(self.db.pool())
            .await?;

        Ok(record)
    }

    async fn create(&self, customer: &CustomerRecord) -> Result<CustomerRecord, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = query_as::<Postgres, CustomerRecord>(CREATE_CUSTOMER_SQL)
            .bind(customer.uuid.into_uuid())
            .bind(&customer.email)
            .bind(&customer.name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete(&self, email: &str) -> Result<(), StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = query(DELETE_CUSTOMER_SQL)
            .bind(email)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for CustomerRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CustomerUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
