//! Orders Repository

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{Db, StorageError},
    domain::orders::records::{Order, OrderUuid, Payment},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_BY_CUSTOMER_SQL: &str = include_str!("sql/list_orders_by_customer.sql");
const UPDATE_ORDER_PAYMENT_SQL: &str = include_str!("sql/update_order_payment.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    async fn create(&self, order: &Order) -> Result<Order, StorageError>;

    async fn get(&self, order: OrderUuid) -> Result<Order, StorageError>;

    /// Orders placed by the customer with the given email, oldest first.
    async fn list_by_customer(&self, email: &str) -> Result<Vec<Order>, StorageError>;

    async fn update_payment(
        &self,
        order: OrderUuid,
        payment: &Payment,
    ) -> Result<Order, StorageError>;

    async fn delete(&self, order: OrderUuid) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    db: Db,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn create(&self, order: &Order) -> Result<Order, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(&order.customer.email)
            .bind(order.payment.status.as_str())
            .bind(Json(order))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get(&self, order: OrderUuid) -> Result<Order, StorageError> {
        let order = query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(order)
    }

    async fn list_by_customer(&self, email: &str) -> Result<Vec<Order>, StorageError> {
        let orders = query_as::<Postgres, Order>(LIST_ORDERS_BY_CUSTOMER_SQL)
            .bind(email)
            .fetch_all(self.db.pool())
            .await?;

        Ok(orders)
    }

    async fn update_payment(
        &self,
        order: OrderUuid,
        payment: &Payment,
    ) -> Result<Order, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = query_as::<Postgres, Order>(UPDATE_ORDER_PAYMENT_SQL)
            .bind(order.into_uuid())
            .bind(Json(payment))
            .bind(payment.status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete(&self, order: OrderUuid) -> Result<(), StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
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

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(order) = row.try_get::<Json<Self>, _>("document")?;

        Ok(order)
    }
}
