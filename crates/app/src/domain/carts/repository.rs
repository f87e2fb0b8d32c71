//! Carts Repository
//!
//! Carts are stored as one row per customer with items and applied discount
//! codes kept in a JSONB document.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{Db, StorageError, to_i64},
    domain::{
        carts::records::{Cart, CartItem, CartItemUuid, CartUuid},
        customers::records::CustomerUuid,
        discounts::{
            DiscountCodeError,
            records::{DiscountCode, DiscountCodeUuid, DiscountKind, DiscountValue},
        },
        products::records::ProductRef,
    },
};

const GET_CART_BY_CUSTOMER_SQL: &str = include_str!("sql/get_cart_by_customer.sql");
const CREATE_CART_SQL: &str = include_str!("sql/create_cart.sql");
const SAVE_CART_SQL: &str = include_str!("sql/save_cart.sql");
const DELETE_CART_SQL: &str = include_str!("sql/delete_cart.sql");

#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// Retrieve the cart owned by the customer with the given email.
    async fn get_by_customer(&self, email: &str) -> Result<Cart, StorageError>;

    async fn create(&self, cart: &Cart) -> Result<Cart, StorageError>;

    /// Overwrite the stored items, discount codes and total of a cart.
    async fn save(&self, cart: &Cart) -> Result<Cart, StorageError>;

    /// Clear every item and discount code from a stored cart.
    async fn empty(&self, cart: CartUuid) -> Result<(), StorageError>;

    async fn delete(&self, cart: CartUuid) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
pub struct PgCartsRepository {
    db: Db,
}

impl PgCartsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartsRepository for PgCartsRepository {
    async fn get_by_customer(&self, email: &str) -> Result<Cart, StorageError> {
        let cart = query_as::<Postgres, Cart>(GET_CART_BY_CUSTOMER_SQL)
            .bind(email)
            .fetch_one(self.db.pool())
            .await?;

        Ok(cart)
    }

    async fn create(&self, cart: &Cart) -> Result<Cart, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.customer_uuid.into_uuid())
            .bind(&cart.customer_email)
            .bind(Json(CartDocument::from(cart)))
            .bind(to_i64(cart.total_amount(), "total_amount")?)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let saved = query_as::<Postgres, Cart>(SAVE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(Json(CartDocument::from(cart)))
            .bind(to_i64(cart.total_amount(), "total_amount")?)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn empty(&self, cart: CartUuid) -> Result<(), StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = query(SAVE_CART_SQL)
            .bind(cart.into_uuid())
            .bind(Json(CartDocument::default()))
            .bind(0i64)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn delete(&self, cart: CartUuid) -> Result<(), StorageError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = query(DELETE_CART_SQL)
            .bind(cart.into_uuid())
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

#[derive(Debug, Default, Serialize, Deserialize)]
struct CartDocument {
    items: Vec<CartItemDocument>,
    discount_codes: Vec<AppliedCodeDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CartItemDocument {
    uuid: CartItemUuid,
    product: ProductRef,
    quantity: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct AppliedCodeDocument {
    uuid: DiscountCodeUuid,
    code: String,
    kind: String,
    value: Decimal,
    expiration_date: Timestamp,
    is_active: bool,
}

impl From<&Cart> for CartDocument {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemDocument {
                    uuid: item.uuid,
                    product: item.product.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            discount_codes: cart
                .discount_codes()
                .iter()
                .map(|code| AppliedCodeDocument {
                    uuid: code.uuid,
                    code: code.code.clone(),
                    kind: code.kind().as_str().to_string(),
                    value: code.value.as_decimal(),
                    expiration_date: code.expiration_date,
                    is_active: code.is_active,
                })
                .collect(),
        }
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(document) = row.try_get::<Json<CartDocument>, _>("document")?;

        let items = document
            .items
            .into_iter()
            .map(|item| CartItem {
                uuid: item.uuid,
                product: item.product,
                quantity: item.quantity,
            })
            .collect();

        let discount_codes = document
            .discount_codes
            .into_iter()
            .map(|applied| -> Result<DiscountCode, DiscountCodeError> {
                let value = applied
                    .kind
                    .parse::<DiscountKind>()
                    .and_then(|kind| DiscountValue::new(kind, applied.value))?;

                Ok(DiscountCode {
                    uuid: applied.uuid,
                    code: applied.code,
                    value,
                    expiration_date: applied.expiration_date,
                    is_active: applied.is_active,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "document".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self::restore(
            CartUuid::from_uuid(row.try_get("uuid")?),
            CustomerUuid::from_uuid(row.try_get("customer_uuid")?),
            row.try_get("customer_email")?,
            items,
            discount_codes,
        ))
    }
}
