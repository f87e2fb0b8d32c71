//! Database test utilities and shared infrastructure

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool, Postgres, query_as};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

use crate::{
    database::Db,
    domain::products::records::{ProductRecord, ProductUuid},
};

const DB_USER: &str = "storefront_test";
const DB_PASSWORD: &str = "storefront_test_password";

/// Check a generated database name before it is spliced into DDL.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("Database name must be 1-63 characters long".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err("Database name must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Database name can only contain letters, digits and underscores".to_string());
    }

    Ok(())
}

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(DB_USER)
        .with_password(DB_PASSWORD)
        .with_db_name("storefront_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

/// One container shared by every database-backed test.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped.
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            if let Err(err) = cleanup_database(&db_name).await {
                eprintln!("Failed to cleanup database '{db_name}': {err}");
            }
        }
    });

    sender
}

async fn server_url(database: &str) -> Option<String> {
    let container = POSTGRES_CONTAINER.get()?;
    let port = container.get_host_port_ipv4(5432).await.ok()?;
    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    Some(format!(
        "postgresql://{DB_USER}:{DB_PASSWORD}@{host}:{port}/{database}"
    ))
}

async fn cleanup_database(db_name: &str) -> Result<(), sqlx::Error> {
    if validate_database_name(db_name).is_err() {
        return Ok(());
    }

    if let Some(url) = server_url("postgres").await {
        let mut conn = PgConnection::connect(&url).await?;

        sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\""))
            .execute(&mut conn)
            .await?;

        conn.close().await?;
    }

    Ok(())
}

/// A freshly migrated database inside the shared container.
///
/// Every test gets its own database, so repositories commit normally and
/// nothing leaks between tests. The database is dropped in the background
/// once the `TestDb` goes out of scope.
#[derive(Debug)]
pub(crate) struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub(crate) async fn new() -> Self {
        let name = format!("storefront_test_{}", Uuid::now_v7().simple());

        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;
        POSTGRES_CONTAINER
            .get_or_init(init_postgres_container)
            .await;

        if let Err(error) = validate_database_name(&name) {
            panic!("Invalid database name '{name}': {error}");
        }

        let admin_url = server_url("postgres")
            .await
            .expect("Failed to resolve container address");

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let database_url = server_url(&name)
            .await
            .expect("Failed to resolve container address");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to create pool for database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self { pool, name }
    }

    pub(crate) fn db(&self) -> Db {
        Db::new(self.pool.clone())
    }

    /// Insert a catalog row directly; the app itself never creates products.
    pub(crate) async fn insert_product(&self, name: &str, price: i64, stock: i64) -> ProductRecord {
        query_as::<Postgres, ProductRecord>(
            "INSERT INTO products (uuid, name, price, stock)
             VALUES ($1, $2, $3, $4)
             RETURNING uuid, name, price, stock, version, created_at, updated_at",
        )
        .bind(ProductUuid::new().into_uuid())
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to insert product")
    }

    /// Soft-delete a product the way catalog maintenance would.
    pub(crate) async fn retire_product(&self, product: ProductUuid) {
        sqlx::query("UPDATE products SET deleted_at = now() WHERE uuid = $1")
            .bind(product.into_uuid())
            .execute(&self.pool)
            .await
            .expect("Failed to retire product");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_valid() {
        let name = format!("storefront_test_{}", Uuid::now_v7().simple());

        assert!(validate_database_name(&name).is_ok());
    }

    #[test]
    fn unsafe_names_are_rejected() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name("1starts_with_digit").is_err());
        assert!(validate_database_name("has-hyphen").is_err());
        assert!(validate_database_name("quote\"d").is_err());
    }

    #[tokio::test]
    async fn migrated_database_accepts_queries() {
        let test_db = TestDb::new().await;

        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&test_db.pool)
            .await
            .expect("Failed to count products");

        assert_eq!(products, 0);
    }
}
