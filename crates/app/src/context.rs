//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::CheckoutConfig,
    database::{self, Db},
    domain::{
        carts::{AppCartsService, CartsRepository, CartsService, PgCartsRepository},
        customers::{
            AppCustomersService, CustomersRepository, CustomersService, PgCustomersRepository,
        },
        discounts::{
            AppDiscountCodesService, DiscountCodesRepository, DiscountCodesService,
            PgDiscountCodesRepository,
        },
        orders::{
            AppOrdersService, DriftReporter, OrderPlacement, OrdersRepository, OrdersService,
            PgOrdersRepository, TracingDriftReporter,
        },
        products::{PgProductsRepository, ProductsRepository},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Storage collaborators the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductsRepository>,
    pub customers: Arc<dyn CustomersRepository>,
    pub carts: Arc<dyn CartsRepository>,
    pub orders: Arc<dyn OrdersRepository>,
    pub discount_codes: Arc<dyn DiscountCodesRepository>,
}

impl Repositories {
    #[must_use]
    pub fn postgres(db: &Db) -> Self {
        Self {
            products: Arc::new(PgProductsRepository::new(db.clone())),
            customers: Arc::new(PgCustomersRepository::new(db.clone())),
            carts: Arc::new(PgCartsRepository::new(db.clone())),
            orders: Arc::new(PgOrdersRepository::new(db.clone())),
            discount_codes: Arc::new(PgDiscountCodesRepository::new(db.clone())),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub customers: Arc<dyn CustomersService>,
    pub discount_codes: Arc<dyn DiscountCodesService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        checkout: CheckoutConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let repositories = Repositories::postgres(&Db::new(pool));

        Ok(Self::new(
            &repositories,
            checkout,
            Arc::new(TracingDriftReporter),
        ))
    }

    /// Wire every service over the given repositories.
    #[must_use]
    pub fn new(
        repositories: &Repositories,
        checkout: CheckoutConfig,
        drift: Arc<dyn DriftReporter>,
    ) -> Self {
        let placement = OrderPlacement::new(
            Arc::clone(&repositories.orders),
            Arc::clone(&repositories.products),
            Arc::clone(&repositories.carts),
            Arc::clone(&repositories.discount_codes),
        )
        .with_drift_reporter(drift)
        .with_stock_update_attempts(checkout.stock_update_attempts);

        Self {
            carts: Arc::new(AppCartsService::new(
                Arc::clone(&repositories.carts),
                Arc::clone(&repositories.products),
                Arc::clone(&repositories.discount_codes),
                Arc::clone(&repositories.customers),
                placement,
            )),
            orders: Arc::new(AppOrdersService::new(Arc::clone(&repositories.orders))),
            customers: Arc::new(AppCustomersService::new(
                Arc::clone(&repositories.customers),
                Arc::clone(&repositories.carts),
            )),
            discount_codes: Arc::new(AppDiscountCodesService::new(Arc::clone(
                &repositories.discount_codes,
            ))),
        }
    }
}
