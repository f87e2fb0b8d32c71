//! Customers Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{error, info};

use crate::{
    auth::{Caller, authorize_customer_access},
    database::StorageError,
    domain::{
        carts::{CartsRepository, records::Cart},
        customers::{
            CustomersRepository, CustomersServiceError, data::NewCustomer,
            records::CustomerRecord,
        },
    },
    saga::{Saga, SagaStep},
};

/// Tracing target for customers left behind by a failed registration.
pub const ORPHANED_CUSTOMER_TARGET: &str = "storefront::orphaned_customer";

#[derive(Clone)]
pub struct AppCustomersService {
    customers: Arc<dyn CustomersRepository>,
    carts: Arc<dyn CartsRepository>,
}

impl AppCustomersService {
    #[must_use]
    pub fn new(customers: Arc<dyn CustomersRepository>, carts: Arc<dyn CartsRepository>) -> Self {
        Self { customers, carts }
    }
}

#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// Register a customer together with their empty cart.
    async fn register_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, CustomersServiceError>;

    /// Retrieve a customer by email.
    async fn get_customer(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<CustomerRecord, CustomersServiceError>;

    /// Delete a customer account and its cart.
    async fn delete_customer(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<(), CustomersServiceError>;
}

#[async_trait]
impl CustomersService for AppCustomersService {
    #[tracing::instrument(
        name = "customers.service.register_customer",
        skip(self, customer),
        fields(email = %customer.email),
        err
    )]
    async fn register_customer(
        &self,
        customer: NewCustomer,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        let email = customer.email.trim().to_string();

        if !is_plausible_email(&email) {
            return Err(CustomersServiceError::InvalidEmail(customer.email));
        }

        let name = customer.name.trim().to_string();

        if name.is_empty() {
            return Err(CustomersServiceError::EmptyName);
        }

        let record = CustomerRecord {
            uuid: customer.uuid,
            email,
            name,
            created_at: Timestamp::now(),
        };

        let cart = Cart::new(&record);

        Saga::new("register_customer")
            .step(CreateCustomer {
                customers: Arc::clone(&self.customers),
                record: record.clone(),
            })
            .step(CreateCart {
                carts: Arc::clone(&self.carts),
                cart,
            })
            .run()
            .await
            .map_err(|failure| {
                for compensation in &failure.compensation_failures {
                    error!(
                        target: ORPHANED_CUSTOMER_TARGET,
                        customer_uuid = %record.uuid,
                        email = %record.email,
                        step = compensation.step,
                        error = %compensation.error,
                        "registration rollback failed, customer has no cart"
                    );
                }

                failure.error
            })?;

        info!(customer_uuid = %record.uuid, "registered customer");

        Ok(record)
    }

    #[tracing::instrument(
        name = "customers.service.get_customer",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn get_customer(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<CustomerRecord, CustomersServiceError> {
        authorize_customer_access(caller, email)?;

        self.customers
            .get_by_email(email)
            .await
            .map_err(|e| CustomersServiceError::from_storage(email, e))
    }

    #[tracing::instrument(
        name = "customers.service.delete_customer",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn delete_customer(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<(), CustomersServiceError> {
        authorize_customer_access(caller, email)?;

        let customer = self
            .customers
            .get_by_email(email)
            .await
            .map_err(|e| CustomersServiceError::from_storage(email, e))?;

        match self.carts.get_by_customer(email).await {
            Ok(cart) => self
                .carts
                .delete(cart.uuid)
                .await
                .map_err(CustomersServiceError::Storage)?,
            Err(StorageError::NotFound) => {}
            Err(e) => return Err(CustomersServiceError::Storage(e)),
        }

        self.customers
            .delete(email)
            .await
            .map_err(|e| CustomersServiceError::from_storage(email, e))?;

        info!(customer_uuid = %customer.uuid, "deleted customer");

        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}

struct CreateCustomer {
    customers: Arc<dyn CustomersRepository>,
    record: CustomerRecord,
}

#[async_trait]
impl SagaStep<CustomersServiceError> for CreateCustomer {
    fn name(&self) -> &'static str {
        "create_customer"
    }

    async fn execute(&mut self) -> Result<(), CustomersServiceError> {
        self.customers
            .create(&self.record)
            .await
            .map_err(|e| CustomersServiceError::from_storage(&self.record.email, e))?;

        Ok(())
    }

    async fn compensate(&mut self) -> Result<(), CustomersServiceError> {
        self.customers
            .delete(&self.record.email)
            .await
            .map_err(CustomersServiceError::Storage)
    }
}

struct CreateCart {
    carts: Arc<dyn CartsRepository>,
    cart: Cart,
}

#[async_trait]
impl SagaStep<CustomersServiceError> for CreateCart {
    fn name(&self) -> &'static str {
        "create_cart"
    }

    async fn execute(&mut self) -> Result<(), CustomersServiceError> {
        self.carts
            .create(&self.cart)
            .await
            .map_err(CustomersServiceError::Storage)?;

        Ok(())
    }
}
