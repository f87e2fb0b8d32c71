//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{Caller, authorize_customer_access, require_admin},
    domain::orders::{
        OrdersRepository, OrdersServiceError,
        records::{Order, OrderUuid},
    },
};

#[derive(Clone)]
pub struct AppOrdersService {
    orders: Arc<dyn OrdersRepository>,
}

impl AppOrdersService {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersRepository>) -> Self {
        Self { orders }
    }

    async fn load(&self, uuid: OrderUuid) -> Result<Order, OrdersServiceError> {
        self.orders
            .get(uuid)
            .await
            .map_err(|e| OrdersServiceError::from_storage(uuid, e))
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve a single order.
    async fn get_order(
        &self,
        caller: &Caller,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// List every order placed by a customer.
    async fn list_customer_orders(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Mark an unpaid order as paid.
    async fn pay_order(
        &self,
        caller: &Caller,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Delete an order. Stock is not returned.
    async fn delete_order(
        &self,
        caller: &Caller,
        uuid: OrderUuid,
    ) -> Result<(), OrdersServiceError>;
}

#[async_trait]
impl OrdersService for AppOrdersService {
    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn get_order(
        &self,
        caller: &Caller,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let order = self.load(uuid).await?;

        authorize_customer_access(caller, &order.customer.email)?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.list_customer_orders",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn list_customer_orders(
        &self,
        caller: &Caller,
        email: &str,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        authorize_customer_access(caller, email)?;

        self.orders
            .list_by_customer(email)
            .await
            .map_err(OrdersServiceError::Storage)
    }

    #[tracing::instrument(
        name = "orders.service.pay_order",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn pay_order(
        &self,
        caller: &Caller,
        uuid: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut order = self.load(uuid).await?;

        authorize_customer_access(caller, &order.customer.email)?;

        order.payment.pay()?;

        let updated = self
            .orders
            .update_payment(uuid, &order.payment)
            .await
            .map_err(|e| OrdersServiceError::from_storage(uuid, e))?;

        info!(order_uuid = %uuid, amount = updated.payment.amount, "order paid");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.delete_order",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn delete_order(
        &self,
        caller: &Caller,
        uuid: OrderUuid,
    ) -> Result<(), OrdersServiceError> {
        require_admin(caller)?;

        self.orders
            .delete(uuid)
            .await
            .map_err(|e| OrdersServiceError::from_storage(uuid, e))?;

        info!(order_uuid = %uuid, "deleted order");

        Ok(())
    }
}
