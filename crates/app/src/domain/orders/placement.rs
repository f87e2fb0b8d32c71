//! Order placement.
//!
//! Turning a cart into an order touches three documents: the new order, the
//! stock of every product in the cart, and the cart itself. They are written
//! as a [`Saga`] so a failure part-way through leaves no partial order and no
//! lost stock behind.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, error, info};

use crate::{
    database::StorageError,
    domain::{
        carts::{
            CartError, CartsRepository, CartsServiceError,
            records::{Cart, CartUuid},
        },
        customers::records::CustomerSnapshot,
        discounts::DiscountCodesRepository,
        orders::{
            OrdersRepository,
            records::{Order, OrderUuid, PaymentStatus},
        },
        products::{ProductsRepository, data::StockUpdate, records::ProductRecord},
    },
    saga::{Saga, SagaStep},
};

/// Tracing target for compensations that could not be applied.
pub const INVENTORY_DRIFT_TARGET: &str = "storefront::inventory_drift";

/// Compare-and-swap attempts per stock write before giving up.
pub const DEFAULT_STOCK_UPDATE_ATTEMPTS: u32 = 3;

/// Receives compensations that failed during a rolled-back placement.
///
/// Each report means stored state no longer matches what the failed placement
/// started from and needs manual reconciliation.
#[automock]
pub trait DriftReporter: Send + Sync {
    fn report(&self, order: OrderUuid, step: &str, error: &CartsServiceError);
}

/// Reports drift as `error` events on [`INVENTORY_DRIFT_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDriftReporter;

impl DriftReporter for TracingDriftReporter {
    fn report(&self, order: OrderUuid, step: &str, error: &CartsServiceError) {
        error!(
            target: INVENTORY_DRIFT_TARGET,
            order_uuid = %order,
            step,
            error = %error,
            "compensation failed, manual reconciliation required"
        );
    }
}

#[derive(Clone)]
pub struct OrderPlacement {
    orders: Arc<dyn OrdersRepository>,
    products: Arc<dyn ProductsRepository>,
    carts: Arc<dyn CartsRepository>,
    discount_codes: Arc<dyn DiscountCodesRepository>,
    drift: Arc<dyn DriftReporter>,
    stock_update_attempts: u32,
}

impl OrderPlacement {
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrdersRepository>,
        products: Arc<dyn ProductsRepository>,
        carts: Arc<dyn CartsRepository>,
        discount_codes: Arc<dyn DiscountCodesRepository>,
    ) -> Self {
        Self {
            orders,
            products,
            carts,
            discount_codes,
            drift: Arc::new(TracingDriftReporter),
            stock_update_attempts: DEFAULT_STOCK_UPDATE_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn with_drift_reporter(mut self, drift: Arc<dyn DriftReporter>) -> Self {
        self.drift = drift;
        self
    }

    /// At least one attempt is always made.
    #[must_use]
    pub fn with_stock_update_attempts(mut self, attempts: u32) -> Self {
        self.stock_update_attempts = attempts.max(1);
        self
    }

    /// Place an order for every line in `cart`.
    ///
    /// Stock for every line is checked before anything is written. The order
    /// is priced from the products as read for that check and from the
    /// stored state of every applied code; codes switched off or expired
    /// since they were applied are dropped. On success the order is stored, stock is decremented and the stored cart
    /// is emptied. On failure every completed write is undone and the error
    /// of the failing step is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::EmptyCart`] for a cart without items,
    /// [`CartError::InsufficientStock`] when a product cannot cover its line,
    /// or the error of whichever write failed.
    pub async fn place(
        &self,
        cart: &Cart,
        customer: CustomerSnapshot,
        status: PaymentStatus,
    ) -> Result<Order, CartsServiceError> {
        if cart.is_empty() {
            return Err(CartsServiceError::EmptyCart(cart.customer_email.clone()));
        }

        let mut lines = Vec::with_capacity(cart.items().len());

        for item in cart.items() {
            let uuid = item.product.uuid;

            let product = self
                .products
                .get_by_id(uuid)
                .await
                .map_err(|e| CartsServiceError::product_storage(uuid, e))?;

            if product.stock < item.quantity {
                return Err(CartError::InsufficientStock {
                    product: uuid,
                    requested: item.quantity,
                    available: product.stock,
                }
                .into());
            }

            lines.push((product, item.quantity));
        }

        let mut current_codes = Vec::with_capacity(cart.discount_codes().len());

        for applied in cart.discount_codes() {
            match self.discount_codes.get_by_code(&applied.code).await {
                Ok(code) => current_codes.push(code),
                Err(StorageError::NotFound) => {}
                Err(e) => return Err(CartsServiceError::Storage(e)),
            }
        }

        let now = Timestamp::now();
        let products: Vec<ProductRecord> =
            lines.iter().map(|(product, _)| product.clone()).collect();

        let mut priced = cart.clone();

        for code in priced.revalidate(&products, &current_codes, now) {
            info!(cart_uuid = %cart.uuid, code = %code, "dropped discount code no longer active");
        }

        let order = Order::from_cart(&priced, customer, status, now)?;

        let mut saga = Saga::new("place_order").step(PersistOrder {
            orders: Arc::clone(&self.orders),
            order: order.clone(),
        });

        for (product, quantity) in lines {
            saga = saga.step(DecrementStock {
                products: Arc::clone(&self.products),
                product,
                quantity,
                attempts: self.stock_update_attempts,
                written: None,
            });
        }

        let saga = saga.step(ClearCart {
            carts: Arc::clone(&self.carts),
            cart: cart.uuid,
        });

        if let Err(failure) = saga.run().await {
            if failure.fully_compensated() {
                info!(order_uuid = %order.uuid, step = failure.step, "checkout rolled back");
            }

            for compensation in &failure.compensation_failures {
                self.drift
                    .report(order.uuid, compensation.step, &compensation.error);
            }

            return Err(failure.error);
        }

        info!(
            order_uuid = %order.uuid,
            amount = order.payment.amount,
            status = %order.payment.status,
            "placed order"
        );

        Ok(order)
    }
}

struct PersistOrder {
    orders: Arc<dyn OrdersRepository>,
    order: Order,
}

#[async_trait]
impl SagaStep<CartsServiceError> for PersistOrder {
    fn name(&self) -> &'static str {
        "persist_order"
    }

    async fn execute(&mut self) -> Result<(), CartsServiceError> {
        self.orders
            .create(&self.order)
            .await
            .map_err(CartsServiceError::Storage)?;

        Ok(())
    }

    async fn compensate(&mut self) -> Result<(), CartsServiceError> {
        match self.orders.delete(self.order.uuid).await {
            Ok(()) | Err(StorageError::NotFound) => Ok(()),
            Err(source) => Err(CartsServiceError::OrderRollback {
                order: self.order.uuid,
                source,
            }),
        }
    }
}

/// Takes one cart line's quantity off a product's stock.
struct DecrementStock {
    products: Arc<dyn ProductsRepository>,
    /// Product as read during the stock check.
    product: ProductRecord,
    quantity: u64,
    attempts: u32,
    /// Product as stored by the decrement, once it has been applied.
    written: Option<ProductRecord>,
}

#[async_trait]
impl SagaStep<CartsServiceError> for DecrementStock {
    fn name(&self) -> &'static str {
        "decrement_stock"
    }

    async fn execute(&mut self) -> Result<(), CartsServiceError> {
        let uuid = self.product.uuid;
        let mut current = self.product.clone();

        for attempt in 1..=self.attempts {
            if current.stock < self.quantity {
                return Err(CartError::InsufficientStock {
                    product: uuid,
                    requested: self.quantity,
                    available: current.stock,
                }
                .into());
            }

            let update = StockUpdate {
                stock: current.stock - self.quantity,
                expected_version: current.version,
            };

            match self.products.update_stock(uuid, update).await {
                Ok(written) => {
                    self.written = Some(written);

                    return Ok(());
                }
                Err(StorageError::VersionConflict) if attempt < self.attempts => {
                    debug!(product_uuid = %uuid, attempt, "stock changed concurrently, re-reading");

                    current = self
                        .products
                        .get_by_id(uuid)
                        .await
                        .map_err(|e| CartsServiceError::product_storage(uuid, e))?;
                }
                Err(StorageError::VersionConflict) => break,
                Err(e) => return Err(CartsServiceError::product_storage(uuid, e)),
            }
        }

        Err(CartsServiceError::StockContention(uuid))
    }

    async fn compensate(&mut self) -> Result<(), CartsServiceError> {
        let Some(written) = self.written.take() else {
            return Ok(());
        };

        let uuid = written.uuid;

        let mut update = StockUpdate {
            stock: written.stock.saturating_add(self.quantity),
            expected_version: written.version,
        };

        let mut attempt = 1;

        loop {
            match self.products.update_stock(uuid, update).await {
                Ok(_) => return Ok(()),
                Err(StorageError::VersionConflict) if attempt < self.attempts => {
                    let current = self.products.get_by_id(uuid).await.map_err(|source| {
                        CartsServiceError::StockRestore {
                            product: uuid,
                            stock: update.stock,
                            source,
                        }
                    })?;

                    update = StockUpdate {
                        stock: current.stock.saturating_add(self.quantity),
                        expected_version: current.version,
                    };

                    attempt += 1;
                }
                Err(source) => {
                    return Err(CartsServiceError::StockRestore {
                        product: uuid,
                        stock: update.stock,
                        source,
                    });
                }
            }
        }
    }
}

/// Empties the stored cart. Runs last and has no inverse.
struct ClearCart {
    carts: Arc<dyn CartsRepository>,
    cart: CartUuid,
}

#[async_trait]
impl SagaStep<CartsServiceError> for ClearCart {
    fn name(&self) -> &'static str {
        "clear_cart"
    }

    async fn execute(&mut self) -> Result<(), CartsServiceError> {
        self.carts
            .empty(self.cart)
            .await
            .map_err(CartsServiceError::Storage)
    }
}
