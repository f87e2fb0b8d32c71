//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{Caller, authorize_customer_access},
    database::StorageError,
    domain::{
        carts::{
            CartError, CartsRepository, CartsServiceError,
            records::{Cart, CartItem, ItemRemoval},
        },
        customers::CustomersRepository,
        discounts::DiscountCodesRepository,
        orders::{
            OrderPlacement,
            records::{Order, PaymentStatus},
        },
        products::{ProductsRepository, records::ProductUuid},
    },
};

#[derive(Clone)]
pub struct AppCartsService {
    carts: Arc<dyn CartsRepository>,
    products: Arc<dyn ProductsRepository>,
    discount_codes: Arc<dyn DiscountCodesRepository>,
    customers: Arc<dyn CustomersRepository>,
    placement: OrderPlacement,
}

impl AppCartsService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsRepository>,
        products: Arc<dyn ProductsRepository>,
        discount_codes: Arc<dyn DiscountCodesRepository>,
        customers: Arc<dyn CustomersRepository>,
        placement: OrderPlacement,
    ) -> Self {
        Self {
            carts,
            products,
            discount_codes,
            customers,
            placement,
        }
    }

    async fn load_cart(&self, email: &str) -> Result<Cart, CartsServiceError> {
        self.carts
            .get_by_customer(email)
            .await
            .map_err(|e| CartsServiceError::cart_storage(email, e))
    }

    async fn save_cart(&self, cart: &Cart) -> Result<Cart, CartsServiceError> {
        self.carts
            .save(cart)
            .await
            .map_err(|e| CartsServiceError::cart_storage(&cart.customer_email, e))
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the cart of the customer with the given email.
    async fn get_cart(&self, caller: &Caller, email: &str) -> Result<Cart, CartsServiceError>;

    /// Add units of a product to a customer's cart.
    async fn add_cart_item(
        &self,
        caller: &Caller,
        email: &str,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove units of a product from a customer's cart.
    async fn remove_cart_item(
        &self,
        caller: &Caller,
        email: &str,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<ItemRemoval, CartsServiceError>;

    /// Apply a discount code to a customer's cart.
    async fn add_discount_code(
        &self,
        caller: &Caller,
        email: &str,
        code: &str,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove an applied discount code from a customer's cart.
    async fn remove_discount_code(
        &self,
        caller: &Caller,
        email: &str,
        code: &str,
    ) -> Result<Cart, CartsServiceError>;

    /// Check out a customer's cart, placing an order with the given
    /// payment status (`paid` or `unpaid`).
    async fn convert_cart_to_order(
        &self,
        caller: &Caller,
        email: &str,
        payment_status: &str,
    ) -> Result<Order, CartsServiceError>;
}

#[async_trait]
impl CartsService for AppCartsService {
    #[tracing::instrument(
        name = "carts.service.get_cart",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn get_cart(&self, caller: &Caller, email: &str) -> Result<Cart, CartsServiceError> {
        authorize_customer_access(caller, email)?;

        self.load_cart(email).await
    }

    #[tracing::instrument(
        name = "carts.service.add_cart_item",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn add_cart_item(
        &self,
        caller: &Caller,
        email: &str,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<CartItem, CartsServiceError> {
        authorize_customer_access(caller, email)?;

        if quantity == 0 {
            return Err(CartError::InvalidQuantity.into());
        }

        let mut cart = self.load_cart(email).await?;

        let record = self
            .products
            .get_by_id(product)
            .await
            .map_err(|e| CartsServiceError::product_storage(product, e))?;

        let item = cart.add_item(&record, quantity)?;

        self.save_cart(&cart).await?;

        info!(
            cart_uuid = %cart.uuid,
            quantity = item.quantity,
            total_amount = cart.total_amount(),
            "added cart item"
        );

        Ok(item)
    }

    #[tracing::instrument(
        name = "carts.service.remove_cart_item",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn remove_cart_item(
        &self,
        caller: &Caller,
        email: &str,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<ItemRemoval, CartsServiceError> {
        authorize_customer_access(caller, email)?;

        if quantity == 0 {
            return Err(CartError::InvalidQuantity.into());
        }

        let mut cart = self.load_cart(email).await?;

        let removal = cart.remove_item(product, quantity)?;

        self.save_cart(&cart).await?;

        info!(
            cart_uuid = %cart.uuid,
            total_amount = cart.total_amount(),
            "removed cart item"
        );

        Ok(removal)
    }

    #[tracing::instrument(
        name = "carts.service.add_discount_code",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn add_discount_code(
        &self,
        caller: &Caller,
        email: &str,
        code: &str,
    ) -> Result<Cart, CartsServiceError> {
        authorize_customer_access(caller, email)?;

        let mut cart = self.load_cart(email).await?;

        let discount = match self.discount_codes.get_by_code(code).await {
            Ok(discount) => discount,
            Err(StorageError::NotFound) => {
                return Err(CartsServiceError::DiscountCodeNotFound(code.to_string()));
            }
            Err(e) => return Err(CartsServiceError::Storage(e)),
        };

        cart.apply_discount_code(discount, Timestamp::now())?;

        let saved = self.save_cart(&cart).await?;

        info!(
            cart_uuid = %saved.uuid,
            total_amount = saved.total_amount(),
            "applied discount code"
        );

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.remove_discount_code",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn remove_discount_code(
        &self,
        caller: &Caller,
        email: &str,
        code: &str,
    ) -> Result<Cart, CartsServiceError> {
        authorize_customer_access(caller, email)?;

        let mut cart = self.load_cart(email).await?;

        cart.remove_discount_code(code)?;

        let saved = self.save_cart(&cart).await?;

        info!(
            cart_uuid = %saved.uuid,
            total_amount = saved.total_amount(),
            "removed discount code"
        );

        Ok(saved)
    }

    #[tracing::instrument(
        name = "carts.service.convert_cart_to_order",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn convert_cart_to_order(
        &self,
        caller: &Caller,
        email: &str,
        payment_status: &str,
    ) -> Result<Order, CartsServiceError> {
        authorize_customer_access(caller, email)?;

        let status = payment_status.parse::<PaymentStatus>()?;

        let cart = self.load_cart(email).await?;

        if cart.is_empty() {
            return Err(CartsServiceError::EmptyCart(email.to_string()));
        }

        let customer = match self.customers.get_by_email(email).await {
            Ok(customer) => customer,
            Err(StorageError::NotFound) => {
                return Err(CartsServiceError::CustomerNotFound(email.to_string()));
            }
            Err(e) => return Err(CartsServiceError::Storage(e)),
        };

        self.placement.place(&cart, customer.snapshot(), status).await
    }
}
