//! In-memory storage with failure injection.
//!
//! Every method yields once before touching state so concurrent callers
//! interleave the way they would against a real database.

use std::{
    collections::{BTreeMap, HashMap, HashSet, VecDeque},
    sync::{Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::task::yield_now;

use crate::{
    database::StorageError,
    domain::{
        carts::{
            CartsRepository,
            records::{Cart, CartUuid},
        },
        customers::{CustomersRepository, records::CustomerRecord},
        discounts::{DiscountCodesRepository, records::DiscountCode},
        orders::{
            OrdersRepository,
            records::{Order, OrderUuid, Payment},
        },
        products::{
            ProductsRepository,
            data::StockUpdate,
            records::{ProductRecord, ProductUuid},
        },
    },
};

/// Writes that should fail on their next attempt.
#[derive(Debug, Default)]
pub(crate) struct Faults {
    pub order_create: bool,
    pub order_delete: bool,
    pub cart_save: bool,
    pub cart_empty: bool,
    /// Stock writes that lower the stock of these products fail.
    pub stock_decrement: HashSet<ProductUuid>,
    /// Stock writes that raise the stock of these products fail.
    pub stock_restore: HashSet<ProductUuid>,
    /// Quantities sold by a simulated concurrent writer, one per stock write.
    pub concurrent_sales: HashMap<ProductUuid, VecDeque<u64>>,
}

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductUuid, ProductRecord>,
    customers: HashMap<String, CustomerRecord>,
    carts: HashMap<CartUuid, Cart>,
    orders: BTreeMap<OrderUuid, Order>,
    discount_codes: HashMap<String, DiscountCode>,
    faults: Faults,
    stock_writes: usize,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
}

fn unavailable(what: &str) -> StorageError {
    StorageError::Unavailable(format!("injected {what} failure"))
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn faults<R>(&self, configure: impl FnOnce(&mut Faults) -> R) -> R {
        configure(&mut self.state().faults)
    }

    pub(crate) fn insert_product(&self, product: ProductRecord) {
        self.state().products.insert(product.uuid, product);
    }

    pub(crate) fn insert_discount_code(&self, code: DiscountCode) {
        self.state().discount_codes.insert(code.code.clone(), code);
    }

    pub(crate) fn product(&self, uuid: ProductUuid) -> Option<ProductRecord> {
        self.state().products.get(&uuid).cloned()
    }

    pub(crate) fn cart_of(&self, email: &str) -> Option<Cart> {
        self.state()
            .carts
            .values()
            .find(|cart| cart.customer_email == email)
            .cloned()
    }

    pub(crate) fn orders(&self) -> Vec<Order> {
        self.state().orders.values().cloned().collect()
    }

    /// Number of successful stock writes so far.
    pub(crate) fn stock_writes(&self) -> usize {
        self.state().stock_writes
    }
}

#[async_trait]
impl ProductsRepository for MemoryStore {
    async fn get_by_id(&self, product: ProductUuid) -> Result<ProductRecord, StorageError> {
        yield_now().await;

        self.state()
            .products
            .get(&product)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_stock(
        &self,
        product: ProductUuid,
        update: StockUpdate,
    ) -> Result<ProductRecord, StorageError> {
        yield_now().await;

        let mut state = self.state();
        let State {
            products,
            faults,
            stock_writes,
            ..
        } = &mut *state;

        let record = products.get_mut(&product).ok_or(StorageError::NotFound)?;

        if let Some(sold) = faults
            .concurrent_sales
            .get_mut(&product)
            .and_then(VecDeque::pop_front)
        {
            record.stock = record.stock.saturating_sub(sold);
            record.version += 1;
        }

        let failing = if update.stock < record.stock {
            &faults.stock_decrement
        } else {
            &faults.stock_restore
        };

        if failing.contains(&product) {
            return Err(unavailable("stock write"));
        }

        if record.version != update.expected_version {
            return Err(StorageError::VersionConflict);
        }

        record.stock = update.stock;
        record.version += 1;
        record.updated_at = Timestamp::now();
        *stock_writes += 1;

        Ok(record.clone())
    }
}

#[async_trait]
impl CustomersRepository for MemoryStore {
    async fn get_by_email(&self, email: &str) -> Result<CustomerRecord, StorageError> {
        yield_now().await;

        self.state()
            .customers
            .get(email)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create(&self, customer: &CustomerRecord) -> Result<CustomerRecord, StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state.customers.contains_key(&customer.email) {
            return Err(StorageError::AlreadyExists);
        }

        state
            .customers
            .insert(customer.email.clone(), customer.clone());

        Ok(customer.clone())
    }

    async fn delete(&self, email: &str) -> Result<(), StorageError> {
        yield_now().await;

        self.state()
            .customers
            .remove(email)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl CartsRepository for MemoryStore {
    async fn get_by_customer(&self, email: &str) -> Result<Cart, StorageError> {
        yield_now().await;

        self.cart_of(email).ok_or(StorageError::NotFound)
    }

    async fn create(&self, cart: &Cart) -> Result<Cart, StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state
            .carts
            .values()
            .any(|existing| existing.customer_email == cart.customer_email)
        {
            return Err(StorageError::AlreadyExists);
        }

        state.carts.insert(cart.uuid, cart.clone());

        Ok(cart.clone())
    }

    async fn save(&self, cart: &Cart) -> Result<Cart, StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state.faults.cart_save {
            return Err(unavailable("cart save"));
        }

        let stored = state.carts.get_mut(&cart.uuid).ok_or(StorageError::NotFound)?;

        *stored = cart.clone();

        Ok(cart.clone())
    }

    async fn empty(&self, cart: CartUuid) -> Result<(), StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state.faults.cart_empty {
            return Err(unavailable("cart empty"));
        }

        state
            .carts
            .get_mut(&cart)
            .map(Cart::empty_cart)
            .ok_or(StorageError::NotFound)
    }

    async fn delete(&self, cart: CartUuid) -> Result<(), StorageError> {
        yield_now().await;

        self.state()
            .carts
            .remove(&cart)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl OrdersRepository for MemoryStore {
    async fn create(&self, order: &Order) -> Result<Order, StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state.faults.order_create {
            return Err(unavailable("order create"));
        }

        if state.orders.contains_key(&order.uuid) {
            return Err(StorageError::AlreadyExists);
        }

        state.orders.insert(order.uuid, order.clone());

        Ok(order.clone())
    }

    async fn get(&self, order: OrderUuid) -> Result<Order, StorageError> {
        yield_now().await;

        self.state()
            .orders
            .get(&order)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_by_customer(&self, email: &str) -> Result<Vec<Order>, StorageError> {
        yield_now().await;

        Ok(self
            .state()
            .orders
            .values()
            .filter(|order| order.customer.email == email)
            .cloned()
            .collect())
    }

    async fn update_payment(
        &self,
        order: OrderUuid,
        payment: &Payment,
    ) -> Result<Order, StorageError> {
        yield_now().await;

        let mut state = self.state();
        let stored = state.orders.get_mut(&order).ok_or(StorageError::NotFound)?;

        stored.payment = payment.clone();

        Ok(stored.clone())
    }

    async fn delete(&self, order: OrderUuid) -> Result<(), StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state.faults.order_delete {
            return Err(unavailable("order delete"));
        }

        state
            .orders
            .remove(&order)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl DiscountCodesRepository for MemoryStore {
    async fn get_by_code(&self, code: &str) -> Result<DiscountCode, StorageError> {
        yield_now().await;

        self.state()
            .discount_codes
            .get(code)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn create(&self, code: DiscountCode) -> Result<DiscountCode, StorageError> {
        yield_now().await;

        let mut state = self.state();

        if state.discount_codes.contains_key(&code.code) {
            return Err(StorageError::AlreadyExists);
        }

        state.discount_codes.insert(code.code.clone(), code.clone());

        Ok(code)
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<DiscountCode, StorageError> {
        yield_now().await;

        let mut state = self.state();
        let stored = state
            .discount_codes
            .get_mut(code)
            .ok_or(StorageError::NotFound)?;

        stored.is_active = active;

        Ok(stored.clone())
    }
}
