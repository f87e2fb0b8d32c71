//! Discount codes service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::{Caller, require_staff},
    domain::discounts::{
        DiscountCodesRepository,
        data::NewDiscountCode,
        errors::DiscountCodesServiceError,
        records::DiscountCode,
    },
};

#[derive(Clone)]
pub struct AppDiscountCodesService {
    repository: Arc<dyn DiscountCodesRepository>,
}

impl AppDiscountCodesService {
    #[must_use]
    pub fn new(repository: Arc<dyn DiscountCodesRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl DiscountCodesService for AppDiscountCodesService {
    #[tracing::instrument(
        name = "discounts.service.create_discount_code",
        skip(self, caller, code),
        fields(caller = %caller.email, code = %code.code),
        err
    )]
    async fn create_discount_code(
        &self,
        caller: &Caller,
        code: NewDiscountCode,
    ) -> Result<DiscountCode, DiscountCodesServiceError> {
        require_staff(caller)?;

        let code = DiscountCode::new(code, Timestamp::now())?;
        let key = code.code.clone();

        let created = self
            .repository
            .create(code)
            .await
            .map_err(|e| DiscountCodesServiceError::from_storage(&key, e))?;

        info!(code = %created.code, kind = %created.kind(), "created discount code");

        Ok(created)
    }

    #[tracing::instrument(
        name = "discounts.service.set_discount_code_active",
        skip(self, caller),
        fields(caller = %caller.email),
        err
    )]
    async fn set_discount_code_active(
        &self,
        caller: &Caller,
        code: &str,
        active: bool,
    ) -> Result<DiscountCode, DiscountCodesServiceError> {
        require_staff(caller)?;

        let updated = self
            .repository
            .set_active(code, active)
            .await
            .map_err(|e| DiscountCodesServiceError::from_storage(code, e))?;

        info!(code = %updated.code, active, "updated discount code");

        Ok(updated)
    }

    async fn get_discount_code(
        &self,
        caller: &Caller,
        code: &str,
    ) -> Result<DiscountCode, DiscountCodesServiceError> {
        require_staff(caller)?;

        self.repository
            .get_by_code(code)
            .await
            .map_err(|e| DiscountCodesServiceError::from_storage(code, e))
    }
}

#[automock]
#[async_trait]
pub trait DiscountCodesService: Send + Sync {
    /// Validate and store a new discount code.
    async fn create_discount_code(
        &self,
        caller: &Caller,
        code: NewDiscountCode,
    ) -> Result<DiscountCode, DiscountCodesServiceError>;

    /// Toggle whether a code may be applied to carts.
    async fn set_discount_code_active(
        &self,
        caller: &Caller,
        code: &str,
        active: bool,
    ) -> Result<DiscountCode, DiscountCodesServiceError>;

    /// Retrieve a single discount code.
    async fn get_discount_code(
        &self,
        caller: &Caller,
        code: &str,
    ) -> Result<DiscountCode, DiscountCodesServiceError>;
}
