//! Client-side controllers for the marketplace app: registration form
//! validation/submission, endless-scroll pagination, and screen routing.

use async_trait::async_trait;
use shared::{
    domain::UserHandle,
    error::{FetchErrorKind, RegistrationErrorKind},
    protocol::{PageCursor, ProductPage, RegisterRequest},
};

pub mod endless_scroll;
pub mod in_memory;
pub mod navigation;
pub mod product_feed;
pub mod registration;

pub use endless_scroll::EndlessScroll;
pub use navigation::{Navigator, Screen, ScreenRouter};
pub use product_feed::{FeedOptions, GridItem, LoadState, PageRequest, ProductFeed};
pub use registration::{
    FieldState, FormField, FormSnapshot, PendingRegistration, RegistrationController,
    RegistrationView, ScreenState,
};

#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn register(&self, request: &RegisterRequest)
        -> Result<UserHandle, RegistrationErrorKind>;
}

#[async_trait]
pub trait PaginationService: Send + Sync {
    async fn fetch_page(
        &self,
        cursor: PageCursor,
        limit: usize,
    ) -> Result<ProductPage, FetchErrorKind>;
}

pub struct MissingRegistrationService;

#[async_trait]
impl RegistrationService for MissingRegistrationService {
    async fn register(
        &self,
        _request: &RegisterRequest,
    ) -> Result<UserHandle, RegistrationErrorKind> {
        Err(RegistrationErrorKind::Unavailable(
            "no registration backend configured".to_string(),
        ))
    }
}

pub struct MissingPaginationService;

#[async_trait]
impl PaginationService for MissingPaginationService {
    async fn fetch_page(
        &self,
        cursor: PageCursor,
        _limit: usize,
    ) -> Result<ProductPage, FetchErrorKind> {
        Err(FetchErrorKind::Unavailable(format!(
            "no catalog backend configured (cursor {})",
            cursor.0
        )))
    }
}
