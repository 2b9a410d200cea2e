//! In-process stand-ins for the registration and catalog backends.

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    domain::{ProductId, ProductSummary, UserHandle, UserId},
    error::{ApiError, ErrorCode, FetchErrorKind, RegistrationErrorKind},
    protocol::{PageCursor, ProductPage, RegisterRequest},
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{PaginationService, RegistrationService};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Default)]
pub struct InMemoryAccounts {
    users: Mutex<Vec<UserHandle>>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn registered_count(&self) -> usize {
        self.users.lock().await.len()
    }
}

#[async_trait]
impl RegistrationService for InMemoryAccounts {
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<UserHandle, RegistrationErrorKind> {
        if !is_valid_email(&request.email) {
            return Err(ApiError::new(ErrorCode::InvalidEmail, "email address is malformed").into());
        }
        if !is_acceptable_password(&request.password) {
            return Err(ApiError::new(
                ErrorCode::WeakPassword,
                format!(
                    "password needs at least {MIN_PASSWORD_LEN} characters with a letter and a digit"
                ),
            )
            .into());
        }

        let mut users = self.users.lock().await;
        if users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(&request.email))
        {
            return Err(ApiError::new(ErrorCode::EmailTaken, "email is already registered").into());
        }

        let user = UserHandle {
            user_id: UserId(users.len() as i64 + 1),
            name: request.name.clone(),
            email: request.email.clone(),
            registered_at: Utc::now(),
        };
        debug!(user_id = user.user_id.0, "in-memory account created");
        users.push(user.clone());
        Ok(user)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

pub fn is_acceptable_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub struct InMemoryCatalog {
    products: Vec<ProductSummary>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<ProductSummary>) -> Self {
        Self { products }
    }

    /// Catalog of `count` generated products with ids starting at 1.
    pub fn generated(count: usize) -> Self {
        let products = (1..=count)
            .map(|n| ProductSummary {
                product_id: ProductId(n as i64),
                title: format!("Product #{n}"),
                price_cents: 499 + (n as i64 % 7) * 250,
                image_url: None,
            })
            .collect();
        Self::new(products)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[async_trait]
impl PaginationService for InMemoryCatalog {
    async fn fetch_page(
        &self,
        cursor: PageCursor,
        limit: usize,
    ) -> Result<ProductPage, FetchErrorKind> {
        let start = cursor.offset();
        if start > self.products.len() {
            return Err(ApiError::new(
                ErrorCode::NotFound,
                format!("cursor {} is past the end of the catalog", cursor.0),
            )
            .into());
        }

        let end = start.saturating_add(limit).min(self.products.len());
        let next_cursor = if end < self.products.len() {
            let next = u32::try_from(end).map_err(|_| {
                FetchErrorKind::from(ApiError::new(
                    ErrorCode::Internal,
                    format!("cursor overflow at {end}"),
                ))
            })?;
            Some(PageCursor(next))
        } else {
            None
        };

        Ok(ProductPage {
            items: self.products[start..end].to_vec(),
            next_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ann".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn registers_and_rejects_duplicate_email() {
        let accounts = InMemoryAccounts::new();

        let user = accounts
            .register(&request("ann@example.com", "pass1234"))
            .await
            .expect("register");
        assert_eq!(user.user_id, UserId(1));

        let err = accounts
            .register(&request("ANN@example.com", "pass5678"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, RegistrationErrorKind::EmailTaken);
        assert_eq!(accounts.registered_count().await, 1);
    }

    #[tokio::test]
    async fn classifies_bad_email_before_weak_password() {
        let accounts = InMemoryAccounts::new();

        let err = accounts
            .register(&request("bad-email", "short"))
            .await
            .expect_err("invalid");
        assert_eq!(err, RegistrationErrorKind::InvalidEmail);

        let err = accounts
            .register(&request("ann@example.com", "password"))
            .await
            .expect_err("weak");
        assert_eq!(err, RegistrationErrorKind::WeakPassword);
    }

    #[tokio::test]
    async fn empty_catalog_serves_a_single_final_page() {
        let catalog = InMemoryCatalog::generated(0);
        assert!(catalog.is_empty());

        let page = catalog
            .fetch_page(PageCursor::start(), 10)
            .await
            .expect("empty page");
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn email_shape_checks() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b..co"));
        assert!(!is_valid_email("a@b@c.co"));
    }

    #[tokio::test]
    async fn catalog_pages_are_stable_per_cursor_and_end_with_none() {
        let catalog = InMemoryCatalog::generated(25);

        let first = catalog
            .fetch_page(PageCursor::start(), 10)
            .await
            .expect("first");
        let again = catalog
            .fetch_page(PageCursor::start(), 10)
            .await
            .expect("again");
        assert_eq!(first, again);
        assert_eq!(first.next_cursor, Some(PageCursor(10)));

        let last = catalog.fetch_page(PageCursor(20), 10).await.expect("last");
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.next_cursor, None);

        let err = catalog
            .fetch_page(PageCursor(30), 10)
            .await
            .expect_err("past the end");
        assert_eq!(
            err,
            FetchErrorKind::Unknown("cursor 30 is past the end of the catalog".into())
        );
    }
}
