use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidEmail,
    WeakPassword,
    EmailTaken,
    Validation,
    NotFound,
    RateLimited,
    Unavailable,
    Internal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure reported by the registration collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationErrorKind {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password does not meet the requirements")]
    WeakPassword,
    #[error("email is already registered")]
    EmailTaken,
    #[error("registration service unavailable: {0}")]
    Unavailable(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Unknown(String),
}

impl From<ApiError> for RegistrationErrorKind {
    fn from(value: ApiError) -> Self {
        match value.code {
            ErrorCode::InvalidEmail => Self::InvalidEmail,
            ErrorCode::WeakPassword => Self::WeakPassword,
            ErrorCode::EmailTaken => Self::EmailTaken,
            ErrorCode::Unavailable | ErrorCode::RateLimited => Self::Unavailable(value.message),
            ErrorCode::Validation | ErrorCode::NotFound | ErrorCode::Internal => {
                Self::Unknown(value.message)
            }
        }
    }
}

/// Failure reported by the pagination collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Unknown(String),
}

impl From<ApiError> for FetchErrorKind {
    fn from(value: ApiError) -> Self {
        match value.code {
            ErrorCode::Unavailable | ErrorCode::RateLimited => Self::Unavailable(value.message),
            ErrorCode::InvalidEmail
            | ErrorCode::WeakPassword
            | ErrorCode::EmailTaken
            | ErrorCode::Validation
            | ErrorCode::NotFound
            | ErrorCode::Internal => Self::Unknown(value.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_codes_deserialize_as_snake_case() {
        let err: ApiError =
            serde_json::from_str(r#"{"code":"email_taken","message":"taken"}"#).expect("decode");
        assert_eq!(err.code, ErrorCode::EmailTaken);
        assert_eq!(RegistrationErrorKind::from(err), RegistrationErrorKind::EmailTaken);
    }

    #[test]
    fn unclassified_api_errors_keep_their_message() {
        let kind = RegistrationErrorKind::from(ApiError::new(ErrorCode::Internal, "boom"));
        assert_eq!(kind, RegistrationErrorKind::Unknown("boom".into()));
        assert_eq!(kind.to_string(), "boom");
    }

    #[test]
    fn rate_limited_fetch_is_reported_as_unavailable() {
        let kind = FetchErrorKind::from(ApiError::new(ErrorCode::RateLimited, "slow down"));
        assert_eq!(kind, FetchErrorKind::Unavailable("slow down".into()));
    }
}
