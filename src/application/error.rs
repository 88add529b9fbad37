use reqwest::StatusCode;
use thiserror::Error;

use crate::{
    config::LoadError,
    domain::{error::ValidationError, routes::Route},
    infra::{error::InfraError, transport::HttpError},
};

const LOGIN_FAILED: &str = "Login failed";

/// Why a sign-in attempt or a stored session was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{message}")]
    Rejected {
        status: Option<StatusCode>,
        message: String,
    },
    #[error("{0}")]
    Unreachable(String),
    #[error(transparent)]
    Incomplete(#[from] ValidationError),
    /// An authorized request was refused and the session has been cleared.
    #[error("session ended: {0}; run `blog-admin login`")]
    Expired(String),
}

impl AuthError {
    /// Translate a failed login exchange into the message shown to the user.
    pub fn from_login_failure(error: HttpError) -> Self {
        match error.status {
            Some(status) => {
                let message = if error.is_generic() {
                    LOGIN_FAILED.to_string()
                } else {
                    error.message
                };
                Self::Rejected {
                    status: Some(status),
                    message,
                }
            }
            None => Self::Unreachable(error.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error("{0}")]
    NotFound(String),
    #[error("sign in required to open {route}; run `blog-admin login`")]
    LoginRequired { route: Route },
    #[error("{failed} of {total} {action} requests failed")]
    MutationFailed {
        action: &'static str,
        failed: usize,
        total: usize,
    },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Report a 401/403 from an authorized request as an ended session.
    pub fn into_session_expired(self) -> Self {
        match self {
            Self::Http(err) if err.is_auth_failure() => Self::Auth(AuthError::Expired(err.message)),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refused_credential_reads_as_expired_session() {
        let err = AppError::from(HttpError::new(Some(StatusCode::UNAUTHORIZED), "Token expired"))
            .into_session_expired();
        assert!(matches!(&err, AppError::Auth(AuthError::Expired(message)) if message == "Token expired"));
        assert!(err.to_string().contains("blog-admin login"));
    }

    #[test]
    fn other_failures_pass_through() {
        let err = AppError::from(HttpError::new(Some(StatusCode::NOT_FOUND), "HTTP 404"))
            .into_session_expired();
        assert!(matches!(err, AppError::Http(_)));

        let err = AppError::not_found("Blog not found").into_session_expired();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn login_failure_without_message_is_generic() {
        let err = AuthError::from_login_failure(HttpError::from_response(StatusCode::UNAUTHORIZED, b""));
        assert_eq!(err.to_string(), "Login failed");
    }
}
