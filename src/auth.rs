//! Caller identity, extracted from the `Authorization` header.
//!
//! Authentication itself terminates upstream: a gateway validates
//! credentials and forwards the authenticated principal as a bearer token
//! of the form `user:<email>`. This module turns that principal into a
//! stable user id without any local user table.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::utils::error::AppError;

/// Namespace for deriving user ids from email addresses.
const USER_ID_NAMESPACE: Uuid = Uuid::from_u128(0x7b13_8064_9cde_4b34_a567_c2cb_c8f1_c3a9);

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl Identity {
    pub fn from_email(email: &str) -> Self {
        Self {
            user_id: user_id_for_email(email),
            email: email.to_string(),
        }
    }
}

/// Derive the stable user id for an email address.
///
/// The same mailbox always maps to the same id regardless of case or
/// surrounding whitespace, so identities survive restarts.
pub fn user_id_for_email(email: &str) -> Uuid {
    Uuid::new_v5(&USER_ID_NAMESPACE, email.trim().to_lowercase().as_bytes())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return Err(AppError::Unauthenticated(
                "Authentication credentials were not provided".to_string(),
            ));
        };

        let Some(token) = value.trim().strip_prefix("Bearer ") else {
            return Err(AppError::Unauthenticated(
                "Authorization header must carry a Bearer token".to_string(),
            ));
        };

        let Some(email) = token.trim().strip_prefix("user:") else {
            return Err(AppError::Unauthenticated(
                "Bearer token must be of the form 'user:<email>'".to_string(),
            ));
        };

        let email = email.trim();
        if email.is_empty() || email.len() > 320 || !email.contains('@') {
            return Err(AppError::Unauthenticated(
                "Bearer token must carry a valid email address".to_string(),
            ));
        }

        Ok(Identity::from_email(email))
    }
}
