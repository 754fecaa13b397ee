//! Authorization boundary in front of the router.
//!
//! The service asks an [`Authorizer`] about every request before routing it.
//! Storage operations never see credentials.

use bluenoise_model::ApiError;
use subtle::ConstantTimeEq;

/// Decides whether a request may proceed.
pub trait Authorizer: Send + Sync + 'static {
    /// Return `Err` with an `AccessDenied` error to reject the request.
    fn authorize(&self, parts: &http::request::Parts) -> Result<(), ApiError>;
}

/// Accepts every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn authorize(&self, _parts: &http::request::Parts) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Requires `Authorization: Bearer <token>` with a fixed token.
#[derive(Clone)]
pub struct BearerTokenAuthorizer {
    token: String,
}

impl std::fmt::Debug for BearerTokenAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenAuthorizer")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl BearerTokenAuthorizer {
    /// Create an authorizer accepting exactly `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Authorizer for BearerTokenAuthorizer {
    fn authorize(&self, parts: &http::request::Parts) -> Result<(), ApiError> {
        let presented = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| {
                v.split_once(' ')
                    .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
                    .map(|(_, token)| token.trim())
            })
            .ok_or_else(|| ApiError::access_denied("Missing bearer token"))?;

        if bool::from(presented.as_bytes().ct_eq(self.token.as_bytes())) {
            Ok(())
        } else {
            Err(ApiError::access_denied("Invalid bearer token"))
        }
    }
}
