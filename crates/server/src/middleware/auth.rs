//! Authentication extractor.
//!
//! Reads the `Authorization: Bearer` header and resolves it through the
//! configured [`Authenticator`](crate::auth::Authenticator). Never rejects:
//! anonymous and invalid credentials both surface as `None`, and the
//! authorization gate decides what that means for the requested operation.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::auth::Identity;
use crate::state::AppState;

/// Extractor that optionally resolves the current identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalAuth(identity): OptionalAuth,
/// ) -> impl IntoResponse {
///     gate::authorize(identity.as_ref(), Operation::Purchase)?;
///     // ...
/// }
/// ```
pub struct OptionalAuth(pub Option<Identity>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        let identity = match token {
            Some(token) => state.authenticator().authenticate(token).await,
            None => None,
        };

        Ok(Self(identity))
    }
}
