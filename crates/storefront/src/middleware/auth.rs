//! Authentication extractor for route handlers.
//!
//! Requests carry a bearer session token; the token resolves to a user
//! through the record store's session table. Token issuance belongs to the
//! external auth collaborator, so this layer only validates.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use trendora_core::UserId;

use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user_id): CurrentUser) -> impl IntoResponse {
///     format!("user {user_id}")
/// }
/// ```
pub struct CurrentUser(pub UserId);

/// Rejection returned when the bearer token is missing or unknown.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authorized" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthRejection)?;

        let user_id = state
            .store()
            .find_session_user(token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                AuthRejection
            })?
            .ok_or(AuthRejection)?;

        Ok(Self(user_id))
    }
}
