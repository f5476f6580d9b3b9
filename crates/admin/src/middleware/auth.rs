//! Admin authentication extractor.
//!
//! Every admin route requires the static bearer token from
//! `ADMIN_API_TOKEN`. There are no per-admin identities; the token is the
//! capability.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use secrecy::ExposeSecret;
use serde_json::json;

use crate::state::AppState;

/// Extractor that requires the admin bearer token.
pub struct RequireAdmin;

/// Rejection returned when the admin token is missing or wrong.
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Not authorized as admin" })),
        )
            .into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AdminRejection)?;

        if token != state.config().api_token.expose_secret() {
            return Err(AdminRejection);
        }

        Ok(Self)
    }
}
