//! Bearer-token access guard placed in front of the weather routes.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use subtle::{Choice, ConstantTimeEq};
use tracing::warn;

use crate::server::AppState;

pub async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if state.access_tokens.is_empty() {
        return next.run(request).await;
    }

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .is_some_and(|token| is_known_token(&state.access_tokens, token));

    if authorized {
        next.run(request).await
    } else {
        warn!(path = %request.uri().path(), "rejected unauthenticated request");
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." }))).into_response()
    }
}

/// Token from an `Authorization` value. The scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Compares against every known token without short-circuiting on the first match.
fn is_known_token(known: &[String], presented: &str) -> bool {
    known
        .iter()
        .fold(Choice::from(0), |found, candidate| {
            found | candidate.as_bytes().ct_eq(presented.as_bytes())
        })
        .into()
}
