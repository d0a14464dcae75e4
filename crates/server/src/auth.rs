//! Token authentication
//!
//! Protected handlers take an [`AuthenticatedUser`] argument; the extractor
//! rejects the request with 401 before the handler body runs.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use database::services::AuthService;
use log::warn;

use crate::{error::ApiError, state::AppState};

/// Schemes accepted in the `Authorization` header
const SCHEMES: [&str; 2] = ["Token", "Bearer"];

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let Some(header) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            warn!("Missing credentials for {}", parts.uri);
            return Err(ApiError::MissingCredentials);
        };

        let key = token_from_header(header)?;
        let user = AuthService::user_for_token(&state.db, key)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        let user = AuthenticatedUser {
            id: user.id,
            username: user.username,
        };
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}

/// Extracts the key from `Token <key>` or `Bearer <key>`.
///
/// A header using some other scheme counts as no credentials at all.
fn token_from_header(header: &str) -> Result<&str, ApiError> {
    let mut words = header.split_whitespace();

    let scheme = words.next().ok_or(ApiError::MissingCredentials)?;
    if !SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return Err(ApiError::MissingCredentials);
    }

    match (words.next(), words.next()) {
        (Some(key), None) => Ok(key),
        _ => Err(ApiError::InvalidToken),
    }
}
