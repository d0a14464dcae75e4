use axum::{Json, extract::State, extract::rejection::JsonRejection};
use database::services::AuthService;
use log::{info, warn};
use models::{
    Payload, ValidationErrors,
    validation::{BLANK, INVALID_STRING, NOT_NULL, REQUIRED},
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Credentials accepted by the token endpoint
#[derive(Debug, PartialEq, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Both fields must be non-empty strings. The password is not trimmed.
    fn from_payload(payload: &Payload) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut field = |name: &str| match payload.get(name) {
            Some(Value::String(value)) if !value.is_empty() => Some(value.clone()),
            Some(Value::String(_)) => {
                errors.add(name, BLANK);
                None
            }
            Some(Value::Null) => {
                errors.add(name, NOT_NULL);
                None
            }
            Some(_) => {
                errors.add(name, INVALID_STRING);
                None
            }
            None => {
                errors.add(name, REQUIRED);
                None
            }
        };

        match (field("username"), field("password")) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(errors),
        }
    }
}

/// Exchanges a username and password for the user's API token
#[utoipa::path(
    post,
    path = "/api-token-auth/",
    request_body = Credentials,
    responses(
        (status = 200, description = "Credentials accepted", body = TokenResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Credentials rejected", body = crate::error::ErrorBody)
    ),
    tag = "Authentication"
)]
pub async fn obtain_token(
    State(state): State<AppState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    let Credentials { username, password } = Credentials::from_payload(&payload)?;

    let Some(user) = AuthService::authenticate(&state.db, &username, &password).await? else {
        warn!("Failed login for {username}");
        return Err(ApiError::InvalidCredentials);
    };

    let token = AuthService::obtain_token(&state.db, user.id).await?;
    info!("Issued token for {}", user.username);

    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_credentials() {
        let credentials =
            Credentials::from_payload(&payload(json!({ "username": "testuser", "password": " pw " })))
                .unwrap();

        assert_eq!(credentials.username, "testuser");
        assert_eq!(credentials.password, " pw ");
    }

    #[test]
    fn test_credentials_errors() {
        let errors =
            Credentials::from_payload(&payload(json!({ "username": "", "password": 5 })))
                .unwrap_err();

        assert_eq!(errors.field("username"), Some(&[BLANK.to_string()][..]));
        assert_eq!(errors.field("password"), Some(&[INVALID_STRING.to_string()][..]));

        let errors = Credentials::from_payload(&payload(json!({}))).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["password", "username"]);
    }
}
