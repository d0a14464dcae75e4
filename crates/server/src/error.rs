use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use database::services::AuthError;
use log::error;
use models::ValidationErrors;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every non-validation error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    MalformedBody(String),

    #[error("Not found.")]
    NotFound,

    #[error("Authentication credentials were not provided.")]
    MissingCredentials,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("Unable to log in with provided credentials.")]
    InvalidCredentials,

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MissingCredentials | Self::InvalidToken | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Database(_) | Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(e) => Self::Database(e),
            AuthError::PasswordHash(e) => Self::PasswordHash(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

// Non-numeric ids never match a row
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            Self::Validation(errors) => (status, Json(errors)).into_response(),
            Self::MissingCredentials | Self::InvalidToken => (
                status,
                [(header::WWW_AUTHENTICATE, "Token")],
                Json(ErrorBody {
                    detail: self.to_string(),
                }),
            )
                .into_response(),
            Self::Database(_) | Self::PasswordHash(_) => {
                error!("{self}");
                (
                    status,
                    Json(ErrorBody {
                        detail: "A server error occurred.".to_string(),
                    }),
                )
                    .into_response()
            }
            _ => (
                status,
                Json(ErrorBody {
                    detail: self.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(ValidationErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Database(DbErr::Custom("boom".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_token_errors_carry_challenge() {
        let response = ApiError::InvalidToken.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Token");
    }

    #[test]
    fn test_store_errors_are_not_leaked() {
        let response = ApiError::Database(DbErr::Custom("secret".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }
}
