use crate::entities::{auth_token, user};
use chrono::Utc;
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}

pub struct AuthService;

impl AuthService {
    pub async fn create_user(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let password_hash =
            hash_password(password).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        let user = user::ActiveModel {
            id: NotSet,
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
        }
        .insert(db)
        .await?;

        info!("Created user {}", user.username);
        Ok(user)
    }

    /// Creates the user unless the username is already taken.
    /// An existing user's password is left untouched.
    pub async fn ensure_user(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        if Self::find_by_username(db, username).await?.is_some() {
            return Ok(false);
        }

        Self::create_user(db, username, password).await?;
        Ok(true)
    }

    pub async fn find_by_username(
        db: &DatabaseConnection,
        username: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await
    }

    /// The matching user, or `None` when the username or password is wrong
    pub async fn authenticate(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        let Some(user) = Self::find_by_username(db, username).await? else {
            return Ok(None);
        };

        Ok(verify_password(password, &user.password_hash).then_some(user))
    }

    /// Returns the user's token, creating it on first use. Tokens are not rotated.
    pub async fn obtain_token(db: &DatabaseConnection, user_id: i32) -> Result<String, DbErr> {
        if let Some(token) = Self::token_of(db, user_id).await? {
            return Ok(token.key);
        }

        let inserted = auth_token::ActiveModel {
            key: Set(Uuid::new_v4().simple().to_string()),
            user_id: Set(user_id),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(db)
        .await;

        match inserted {
            Ok(token) => Ok(token.key),
            // A concurrent login for the same user may have won the unique index
            Err(err) => match Self::token_of(db, user_id).await? {
                Some(token) => Ok(token.key),
                None => Err(err),
            },
        }
    }

    pub async fn user_for_token(
        db: &DatabaseConnection,
        key: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        let found = auth_token::Entity::find_by_id(key.to_string())
            .find_also_related(user::Entity)
            .one(db)
            .await?;

        let user = found.and_then(|(_, user)| user);
        if user.is_none() {
            warn!("Rejected unknown token");
        }
        Ok(user)
    }

    async fn token_of(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Option<auth_token::Model>, DbErr> {
        auth_token::Entity::find()
            .filter(auth_token::Column::UserId.eq(user_id))
            .one(db)
            .await
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_connection;

    #[tokio::test]
    async fn test_password_is_hashed() {
        let db = test_connection().await;
        let user = AuthService::create_user(&db, "testuser", "password")
            .await
            .unwrap();

        assert_ne!(user.password_hash, "password");
        assert!(user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = test_connection().await;
        AuthService::create_user(&db, "testuser", "password")
            .await
            .unwrap();

        let found = AuthService::authenticate(&db, "testuser", "password")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.username), Some("testuser".to_string()));

        assert!(
            AuthService::authenticate(&db, "testuser", "wrong")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            AuthService::authenticate(&db, "nobody", "password")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_token_is_reused() {
        let db = test_connection().await;
        let user = AuthService::create_user(&db, "testuser", "password")
            .await
            .unwrap();

        let first = AuthService::obtain_token(&db, user.id).await.unwrap();
        let second = AuthService::obtain_token(&db, user.id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);

        let owner = AuthService::user_for_token(&db, &first).await.unwrap();
        assert_eq!(owner.map(|u| u.id), Some(user.id));
        assert!(
            AuthService::user_for_token(&db, "not-a-token")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_ensure_user_does_not_overwrite() {
        let db = test_connection().await;

        assert!(AuthService::ensure_user(&db, "admin", "first").await.unwrap());
        assert!(!AuthService::ensure_user(&db, "admin", "second").await.unwrap());

        assert!(
            AuthService::authenticate(&db, "admin", "first")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            AuthService::authenticate(&db, "admin", "second")
                .await
                .unwrap()
                .is_none()
        );
    }
}
