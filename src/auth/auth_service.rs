use crate::auth::auth_repository::UserRepository;
use crate::auth::{create_token, hash_password, verify_password};
use crate::error::{AppError, Result};

use super::auth_models::User;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, jwt_expiration_hours: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    /// Check credentials and issue a session token. Unknown usernames and
    /// wrong passwords produce the same error so callers cannot probe for
    /// account names.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".into()))?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication("Invalid credentials".into()));
        }

        let token = create_token(
            user.id,
            &user.username,
            &self.jwt_secret,
            self.jwt_expiration_hours,
        )?;

        Ok((user, token))
    }

    /// Create the admin account on first boot. An existing account is left
    /// untouched, so password changes in the environment do not rewrite it.
    pub async fn ensure_seed_user(&self, username: &str, password: &str) -> Result<()> {
        if self.user_repo.find_by_username(username).await?.is_some() {
            tracing::debug!("admin user '{}' already exists, skipping seed", username);
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let user = self.user_repo.create(username, &password_hash, "admin").await?;
        tracing::info!("seeded admin user '{}' ({})", user.username, user.id);

        Ok(())
    }
}
