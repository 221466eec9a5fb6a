//! User management service: application-layer orchestration
//!
//! HTTP handlers and the auth middleware are thin wrappers that delegate
//! here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, RepositoryProvider, User, UserRole,
};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Registration input, password in clear text
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check username + password and issue a JWT.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthResult> {
        let user = self.authenticate_basic(username, password).await?;

        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;

        info!(user_id = user.id, username = %user.username, "User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Verify Basic credentials against the stored bcrypt hash.
    pub async fn authenticate_basic(&self, username: &str, password: &str) -> DomainResult<User> {
        let Some(user) = self.repos.users().get_user_by_username(username).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }
        Ok(user)
    }

    /// Verify a bearer token and reload its user, so role changes and
    /// deletions apply to tokens already issued.
    pub async fn authenticate_token(&self, token: &str) -> DomainResult<User> {
        let claims = verify_token(token, &self.jwt_config)
            .map_err(|e| DomainError::Unauthorized(format!("Invalid token: {}", e)))?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| DomainError::Unauthorized("Invalid token subject".into()))?;

        self.repos
            .users()
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("User no longer exists".into()))
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with the `user` role.
    pub async fn register(&self, new_user: NewUser) -> DomainResult<User> {
        self.create(new_user, UserRole::User).await
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list_users().await
    }

    pub async fn get(&self, id: i32) -> DomainResult<User> {
        self.repos
            .users()
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    // ── Commands (mutations) ────────────────────────────────────

    pub async fn set_role(&self, id: i32, role: UserRole) -> DomainResult<User> {
        let user = self
            .repos
            .users()
            .update_role(id, role)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        info!(user_id = id, role = %role, "User role changed");
        Ok(user)
    }

    /// Delete a user with their reservations. Admins are protected.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        let user = self.get(id).await?;
        if user.is_admin() {
            return Err(DomainError::Forbidden(
                "You can't delete a user with the admin role".into(),
            ));
        }

        self.repos.users().delete_cascade(id).await?;
        info!(user_id = id, username = %user.username, "User deleted");
        Ok(())
    }

    /// Create the bootstrap admin when no users exist yet.
    pub async fn ensure_default_admin(&self, admin: NewUser) -> DomainResult<Option<User>> {
        if self.repos.users().count_users().await? > 0 {
            return Ok(None);
        }

        let username = admin.username.clone();
        let user = self.create(admin, UserRole::Admin).await?;
        warn!(
            username = %username,
            "Created default admin account, change its password"
        );
        Ok(Some(user))
    }

    // ── Internals ───────────────────────────────────────────────

    async fn create(&self, new_user: NewUser, role: UserRole) -> DomainResult<User> {
        if new_user.password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self
            .repos
            .users()
            .get_user_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(DomainError::UniqueViolation(format!(
                "User with username: {} already exists",
                new_user.username
            )));
        }

        let password_hash = hash_password(&new_user.password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: new_user.username,
                password_hash,
                name: new_user.name,
                email: new_user.email,
                role,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, role = %user.role, "New user registered");
        Ok(user)
    }
}
