use std::sync::Arc;

use data_model_auth::models::{NewUser, UserView};
use data_model_auth::password::{PasswordError, PasswordHash, hash_password, verify_password};
use data_model_auth::store::{StoreError, UserStore};

use super::forms::Registration;

/// Hashed in place of a real password when the username is unknown, so a failed
/// lookup costs as much as a failed verification.
const DUMMY_PASSWORD: &str = "dummy password for unknown users";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("User store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Password hashing task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

/// Creates users and checks their credentials.
///
/// bcrypt is CPU-bound, so hashing and verification run on tokio's blocking pool.
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
    dummy_hash: PasswordHash,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Result<Self, CredentialError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, bcrypt_cost)?;
        Ok(CredentialService {
            users,
            bcrypt_cost,
            dummy_hash,
        })
    }

    /// Hashes the password and stores a new user.
    /// Usernames are not checked for uniqueness: registering a taken name adds another row.
    pub async fn register(&self, registration: Registration) -> Result<UserView, CredentialError> {
        let Registration { username, password } = registration;
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await??;

        let user = self.users.create_user(NewUser::new(username, hash)).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Registered user");
        Ok(user.into())
    }

    /// Checks the password against the oldest user with this username.
    /// Returns `None` both for an unknown username and for a wrong password.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserView>, CredentialError> {
        let user = self.users.find_first_by_username(username).await?;

        let stored_hash = match &user {
            Some(user) => user.password.clone(),
            None => self.dummy_hash.as_str().to_string(),
        };
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await??;

        match user {
            Some(user) if matches => Ok(Some(user.into())),
            _ => Ok(None),
        }
    }

    /// Every user, oldest first, without password hashes.
    pub async fn list_users(&self) -> Result<Vec<UserView>, CredentialError> {
        let users = self.users.list_users().await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }
}
