use std::fmt;

pub use bcrypt::DEFAULT_COST;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Bcrypt failure: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
}

/// A salted bcrypt hash of a password.
///
/// The only way to build one is [`hash_password`], so a value of this type never holds plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<PasswordHash, PasswordError> {
    let hashed = bcrypt::hash(plaintext, cost)?;
    Ok(PasswordHash(hashed))
}

/// Verify a password against a stored bcrypt hash.
/// Uses constant-time comparison to prevent timing attacks
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(plaintext, hash).map_err(PasswordError::from)
}
