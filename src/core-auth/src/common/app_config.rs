use std::env;
use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use data_model_auth::password::{DEFAULT_COST, MAX_COST, MIN_COST};

use crate::common::env_check::{ConfigError, require_non_empty_env_vars};

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_DURATION_SECONDS: u64 = 86400;

/// Keys shorter than this are accepted, but logged as weak.
pub const MIN_RECOMMENDED_SECRET_KEY_LEN: usize = 32;

#[derive(Clone)]
pub struct AppConfig {
    /// Signs session cookies.
    pub secret_key: String,
    pub session_duration_seconds: u64,
    /// bcrypt work factor for newly hashed passwords.
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("secret_key", &"<redacted>")
            .field("session_duration_seconds", &self.session_duration_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

/// Reads the application configuration from the environment.
///
/// SECRET_KEY is mandatory: there is no fallback key.
/// SESSION_DURATION_SECONDS falls back to 24 hours when absent or unparsable.
/// BCRYPT_COST defaults to bcrypt's default cost and must lie in bcrypt's accepted range.
pub fn get_app_config() -> Result<AppConfig, ConfigError> {
    require_non_empty_env_vars(&["SECRET_KEY"])?;
    let secret_key = env::var("SECRET_KEY").map_err(|e| ConfigError::InvalidValue {
        name: "SECRET_KEY",
        reason: e.to_string(),
    })?;

    if secret_key.len() < MIN_RECOMMENDED_SECRET_KEY_LEN {
        tracing::warn!(
            "SECRET_KEY is only {} bytes long; use at least {} random bytes",
            secret_key.len(),
            MIN_RECOMMENDED_SECRET_KEY_LEN
        );
    }

    let session_duration_seconds = env::var("SESSION_DURATION_SECONDS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SESSION_DURATION_SECONDS);

    let bcrypt_cost = match env::var("BCRYPT_COST") {
        Ok(v) => parse_bcrypt_cost(&v)?,
        Err(_) => DEFAULT_COST,
    };

    Ok(AppConfig {
        secret_key,
        session_duration_seconds,
        bcrypt_cost,
    })
}

fn parse_bcrypt_cost(value: &str) -> Result<u32, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: "BCRYPT_COST",
        reason,
    };
    let cost = value.trim().parse::<u32>().map_err(|e| invalid(e.to_string()))?;
    if (MIN_COST..=MAX_COST).contains(&cost) {
        Ok(cost)
    } else {
        Err(invalid(format!("{} is outside {}..={}", cost, MIN_COST, MAX_COST)))
    }
}

/// A fresh random 256-bit key, base64 encoded, suitable for SECRET_KEY.
pub fn generate_secret_key() -> String {
    let bytes: [u8; 32] = rand::random();
    general_purpose::STANDARD.encode(bytes)
}
