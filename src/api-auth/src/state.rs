use std::sync::Arc;

use axum::extract::FromRef;
use core_auth::AppConfig;
use data_model_auth::store::UserStore;

use crate::auth::{CredentialError, CredentialService, SessionConfig};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<CredentialService>,
    pub sessions: Arc<SessionConfig>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, config: &AppConfig) -> Result<Self, CredentialError> {
        Ok(AppState {
            credentials: Arc::new(CredentialService::new(users, config.bcrypt_cost)?),
            sessions: Arc::new(SessionConfig {
                secret: config.secret_key.clone(),
                max_age_secs: config.session_duration_seconds,
            }),
        })
    }
}

impl FromRef<AppState> for Arc<CredentialService> {
    fn from_ref(state: &AppState) -> Self {
        state.credentials.clone()
    }
}

impl FromRef<AppState> for Arc<SessionConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
