//! Signed-cookie sessions.
//!
//! A [`Session`] is read from the request cookie by its extractor and written back by returning it
//! alongside the handler's response. The cookie holds the whole session (username and pending
//! flash messages) as `issued_at:base64url(json):base64url(hmac_sha256)`.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderValue, StatusCode, header, request::Parts};
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use base64::{Engine as _, engine::general_purpose};
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "user_auth_session";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("HMAC error: {0}")]
    HmacError(String),

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Session payload error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Session cookie is not a valid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to write session cookie");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// Signing key and lifetime shared by every session.
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub max_age_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
        }
    }
}

/// A one-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

/// Everything stored in the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Flash>,
}

impl SessionData {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.flashes.is_empty()
    }
}

/// Per-request session state.
///
/// Extract it in a handler, mutate it, and return it as part of the response. A `Set-Cookie`
/// header is only emitted when the data differs from what the request carried.
pub struct Session {
    data: SessionData,
    loaded: SessionData,
    config: Arc<SessionConfig>,
}

impl Session {
    /// Builds the session from the raw cookie value. Anything that fails to decode (bad format,
    /// bad signature, expired) yields an empty session.
    pub fn load(token: Option<&str>, config: Arc<SessionConfig>) -> Self {
        let data = token
            .and_then(|token| {
                let decoded =
                    now_secs().and_then(|now| decode_session(token, &config.secret, config.max_age_secs, now));
                match decoded {
                    Ok(data) => Some(data),
                    Err(e) => {
                        tracing::debug!(error = %e, "Ignoring session cookie");
                        None
                    }
                }
            })
            .unwrap_or_default();

        Session {
            loaded: data.clone(),
            data,
            config,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.data.username.as_deref()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.data.username = Some(username.into());
    }

    /// Queues a message for the next rendered page.
    pub fn flash(&mut self, category: FlashCategory, message: impl Into<String>) {
        self.data.flashes.push(Flash {
            category,
            message: message.into(),
        });
    }

    /// Removes and returns all pending flash messages, oldest first.
    pub fn take_flashes(&mut self) -> Vec<Flash> {
        std::mem::take(&mut self.data.flashes)
    }

    pub fn is_modified(&self) -> bool {
        self.data != self.loaded
    }

    /// The cookie to send back, if any.
    fn into_set_cookie(self) -> Result<Option<Cookie<'static>>, SessionError> {
        if !self.is_modified() {
            return Ok(None);
        }
        if self.data.is_empty() {
            return Ok(Some(create_removal_cookie()));
        }

        let token = encode_session(&self.data, &self.config.secret, now_secs()?)?;
        Ok(Some(create_session_cookie(&token, self.config.max_age_secs)))
    }
}

impl<S> FromRequestParts<S> for Session
where
    Arc<SessionConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<SessionConfig>::from_ref(state);
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(parse_session_cookie);

        Ok(Session::load(token.as_deref(), config))
    }
}

impl IntoResponseParts for Session {
    type Error = SessionError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        if let Some(cookie) = self.into_set_cookie()? {
            let value = HeaderValue::from_str(&cookie.to_string())?;
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Ok(res)
    }
}

fn now_secs() -> Result<u64, SessionError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

/// Serialize and sign session data, stamped with `issued_at` (unix seconds).
pub fn encode_session(data: &SessionData, secret: &str, issued_at: u64) -> Result<String, SessionError> {
    let json = serde_json::to_vec(data)?;
    let payload = format!("{}:{}", issued_at, general_purpose::URL_SAFE_NO_PAD.encode(json));
    let signature = sign_payload(&payload, secret)?;
    Ok(format!("{}:{}", payload, signature))
}

/// Verify and deserialize a session token.
/// Tokens older than `max_age_secs` at time `now` are rejected.
pub fn decode_session(token: &str, secret: &str, max_age_secs: u64, now: u64) -> Result<SessionData, SessionError> {
    let parts: Vec<&str> = token.split(':').collect();
    let [timestamp_str, body, provided_signature] = parts.as_slice() else {
        return Err(SessionError::InvalidFormat);
    };

    let issued_at: u64 = timestamp_str.parse().map_err(|_| SessionError::InvalidFormat)?;

    let payload = format!("{}:{}", timestamp_str, body);
    verify_signature(&payload, provided_signature, secret)?;

    if now.saturating_sub(issued_at) > max_age_secs {
        return Err(SessionError::Expired);
    }

    let json = general_purpose::URL_SAFE_NO_PAD.decode(body)?;
    Ok(serde_json::from_slice(&json)?)
}

/// Create a session cookie with the token
pub fn create_session_cookie(token: &str, max_age_secs: u64) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(max_age_secs as i64))
        .path("/")
        .build()
}

/// Create a cookie that makes the browser drop the session
pub fn create_removal_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(cookie::time::Duration::seconds(0))
        .path("/")
        .build()
}

/// Parse session token from Cookie header
pub fn parse_session_cookie(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

fn new_mac(secret: &str) -> Result<HmacSha256, SessionError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| SessionError::HmacError(e.to_string()))
}

/// Sign a payload using HMAC-SHA256
fn sign_payload(payload: &str, secret: &str) -> Result<String, SessionError> {
    let mut mac = new_mac(secret)?;
    mac.update(payload.as_bytes());
    let code_bytes = mac.finalize().into_bytes();

    Ok(general_purpose::URL_SAFE_NO_PAD.encode(code_bytes))
}

/// Constant-time check of a base64url signature against the payload
fn verify_signature(payload: &str, signature: &str, secret: &str) -> Result<(), SessionError> {
    let provided = general_purpose::URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| SessionError::InvalidSignature)?;

    let mut mac = new_mac(secret)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&provided).map_err(|_| SessionError::InvalidSignature)
}
