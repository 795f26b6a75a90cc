//! Integration tests for the page routes
//!
//! Tests key endpoints against an in-memory user store:
//! - GET / - Redirect to login
//! - GET/POST /register - Registration form
//! - GET/POST /login - Login form
//! - GET /dashboard - Greeting from the session
//! - GET /users - User listing

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose};
use core_auth::AppConfig;
use data_model_auth::{
    password::{MIN_COST, verify_password},
    store::UserStore,
    test_helpers::MemoryUserStore,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use api_auth::routes::pages::{GUEST_USERNAME, INVALID_CREDENTIALS_MESSAGE, LOGGED_IN_MESSAGE, REGISTERED_MESSAGE};
use api_auth::routes::router;
use api_auth::state::AppState;

fn test_config() -> AppConfig {
    AppConfig {
        secret_key: "routes-test-secret-key-of-reasonable-length".to_string(),
        session_duration_seconds: 3600,
        bcrypt_cost: MIN_COST,
    }
}

/// Helper to create a router over the given store
fn test_router(store: &Arc<MemoryUserStore>) -> Router {
    let users: Arc<dyn UserStore> = store.clone();
    let state = AppState::new(users, &test_config()).unwrap();
    router().with_state(state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Helper to read the response body as text
async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

/// The `name=value` part of the response's Set-Cookie header, ready to send back as a Cookie header
fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().split(';').next().unwrap().to_string())
}

async fn register(app: &Router, username: &str, password: &str) -> Response<Body> {
    send(
        app,
        post_form("/register", &[("username", username), ("password", password)], None),
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> Response<Body> {
    send(app, post_form("/login", &[("username", username), ("password", password)], None)).await
}

//
// GET / tests
//

#[tokio::test]
async fn test_index_redirects_to_login() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

//
// /register tests
//

#[tokio::test]
async fn test_get_register_shows_form() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));

    let response = send(&app, get("/register", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());

    let body = body_text(response).await;
    assert!(body.contains(r#"<form method="POST" action="/register">"#));
}

#[tokio::test]
async fn test_register_creates_user_and_redirects() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);

    let response = register(&app, "alice", "secret123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let users = store.users();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");
    assert_ne!(users[0].password, "secret123");
    assert!(verify_password("secret123", &users[0].password).unwrap());

    // The success notification shows up on the login page, once.
    let cookie = session_cookie(&response).unwrap();
    let login_page = send(&app, get("/login", Some(&cookie))).await;
    let next_cookie = session_cookie(&login_page);
    assert!(body_text(login_page).await.contains(REGISTERED_MESSAGE));

    let cookie_after = next_cookie.unwrap_or(cookie);
    let second_view = body_text(send(&app, get("/login", Some(&cookie_after))).await).await;
    assert!(!second_view.contains(REGISTERED_MESSAGE));
}

#[tokio::test]
async fn test_stored_password_never_equals_plaintext() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);

    let passwords = ["secret123", "x", "$2b$04$looks-like-a-hash", "pass word with spaces", "ünïcødé"];
    for (i, password) in passwords.iter().enumerate() {
        let response = register(&app, &format!("user{}", i), password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    for (user, password) in store.users().iter().zip(passwords) {
        assert_ne!(user.password, password);
        assert!(verify_password(password, &user.password).unwrap());
    }
}

#[tokio::test]
async fn test_register_invalid_form_rerenders_with_errors() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);

    let response = register(&app, "", "secret123").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("This field is required."));

    let response = register(&app, "a", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Field must be between 2 and 20 characters long."));
    assert!(body.contains("This field is required."));
    assert!(body.contains(r#"value="a""#));

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_register_missing_fields_rerenders() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);

    let response = send(&app, post_form("/register", &[], None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This field is required."));
    assert!(store.is_empty());
}

// Documents current behavior: usernames are not unique, so both registrations succeed.
#[tokio::test]
async fn test_register_duplicate_username_creates_two_rows() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);

    assert_eq!(register(&app, "alice", "secret123").await.status(), StatusCode::SEE_OTHER);
    assert_eq!(register(&app, "alice", "other456").await.status(), StatusCode::SEE_OTHER);

    let users = store.users();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.username == "alice"));
    assert_ne!(users[0].id, users[1].id);
}

#[tokio::test]
async fn test_register_store_failure_is_server_error() {
    let app = test_router(&Arc::new(MemoryUserStore::with_failure()));

    let response = register(&app, "alice", "secret123").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("Internal Server Error"));
    assert!(!body.contains("simulated database failure"));
}

//
// /login tests
//

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));
    register(&app, "alice", "secret123").await;

    let response = login(&app, "alice", "secret123").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let cookie = session_cookie(&response).expect("login should set a session cookie");
    let dashboard = send(&app, get("/dashboard", Some(&cookie))).await;
    assert_eq!(dashboard.status(), StatusCode::OK);

    let body = body_text(dashboard).await;
    assert!(body.contains("Welcome to the Dashboard, alice!"));
    assert!(body.contains(LOGGED_IN_MESSAGE));
}

#[tokio::test]
async fn test_session_persists_across_requests() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));
    register(&app, "alice", "secret123").await;
    let cookie = session_cookie(&login(&app, "alice", "secret123").await).unwrap();

    // First visit consumes the flash and re-issues the cookie without it.
    let first = send(&app, get("/dashboard", Some(&cookie))).await;
    let cookie = session_cookie(&first).unwrap_or(cookie);

    let second = send(&app, get("/dashboard", Some(&cookie))).await;
    let body = body_text(second).await;
    assert!(body.contains("Welcome to the Dashboard, alice!"));
    assert!(!body.contains(LOGGED_IN_MESSAGE));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));
    register(&app, "alice", "secret123").await;

    let response = login(&app, "alice", "wrongpass").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none());

    let body = body_text(response).await;
    assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
    assert!(body.contains(r#"<form method="POST" action="/login">"#));

    let dashboard = body_text(send(&app, get("/dashboard", None)).await).await;
    assert!(dashboard.contains(&format!("Welcome to the Dashboard, {}!", GUEST_USERNAME)));
}

#[tokio::test]
async fn test_login_unknown_user_matches_wrong_password() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));
    register(&app, "alice", "secret123").await;

    let wrong_password = login(&app, "alice", "wrongpass").await;
    let unknown_user = login(&app, "mallory", "wrongpass").await;

    assert_eq!(wrong_password.status(), unknown_user.status());
    assert_eq!(
        session_cookie(&wrong_password).is_some(),
        session_cookie(&unknown_user).is_some()
    );
    assert_eq!(body_text(wrong_password).await, body_text(unknown_user).await);
}

#[tokio::test]
async fn test_login_missing_field_is_rejected() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);

    let response = send(&app, post_form("/login", &[("username", "alice")], None)).await;
    assert!(response.status().is_client_error());
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_login_store_failure_is_server_error() {
    let app = test_router(&Arc::new(MemoryUserStore::with_failure()));

    let response = login(&app, "alice", "secret123").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

//
// /dashboard tests
//

#[tokio::test]
async fn test_dashboard_without_session_greets_guest() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));

    let response = send(&app, get("/dashboard", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("Welcome to the Dashboard, Guest!")
    );
}

#[tokio::test]
async fn test_dashboard_ignores_forged_cookie() {
    let app = test_router(&Arc::new(MemoryUserStore::new()));
    register(&app, "alice", "secret123").await;
    let cookie = session_cookie(&login(&app, "alice", "secret123").await).unwrap();

    // Swap the signed payload for one claiming to be someone else.
    let (name, value) = cookie.split_once('=').unwrap();
    let parts: Vec<&str> = value.split(':').collect();
    let forged_payload = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"username":"admin"}"#);
    let forged = format!("{}={}:{}:{}", name, parts[0], forged_payload, parts[2]);

    let body = body_text(send(&app, get("/dashboard", Some(&forged))).await).await;
    assert!(body.contains("Welcome to the Dashboard, Guest!"));
    assert!(!body.contains("admin"));
}

#[tokio::test]
async fn test_session_signed_with_other_key_is_ignored() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);
    register(&app, "alice", "secret123").await;
    let cookie = session_cookie(&login(&app, "alice", "secret123").await).unwrap();

    let users: Arc<dyn UserStore> = store.clone();
    let other_config = AppConfig {
        secret_key: "a-completely-different-secret-key".to_string(),
        ..test_config()
    };
    let other_app = router().with_state(AppState::new(users, &other_config).unwrap());

    let body = body_text(send(&other_app, get("/dashboard", Some(&cookie))).await).await;
    assert!(body.contains("Welcome to the Dashboard, Guest!"));
}

//
// /users tests
//

#[tokio::test]
async fn test_users_lists_all_without_hashes() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);
    register(&app, "alice", "secret123").await;
    register(&app, "bob", "hunter22").await;

    let response = send(&app, get("/users", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    for user in store.users() {
        assert!(body.contains(&user.id.to_string()));
        assert!(body.contains(&user.username));
        assert!(!body.contains(&user.password));
    }
    assert!(!body.contains("$2b$"));
}

#[tokio::test]
async fn test_users_store_failure_is_server_error() {
    let app = test_router(&Arc::new(MemoryUserStore::with_failure()));

    let response = send(&app, get("/users", None)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

//
// Idempotence
//

#[tokio::test]
async fn test_get_requests_do_not_persist() {
    let store = Arc::new(MemoryUserStore::new());
    let app = test_router(&store);
    register(&app, "alice", "secret123").await;
    let before: Vec<_> = store.users().into_iter().map(|u| u.id).collect();

    for _ in 0..3 {
        for uri in ["/login", "/register", "/dashboard", "/users"] {
            let response = send(&app, get(uri, None)).await;
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }
    }

    let after: Vec<_> = store.users().into_iter().map(|u| u.id).collect();
    assert_eq!(before, after);
}
