use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::auth::{CredentialService, FlashCategory, LoginForm, RegisterForm, Session};
use crate::errors::AppError;
use crate::views;

pub const REGISTERED_MESSAGE: &str = "Your account has been created! You can now log in.";
pub const LOGGED_IN_MESSAGE: &str = "Login successful!";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Shown on the dashboard when nobody is logged in.
pub const GUEST_USERNAME: &str = "Guest";

/// GET /
pub async fn get_index() -> Redirect {
    Redirect::to("/login")
}

/// GET /register
pub async fn get_register(mut session: Session) -> impl IntoResponse {
    let flashes = session.take_flashes();
    (session, Html(views::render_register("", &[], &flashes)))
}

/// POST /register
/// Creates the user and sends them to the login page, or re-renders the form with its errors.
pub async fn post_register(
    State(credentials): State<Arc<CredentialService>>,
    mut session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(registration) => {
            credentials.register(registration).await?;
            session.flash(FlashCategory::Success, REGISTERED_MESSAGE);
            Ok((session, Redirect::to("/login")).into_response())
        }
        Err(errors) => {
            tracing::debug!(error_count = errors.len(), "Registration form rejected");
            let flashes = session.take_flashes();
            Ok((session, Html(views::render_register(&form.username, &errors, &flashes))).into_response())
        }
    }
}

/// GET /login
pub async fn get_login(mut session: Session) -> impl IntoResponse {
    let flashes = session.take_flashes();
    (session, Html(views::render_login(&flashes)))
}

/// POST /login
/// On success the username goes into the session. Unknown users and wrong passwords get the
/// same response.
pub async fn post_login(
    State(credentials): State<Arc<CredentialService>>,
    mut session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match credentials.authenticate(&form.username, &form.password).await? {
        Some(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "Successful login");
            session.set_username(form.username);
            session.flash(FlashCategory::Success, LOGGED_IN_MESSAGE);
            Ok((session, Redirect::to("/dashboard")).into_response())
        }
        None => {
            tracing::warn!(username = %form.username, "Failed login attempt");
            session.flash(FlashCategory::Danger, INVALID_CREDENTIALS_MESSAGE);
            let flashes = session.take_flashes();
            Ok((session, Html(views::render_login(&flashes))).into_response())
        }
    }
}

/// GET /dashboard
pub async fn get_dashboard(mut session: Session) -> impl IntoResponse {
    let flashes = session.take_flashes();
    let username = session.username().unwrap_or(GUEST_USERNAME).to_string();
    (session, Html(views::render_dashboard(&username, &flashes)))
}

/// GET /users
pub async fn get_users(
    State(credentials): State<Arc<CredentialService>>,
    mut session: Session,
) -> Result<Response, AppError> {
    let users = credentials.list_users().await?;
    let flashes = session.take_flashes();
    Ok((session, Html(views::render_users(&users, &flashes))).into_response())
}
