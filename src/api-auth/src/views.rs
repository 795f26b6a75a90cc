//! Server-rendered HTML pages.
//!
//! All user-supplied text goes through [`escape_html`] before it is placed in markup.

use data_model_auth::models::UserView;

use crate::auth::{FieldError, Flash};

const STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
           background: #f5f5f5; color: #333; max-width: 640px; margin: 40px auto; padding: 0 20px; }
    nav a { margin-right: 12px; color: #4a6cf7; text-decoration: none; }
    .card { background: #fff; border-radius: 12px; padding: 24px; margin-top: 16px;
            box-shadow: 0 4px 24px rgba(0,0,0,0.08); }
    .form-group { margin-bottom: 16px; }
    .form-group label { display: block; font-weight: 500; margin-bottom: 6px; }
    .form-group input { width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 8px; }
    .errors { color: #d32f2f; font-size: 13px; margin: 4px 0 0; padding-left: 18px; }
    .flash { padding: 10px 14px; border-radius: 8px; margin-top: 16px; }
    .flash-success { background: #ecf8ef; color: #1e7e34; }
    .flash-danger { background: #fff0f0; color: #d32f2f; }
    table { width: 100%; border-collapse: collapse; }
    th, td { text-align: left; padding: 8px; border-bottom: 1px solid #eee; }
"#;

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn layout(title: &str, flashes: &[Flash], content: &str) -> String {
    let flashes_html: String = flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="flash flash-{}">{}</div>"#,
                flash.category.as_str(),
                escape_html(&flash.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head>
<meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head><body>
<nav><a href="/register">Register</a><a href="/login">Login</a><a href="/dashboard">Dashboard</a><a href="/users">Users</a></nav>
{flashes_html}
<div class="card">
{content}
</div>
</body></html>"#,
        title = escape_html(title),
    )
}

fn field_errors_html(errors: &[FieldError], field: &str) -> String {
    let items: String = errors
        .iter()
        .filter(|e| e.field == field)
        .map(|e| format!("<li>{}</li>", escape_html(&e.message)))
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!(r#"<ul class="errors">{}</ul>"#, items)
    }
}

/// Registration form, optionally pre-filled with the rejected username and its field errors.
pub fn render_register(username: &str, errors: &[FieldError], flashes: &[Flash]) -> String {
    let content = format!(
        r#"<h1>Register</h1>
<form method="POST" action="/register">
  <div class="form-group">
    <label for="username">Username</label>
    <input type="text" id="username" name="username" value="{username}" autocomplete="username">
    {username_errors}
  </div>
  <div class="form-group">
    <label for="password">Password</label>
    <input type="password" id="password" name="password" autocomplete="new-password">
    {password_errors}
  </div>
  <button type="submit">Sign Up</button>
</form>
<p>Already have an account? <a href="/login">Log in</a></p>"#,
        username = escape_html(username),
        username_errors = field_errors_html(errors, "username"),
        password_errors = field_errors_html(errors, "password"),
    );
    layout("Register", flashes, &content)
}

pub fn render_login(flashes: &[Flash]) -> String {
    let content = r#"<h1>Login</h1>
<form method="POST" action="/login">
  <div class="form-group">
    <label for="username">Username</label>
    <input type="text" id="username" name="username" required autocomplete="username">
  </div>
  <div class="form-group">
    <label for="password">Password</label>
    <input type="password" id="password" name="password" required autocomplete="current-password">
  </div>
  <button type="submit">Login</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#;
    layout("Login", flashes, content)
}

pub fn render_dashboard(username: &str, flashes: &[Flash]) -> String {
    let content = format!("<h1>Welcome to the Dashboard, {}!</h1>", escape_html(username));
    layout("Dashboard", flashes, &content)
}

pub fn render_users(users: &[UserView], flashes: &[Flash]) -> String {
    let rows: String = users
        .iter()
        .map(|user| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                user.id,
                escape_html(&user.username)
            )
        })
        .collect();
    let content = format!(
        r#"<h1>Users</h1>
<table>
<thead><tr><th>ID</th><th>Username</th></tr></thead>
<tbody>
{rows}</tbody>
</table>"#
    );
    layout("Users", flashes, &content)
}

pub fn render_server_error() -> String {
    layout(
        "Internal Server Error",
        &[],
        "<h1>Internal Server Error</h1><p>Something went wrong. Please try again later.</p>",
    )
}
