use serde::Deserialize;

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 20;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Registration form as submitted. Missing fields arrive as empty strings so they
/// are reported as validation errors instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login form as submitted. Both fields must be present; their content is not validated.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// A validation message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// A registration that passed validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
}

impl RegisterForm {
    /// Checks the submission, returning every field error at once on failure.
    pub fn validate(&self) -> Result<Registration, Vec<FieldError>> {
        let mut errors = Vec::new();

        if is_blank(&self.username) {
            errors.push(field_error("username", REQUIRED_MESSAGE));
        } else {
            let chars = self.username.chars().count();
            if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&chars) {
                errors.push(field_error(
                    "username",
                    &format!(
                        "Field must be between {} and {} characters long.",
                        USERNAME_MIN_CHARS, USERNAME_MAX_CHARS
                    ),
                ));
            }
        }

        if is_blank(&self.password) {
            errors.push(field_error("password", REQUIRED_MESSAGE));
        }

        if errors.is_empty() {
            Ok(Registration {
                username: self.username.clone(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn field_error(field: &'static str, message: &str) -> FieldError {
    FieldError {
        field,
        message: message.to_string(),
    }
}
