pub mod credentials;
pub mod forms;
pub mod session;

pub use credentials::{CredentialError, CredentialService};
pub use forms::{FieldError, LoginForm, RegisterForm, Registration};
pub use session::{Flash, FlashCategory, Session, SessionConfig, SessionError};
