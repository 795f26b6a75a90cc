pub mod common;

pub use common::app_config::{AppConfig, generate_secret_key, get_app_config};
pub use common::db_env::{DbEnvError, get_database_url, get_db_pool};
pub use common::env_check::{ConfigError, require_non_empty_env_vars};
pub use common::hostname::{HostPortError, get_api_base_url};
pub use common::logging::setup_logging;
