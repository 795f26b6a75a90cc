pub mod app_config;
pub mod db_env;
pub mod env_check;
pub mod hostname;
pub mod logging;
