pub mod auth;
pub mod errors;
pub mod routes;
pub mod state;
pub mod views;
