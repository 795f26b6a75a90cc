use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, thiserror::Error)]
pub enum HostPortError {
    #[error("Invalid port: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Invalid hostname: {0}")]
    InvalidHostname(#[from] AddrParseError),
}

/// Gets the host:port to listen on from the env vars HOST and PORT.
/// Uses defaults `127.0.0.1:5000` for whichever is unset.
pub fn get_api_base_url() -> Result<SocketAddr, HostPortError> {
    parse_host_port(std::env::var("HOST").ok().as_deref(), std::env::var("PORT").ok().as_deref())
}

fn parse_host_port(host: Option<&str>, port: Option<&str>) -> Result<SocketAddr, HostPortError> {
    let host = host.unwrap_or(DEFAULT_HOST);
    let port = match port {
        Some(p) => p.trim().parse::<u16>()?,
        None => DEFAULT_PORT,
    };
    Ok(format!("{}:{}", host, port).parse::<SocketAddr>()?)
}
