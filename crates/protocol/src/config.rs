//! Environment-driven configuration for both ends of the protocol.

use std::env;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::types::DEFAULT_PORT;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    /// Deadline for each reply; `None` waits forever
    pub receive_timeout: Option<Duration>,
    pub log_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_millis(5_000),
            receive_timeout: Some(Duration::from_millis(30_000)),
            log_path: None,
        }
    }
}

impl ClientConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("C4_HOST").unwrap_or(defaults.host);
        let port = env_parse("C4_PORT").unwrap_or(defaults.port);
        let connect_timeout = env_parse::<u64>("C4_CONNECT_TIMEOUT_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.connect_timeout);
        let receive_timeout = match env_parse::<u64>("C4_RECEIVE_TIMEOUT_MS") {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.receive_timeout,
        };

        Self {
            host,
            port,
            connect_timeout,
            receive_timeout,
            log_path: env_path("C4_LOG_PATH"),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Responder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderConfig {
    pub host: String,
    pub port: u16,
    /// Idle deadline while waiting for the client's next message.
    ///
    /// `None` by default: a player may think or sit on the rematch prompt
    /// for as long as they like.
    pub receive_timeout: Option<Duration>,
    pub log_path: Option<String>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            receive_timeout: None,
            log_path: None,
        }
    }
}

impl ResponderConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = env::var("C4_RESPONDER_HOST").unwrap_or(defaults.host);
        let port = env_parse("C4_RESPONDER_PORT").unwrap_or(defaults.port);
        let receive_timeout = match env_parse::<u64>("C4_RESPONDER_TIMEOUT_MS") {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => defaults.receive_timeout,
        };

        Self {
            host,
            port,
            receive_timeout,
            log_path: env_path("C4_RESPONDER_LOG_PATH"),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_path(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

/// Interpret the host typed on the connect screen.
///
/// Empty input means localhost; anything else must be a dotted-quad IPv4 address.
pub fn parse_host_input(input: &str) -> Option<Ipv4Addr> {
    let input = input.trim();
    if input.is_empty() {
        return Some(Ipv4Addr::LOCALHOST);
    }
    input.parse().ok()
}

/// Fail fast when the responder's port is already taken.
pub fn check_tcp_listen_available(host: &str, port: u16) -> std::io::Result<()> {
    std::net::TcpListener::bind((host, port)).map(drop)
}
