//! HTTP server configuration parsing from environment variables.

use std::env;

/// Server environment configuration
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            bind_address: lookup("SERVER_BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("SERVER_PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .unwrap_or(5000),
        }
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
