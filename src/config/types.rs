use crate::edge::preroll::PrerollConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Content origin the interceptor forwards to. Optional: when absent,
    /// every request takes the "Origin not found" soft-failure path.
    #[serde(default)]
    pub origin: Option<OriginConfig>,

    #[serde(default)]
    pub preroll: PrerollConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Custom origin descriptor attached to intercepted requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OriginConfig {
    #[serde(default = "default_protocol")]
    pub protocol: String,

    pub domain_name: String,

    #[serde(default = "default_origin_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_protocol() -> String {
    "https".to_string()
}

fn default_origin_port() -> u16 {
    443
}
