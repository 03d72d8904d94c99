mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./cuesplice.toml",
        "~/.config/cuesplice/config.toml",
        "/etc/cuesplice/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if let Some(origin) = &config.origin {
        if origin.protocol != "http" && origin.protocol != "https" {
            anyhow::bail!("Origin protocol must be http or https, got '{}'", origin.protocol);
        }
        if origin.domain_name.is_empty() {
            anyhow::bail!("Origin domain_name cannot be empty");
        }
        if origin.port == 0 {
            anyhow::bail!("Origin port cannot be 0");
        }
    }

    if config.preroll.duration_secs <= 0.0 {
        anyhow::bail!("Preroll duration must be positive");
    }
    if config.preroll.slate_uri.is_empty() {
        anyhow::bail!("Preroll slate_uri cannot be empty");
    }

    Ok(())
}
