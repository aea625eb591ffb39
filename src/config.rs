//! # Configuration Module
//!
//! Application configuration for the routing host layer, loaded from
//! environment variables or a TOML file.
//!
//! ## Environment Variables
//!
//! ### `VIEWFUL_SERVER_NAME`
//!
//! Host (and optional port) used by [`App::url_for_external`](crate::app::App::url_for_external).
//! Unset by default, in which case only relative URLs can be built.
//!
//! ### `VIEWFUL_URL_SCHEME`
//!
//! Scheme of external URLs. Default: `http`.
//!
//! ### `VIEWFUL_STRICT_SLASHES`
//!
//! Default trailing-slash policy for rules that do not set their own.
//! `true` (default) redirects `/items` to a rule declared as `/items/`;
//! `false` serves both forms.
//!
//! ### `VIEWFUL_AUTOMATIC_OPTIONS`
//!
//! When `true` (default), every rule added to an app also accepts `OPTIONS`
//! and the app answers it with the `Allow` header.
//!
//! ## Example Configuration
//!
//! ```toml
//! server_name = "example.com"
//! preferred_url_scheme = "https"
//! strict_slashes = false
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host used for external URLs (e.g. `example.com`)
    pub server_name: Option<String>,
    /// Scheme used for external URLs (default: `http`)
    pub preferred_url_scheme: String,
    /// Default trailing-slash policy (default: `true`)
    pub strict_slashes: bool,
    /// Answer `OPTIONS` automatically on every rule (default: `true`)
    pub provide_automatic_options: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_name: None,
            preferred_url_scheme: "http".to_string(),
            strict_slashes: true,
            provide_automatic_options: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_name: env::var("VIEWFUL_SERVER_NAME")
                .ok()
                .filter(|s| !s.is_empty()),
            preferred_url_scheme: env::var("VIEWFUL_URL_SCHEME")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.preferred_url_scheme),
            strict_slashes: env_flag("VIEWFUL_STRICT_SLASHES").unwrap_or(defaults.strict_slashes),
            provide_automatic_options: env_flag("VIEWFUL_AUTOMATIC_OPTIONS")
                .unwrap_or(defaults.provide_automatic_options),
        }
    }

    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)
            .map_err(|e| anyhow::anyhow!("invalid config file {}: {e}", path.display()))?;
        Ok(config)
    }
}

fn env_flag(name: &str) -> Option<bool> {
    parse_flag(&env::var(name).ok()?)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
