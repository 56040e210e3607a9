//! Client configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the portal can start with zero
//! configuration.

use std::path::PathBuf;

use podboard_shared::constants::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_NAME};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Directory holding `podboard.db`.
    /// Env: `PODBOARD_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Name of the admin seeded on first run.
    /// Env: `PODBOARD_ADMIN_NAME`
    /// Default: `"Admin"`
    pub admin_name: String,

    /// Email of the admin seeded on first run.
    /// Env: `PODBOARD_ADMIN_EMAIL`
    /// Default: `"admin@podboard.local"`
    pub admin_email: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            admin_name: DEFAULT_ADMIN_NAME.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("PODBOARD_DATA_DIR") {
            if dir.trim().is_empty() {
                tracing::warn!("Empty PODBOARD_DATA_DIR, using platform default");
            } else {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(name) = lookup("PODBOARD_ADMIN_NAME") {
            if !name.trim().is_empty() {
                config.admin_name = name.trim().to_string();
            }
        }

        if let Some(email) = lookup("PODBOARD_ADMIN_EMAIL") {
            if looks_like_email(&email) {
                config.admin_email = email.trim().to_string();
            } else {
                tracing::warn!(value = %email, "Invalid PODBOARD_ADMIN_EMAIL, using default");
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PODBOARD_DATA_DIR", "/tmp/podboard"),
            ("PODBOARD_ADMIN_NAME", " Host "),
            ("PODBOARD_ADMIN_EMAIL", "host@show.fm"),
        ]));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/podboard")));
        assert_eq!(config.admin_name, "Host");
        assert_eq!(config.admin_email, "host@show.fm");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("PODBOARD_DATA_DIR", "  "),
            ("PODBOARD_ADMIN_EMAIL", "not-an-email"),
        ]));
        assert_eq!(config.data_dir, None);
        assert_eq!(config.admin_email, DEFAULT_ADMIN_EMAIL);
    }
}
