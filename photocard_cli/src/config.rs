use std::env;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Runtime settings shared by the CLI and the server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Missing key is not fatal here; extraction fails at request time instead.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Extra fonts loaded on top of the system ones (e.g. a Bengali face).
    pub font_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            font_dir: None,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty("GEMINI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_base_url),
            font_dir: non_empty("PHOTOCARD_FONT_DIR").map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]);
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert!(config.font_dir.is_none());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "  ")]);
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("GEMINI_BASE_URL", "http://localhost:9999/"),
            ("PHOTOCARD_FONT_DIR", "/usr/share/fonts/bengali"),
        ]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini_model, "gemini-pro");
        assert_eq!(config.gemini_base_url, "http://localhost:9999");
        assert_eq!(config.font_dir, Some(PathBuf::from("/usr/share/fonts/bengali")));
    }
}
