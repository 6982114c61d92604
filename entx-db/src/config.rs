use entx_api::params::{DEFAULT_PAGE, DEFAULT_PER_PAGE};
use serde::Deserialize;

/// Environment variable overriding [`PaginationConfig::default_page`].
pub const ENV_DEFAULT_PAGE: &str = "ENTX_DEFAULT_PAGE";

/// Environment variable overriding [`PaginationConfig::default_per_page`].
pub const ENV_DEFAULT_PER_PAGE: &str = "ENTX_DEFAULT_PER_PAGE";

/// Defaults used when a request carries no usable page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page")]
    pub default_page: u64,
    #[serde(default = "default_per_page")]
    pub default_per_page: u64,
}

impl PaginationConfig {
    pub fn new(default_page: u64, default_per_page: u64) -> Self {
        Self {
            default_page: default_page.max(1),
            default_per_page: default_per_page.max(1),
        }
    }

    /// Build a config from `ENTX_DEFAULT_PAGE` / `ENTX_DEFAULT_PER_PAGE`.
    ///
    /// Unset, unparsable and non-positive values keep the built-in defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, fallback: u64| {
            lookup(key)
                .and_then(|raw| raw.trim().parse::<u64>().ok())
                .filter(|value| *value >= 1)
                .unwrap_or(fallback)
        };
        Self {
            default_page: read(ENV_DEFAULT_PAGE, DEFAULT_PAGE),
            default_per_page: read(ENV_DEFAULT_PER_PAGE, DEFAULT_PER_PAGE),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: DEFAULT_PAGE,
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default() {
        let config = PaginationConfig::default();
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_per_page, 10);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PaginationConfig = serde_json::from_str(r#"{"default_per_page": 25}"#).unwrap();
        assert_eq!(config, PaginationConfig::new(1, 25));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ENV_DEFAULT_PAGE, "0"), (ENV_DEFAULT_PER_PAGE, " 50 ")]);
        let config = PaginationConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config, PaginationConfig::new(1, 50));

        let config = PaginationConfig::from_lookup(|_| Some("many".to_string()));
        assert_eq!(config, PaginationConfig::default());
    }
}
