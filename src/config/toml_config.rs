use crate::config::{CacheConfig, ClientConfig};
use crate::utils::error::{HypixelError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// On-disk configuration file.
///
/// ```toml
/// [api]
/// keys = ["${HYPIXEL_KEY}"]
/// timeout_seconds = 10
///
/// [cache]
/// backend = "sqlite"   # or "memory", "redis"
/// cache_name = "hypixel"
/// expire_after_seconds = 60
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    pub cache: Option<CacheConfig>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default)]
    pub keys: Vec<String>,
    pub hypixel_api_url: Option<String>,
    pub mojang_api_url: Option<String>,
    pub crafatar_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| HypixelError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are
    /// left untouched so validation can report them.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Merges the file over the library defaults.
    pub fn into_client_config(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        let api = self.api;

        ClientConfig {
            api_keys: api.keys,
            hypixel_api_url: api.hypixel_api_url.unwrap_or(defaults.hypixel_api_url),
            mojang_api_url: api.mojang_api_url.unwrap_or(defaults.mojang_api_url),
            crafatar_url: api.crafatar_url.unwrap_or(defaults.crafatar_url),
            timeout_seconds: api.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            user_agent: api.user_agent.unwrap_or(defaults.user_agent),
            cache: self.cache,
        }
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|logging| logging.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|logging| logging.json)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        for key in &self.api.keys {
            if ENV_PLACEHOLDER.is_match(key) {
                return Err(HypixelError::MissingConfigError {
                    field: format!("api.keys ({})", key),
                });
            }
        }
        self.clone().into_client_config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackendKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
keys = ["key-one", "key-two"]
hypixel_api_url = "http://localhost:9000"
timeout_seconds = 5

[cache]
backend = "sqlite"
cache_name = "hypixel"
expire_after_seconds = 60
old_data_on_error = false

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.verbose());
        assert!(!config.json_logs());

        let client = config.into_client_config();
        assert_eq!(client.api_keys, vec!["key-one", "key-two"]);
        assert_eq!(client.hypixel_api_url, "http://localhost:9000");
        assert_eq!(client.mojang_api_url, crate::config::DEFAULT_MOJANG_API_URL);
        assert_eq!(client.timeout_seconds, 5);

        let cache = client.cache.unwrap();
        assert_eq!(cache.backend, CacheBackendKind::Sqlite);
        assert_eq!(cache.expire_after_seconds, Some(60));
        assert!(!cache.old_data_on_error);
        assert_eq!(cache.max_entries, 1024);
    }

    #[test]
    fn test_parse_redis_cache() {
        let config = TomlConfig::from_toml_str(
            r#"
[cache]
backend = "redis"
cache_name = "bot"
redis_url = "redis://cache.internal:6379/2"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());

        let cache = config.into_client_config().cache.unwrap();
        assert_eq!(cache.backend, CacheBackendKind::Redis);
        assert_eq!(cache.redis_url, "redis://cache.internal:6379/2");
        assert_eq!(cache.expire_after_seconds, Some(30));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HYPIXELIO_TEST_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[api]
keys = ["${HYPIXELIO_TEST_KEY}"]
"#,
        )
        .unwrap();
        assert_eq!(config.api.keys, vec!["from-env"]);
        assert!(config.validate().is_ok());

        std::env::remove_var("HYPIXELIO_TEST_KEY");
    }

    #[test]
    fn test_unresolved_key_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
keys = ["${HYPIXELIO_DEFINITELY_UNSET_VAR}"]
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(HypixelError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_invalid_url_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
hypixel_api_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        let client = config.into_client_config();
        assert!(client.api_keys.is_empty());
        assert!(client.cache.is_none());
        assert_eq!(client.hypixel_api_url, crate::config::DEFAULT_HYPIXEL_API_URL);
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nkeys = [\"file-key\"]\n\n[cache]\nbackend = \"memory\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api.keys, vec!["file-key"]);
        assert_eq!(config.cache.unwrap().backend, CacheBackendKind::Memory);
    }
}
