use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the configuration looked up in the home directory when no
/// `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "opensearch_config.yaml";

/// Number of hits requested per search page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Top-level configuration. The file is flat: its keys are those of [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub search: SearchConfig,
}

/// Connection and query parameters for the log search backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Backend base URLs, e.g. "https://opensearch.internal:9200"
    pub addresses: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Index name or pattern queried by every page request
    #[serde(default = "default_index")]
    pub index: String,
    /// Value of the `dissect.namespace` term filter
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Value of the `dissect.container_name` term filter
    #[serde(default = "default_container")]
    pub container: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_index() -> String {
    "mpop-lke-logs*".to_string()
}

fn default_namespace() -> String {
    "pulsar".to_string()
}

fn default_container() -> String {
    "nginx".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl AppConfig {
    /// Load configuration from a YAML file and environment variables
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        let path_str = config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid config path: {}", config_path.display()))?;

        let mut builder = config::Config::builder();

        builder = builder.add_source(config::File::new(path_str, config::FileFormat::Yaml));

        // Add environment variables with prefix LATENCY_REPORT_
        // Example: LATENCY_REPORT_PASSWORD=secret
        builder = builder.add_source(
            config::Environment::with_prefix("LATENCY_REPORT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("addresses"),
        );

        let config = builder
            .build()
            .with_context(|| format!("Failed to build configuration from '{}'", path_str))?;

        // Deserialize straight from the config value so scalars such as a
        // numeric password are coerced into the string fields
        let search: SearchConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(Self { search })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;

        if search.addresses.is_empty() {
            anyhow::bail!("Configuration requires at least one entry in 'addresses'");
        }

        for address in &search.addresses {
            let parsed = url::Url::parse(address)
                .with_context(|| format!("Invalid backend address '{}'", address))?;
            match parsed.scheme() {
                "http" | "https" => {}
                other => anyhow::bail!(
                    "Backend address '{}' has unsupported scheme '{}'",
                    address,
                    other
                ),
            }
        }

        if search.password.is_some() && search.username.is_none() {
            anyhow::bail!("'password' is set but 'username' is missing");
        }

        if search.page_size == 0 {
            anyhow::bail!("'page_size' must be greater than zero");
        }

        if search.index.trim().is_empty() {
            anyhow::bail!("'index' cannot be empty");
        }

        Ok(())
    }
}

/// Get the default configuration path ($HOME/opensearch_config.yaml)
pub fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Unable to determine home directory"))?;

    Ok(PathBuf::from(home).join(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::NamedTempFile;

    /// Loading reads the process environment; tests that load hold this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn search_config(addresses: &[&str]) -> AppConfig {
        AppConfig {
            search: SearchConfig {
                addresses: addresses.iter().map(|a| a.to_string()).collect(),
                username: Some("admin".to_string()),
                password: Some("admin".to_string()),
                index: default_index(),
                namespace: default_namespace(),
                container: default_container(),
                page_size: DEFAULT_PAGE_SIZE,
            },
        }
    }

    #[test]
    fn test_load_flat_yaml() {
        let _env = env_lock();
        let file = write_config(
            "addresses:\n  - https://search-1:9200\n  - https://search-2:9200\nusername: reader\npassword: hunter2\n",
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(
            config.search.addresses,
            vec!["https://search-1:9200", "https://search-2:9200"]
        );
        assert_eq!(config.search.username.as_deref(), Some("reader"));
        assert_eq!(config.search.password.as_deref(), Some("hunter2"));
        assert_eq!(config.search.index, "mpop-lke-logs*");
        assert_eq!(config.search.namespace, "pulsar");
        assert_eq!(config.search.container, "nginx");
        assert_eq!(config.search.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_defaults() {
        let _env = env_lock();
        let file = write_config(
            "addresses: [\"http://localhost:9200\"]\nindex: edge-logs-*\npage_size: 100\n",
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.search.index, "edge-logs-*");
        assert_eq!(config.search.page_size, 100);
        assert!(config.search.username.is_none());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(dir.path().join("absent.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let _env = env_lock();
        let file = write_config("addresses: [unterminated\n");
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_addresses_fails() {
        let _env = env_lock();
        let file = write_config("username: reader\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("deserialize"));
    }

    #[test]
    fn test_validate_rejects_empty_addresses() {
        let config = search_config(&[]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = search_config(&["not a url"]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid backend address"));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = search_config(&["ftp://search:21"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_password_without_username() {
        let mut config = search_config(&["https://search:9200"]);
        config.search.username = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = search_config(&["https://search:9200"]);
        config.search.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_numeric_credentials_as_strings() {
        let _env = env_lock();
        let file = write_config(
            "addresses: [https://search:9200]\nusername: 1001\npassword: 123456\n",
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.search.username.as_deref(), Some("1001"));
        assert_eq!(config.search.password.as_deref(), Some("123456"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_file() {
        let _env = env_lock();
        let file = write_config(
            "addresses: [https://search:9200]\nusername: reader\npassword: from-file\n",
        );

        std::env::set_var(
            "LATENCY_REPORT_ADDRESSES",
            "https://env-a.test:9200,https://env-b.test:9200",
        );
        std::env::set_var("LATENCY_REPORT_PAGE_SIZE", "250");
        std::env::set_var("LATENCY_REPORT_PASSWORD", "987654");

        let result = AppConfig::load(file.path());

        std::env::remove_var("LATENCY_REPORT_ADDRESSES");
        std::env::remove_var("LATENCY_REPORT_PAGE_SIZE");
        std::env::remove_var("LATENCY_REPORT_PASSWORD");

        let config = result.unwrap();
        assert_eq!(
            config.search.addresses,
            vec!["https://env-a.test:9200", "https://env-b.test:9200"]
        );
        assert_eq!(config.search.page_size, 250);
        assert_eq!(config.search.username.as_deref(), Some("reader"));
        assert_eq!(config.search.password.as_deref(), Some("987654"));
    }
}
