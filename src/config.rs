use crate::error::ConfigError;
use dotenv::dotenv;
use serde::Deserialize;
use std::{fs, time::Duration};

pub const DEFAULT_SEARCH_URL: &str = "https://api.github.com/search/repositories";
pub const DEFAULT_USER_AGENT: &str = "repo_finder";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Env variable naming an optional toml config file.
pub const CONFIG_FILE_VAR: &str = "REPO_FINDER_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub search_url: String,
    pub api_token: Option<String>,
    pub user_agent: String,
    pub api_version: String,
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            search_url: DEFAULT_SEARCH_URL.to_owned(),
            api_token: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// Keys accepted in the toml config file, all optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    search_url: Option<String>,
    api_token: Option<String>,
    user_agent: Option<String>,
    api_version: Option<String>,
    debounce_ms: Option<u64>,
}

impl Config {
    /// Loads `.env`, then layers defaults < toml file (if `REPO_FINDER_CONFIG` is set) < env:
    /// 1. **GH_SEARCH_URL**, repository search endpoint.
    /// 2. **GH_API_KEY**, api token sent as bearer authorization.
    /// 3. **GH_API_USER_AGENT**, user agent, github rejects requests without one.
    /// 4. **GH_API_VERSION**, value of the *X-GitHub-Api-Version* header.
    /// 5. **SEARCH_DEBOUNCE_MS**, quiescence window of the query pipeline.
    pub fn load() -> Result<Config, ConfigError> {
        dotenv().ok();
        let mut config = Config::default();
        if let Ok(path) = std::env::var(CONFIG_FILE_VAR) {
            config = config.merge_file(&path)?;
        }
        config.merge_vars(|key| std::env::var(key).ok())
    }

    pub fn merge_file(self, path: &str) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        info!("Loaded config file {}", path);

        Ok(Config {
            search_url: file.search_url.unwrap_or(self.search_url),
            api_token: file.api_token.or(self.api_token),
            user_agent: file.user_agent.unwrap_or(self.user_agent),
            api_version: file.api_version.unwrap_or(self.api_version),
            debounce: file
                .debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(self.debounce),
        })
    }

    /// `lookup` abstracts the process environment so tests don't have to touch it.
    pub fn merge_vars<F>(mut self, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = lookup("GH_SEARCH_URL") {
            self.search_url = url;
        }
        if let Some(token) = lookup("GH_API_KEY") {
            self.api_token = Some(token);
        }
        if let Some(user_agent) = lookup("GH_API_USER_AGENT") {
            self.user_agent = user_agent;
        }
        if let Some(version) = lookup("GH_API_VERSION") {
            self.api_version = version;
        }
        if let Some(value) = lookup("SEARCH_DEBOUNCE_MS") {
            let millis = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "SEARCH_DEBOUNCE_MS",
                    value: value.clone(),
                })?;
            self.debounce = Duration::from_millis(millis);
        }
        Ok(self)
    }
}
