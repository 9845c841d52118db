//! Configuration management for the smoke tester
//!
//! Values resolve from built-in defaults, an optional TOML file, then
//! `LBPROBE_*` environment variables. The CLI layers its flags on top.

use core::fmt::{Debug, Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use std::fs::read_to_string;
use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
/// Test account email used when nothing else is configured.
pub const DEFAULT_EMAIL: &str = "test@example.com";
/// Test account password used when nothing else is configured.
pub const DEFAULT_PASSWORD: &str = "testpassword123";

const ENV_BASE_URL: &str = "LBPROBE_BASE_URL";
const ENV_EMAIL: &str = "LBPROBE_EMAIL";
const ENV_PASSWORD: &str = "LBPROBE_PASSWORD";

const MASK: &str = "********";

/// Full smoke-test configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the service under test lives.
    pub target: TargetConfig,
    /// Account used for the single login call.
    pub credentials: Credentials,
    /// Optional listing parameters sent with every leaderboard read.
    pub leaderboard: LeaderboardQuery,
}

impl Config {
    /// Loads configuration from a TOML file. Keys absent from the file keep
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlays values found through `lookup`, keyed by the `LBPROBE_*`
    /// variable names. Empty values are ignored.
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(base_url) = present(ENV_BASE_URL) {
            self.target.base_url = base_url;
        }
        if let Some(email) = present(ENV_EMAIL) {
            self.credentials.email = email;
        }
        if let Some(password) = present(ENV_PASSWORD) {
            self.credentials.password = password;
        }
        self
    }

    /// Checks that the configuration can drive a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http`/`https`
    /// URL, or if either credential is empty.
    pub fn validate(&self) -> Result<()> {
        self.target.url()?;

        if self.credentials.email.trim().is_empty() {
            return Err(Error::Config("credentials.email is empty".to_owned()));
        }
        if self.credentials.password.is_empty() {
            return Err(Error::Config("credentials.password is empty".to_owned()));
        }
        Ok(())
    }

    /// Pretty TOML rendering with the password replaced by a mask.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_masked_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        if !shown.credentials.password.is_empty() {
            MASK.clone_into(&mut shown.credentials.password);
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

/// Location of the service under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Scheme, host and optional port, e.g. `http://localhost:3000`.
    pub base_url: String,
}

impl TargetConfig {
    /// Parsed and scheme-checked base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the value is not an absolute
    /// `http` or `https` URL.
    pub fn url(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|err| Error::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(Error::InvalidUrl(format!(
                "{}: unsupported scheme `{other}`",
                self.base_url
            ))),
        }
    }

    /// Joins an absolute API path (starting with `/`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim().trim_end_matches('/'))
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// Email/password pair sent to the login endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &MASK)
            .finish()
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_owned(),
            password: DEFAULT_PASSWORD.to_owned(),
        }
    }
}

/// Listing parameters accepted by `GET /api/leaderboard`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardQuery {
    /// Maximum rows returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Rows skipped before the first returned row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Column to sort by, e.g. `overall_score`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

impl LeaderboardQuery {
    /// Query-string pairs for the parameters that are set, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("order_by", order_by.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.to_string()));
        }
        pairs
    }
}

/// Sort direction for leaderboard listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Lowest first.
    Asc,
    /// Highest first.
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> core::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("invalid sort order `{other}` (expected asc or desc)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default_matches_builtin_constants() {
        let config = Config::default();
        assert_eq!(config.target.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.credentials.email, DEFAULT_EMAIL);
        assert_eq!(config.credentials.password, DEFAULT_PASSWORD);
        assert!(config.leaderboard.pairs().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = Config::default().with_env(lookup_from(&[
            ("LBPROBE_BASE_URL", "https://staging.example.com"),
            ("LBPROBE_EMAIL", "ci@example.com"),
        ]));
        assert_eq!(config.target.base_url, "https://staging.example.com");
        assert_eq!(config.credentials.email, "ci@example.com");
        assert_eq!(config.credentials.password, DEFAULT_PASSWORD);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = Config::default().with_env(lookup_from(&[("LBPROBE_PASSWORD", "")]));
        assert_eq!(config.credentials.password, DEFAULT_PASSWORD);
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_keys() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("lbprobe.toml");
        fs::write(
            &path,
            "[target]\nbase_url = \"http://127.0.0.1:8080\"\n\n[leaderboard]\nlimit = 10\norder = \"asc\"\n",
        )
        .expect("Failed to write config");

        let config = Config::from_file(&path).expect("Failed to load config");
        assert_eq!(config.target.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.credentials, Credentials::default());
        assert_eq!(config.leaderboard.limit, Some(10));
        assert_eq!(config.leaderboard.order, Some(SortOrder::Asc));
    }

    #[test]
    fn test_from_file_rejects_bad_toml() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[target\nbase_url = ").expect("Failed to write config");

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_validate_rejects_bad_urls_and_empty_credentials() {
        let mut config = Config::default();
        config.target.base_url = "ftp://example.com".to_owned();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        config.target.base_url = "not a url".to_owned();
        assert!(matches!(config.validate(), Err(Error::InvalidUrl(_))));

        let mut config = Config::default();
        config.credentials.email = "  ".to_owned();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.credentials.password = String::new();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let target = TargetConfig {
            base_url: "http://localhost:3000/".to_owned(),
        };
        assert_eq!(
            target.endpoint("/api/leaderboard"),
            "http://localhost:3000/api/leaderboard"
        );
    }

    #[test]
    fn test_masked_toml_hides_password() {
        let rendered = Config::default()
            .to_masked_toml()
            .expect("Failed to render config");
        assert!(rendered.contains("test@example.com"));
        assert!(rendered.contains(MASK));
        assert!(!rendered.contains(DEFAULT_PASSWORD));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let rendered = format!("{:?}", Credentials::default());
        assert!(!rendered.contains(DEFAULT_PASSWORD));
    }

    #[test]
    fn test_query_pairs_in_stable_order() {
        let query = LeaderboardQuery {
            limit: Some(25),
            offset: Some(50),
            order_by: Some("accuracy_score".to_owned()),
            order: Some(SortOrder::Desc),
        };
        assert_eq!(
            query.pairs(),
            vec![
                ("limit", "25".to_owned()),
                ("offset", "50".to_owned()),
                ("order_by", "accuracy_score".to_owned()),
                ("order", "desc".to_owned()),
            ]
        );
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
