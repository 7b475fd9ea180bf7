//! Environment-supplied configuration.
//!
//! Every setting has a default so an empty environment yields a usable (if backend-less)
//! configuration. Numeric values that are missing, unparseable or zero fall back to defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{codes, AppError};

pub const NUMBER_PLACEHOLDER: &str = "{number}";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeskEnv {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskConfig {
    pub api_base_url: String,
    /// Full incidents URL; replaces `api_base_url + incidents_endpoint` when set.
    pub incidents_api_url: String,
    pub api_key: String,

    pub incidents_endpoint: String,
    /// May contain `{number}`.
    pub affected_users_endpoint: String,
    pub search_users_path: String,

    pub default_limit: u32,
    pub default_offset: u32,

    pub incidents_cache_ttl: Duration,
    pub affected_users_cache_ttl: Duration,
    pub user_search_cache_ttl: Duration,

    pub request_timeout: Option<Duration>,
    pub env: DeskEnv,
    pub log_level: String,
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            api_base_url: String::new(),
            incidents_api_url: String::new(),
            api_key: String::new(),
            incidents_endpoint: "/incidents".to_string(),
            affected_users_endpoint: "/incidents/{number}/affected-users".to_string(),
            search_users_path: "/search/users".to_string(),
            default_limit: 20,
            default_offset: 0,
            incidents_cache_ttl: Duration::from_millis(60_000),
            affected_users_cache_ttl: Duration::from_millis(300_000),
            user_search_cache_ttl: Duration::from_millis(300_000),
            request_timeout: None,
            env: DeskEnv::Development,
            log_level: "info".to_string(),
        }
    }
}

fn positive<T: std::str::FromStr + PartialEq + Default>(raw: Option<String>) -> Option<T> {
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}

impl DeskConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = DeskConfig::default();
        let text = |key: &str, default: String| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        let millis = |key: &str, default: Duration| -> Duration {
            positive::<u64>(lookup(key))
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        DeskConfig {
            api_base_url: text("DESK_API_BASE_URL", d.api_base_url),
            incidents_api_url: text("DESK_INCIDENTS_API_URL", d.incidents_api_url),
            api_key: text("DESK_API_KEY", d.api_key),
            incidents_endpoint: text("DESK_INCIDENTS_ENDPOINT", d.incidents_endpoint),
            affected_users_endpoint: text(
                "DESK_AFFECTED_USERS_ENDPOINT",
                d.affected_users_endpoint,
            ),
            search_users_path: text("DESK_SEARCH_USERS_PATH", d.search_users_path),
            default_limit: positive(lookup("DESK_DEFAULT_LIMIT")).unwrap_or(d.default_limit),
            default_offset: positive(lookup("DESK_DEFAULT_OFFSET")).unwrap_or(d.default_offset),
            incidents_cache_ttl: millis("DESK_CACHE_TTL_MS", d.incidents_cache_ttl),
            affected_users_cache_ttl: millis(
                "DESK_AFFECTED_USERS_CACHE_TTL_MS",
                d.affected_users_cache_ttl,
            ),
            user_search_cache_ttl: millis(
                "DESK_USER_SEARCH_CACHE_TTL_MS",
                d.user_search_cache_ttl,
            ),
            request_timeout: positive::<u64>(lookup("DESK_REQUEST_TIMEOUT_MS"))
                .map(Duration::from_millis),
            env: match lookup("DESK_ENV").as_deref().map(str::trim) {
                Some(v) if v.eq_ignore_ascii_case("production") => DeskEnv::Production,
                _ => DeskEnv::Development,
            },
            log_level: text("DESK_LOG", d.log_level),
        }
    }

    pub fn is_dev(&self) -> bool {
        self.env == DeskEnv::Development
    }

    pub fn is_prod(&self) -> bool {
        self.env == DeskEnv::Production
    }

    /// Reject base URLs that are set but are not http(s).
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("api_base_url", &self.api_base_url),
            ("incidents_api_url", &self.incidents_api_url),
        ] {
            if !value.is_empty()
                && !value.starts_with("http://")
                && !value.starts_with("https://")
            {
                return Err(AppError::new(
                    codes::CONFIG_INVALID,
                    format!("{field} must be an http(s) URL"),
                )
                .with_details(format!("{field}={value}")));
            }
        }
        Ok(())
    }

    fn base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn incidents_url(&self) -> String {
        if !self.incidents_api_url.is_empty() {
            return self.incidents_api_url.clone();
        }
        format!("{}{}", self.base(), self.incidents_endpoint)
    }

    pub fn pagination(&self) -> Vec<(String, String)> {
        vec![
            ("limit".to_string(), self.default_limit.to_string()),
            ("offset".to_string(), self.default_offset.to_string()),
        ]
    }

    pub fn affected_users_url(&self, incident_number: &str) -> String {
        let endpoint = self
            .affected_users_endpoint
            .replacen(NUMBER_PLACEHOLDER, incident_number, 1);
        format!("{}{}", self.base(), endpoint)
    }

    pub fn search_users_url(&self) -> String {
        format!("{}{}", self.base(), self.search_users_path)
    }

    pub fn assignee_url(&self, incident_number: &str) -> String {
        format!("{}/incidents/{}/assignee", self.base(), incident_number)
    }

    /// Bearer token, when one is configured.
    pub fn bearer(&self) -> Option<String> {
        if self.api_key.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.api_key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> DeskConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DeskConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]), DeskConfig::default());
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let c = config(&[
            ("DESK_DEFAULT_LIMIT", "abc"),
            ("DESK_CACHE_TTL_MS", "0"),
            ("DESK_AFFECTED_USERS_CACHE_TTL_MS", "1500"),
        ]);
        assert_eq!(c.default_limit, 20);
        assert_eq!(c.incidents_cache_ttl, Duration::from_millis(60_000));
        assert_eq!(c.affected_users_cache_ttl, Duration::from_millis(1_500));
    }

    #[test]
    fn url_builders() {
        let c = config(&[
            ("DESK_API_BASE_URL", "https://api.example.com/"),
            ("DESK_API_KEY", "secret"),
        ]);
        assert_eq!(c.incidents_url(), "https://api.example.com/incidents");
        assert_eq!(
            c.affected_users_url("INC42"),
            "https://api.example.com/incidents/INC42/affected-users"
        );
        assert_eq!(c.search_users_url(), "https://api.example.com/search/users");
        assert_eq!(
            c.assignee_url("INC42"),
            "https://api.example.com/incidents/INC42/assignee"
        );
        assert_eq!(c.bearer().as_deref(), Some("Bearer secret"));
    }

    #[test]
    fn incidents_override_replaces_base() {
        let c = config(&[
            ("DESK_API_BASE_URL", "https://api.example.com"),
            ("DESK_INCIDENTS_API_URL", "https://other.example.com/v2/inc"),
        ]);
        assert_eq!(c.incidents_url(), "https://other.example.com/v2/inc");
    }

    #[test]
    fn env_mode_and_validation() {
        let c = config(&[("DESK_ENV", "Production"), ("DESK_API_BASE_URL", "ftp://x")]);
        assert!(c.is_prod());
        assert!(!c.is_dev());
        assert_eq!(c.validate().unwrap_err().code, codes::CONFIG_INVALID);
        assert!(DeskConfig::default().validate().is_ok());
    }
}
