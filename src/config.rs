//! Credentials and account selection resolved once at startup.
//!
//! The resolved [`Config`] is handed to [`crate::ads_api::GoogleAdsClient::new`]; nothing in the
//! dispatch pipeline reads the environment directly.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{
    DEFAULT_API_VERSION, ENV_API_VERSION, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_CUSTOMER_ID,
    ENV_DEVELOPER_TOKEN, ENV_LOGIN_CUSTOMER_ID, ENV_REFRESH_TOKEN,
};
use crate::error::{Error, Result};

static CUSTOMER_ID_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").ok());

static API_VERSION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^v\d+$").ok());

/// Google Ads API credentials and target account
#[derive(Clone)]
pub struct Config {
    pub client_id:         String,
    pub client_secret:     String,
    pub developer_token:   String,
    pub refresh_token:     String,
    pub customer_id:       String,
    pub login_customer_id: Option<String>,
    pub api_version:       String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("customer_id", &self.customer_id)
            .field("login_customer_id", &self.login_customer_id)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::Configuration(format!("{key} is not set")))
        };
        let optional = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let customer_id = normalize_customer_id(ENV_CUSTOMER_ID, &required(ENV_CUSTOMER_ID)?)?;
        let login_customer_id = optional(ENV_LOGIN_CUSTOMER_ID)
            .map(|value| normalize_customer_id(ENV_LOGIN_CUSTOMER_ID, &value))
            .transpose()?;

        let api_version =
            optional(ENV_API_VERSION).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let version_ok = API_VERSION_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&api_version));
        if !version_ok {
            return Err(Error::Configuration(format!(
                "{ENV_API_VERSION} must look like 'v17', got '{api_version}'"
            )));
        }

        Ok(Self {
            client_id: required(ENV_CLIENT_ID)?,
            client_secret: required(ENV_CLIENT_SECRET)?,
            developer_token: required(ENV_DEVELOPER_TOKEN)?,
            refresh_token: required(ENV_REFRESH_TOKEN)?,
            customer_id,
            login_customer_id,
            api_version,
        })
    }
}

/// Strip the dashes the Ads UI shows (`123-456-7890`) and check for ten digits
fn normalize_customer_id(key: &str, raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| *c != '-').collect();
    let valid = CUSTOMER_ID_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&digits));
    if valid {
        Ok(digits)
    } else {
        Err(Error::Configuration(format!(
            "{key} must be a 10-digit customer id, got '{raw}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_CLIENT_ID, "client-id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_DEVELOPER_TOKEN, "dev-token"),
            (ENV_REFRESH_TOKEN, "refresh"),
            (ENV_CUSTOMER_ID, "123-456-7890"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config> {
        Config::from_lookup(|key| env.get(key).map(ToString::to_string))
    }

    #[test]
    fn test_loads_and_normalizes_customer_id() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.customer_id, "1234567890");
        assert_eq!(config.login_customer_id, None);
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_login_customer_id_is_optional_but_validated() {
        let mut env = full_env();
        env.insert(ENV_LOGIN_CUSTOMER_ID, "999-888-7777");
        assert_eq!(
            load(&env).unwrap().login_customer_id.as_deref(),
            Some("9998887777")
        );

        env.insert(ENV_LOGIN_CUSTOMER_ID, "12345");
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains(ENV_LOGIN_CUSTOMER_ID));
    }

    #[test]
    fn test_missing_variable_is_named() {
        let mut env = full_env();
        env.remove(ENV_DEVELOPER_TOKEN);
        let err = load(&env).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains(ENV_DEVELOPER_TOKEN));
    }

    #[test]
    fn test_blank_variable_counts_as_missing() {
        let mut env = full_env();
        env.insert(ENV_REFRESH_TOKEN, "   ");
        assert!(load(&env).unwrap_err().to_string().contains(ENV_REFRESH_TOKEN));
    }

    #[test]
    fn test_rejects_malformed_api_version() {
        let mut env = full_env();
        env.insert(ENV_API_VERSION, "latest");
        assert!(load(&env).is_err());
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let config = load(&full_env()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("refresh"));
    }
}
