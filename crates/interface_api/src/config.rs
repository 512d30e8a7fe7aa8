//! API configuration

use serde::Deserialize;

use domain_feature::UnknownFeaturePolicy;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// JSON flag document; flags start empty in memory when unset
    #[serde(default)]
    pub feature_flags_path: Option<String>,
    /// Answer for flags the snapshot does not define; unknown flags are an
    /// error when unset
    #[serde(default)]
    pub unknown_feature_default: Option<bool>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            feature_flags_path: None,
            unknown_feature_default: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `SPLIT_`-prefixed environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::Environment::with_prefix("SPLIT").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn unknown_feature_policy(&self) -> UnknownFeaturePolicy {
        match self.unknown_feature_default {
            Some(value) => UnknownFeaturePolicy::DefaultTo(value),
            None => UnknownFeaturePolicy::Fail,
        }
    }
}
