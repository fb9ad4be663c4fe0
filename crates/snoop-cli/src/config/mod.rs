//! Configuration for the Snoop CLI with multi-source loading.
//!
//! Priority: CLI > Environment (`SNOOP_*`) > `snoop.config.json` > Defaults

mod defaults;
mod loading;
mod validation;

use serde::{Deserialize, Serialize};
use snoop_core::SandboxLimits;

pub use defaults::*;
pub use validation::*;

/// Snoop configuration, loaded from snoop.config.json, the environment and CLI args.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoopConfig {
    /// Base URL chunk files are requested from; no requests are made when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Proxy for chunk file requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Extra request headers, each as "Name: value"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,

    /// Maximum number of requests in flight
    #[serde(default = "default_threads")]
    pub threads: usize,

    /// Glob patterns selecting files in directory mode, relative to the scanned directory
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Iterations any single loop in a loader may run
    #[serde(default = "default_fuel")]
    pub fuel: u64,

    /// Maximum nested call depth inside the sandbox
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
}

impl Default for SnoopConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            proxy: None,
            headers: Vec::new(),
            insecure: false,
            threads: default_threads(),
            include: default_include(),
            fuel: default_fuel(),
            max_call_depth: default_max_call_depth(),
        }
    }
}

impl SnoopConfig {
    /// Sandbox limits derived from `fuel` and `maxCallDepth`.
    pub fn sandbox_limits(&self) -> SandboxLimits {
        SandboxLimits {
            fuel: self.fuel,
            max_call_depth: self.max_call_depth,
        }
    }

    /// Example snoop.config.json content.
    pub fn example_config() -> String {
        let example = Self {
            base_url: Some("https://app.example.com".to_string()),
            proxy: Some("http://127.0.0.1:8080".to_string()),
            headers: vec!["Cookie: session=abc123".to_string()],
            ..Self::default()
        };
        serde_json::to_string_pretty(&example).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_uses_camel_case() {
        let config = SnoopConfig {
            base_url: Some("https://example.com".into()),
            ..SnoopConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("baseUrl").is_some());
        assert!(value.get("maxCallDepth").is_some());
        assert!(value.get("base_url").is_none());
        assert!(value.get("proxy").is_none());
        assert!(value.get("headers").is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SnoopConfig = serde_json::from_str(r#"{ "insecure": true }"#).unwrap();
        assert!(config.insecure);
        assert_eq!(config.threads, DEFAULT_THREADS);
        assert_eq!(config.include, ["**/*.js"]);
        assert_eq!(config.sandbox_limits(), SandboxLimits::default());
    }

    #[test]
    fn test_example_config_parses_and_validates() {
        let config: SnoopConfig = serde_json::from_str(&SnoopConfig::example_config()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://app.example.com"));
        config.validate().unwrap();
    }
}
